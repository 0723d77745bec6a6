use super::*;
use crate::raster::canvas::Sprite;

#[test]
fn promotion_keeps_label_plane_and_zeroes_colors() {
    let mut m = Mask::new(3, 2);
    m.cell_mut(1, 2)[0] = 5;
    let before = m.label_plane();

    m.promote_to_instance();
    assert_eq!(m.format(), MaskFormat::Instance);
    assert_eq!(m.as_raw().len(), 3 * 2 * 4);
    assert_eq!(m.label_plane(), before);
    assert_eq!(m.color_at(1, 2), Some(Rgb8::BLACK));

    // second promotion is a no-op
    let snapshot = m.clone();
    m.promote_to_instance();
    assert_eq!(m, snapshot);
}

#[test]
fn pixel_write_into_instance_mask_is_rejected() {
    let mut m = Mask::new(2, 2);
    assert!(m.ensure_writable_as(MaskFormat::Pixel).is_ok());
    m.promote_to_instance();
    assert!(m.ensure_writable_as(MaskFormat::Instance).is_ok());
    assert!(matches!(
        m.ensure_writable_as(MaskFormat::Pixel),
        Err(CollageError::Validation(_))
    ));
}

#[test]
fn overlap_ignores_cells_outside_footprint() {
    let mut m = Mask::new(4, 4);
    m.cell_mut(0, 0)[0] = 1;

    // footprint has a hole in its top-left corner
    let mut px = vec![9u8; 2 * 2 * 3];
    px[..3].copy_from_slice(&[0, 0, 0]);
    let fp = Sprite::from_raw(2, 2, px).unwrap().footprint();

    assert!(!m.overlaps(Point::new(0, 0), &fp).unwrap());
    m.cell_mut(1, 1)[0] = 2;
    assert!(m.overlaps(Point::new(0, 0), &fp).unwrap());
    assert!(!m.overlaps(Point::new(2, 2), &fp).unwrap());
}

#[test]
fn overlap_reads_channel_zero_of_instance_masks() {
    let mut m = Mask::new(2, 2);
    m.promote_to_instance();
    let fp = Sprite::solid(1, 1, [1, 1, 1]).unwrap().footprint();
    m.cell_mut(0, 0)[1] = 200;
    assert!(!m.overlaps(Point::new(0, 0), &fp).unwrap());
    m.cell_mut(0, 0)[0] = 1;
    assert!(m.overlaps(Point::new(0, 0), &fp).unwrap());
}

#[test]
fn patch_length_must_match_format() {
    assert!(MaskPatch::new(2, 2, MaskFormat::Pixel, vec![0; 4]).is_ok());
    assert!(MaskPatch::new(2, 2, MaskFormat::Instance, vec![0; 4]).is_err());
    let p = MaskPatch::uniform(2, 1, MaskFormat::Instance, 3);
    assert_eq!(p.cell(0, 1), &[3, 3, 3, 3]);
}

#[test]
fn overlap_window_past_an_edge_is_a_geometry_error() {
    let mut m = Mask::new(10, 10);
    m.cell_mut(1, 0)[0] = 3;

    // would wrap into row 1 if the right edge were not checked
    let row = Sprite::solid(5, 1, [1, 1, 1]).unwrap().footprint();
    assert!(matches!(
        m.overlaps(Point::new(0, 8), &row),
        Err(CollageError::Geometry(_))
    ));
    assert!(!m.overlaps(Point::new(0, 5), &row).unwrap());

    let block = Sprite::solid(5, 5, [1, 1, 1]).unwrap().footprint();
    assert!(matches!(
        m.overlaps(Point::new(8, 8), &block),
        Err(CollageError::Geometry(_))
    ));
    assert!(m.overlaps(Point::new(0, 0), &block).unwrap());
    assert!(!m.overlaps(Point::new(5, 5), &block).unwrap());
}

#[test]
fn label_checked_rejects_cells_outside_the_mask() {
    let mut m = Mask::new(10, 10);
    m.cell_mut(4, 2)[0] = 7;
    assert_eq!(m.label_checked(4, 2), Some(7));
    assert_eq!(m.label_checked(3, 12), None);
    assert_eq!(m.label_checked(10, 0), None);
}

#[test]
#[should_panic(expected = "outside the 10x10 mask")]
fn label_at_panics_instead_of_reading_another_row() {
    let _ = Mask::new(10, 10).label_at(3, 12);
}
