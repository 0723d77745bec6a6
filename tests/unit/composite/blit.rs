use rand::{SeedableRng, rngs::StdRng};

use super::*;
use crate::foundation::core::Rgb8;

fn put(
    c: &mut Collage,
    at: Point,
    s: &Sprite,
    write: MaskWrite<'_>,
    format: MaskFormat,
) -> CollageResult<()> {
    let mut rng = StdRng::seed_from_u64(0);
    blit(c, at, s, write, format, &mut rng)
}

fn label(id: u8) -> Label {
    Label::new(id).unwrap()
}

/// 3x2 sprite whose middle column is background.
fn notched_sprite() -> Sprite {
    #[rustfmt::skip]
    let data = vec![
        10, 20, 30,  0, 0, 0,  40, 50, 60,
        70, 80, 90,  0, 0, 0,  1, 2, 3,
    ];
    Sprite::from_raw(3, 2, data).unwrap()
}

#[test]
fn label_write_only_touches_footprint() {
    let mut c = Collage::new(6, 4);
    let s = notched_sprite();
    put(&mut c, Point::new(1, 2), &s, MaskWrite::Label(label(3)), MaskFormat::Pixel).unwrap();

    assert_eq!(c.canvas().pixel(1, 2), [10, 20, 30]);
    assert_eq!(c.canvas().pixel(2, 4), [1, 2, 3]);
    assert_eq!(c.mask().label_at(1, 2), 3);
    assert_eq!(c.mask().label_at(1, 3), 0);
    assert_eq!(c.mask().count_label(label(3)), 4);
    assert!(c.colors().is_empty());
}

#[test]
fn blit_is_not_idempotent() {
    let mut c = Collage::new(4, 4);
    let s = Sprite::solid(2, 2, [100, 7, 200]).unwrap();
    for _ in 0..2 {
        put(&mut c, Point::new(0, 0), &s, MaskWrite::Label(label(2)), MaskFormat::Pixel).unwrap();
    }
    // modular accumulation: 200 + 200 wraps
    assert_eq!(c.canvas().pixel(1, 1), [200, 14, 144]);
    assert_eq!(c.mask().label_at(1, 1), 4);
}

#[test]
fn instance_promotion_matches_pixel_label_plane() {
    let s = notched_sprite();
    let at = Point::new(0, 1);

    let mut pixel = Collage::new(5, 3);
    put(&mut pixel, at, &s, MaskWrite::Label(label(9)), MaskFormat::Pixel).unwrap();

    let mut instance = Collage::new(5, 3);
    put(&mut instance, at, &s, MaskWrite::Label(label(9)), MaskFormat::Instance).unwrap();

    assert_eq!(instance.mask().format(), MaskFormat::Instance);
    assert_eq!(instance.mask().label_plane(), pixel.mask().label_plane());
    assert_eq!(instance.canvas(), pixel.canvas());

    let (color, l) = instance.colors().entries().next().unwrap();
    assert_eq!(l, label(9));
    assert!(!color.is_zero());
    assert_eq!(instance.mask().color_at(0, 1), Some(color));
    assert_eq!(instance.mask().color_at(0, 2), Some(Rgb8::BLACK));
}

#[test]
fn pattern_write_copies_whole_box() {
    let mut c = Collage::new(4, 3);
    let s = notched_sprite();
    let patch = MaskPatch::new(3, 2, MaskFormat::Pixel, vec![1, 2, 3, 4, 5, 6]).unwrap();
    put(&mut c, Point::new(1, 1), &s, MaskWrite::Pattern(&patch), MaskFormat::Pixel).unwrap();

    // background column of the sprite still receives the patch value
    assert_eq!(c.mask().label_at(1, 2), 2);
    assert_eq!(c.mask().label_at(2, 3), 6);
    assert_eq!(c.mask().label_at(0, 0), 0);
}

#[test]
fn instance_pattern_write_allocates_no_color() {
    let mut c = Collage::new(3, 3);
    let s = Sprite::solid(1, 1, [5, 5, 5]).unwrap();
    let patch = MaskPatch::uniform(1, 1, MaskFormat::Instance, 8);
    put(&mut c, Point::new(2, 2), &s, MaskWrite::Pattern(&patch), MaskFormat::Instance).unwrap();
    assert!(c.colors().is_empty());
    assert_eq!(c.mask().color_at(2, 2), Some(Rgb8::new(8, 8, 8)));
    assert_eq!(c.mask().label_at(2, 2), 8);
}

#[test]
fn mismatched_patch_is_rejected_before_any_write() {
    let mut c = Collage::new(4, 4);
    let s = Sprite::solid(2, 2, [1, 1, 1]).unwrap();
    let wrong_format = MaskPatch::uniform(2, 2, MaskFormat::Pixel, 1);
    let before = c.clone();
    assert!(
        put(&mut c, Point::new(0, 0), &s, MaskWrite::Pattern(&wrong_format), MaskFormat::Instance).is_err()
    );
    let wrong_size = MaskPatch::uniform(1, 2, MaskFormat::Pixel, 1);
    assert!(
        put(&mut c, Point::new(0, 0), &s, MaskWrite::Pattern(&wrong_size), MaskFormat::Pixel).is_err()
    );
    assert_eq!(c, before);
}

#[test]
fn out_of_bounds_is_a_geometry_error() {
    let mut c = Collage::new(4, 4);
    let s = Sprite::solid(2, 2, [1, 1, 1]).unwrap();
    let before = c.clone();
    let err = put(&mut c, Point::new(3, 0), &s, MaskWrite::Label(label(1)), MaskFormat::Instance).unwrap_err();
    assert!(matches!(err, CollageError::Geometry(_)));
    assert_eq!(c, before);
    assert!(blit_preview(&mut Canvas::new(4, 4), Point::new(0, 3), &s).is_err());
}

#[test]
fn pixel_write_after_promotion_is_rejected() {
    let mut c = Collage::new(4, 4);
    let s = Sprite::solid(1, 1, [1, 1, 1]).unwrap();
    put(&mut c, Point::new(0, 0), &s, MaskWrite::Label(label(1)), MaskFormat::Instance).unwrap();
    let err = put(&mut c, Point::new(2, 2), &s, MaskWrite::Label(label(1)), MaskFormat::Pixel).unwrap_err();
    assert!(matches!(err, CollageError::Validation(_)));
}

#[test]
fn preview_blit_skips_painted_cells() {
    let mut canvas = Canvas::new(3, 1);
    canvas.pixel_mut(0, 1).copy_from_slice(&[0, 0, 9]);
    let s = Sprite::solid(3, 1, [4, 4, 4]).unwrap();
    blit_preview(&mut canvas, Point::new(0, 0), &s).unwrap();
    assert_eq!(canvas.pixel(0, 0), [4, 4, 4]);
    assert_eq!(canvas.pixel(0, 1), [0, 0, 9]);
    assert_eq!(canvas.pixel(0, 2), [4, 4, 4]);
}
