//! Raster helpers around the compositor: sprite cropping/extraction and mask post-processing.

use crate::foundation::{
    core::Label,
    error::{CollageError, CollageResult},
};
use crate::raster::{canvas::Sprite, mask::Mask};

/// Crops the zero padding around a sprite's foreground.
///
/// Returns `None` when the sprite has no foreground pixel at all.
pub fn crop_to_content(sprite: &Sprite) -> Option<Sprite> {
    let (w, h) = (sprite.width(), sprite.height());
    let mut min_row = u32::MAX;
    let mut max_row = 0u32;
    let mut min_col = u32::MAX;
    let mut max_col = 0u32;
    for row in 0..h {
        for col in 0..w {
            if sprite.is_foreground(row, col) {
                min_row = min_row.min(row);
                max_row = max_row.max(row);
                min_col = min_col.min(col);
                max_col = max_col.max(col);
            }
        }
    }
    if min_row == u32::MAX {
        return None;
    }

    let out_w = max_col - min_col + 1;
    let out_h = max_row - min_row + 1;
    let mut data = Vec::with_capacity(out_w as usize * out_h as usize * 3);
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            data.extend_from_slice(&sprite.pixel(row, col));
        }
    }
    Sprite::from_raw(out_w, out_h, data).ok()
}

/// Cuts an object out of a photo: pixels where `object_mask` is black become background.
///
/// Both images must have the same dimensions. The result is cropped to its content.
pub fn extract_sprite(
    image: &image::RgbImage,
    object_mask: &image::RgbImage,
) -> CollageResult<Sprite> {
    if image.dimensions() != object_mask.dimensions() {
        return Err(CollageError::validation(format!(
            "object mask is {:?} but image is {:?}",
            object_mask.dimensions(),
            image.dimensions()
        )));
    }
    let mut out = image.clone();
    for (px, m) in out.pixels_mut().zip(object_mask.pixels()) {
        if m.0 == [0, 0, 0] {
            px.0 = [0, 0, 0];
        }
    }
    let sprite = Sprite::from_image(&out)?;
    crop_to_content(&sprite)
        .ok_or_else(|| CollageError::validation("object mask selects no foreground pixel"))
}

/// One 0/1 plane per label, in the order given, from the label plane of `mask`.
pub fn binary_masks(mask: &Mask, labels: &[Label]) -> Vec<Vec<u8>> {
    let plane = mask.label_plane();
    labels
        .iter()
        .map(|label| {
            plane
                .iter()
                .map(|&v| u8::from(v == label.get()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/raster/ops.rs"]
mod tests;
