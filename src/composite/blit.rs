use rand::Rng;

use crate::composite::collage::Collage;
use crate::foundation::{
    core::{Label, Point},
    error::{CollageError, CollageResult},
};
use crate::raster::{
    canvas::{Canvas, Sprite, check_window},
    mask::{MaskFormat, MaskPatch},
};

/// What a blit writes into the mask.
#[derive(Clone, Copy, Debug)]
pub enum MaskWrite<'a> {
    /// Add the label under the sprite's footprint.
    Label(Label),
    /// Add a literal patch over the sprite's whole bounding box, ignoring the footprint.
    Pattern(&'a MaskPatch),
}

/// Adds `sprite` into `canvas` only where the canvas is still empty.
///
/// Painted cells are left as they are, so overlapping sprites partially occlude each other.
/// Used for previews; no mask is involved.
pub fn blit_preview(canvas: &mut Canvas, at: Point, sprite: &Sprite) -> CollageResult<()> {
    check_fits(canvas.width(), canvas.height(), at, sprite)?;
    for row in 0..sprite.height() {
        for col in 0..sprite.width() {
            let (r, c) = (at.row + row, at.col + col);
            if !canvas.is_empty_at(r, c) {
                continue;
            }
            let src = sprite.pixel(row, col);
            for (d, s) in canvas.pixel_mut(r, c).iter_mut().zip(src) {
                *d = d.wrapping_add(s);
            }
        }
    }
    Ok(())
}

/// Writes `sprite` at `at` into the collage's canvas and mask.
///
/// Canvas values accumulate with wrapping `u8` addition, so the destination is expected to be
/// empty: placement searches guarantee that, direct callers must. An instance-format label write
/// promotes the mask if needed and paints a freshly allocated color into channels 1..=3.
///
/// All checks run before the first write; on error the collage is untouched.
pub fn blit<R: Rng>(
    collage: &mut Collage,
    at: Point,
    sprite: &Sprite,
    write: MaskWrite<'_>,
    format: MaskFormat,
    rng: &mut R,
) -> CollageResult<()> {
    check_fits(collage.width(), collage.height(), at, sprite)?;
    collage.mask.ensure_writable_as(format)?;
    if let MaskWrite::Pattern(patch) = write {
        check_patch(patch, sprite, format)?;
    }

    let color = match (format, write) {
        (MaskFormat::Instance, MaskWrite::Label(label)) => {
            let color = collage.colors.fresh_color(rng)?;
            collage.colors.record(color, label);
            Some(color)
        }
        _ => None,
    };
    if format == MaskFormat::Instance {
        collage.mask.promote_to_instance();
    }

    for row in 0..sprite.height() {
        for col in 0..sprite.width() {
            let (r, c) = (at.row + row, at.col + col);
            let src = sprite.pixel(row, col);
            for (d, s) in collage.canvas.pixel_mut(r, c).iter_mut().zip(src) {
                *d = d.wrapping_add(s);
            }

            let cell = collage.mask.cell_mut(r, c);
            match write {
                MaskWrite::Pattern(patch) => {
                    for (d, s) in cell.iter_mut().zip(patch.cell(row, col)) {
                        *d = d.wrapping_add(*s);
                    }
                }
                MaskWrite::Label(label) => {
                    if src == [0, 0, 0] {
                        continue;
                    }
                    cell[0] = cell[0].wrapping_add(label.get());
                    if let Some(color) = color {
                        for (d, s) in cell[1..].iter_mut().zip(color.to_array()) {
                            *d = d.wrapping_add(s);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn check_fits(width: u32, height: u32, at: Point, sprite: &Sprite) -> CollageResult<()> {
    check_window(width, height, at, sprite.width(), sprite.height())
}

fn check_patch(patch: &MaskPatch, sprite: &Sprite, format: MaskFormat) -> CollageResult<()> {
    if (patch.width(), patch.height()) != (sprite.width(), sprite.height()) {
        return Err(CollageError::validation(format!(
            "mask patch is {}x{} but sprite is {}x{}",
            patch.width(),
            patch.height(),
            sprite.width(),
            sprite.height()
        )));
    }
    if patch.format() != format {
        return Err(CollageError::validation(format!(
            "{:?} mask patch cannot be written in {format:?} format",
            patch.format()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blit.rs"]
mod tests;
