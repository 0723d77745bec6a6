use crate::composite::blit::blit_preview;
use crate::foundation::{core::Point, error::CollageResult};
use crate::raster::canvas::{Canvas, Sprite};

/// Renders `sprite` at the top-left corner of a white `width x height` canvas.
///
/// Lets a caller judge a sprite's size relative to the collage before adding it to a library.
pub fn preview(sprite: &Sprite, width: u32, height: u32) -> CollageResult<Canvas> {
    let mut canvas = Canvas::new(width, height);
    blit_preview(&mut canvas, Point::new(0, 0), sprite)?;

    let mut out = Vec::with_capacity(canvas.as_raw().len());
    for px in canvas.as_raw().chunks_exact(3) {
        if px == [0, 0, 0] {
            out.extend_from_slice(&[255, 255, 255]);
        } else {
            out.extend_from_slice(px);
        }
    }
    Canvas::from_raw(width, height, out)
}
