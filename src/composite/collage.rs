use crate::composite::color::ColorRegistry;
use crate::foundation::error::{CollageError, CollageResult};
use crate::raster::{canvas::Canvas, mask::Mask};

/// Per-session state of one collage: canvas, aligned mask and instance color registry.
///
/// A `Collage` is owned by exactly one generation session. Parallel sessions each build their
/// own; nothing inside is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collage {
    pub(crate) canvas: Canvas,
    pub(crate) mask: Mask,
    pub(crate) colors: ColorRegistry,
}

impl Collage {
    /// Zero canvas, zero pixel mask, empty registry.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_colors(width, height, ColorRegistry::new())
    }

    /// Fresh canvas and mask that keep allocating from an existing registry.
    pub fn with_colors(width: u32, height: u32, colors: ColorRegistry) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            mask: Mask::new(width, height),
            colors,
        }
    }

    pub fn from_parts(canvas: Canvas, mask: Mask, colors: ColorRegistry) -> CollageResult<Self> {
        if (canvas.width(), canvas.height()) != (mask.width(), mask.height()) {
            return Err(CollageError::validation(format!(
                "mask is {}x{} but canvas is {}x{}",
                mask.width(),
                mask.height(),
                canvas.width(),
                canvas.height()
            )));
        }
        Ok(Self {
            canvas,
            mask,
            colors,
        })
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    pub fn into_parts(self) -> (Canvas, Mask, ColorRegistry) {
        (self.canvas, self.mask, self.colors)
    }
}
