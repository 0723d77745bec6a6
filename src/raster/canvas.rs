use std::sync::Arc;

use crate::foundation::{
    core::Point,
    error::{CollageError, CollageResult},
};

/// Mutable RGB8 raster the sprites are composited onto.
///
/// Pixels are stored row-major, three bytes per pixel. A pixel is empty iff all three channels
/// are zero; there is no separate occupancy plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Zero-filled (fully empty) canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> CollageResult<Self> {
        let expected = rgb_len(width, height)?;
        if data.len() != expected {
            return Err(CollageError::validation(format!(
                "canvas expects {expected} bytes for {width}x{height} rgb8, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the canvas; see [`Canvas::pixel_checked`].
    pub fn pixel(&self, row: u32, col: u32) -> [u8; 3] {
        let i = self.index(row, col);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn pixel_checked(&self, row: u32, col: u32) -> Option<[u8; 3]> {
        (row < self.height && col < self.width).then(|| self.pixel(row, col))
    }

    pub fn is_empty_at(&self, row: u32, col: u32) -> bool {
        self.pixel(row, col) == [0, 0, 0]
    }

    pub(crate) fn pixel_mut(&mut self, row: u32, col: u32) -> &mut [u8] {
        let i = self.index(row, col);
        &mut self.data[i..i + 3]
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbImage::new(self.width, self.height))
    }

    fn index(&self, row: u32, col: u32) -> usize {
        assert_in_bounds("canvas", self.width, self.height, row, col);
        (row as usize * self.width as usize + col as usize) * 3
    }
}

/// Immutable RGB8 foreground raster whose background pixels are exactly zero.
///
/// Pixel bytes are reference counted so a sprite library can be shared read-only across
/// parallel generation sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    data: Arc<Vec<u8>>,
}

impl Sprite {
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> CollageResult<Self> {
        if width == 0 || height == 0 {
            return Err(CollageError::validation("sprite must be at least 1x1"));
        }
        let expected = rgb_len(width, height)?;
        if data.len() != expected {
            return Err(CollageError::validation(format!(
                "sprite expects {expected} bytes for {width}x{height} rgb8, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::new(data),
        })
    }

    pub fn from_image(img: &image::RgbImage) -> CollageResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, img.as_raw().clone())
    }

    /// Sprite with every pixel set to `rgb`.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> CollageResult<Self> {
        Self::from_raw(width, height, rgb.repeat(width as usize * height as usize))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the sprite.
    pub fn pixel(&self, row: u32, col: u32) -> [u8; 3] {
        assert_in_bounds("sprite", self.width, self.height, row, col);
        let i = (row as usize * self.width as usize + col as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn is_foreground(&self, row: u32, col: u32) -> bool {
        self.pixel(row, col) != [0, 0, 0]
    }

    pub fn footprint(&self) -> Footprint {
        let bits = self
            .data
            .chunks_exact(3)
            .map(|px| px.iter().any(|&c| c != 0))
            .collect();
        Footprint {
            width: self.width,
            height: self.height,
            bits,
        }
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_raw(self.width, self.height, self.data.as_ref().clone())
            .unwrap_or_else(|| image::RgbImage::new(self.width, self.height))
    }
}

/// Boolean indicator of a sprite's non-zero pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Footprint {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the footprint's bounding box.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        assert_in_bounds("footprint", self.width, self.height, row, col);
        self.bits[row as usize * self.width as usize + col as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Canvas coordinates covered by the footprint when placed at `at`.
    pub fn cells_at(&self, at: Point) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(move |(i, _)| {
                let i = i as u32;
                (at.row + i / w, at.col + i % w)
            })
    }
}

/// Fails with a geometry error unless a `w x h` window at `at` lies inside a `width x height`
/// raster.
pub(crate) fn check_window(
    width: u32,
    height: u32,
    at: Point,
    w: u32,
    h: u32,
) -> CollageResult<()> {
    let bottom = u64::from(at.row) + u64::from(h);
    let right = u64::from(at.col) + u64::from(w);
    if bottom > u64::from(height) || right > u64::from(width) {
        return Err(CollageError::geometry(format!(
            "{w}x{h} window at ({}, {}) exceeds {width}x{height} raster",
            at.row, at.col
        )));
    }
    Ok(())
}

pub(crate) fn assert_in_bounds(what: &str, width: u32, height: u32, row: u32, col: u32) {
    assert!(
        row < height && col < width,
        "({row}, {col}) is outside the {width}x{height} {what}"
    );
}

fn rgb_len(width: u32, height: u32) -> CollageResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| CollageError::validation("raster size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/canvas.rs"]
mod tests;
