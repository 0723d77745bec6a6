use crate::foundation::{
    core::{Label, Point, Rgb8},
    error::{CollageError, CollageResult},
};
use crate::raster::canvas::{Footprint, assert_in_bounds, check_window};

/// Mask encoding requested by a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskFormat {
    /// One channel: label id per pixel.
    Pixel,
    /// Four channels: label id, then an RGB color unique to each placed instance.
    Instance,
}

impl MaskFormat {
    pub fn channels(self) -> usize {
        match self {
            MaskFormat::Pixel => 1,
            MaskFormat::Instance => 4,
        }
    }
}

/// Segmentation mask aligned with a [`Canvas`](crate::Canvas).
///
/// Channel 0 always holds the label plane. A pixel mask becomes an instance mask on the first
/// instance-format write and never goes back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    format: MaskFormat,
    data: Vec<u8>,
}

impl Mask {
    /// Zero-filled pixel mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: MaskFormat::Pixel,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> MaskFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Raw interleaved bytes (`channels()` per pixel).
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the mask; see [`Mask::label_checked`].
    pub fn label_at(&self, row: u32, col: u32) -> u8 {
        self.data[self.index(row, col)]
    }

    pub fn label_checked(&self, row: u32, col: u32) -> Option<u8> {
        (row < self.height && col < self.width).then(|| self.label_at(row, col))
    }

    /// Instance color under a pixel; `None` for pixel masks.
    pub fn color_at(&self, row: u32, col: u32) -> Option<Rgb8> {
        match self.format {
            MaskFormat::Pixel => None,
            MaskFormat::Instance => {
                let i = self.index(row, col);
                Some(Rgb8::new(
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ))
            }
        }
    }

    /// Channel 0 as a standalone row-major plane.
    pub fn label_plane(&self) -> Vec<u8> {
        self.data.iter().step_by(self.channels()).copied().collect()
    }

    /// Channels 1..=3 as interleaved RGB8, or `None` for pixel masks.
    pub fn instance_colors(&self) -> Option<Vec<u8>> {
        match self.format {
            MaskFormat::Pixel => None,
            MaskFormat::Instance => Some(
                self.data
                    .chunks_exact(4)
                    .flat_map(|px| [px[1], px[2], px[3]])
                    .collect(),
            ),
        }
    }

    pub fn count_label(&self, label: Label) -> usize {
        self.data
            .iter()
            .step_by(self.channels())
            .filter(|&&v| v == label.get())
            .count()
    }

    /// Appends three zero channels to every pixel. No-op on instance masks.
    pub fn promote_to_instance(&mut self) {
        if self.format == MaskFormat::Instance {
            return;
        }
        let mut data = Vec::with_capacity(self.data.len() * 4);
        for &v in &self.data {
            data.extend_from_slice(&[v, 0, 0, 0]);
        }
        self.data = data;
        self.format = MaskFormat::Instance;
    }

    /// Rejects writes that would need to demote an instance mask back to pixel format.
    pub(crate) fn ensure_writable_as(&self, format: MaskFormat) -> CollageResult<()> {
        match (self.format, format) {
            (MaskFormat::Instance, MaskFormat::Pixel) => Err(CollageError::validation(
                "pixel-format write into a mask that was already promoted to instance format",
            )),
            _ => Ok(()),
        }
    }

    /// True iff any label-plane cell under `footprint` placed at `at` is non-zero.
    ///
    /// A window reaching past the mask edge is a geometry error, never clipped.
    pub fn overlaps(&self, at: Point, footprint: &Footprint) -> CollageResult<bool> {
        check_window(self.width, self.height, at, footprint.width(), footprint.height())?;
        Ok(self.overlaps_within(at, footprint))
    }

    /// [`Mask::overlaps`] for a window already known to lie inside the mask.
    pub(crate) fn overlaps_within(&self, at: Point, footprint: &Footprint) -> bool {
        footprint
            .cells_at(at)
            .any(|(row, col)| self.label_at(row, col) != 0)
    }

    pub(crate) fn cell_mut(&mut self, row: u32, col: u32) -> &mut [u8] {
        let i = self.index(row, col);
        let n = self.channels();
        &mut self.data[i..i + n]
    }

    fn index(&self, row: u32, col: u32) -> usize {
        assert_in_bounds("mask", self.width, self.height, row, col);
        (row as usize * self.width as usize + col as usize) * self.channels()
    }
}

/// Literal mask values copied over a sprite's whole bounding box in pattern-mode writes.
///
/// The patch carries as many channels as the mask format it targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskPatch {
    width: u32,
    height: u32,
    format: MaskFormat,
    data: Vec<u8>,
}

impl MaskPatch {
    pub fn new(width: u32, height: u32, format: MaskFormat, data: Vec<u8>) -> CollageResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(format.channels()))
            .ok_or_else(|| CollageError::validation("mask patch size overflow"))?;
        if data.len() != expected {
            return Err(CollageError::validation(format!(
                "mask patch expects {expected} bytes for {width}x{height} {format:?}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Patch with every cell set to `value` in every channel.
    pub fn uniform(width: u32, height: u32, format: MaskFormat, value: u8) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![value; width as usize * height as usize * format.channels()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> MaskFormat {
        self.format
    }

    pub(crate) fn cell(&self, row: u32, col: u32) -> &[u8] {
        assert_in_bounds("mask patch", self.width, self.height, row, col);
        let n = self.format.channels();
        let i = (row as usize * self.width as usize + col as usize) * n;
        &self.data[i..i + n]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
