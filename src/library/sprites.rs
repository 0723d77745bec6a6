use crate::foundation::{
    core::Label,
    error::{CollageError, CollageResult},
};
use crate::library::labels::LabelBook;
use crate::raster::canvas::Sprite;

/// How an incoming image is sized before it becomes a sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SizePolicy {
    /// Keep the decoded dimensions.
    #[default]
    Original,
    /// Nearest-neighbour resize, so zero background stays exactly zero.
    Resize { width: u32, height: u32 },
}

impl SizePolicy {
    pub fn validate(self) -> CollageResult<()> {
        match self {
            SizePolicy::Resize { width, height } if width == 0 || height == 0 => Err(
                CollageError::validation("resize target must be at least 1x1"),
            ),
            _ => Ok(()),
        }
    }

    /// Sizes `rgb` as the policy asks; `Original` hands the image back untouched.
    pub fn apply(self, rgb: image::RgbImage) -> CollageResult<image::RgbImage> {
        self.validate()?;
        Ok(match self {
            SizePolicy::Original => rgb,
            SizePolicy::Resize { width, height } => {
                image::imageops::resize(&rgb, width, height, image::imageops::FilterType::Nearest)
            }
        })
    }
}

/// Sprites grouped by label, shared read-only by generation sessions.
#[derive(Clone, Debug, Default)]
pub struct SpriteLibrary {
    labels: LabelBook,
    sprites: Vec<Vec<Sprite>>,
    max_width: u32,
    max_height: u32,
}

impl SpriteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> &LabelBook {
        &self.labels
    }

    pub fn add_label(&mut self, name: &str) -> CollageResult<Label> {
        let label = self.labels.add(name)?;
        if self.sprites.len() < self.labels.len() {
            self.sprites.push(Vec::new());
        }
        Ok(label)
    }

    /// Converts `image` to a sprite under `policy` and files it under the existing label `name`.
    pub fn add_image(
        &mut self,
        image: &image::DynamicImage,
        name: &str,
        policy: SizePolicy,
    ) -> CollageResult<Label> {
        let label = self
            .labels
            .id(name)
            .ok_or_else(|| CollageError::validation(format!("unknown label '{name}'")))?;
        let rgb = policy.apply(image.to_rgb8())?;
        self.add_sprite(Sprite::from_image(&rgb)?, label)?;
        Ok(label)
    }

    pub fn add_sprite(&mut self, sprite: Sprite, label: Label) -> CollageResult<()> {
        let slot = self
            .sprites
            .get_mut(usize::from(label.get()) - 1)
            .ok_or_else(|| CollageError::validation(format!("unknown label id {label}")))?;
        self.max_width = self.max_width.max(sprite.width());
        self.max_height = self.max_height.max(sprite.height());
        slot.push(sprite);
        Ok(())
    }

    pub fn sprites(&self, label: Label) -> &[Sprite] {
        self.sprites
            .get(usize::from(label.get()) - 1)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Labels that own at least one sprite.
    pub fn populated_labels(&self) -> Vec<Label> {
        self.labels
            .iter()
            .map(|(_, label)| label)
            .filter(|label| !self.sprites(*label).is_empty())
            .collect()
    }

    /// Largest sprite width and height seen so far, as `(width, height)`.
    pub fn max_component_size(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    pub fn len(&self) -> usize {
        self.sprites.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/library/sprites.rs"]
mod tests;
