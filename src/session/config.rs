use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;

use crate::foundation::error::{CollageError, CollageResult};
use crate::library::import::ImportOptions;
use crate::placement::search::{ScanConfig, Strategy};
use crate::raster::mask::MaskFormat;

/// Parameters of a collage generation run, loadable from JSON.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub width: u32,
    pub height: u32,
    /// Sprites attempted per collage are drawn uniformly from `min_sprites..=max_sprites`.
    pub min_sprites: u32,
    pub max_sprites: u32,
    /// Walk iterations per sprite before it is dropped.
    pub patience: u32,
    pub strategy: Strategy,
    pub format: MaskFormat,
    pub scan: ScanConfig,
    /// Collage `i` of a batch is generated from `seed + i`.
    pub seed: u64,
    pub collages: u32,
    /// Worker threads for batch generation; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Sprite sizing applied when importing a sprite directory.
    pub import: ImportOptions,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            min_sprites: 10,
            max_sprites: 30,
            patience: 200,
            strategy: Strategy::Try,
            format: MaskFormat::Pixel,
            scan: ScanConfig::default(),
            seed: 0,
            collages: 1,
            threads: None,
            import: ImportOptions::default(),
        }
    }
}

impl GenerateConfig {
    pub fn from_json_file(path: &Path) -> CollageResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| CollageError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> CollageResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CollageError::validation("canvas width/height must be > 0"));
        }
        if self.max_sprites == 0 {
            return Err(CollageError::validation("max_sprites must be > 0"));
        }
        if self.min_sprites > self.max_sprites {
            return Err(CollageError::validation(
                "min_sprites must be <= max_sprites",
            ));
        }
        if self.collages == 0 {
            return Err(CollageError::validation("collages must be > 0"));
        }
        if self.threads == Some(0) {
            return Err(CollageError::validation("threads must be > 0 when set"));
        }
        self.import.validate()?;
        self.scan.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
