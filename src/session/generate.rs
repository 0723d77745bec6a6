use std::collections::BTreeMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::composite::{blit::MaskWrite, collage::Collage, color::ColorRegistry};
use crate::foundation::{
    core::{Label, Rgb8},
    error::{CollageError, CollageResult},
};
use crate::library::sprites::SpriteLibrary;
use crate::placement::search::{Placement, place, place_init};
use crate::raster::canvas::Sprite;
use crate::session::config::GenerateConfig;

/// One finished collage plus placement statistics.
#[derive(Clone, Debug)]
pub struct GeneratedCollage {
    /// Position within a batch (0 for single runs).
    pub index: u32,
    pub collage: Collage,
    pub attempted: u32,
    pub placed: u32,
    pub dropped: u32,
}

impl GeneratedCollage {
    pub fn legend(&self, library: &SpriteLibrary) -> Legend {
        Legend::new(library, self.collage.colors())
    }
}

/// Human-readable key for a generated mask.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Legend {
    /// Label name to mask value.
    pub labels: BTreeMap<String, Label>,
    /// Instance colors in the order of their packed value; empty for pixel masks.
    pub instances: Vec<InstanceColor>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InstanceColor {
    pub color: Rgb8,
    pub label: Label,
}

impl Legend {
    pub fn new(library: &SpriteLibrary, colors: &ColorRegistry) -> Self {
        Self {
            labels: library
                .labels()
                .iter()
                .map(|(name, label)| (name.to_string(), label))
                .collect(),
            instances: colors
                .entries()
                .map(|(color, label)| InstanceColor { color, label })
                .collect(),
        }
    }
}

/// Builds one collage from `library` on a fresh canvas.
pub fn generate<R: Rng>(
    library: &SpriteLibrary,
    config: &GenerateConfig,
    rng: &mut R,
) -> CollageResult<GeneratedCollage> {
    generate_with_colors(library, config, ColorRegistry::new(), rng)
}

/// Like [`generate`], allocating instance colors from `colors`.
///
/// Pass the registry of the previous collage to keep instance colors unique across a dataset.
#[tracing::instrument(skip_all, fields(width = config.width, height = config.height))]
pub fn generate_with_colors<R: Rng>(
    library: &SpriteLibrary,
    config: &GenerateConfig,
    colors: ColorRegistry,
    rng: &mut R,
) -> CollageResult<GeneratedCollage> {
    config.validate()?;
    let labels = library.populated_labels();
    if labels.is_empty() {
        return Err(CollageError::validation("sprite library is empty"));
    }
    let (max_w, max_h) = library.max_component_size();
    let room = 2 * u64::from(config.scan.margin);
    if u64::from(config.width) <= u64::from(max_w) + room
        || u64::from(config.height) <= u64::from(max_h) + room
    {
        return Err(CollageError::geometry(format!(
            "largest sprite ({max_w}x{max_h}) plus a {}px margin does not fit a {}x{} canvas",
            config.scan.margin, config.width, config.height
        )));
    }

    let mut collage = Collage::with_colors(config.width, config.height, colors);
    let mut usage = Usage::new(library);
    let attempted = rng.random_range(config.min_sprites..=config.max_sprites);
    let (mut placed, mut dropped) = (0u32, 0u32);

    for _ in 0..attempted {
        let (label, sprite) = usage.pick(library, &labels, rng);
        let write = MaskWrite::Label(label);
        let outcome = if placed == 0 {
            place_init(&mut collage, sprite, write, config.format, config.scan, rng)?
        } else {
            place(
                config.strategy,
                &mut collage,
                sprite,
                write,
                config.patience,
                config.format,
                config.scan,
                rng,
            )?
        };
        match outcome {
            Placement::Placed(_) => placed += 1,
            Placement::Dropped => {
                dropped += 1;
                tracing::debug!(%label, patience = config.patience, "sprite dropped");
            }
        }
    }

    tracing::debug!(attempted, placed, dropped, "collage finished");
    Ok(GeneratedCollage {
        index: 0,
        collage,
        attempted,
        placed,
        dropped,
    })
}

/// Generates `config.collages` independent collages in parallel.
///
/// Collage `i` uses its own `StdRng` seeded with `config.seed + i`, so every collage is
/// reproducible on its own regardless of thread count. Results are in index order.
#[tracing::instrument(skip_all, fields(collages = config.collages))]
pub fn generate_batch(
    library: &SpriteLibrary,
    config: &GenerateConfig,
) -> CollageResult<Vec<GeneratedCollage>> {
    config.validate()?;
    let pool = build_thread_pool(config.threads)?;
    pool.install(|| {
        (0..config.collages)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(u64::from(i)));
                let mut out = generate(library, config, &mut rng)?;
                out.index = i;
                Ok(out)
            })
            .collect()
    })
}

/// Per-session sprite usage; picks favour the least-used sprites of a label.
struct Usage {
    counts: Vec<Vec<u32>>,
}

impl Usage {
    fn new(library: &SpriteLibrary) -> Self {
        let counts = library
            .labels()
            .iter()
            .map(|(_, label)| vec![0; library.sprites(label).len()])
            .collect();
        Self { counts }
    }

    fn pick<'a, R: Rng>(
        &mut self,
        library: &'a SpriteLibrary,
        labels: &[Label],
        rng: &mut R,
    ) -> (Label, &'a Sprite) {
        let label = labels[rng.random_range(0..labels.len())];
        let counts = &mut self.counts[usize::from(label.get()) - 1];
        let least = counts.iter().copied().min().unwrap_or(0);
        let candidates: Vec<usize> = (0..counts.len()).filter(|&i| counts[i] == least).collect();
        let idx = candidates[rng.random_range(0..candidates.len())];
        counts[idx] += 1;
        (label, &library.sprites(label)[idx])
    }
}

fn build_thread_pool(threads: Option<usize>) -> CollageResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        CollageError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/generate.rs"]
mod tests;
