use rand::Rng;

use crate::composite::{
    blit::{MaskWrite, blit},
    collage::Collage,
};
use crate::foundation::{
    core::Point,
    error::{CollageError, CollageResult},
};
use crate::raster::{canvas::Sprite, mask::MaskFormat};

/// Border and stride shared by the randomized placement searches.
///
/// `margin` is kept free on every canvas edge when drawing a starting point; `step` bounds
/// each random-walk move to `[-step, step)` per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub margin: u32,
    pub step: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { margin: 5, step: 5 }
    }
}

impl ScanConfig {
    pub fn uniform(constant: u32) -> Self {
        Self {
            margin: constant,
            step: constant,
        }
    }

    pub fn validate(&self) -> CollageResult<()> {
        if self.step == 0 {
            return Err(CollageError::validation("scan step must be > 0"));
        }
        Ok(())
    }
}

/// Outcome of one placement call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The sprite was written with its top-left corner at this point.
    Placed(Point),
    /// Patience ran out; canvas, mask and color registry are unchanged.
    Dropped,
}

impl Placement {
    pub fn is_placed(self) -> bool {
        matches!(self, Placement::Placed(_))
    }

    pub fn point(self) -> Option<Point> {
        match self {
            Placement::Placed(p) => Some(p),
            Placement::Dropped => None,
        }
    }
}

/// Search policy used for every sprite after the first one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Random walk, place at the first free point.
    Secondary,
    /// Escape occupied space, or walk up to its edge and back off one step.
    #[default]
    Try,
}

/// Places `sprite` at a uniformly random point of the margin-bounded interior, without any
/// overlap test. Meant for the first sprite on an empty canvas.
pub fn place_init<R: Rng>(
    collage: &mut Collage,
    sprite: &Sprite,
    write: MaskWrite<'_>,
    format: MaskFormat,
    scan: ScanConfig,
    rng: &mut R,
) -> CollageResult<Placement> {
    let area = WalkArea::new(collage, sprite)?;
    let at = area.initial_point(scan.margin, rng)?;
    blit(collage, at, sprite, write, format, rng)?;
    Ok(Placement::Placed(at))
}

/// Random walk from a random start; places at the first candidate that does not overlap.
///
/// Each of the `patience` iterations perturbs the point, clips it to the canvas and tests it.
/// When every candidate overlaps the sprite is dropped.
pub fn place_secondary<R: Rng>(
    collage: &mut Collage,
    sprite: &Sprite,
    write: MaskWrite<'_>,
    patience: u32,
    format: MaskFormat,
    scan: ScanConfig,
    rng: &mut R,
) -> CollageResult<Placement> {
    scan.validate()?;
    collage.mask().ensure_writable_as(format)?;
    let area = WalkArea::new(collage, sprite)?;
    let footprint = sprite.footprint();

    let mut at = area.initial_point(scan.margin, rng)?;
    for _ in 0..patience {
        at = area.perturb(at, scan.step, rng);
        if !collage.mask().overlaps_within(at, &footprint) {
            blit(collage, at, sprite, write, format, rng)?;
            return Ok(Placement::Placed(at));
        }
    }
    Ok(Placement::Dropped)
}

/// Escape-or-seek walk.
///
/// If the start overlaps, the walk places at the first free point it reaches. If the start
/// is free, the walk keeps moving through free space and, as soon as it steps onto occupied
/// cells, places at the last free point instead. Running out of `patience` drops the sprite,
/// which includes a free start that never reaches occupied space.
pub fn place_try<R: Rng>(
    collage: &mut Collage,
    sprite: &Sprite,
    write: MaskWrite<'_>,
    patience: u32,
    format: MaskFormat,
    scan: ScanConfig,
    rng: &mut R,
) -> CollageResult<Placement> {
    scan.validate()?;
    collage.mask().ensure_writable_as(format)?;
    let area = WalkArea::new(collage, sprite)?;
    let footprint = sprite.footprint();

    let mut at = area.initial_point(scan.margin, rng)?;
    let escaping = collage.mask().overlaps_within(at, &footprint);
    let mut last_free = at;

    for _ in 0..patience {
        at = area.perturb(at, scan.step, rng);
        let overlap = collage.mask().overlaps_within(at, &footprint);
        let target = match (escaping, overlap) {
            (true, true) => continue,
            (true, false) => at,
            (false, false) => {
                last_free = at;
                continue;
            }
            (false, true) => last_free,
        };
        blit(collage, target, sprite, write, format, rng)?;
        return Ok(Placement::Placed(target));
    }
    Ok(Placement::Dropped)
}

/// Runs the bounded search selected by `strategy`.
#[allow(clippy::too_many_arguments)]
pub fn place<R: Rng>(
    strategy: Strategy,
    collage: &mut Collage,
    sprite: &Sprite,
    write: MaskWrite<'_>,
    patience: u32,
    format: MaskFormat,
    scan: ScanConfig,
    rng: &mut R,
) -> CollageResult<Placement> {
    match strategy {
        Strategy::Secondary => place_secondary(collage, sprite, write, patience, format, scan, rng),
        Strategy::Try => place_try(collage, sprite, write, patience, format, scan, rng),
    }
}

/// Legal top-left corners for one sprite: `[0, max_row] x [0, max_col]`.
#[derive(Clone, Copy, Debug)]
struct WalkArea {
    max_row: u32,
    max_col: u32,
}

impl WalkArea {
    fn new(collage: &Collage, sprite: &Sprite) -> CollageResult<Self> {
        let max_row = collage.height().checked_sub(sprite.height());
        let max_col = collage.width().checked_sub(sprite.width());
        match (max_row, max_col) {
            (Some(max_row), Some(max_col)) => Ok(Self { max_row, max_col }),
            _ => Err(CollageError::geometry(format!(
                "{}x{} sprite does not fit a {}x{} canvas",
                sprite.width(),
                sprite.height(),
                collage.width(),
                collage.height()
            ))),
        }
    }

    /// Uniform draw from `[margin, max - margin)` on both axes.
    fn initial_point<R: Rng>(&self, margin: u32, rng: &mut R) -> CollageResult<Point> {
        let row = draw_inside(self.max_row, margin, rng);
        let col = draw_inside(self.max_col, margin, rng);
        match (row, col) {
            (Some(row), Some(col)) => Ok(Point::new(row, col)),
            _ => Err(CollageError::geometry(format!(
                "no starting point leaves a {margin}px margin (placement range {}x{})",
                self.max_col, self.max_row
            ))),
        }
    }

    fn perturb<R: Rng>(&self, at: Point, step: u32, rng: &mut R) -> Point {
        let step = i64::from(step);
        let row = i64::from(at.row) + rng.random_range(-step..step);
        let col = i64::from(at.col) + rng.random_range(-step..step);
        Point::new(
            row.clamp(0, i64::from(self.max_row)) as u32,
            col.clamp(0, i64::from(self.max_col)) as u32,
        )
    }
}

fn draw_inside<R: Rng>(max: u32, margin: u32, rng: &mut R) -> Option<u32> {
    let high = max.checked_sub(margin)?;
    (margin < high).then(|| rng.random_range(margin..high))
}

#[cfg(test)]
#[path = "../../tests/unit/placement/search.rs"]
mod tests;
