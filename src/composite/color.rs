use std::collections::{BTreeMap, HashSet};

use rand::Rng;

use crate::foundation::{
    core::{Label, Rgb8},
    error::{CollageError, CollageResult},
};

/// Number of distinct non-zero RGB8 colors.
pub const COLOR_SPACE: u32 = (1 << 24) - 1;

const RANDOM_DRAWS: usize = 64;

/// Instance colors handed out so far, and the label each one was painted with.
///
/// Scoped to one collage by default. Threading the same registry through several collages
/// keeps colors unique across all of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorRegistry {
    used: HashSet<Rgb8>,
    labels: BTreeMap<Rgb8, Label>,
    limit: u32,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::with_limit(COLOR_SPACE)
    }

    /// Registry that only hands out the first `limit` packed colors (`0x000001..=limit`).
    ///
    /// `limit` is clamped to [`COLOR_SPACE`].
    pub fn with_limit(limit: u32) -> Self {
        Self {
            used: HashSet::new(),
            labels: BTreeMap::new(),
            limit: limit.min(COLOR_SPACE),
        }
    }

    /// Colors handed out so far, including allocated colors not yet passed to
    /// [`ColorRegistry::record`]. Only recorded colors appear in [`ColorRegistry::entries`].
    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn contains(&self, color: Rgb8) -> bool {
        self.used.contains(&color)
    }

    pub fn label_for(&self, color: Rgb8) -> Option<Label> {
        self.labels.get(&color).copied()
    }

    /// `color -> label` entries in color order.
    pub fn entries(&self) -> impl Iterator<Item = (Rgb8, Label)> + '_ {
        self.labels.iter().map(|(c, l)| (*c, *l))
    }

    pub fn record(&mut self, color: Rgb8, label: Label) {
        self.used.insert(color);
        self.labels.insert(color, label);
    }

    pub(crate) fn fresh_color<R: Rng>(&mut self, rng: &mut R) -> CollageResult<Rgb8> {
        if self.limit == 0 || self.used.len() >= self.limit as usize {
            return Err(self.exhausted());
        }

        for _ in 0..RANDOM_DRAWS {
            let color = Rgb8::from_u24(rng.random_range(1..=self.limit));
            if self.used.insert(color) {
                return Ok(color);
            }
        }

        // Dense registry: walk the packed range from a random start.
        let start = rng.random_range(0..self.limit);
        for offset in 0..self.limit {
            let color = Rgb8::from_u24((start + offset) % self.limit + 1);
            if self.used.insert(color) {
                return Ok(color);
            }
        }
        Err(self.exhausted())
    }

    fn exhausted(&self) -> CollageError {
        CollageError::ColorSpaceExhausted {
            allocated: self.used.len(),
        }
    }
}

/// Draws a color never handed out by `registry` and returns it with the updated registry.
///
/// The returned color is always non-zero and is reserved in the registry right away, so it
/// counts towards [`ColorRegistry::len`]. Pair it with a label through [`ColorRegistry::record`]
/// before it shows up in [`ColorRegistry::entries`]; [`blit`](crate::blit) does both.
/// Fails only once every color below the registry's limit is taken.
pub fn allocate<R: Rng>(
    mut registry: ColorRegistry,
    rng: &mut R,
) -> CollageResult<(Rgb8, ColorRegistry)> {
    let color = registry.fresh_color(rng)?;
    Ok((color, registry))
}

#[cfg(test)]
#[path = "../../tests/unit/composite/color.rs"]
mod tests;
