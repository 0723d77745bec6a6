//! Collage synthesizes labeled training images by scattering pre-cropped sprites onto a canvas
//! without pixel-level overlap, producing an aligned segmentation mask alongside.
//!
//! # Engine overview
//!
//! 1. **Compositor** ([`blit`]): writes one sprite into a [`Collage`]'s canvas and mask, as a
//!    label mask ([`MaskFormat::Pixel`]) or an instance mask ([`MaskFormat::Instance`]).
//! 2. **Color allocation** ([`allocate`], [`ColorRegistry`]): unique non-zero color per instance.
//! 3. **Placement search** ([`place_init`], [`place_secondary`], [`place_try`]): bounded random
//!    walks that find a non-overlapping point, then call the compositor once.
//!
//! Around the engine sit a sprite library with directory import ([`SpriteLibrary`],
//! [`import_dir`]), the generation session ([`generate`], [`generate_batch`]) and PNG/JSON export.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit session state**: canvas, mask and color registry live in a [`Collage`] owned by
//!   one session; randomness comes from a caller-provided RNG, so a seed reproduces a collage.
//! - **Dropping is not an error**: exhausted patience yields [`Placement::Dropped`] and leaves the
//!   collage untouched.
#![forbid(unsafe_code)]

mod composite;
mod foundation;
mod library;
mod placement;
mod raster;
mod session;

pub use composite::blit::{MaskWrite, blit, blit_preview};
pub use composite::collage::Collage;
pub use composite::color::{COLOR_SPACE, ColorRegistry, allocate};
pub use foundation::core::{Label, Point, Rgb8};
pub use foundation::error::{CollageError, CollageResult};
pub use library::import::{ImportItem, ImportOptions, ImportReport, ImportStatus, import_dir};
pub use library::labels::LabelBook;
pub use library::preview::preview;
pub use library::sprites::{SizePolicy, SpriteLibrary};
pub use placement::search::{
    Placement, ScanConfig, Strategy, place, place_init, place_secondary, place_try,
};
pub use raster::canvas::{Canvas, Footprint, Sprite};
pub use raster::mask::{Mask, MaskFormat, MaskPatch};
pub use raster::ops::{binary_masks, crop_to_content, extract_sprite};
pub use session::config::GenerateConfig;
pub use session::export::{
    save_canvas_png, save_instance_png, save_label_png, save_legend_json, write_collage,
};
pub use session::generate::{
    GeneratedCollage, InstanceColor, Legend, generate, generate_batch, generate_with_colors,
};
