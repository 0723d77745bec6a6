use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{CollageError, CollageResult};
use crate::library::sprites::SpriteLibrary;
use crate::raster::{
    canvas::Canvas,
    mask::{Mask, MaskFormat},
};
use crate::session::generate::{GeneratedCollage, Legend};

pub fn save_canvas_png(canvas: &Canvas, path: &Path) -> CollageResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Writes the label plane as an 8-bit grayscale PNG.
pub fn save_label_png(mask: &Mask, path: &Path) -> CollageResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &mask.label_plane(),
        mask.width(),
        mask.height(),
        image::ColorType::L8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Writes the per-instance color channels as an RGB PNG.
pub fn save_instance_png(mask: &Mask, path: &Path) -> CollageResult<()> {
    let colors = mask
        .instance_colors()
        .ok_or_else(|| CollageError::validation("pixel masks carry no instance colors"))?;
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &colors,
        mask.width(),
        mask.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

pub fn save_legend_json(legend: &Legend, path: &Path) -> CollageResult<()> {
    ensure_parent_dir(path)?;
    let f = std::fs::File::create(path)
        .with_context(|| format!("create legend '{}'", path.display()))?;
    serde_json::to_writer_pretty(f, legend)
        .map_err(|e| CollageError::serde(format!("write legend '{}': {e}", path.display())))
}

/// Writes `<stem>_image.png`, `<stem>_mask.png`, `<stem>_legend.json` and, for instance
/// masks, `<stem>_instances.png` into `dir`. Returns the written paths.
pub fn write_collage(
    dir: &Path,
    stem: &str,
    generated: &GeneratedCollage,
    library: &SpriteLibrary,
) -> CollageResult<Vec<PathBuf>> {
    let collage = &generated.collage;
    let mut written = Vec::with_capacity(4);

    let image_path = dir.join(format!("{stem}_image.png"));
    save_canvas_png(collage.canvas(), &image_path)?;
    written.push(image_path);

    let mask_path = dir.join(format!("{stem}_mask.png"));
    save_label_png(collage.mask(), &mask_path)?;
    written.push(mask_path);

    if collage.mask().format() == MaskFormat::Instance {
        let instances_path = dir.join(format!("{stem}_instances.png"));
        save_instance_png(collage.mask(), &instances_path)?;
        written.push(instances_path);
    }

    let legend_path = dir.join(format!("{stem}_legend.json"));
    save_legend_json(&generated.legend(library), &legend_path)?;
    written.push(legend_path);

    Ok(written)
}

fn ensure_parent_dir(path: &Path) -> CollageResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
