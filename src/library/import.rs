use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::{
    core::Label,
    error::{CollageError, CollageResult},
};
use crate::library::sprites::{SizePolicy, SpriteLibrary};

/// Label directories never imported as sprite classes.
const SKIPPED_DIRS: &[&str] = &["background"];

/// Sizing rules for [`import_dir`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Policy for labels without an entry in `label_sizes`.
    pub default_size: SizePolicy,
    /// Per-label overrides, keyed by directory name.
    pub label_sizes: BTreeMap<String, SizePolicy>,
}

impl ImportOptions {
    pub fn policy_for(&self, label: &str) -> SizePolicy {
        self.label_sizes
            .get(label)
            .copied()
            .unwrap_or(self.default_size)
    }

    pub fn validate(&self) -> CollageResult<()> {
        self.default_size.validate()?;
        for (label, policy) in &self.label_sizes {
            policy
                .validate()
                .map_err(|e| CollageError::validation(format!("label '{label}': {e}")))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportStatus {
    Added(Label),
    Skipped(String),
}

/// Result of importing one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportItem {
    pub path: PathBuf,
    pub status: ImportStatus,
}

/// Per-file outcome of a directory import.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub items: Vec<ImportItem>,
}

impl ImportReport {
    pub fn added(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.status, ImportStatus::Added(_)))
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &str)> + '_ {
        self.items.iter().filter_map(|i| match &i.status {
            ImportStatus::Skipped(reason) => Some((i.path.as_path(), reason.as_str())),
            ImportStatus::Added(_) => None,
        })
    }
}

/// Imports every image under `root/<label>/` into `library`.
///
/// Label directories are visited in name order; hidden entries and `background` are ignored.
/// A file that cannot be decoded or converted is recorded as skipped and the import goes on.
/// Only an unreadable `root` or label directory aborts the import.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn import_dir(
    library: &mut SpriteLibrary,
    root: &Path,
    options: &ImportOptions,
) -> CollageResult<ImportReport> {
    let mut report = ImportReport::default();
    for label_dir in sorted_entries(root)? {
        let Some(name) = visible_name(&label_dir) else {
            continue;
        };
        if !label_dir.is_dir() || SKIPPED_DIRS.contains(&name.as_str()) {
            continue;
        }

        let policy = options.policy_for(&name);
        for file in sorted_entries(&label_dir)? {
            if visible_name(&file).is_none() || !file.is_file() {
                continue;
            }
            let status = match import_file(library, &file, &name, policy) {
                Ok(label) => ImportStatus::Added(label),
                Err(e) => {
                    tracing::debug!(path = %file.display(), error = %e, "skipping sprite");
                    ImportStatus::Skipped(e.to_string())
                }
            };
            report.items.push(ImportItem { path: file, status });
        }
    }
    Ok(report)
}

fn import_file(
    library: &mut SpriteLibrary,
    path: &Path,
    label: &str,
    policy: SizePolicy,
) -> CollageResult<Label> {
    let image = image::open(path).with_context(|| format!("decode sprite '{}'", path.display()))?;
    library.add_label(label)?;
    library.add_image(&image, label, policy)
}

fn sorted_entries(dir: &Path) -> CollageResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read directory '{}'", dir.display()))
        .map_err(|e| CollageError::import(format!("{e:#}")))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("list directory '{}'", dir.display()))
            .map_err(|e| CollageError::import(format!("{e:#}")))?;
        out.push(entry.path());
    }
    out.sort();
    Ok(out)
}

fn visible_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    (!name.starts_with('.')).then(|| name.to_string())
}
