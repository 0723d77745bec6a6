/// Convenience result type used across the crate.
pub type CollageResult<T> = Result<T, CollageError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Running out of placement patience is not represented here: a dropped sprite is a normal
/// outcome reported through [`Placement::Dropped`](crate::Placement::Dropped).
#[derive(thiserror::Error, Debug)]
pub enum CollageError {
    /// A sprite's bounding box does not fit the canvas at the requested point.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Invalid caller-provided data (labels, patches, configuration, raster sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Every representable instance color has already been handed out.
    #[error("color space exhausted after {allocated} allocations")]
    ColorSpaceExhausted {
        /// Number of colors held by the registry when allocation failed.
        allocated: usize,
    },

    /// Sprite ingestion failures that abort a whole import.
    #[error("import error: {0}")]
    Import(String),

    /// Errors when serializing or deserializing configuration and legends.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollageError {
    /// Build a [`CollageError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`CollageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CollageError::Import`] value.
    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    /// Build a [`CollageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
