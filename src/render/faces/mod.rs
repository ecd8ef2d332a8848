pub mod analog;
pub mod segment;

use anyhow::Context;
use std::path::Path;
use tracing::warn;

use crate::render::surface::Surface;

/// Export helper shared by the faces: data URI or empty string.
pub(crate) fn image_data<S: Surface>(surface: Option<&S>) -> String {
    let Some(surface) = surface else {
        return String::new();
    };
    surface.to_data_url().unwrap_or_else(|e| {
        warn!("Failed to export clock image: {}", e);
        String::new()
    })
}

pub(crate) fn write_png<S: Surface>(surface: Option<&S>, path: &Path) -> anyhow::Result<()> {
    match surface {
        Some(surface) => surface
            .save_png(path)
            .with_context(|| format!("Failed to save PNG: {}", path.display())),
        None => Ok(()),
    }
}
