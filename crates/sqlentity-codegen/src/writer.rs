//! Writing rendered entities to disk

use crate::generator::{CodegenError, GeneratedEntity};
use std::path::{Path, PathBuf};

/// Write each entity to `<output_dir>/<ClassName>.java`.
///
/// The directory is created if absent; existing files are overwritten.
/// Returns the written paths in entity order.
pub fn write_entities(entities: &[GeneratedEntity], output_dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
    std::fs::create_dir_all(output_dir).map_err(|source| CodegenError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(entities.len());
    for entity in entities {
        let path = output_dir.join(entity.file_name());
        std::fs::write(&path, &entity.source).map_err(|source| CodegenError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(table = %entity.table, file = %path.display(), "Generated entity");
        written.push(path);
    }

    Ok(written)
}
