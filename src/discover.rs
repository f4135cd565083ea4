use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{BuildError, Result};

/// `source` is either a single `.java` file or a directory searched
/// recursively. The result is sorted so builds are reproducible.
pub fn java_sources(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_dir() {
        return files_with_extension(source, "java");
    }

    if has_extension(source, "java") {
        Ok(vec![source.to_path_buf()])
    } else {
        Ok(Vec::new())
    }
}

pub fn class_files(dir: &Path) -> Result<Vec<PathBuf>> {
    files_with_extension(dir, "class")
}

fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            BuildError::Io {
                path,
                source: e.into(),
            }
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().map_or(false, |e| e == extension)
}
