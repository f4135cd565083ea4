use std::{io, path::PathBuf};

use jembed_class_file::ClassFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No Java sources found in {}", .0.display())]
    NoSources(PathBuf),
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {}", code.map_or("a signal".to_owned(), |c| format!("status {}", c)))]
    ToolFailed { program: String, code: Option<i32> },
    #[error("{} and {} both define the C++ symbol {symbol}", first.display(), second.display())]
    DuplicateSymbol {
        symbol: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ClassFileError,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> BuildError {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}
