use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use jembed_class_file::ClassDescriptor;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::{discover, emit, toolchain, BuildError, Result};

/// A decoded class together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedClass {
    pub path: PathBuf,
    pub class: ClassDescriptor,
}

impl EmbeddedClass {
    pub fn read(path: &Path) -> Result<EmbeddedClass> {
        let bytes = fs::read(path).map_err(BuildError::io(path))?;
        let class = ClassDescriptor::decode(bytes).map_err(|source| BuildError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(EmbeddedClass {
            path: path.to_path_buf(),
            class,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub source: PathBuf,
    pub release: String,
    pub class_dir: PathBuf,
    pub jar_path: Option<PathBuf>,
    pub cpp_output: Option<PathBuf>,
    pub skip_invalid: bool,
    pub javac: String,
    pub jar: String,
}

impl BuildConfig {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            release: "8".to_owned(),
            class_dir: PathBuf::from("build/java"),
            jar_path: None,
            cpp_output: None,
            skip_invalid: false,
            javac: "javac".to_owned(),
            jar: "jar".to_owned(),
        }
    }
}

/// Compiles, optionally archives, and optionally renders the C++ table.
pub fn run(config: &BuildConfig) -> Result<()> {
    let sources = discover::java_sources(&config.source)?;
    if sources.is_empty() {
        return Err(BuildError::NoSources(config.source.clone()));
    }
    debug!("Found {} Java sources in {}", sources.len(), config.source.display());

    toolchain::javac(&config.javac, &config.release, &sources, &config.class_dir).run()?;

    if let Some(jar_path) = &config.jar_path {
        toolchain::jar(&config.jar, jar_path, &config.class_dir).run()?;
    }

    if let Some(cpp_output) = &config.cpp_output {
        let class_files = discover::class_files(&config.class_dir)?;
        let classes = decode_classes(&class_files, config.skip_invalid)?;
        write_table(cpp_output, &classes)?;
    }

    Ok(())
}

/// Reads and decodes every file in parallel. The result keeps the order of
/// `paths`. With `skip_invalid`, files that fail are logged and left out;
/// otherwise the first failure in `paths` order is returned.
pub fn decode_classes(paths: &[PathBuf], skip_invalid: bool) -> Result<Vec<EmbeddedClass>> {
    let decoded = paths
        .par_iter()
        .map(|path| EmbeddedClass::read(path))
        .collect::<Vec<_>>();

    let mut classes = Vec::with_capacity(decoded.len());
    for result in decoded {
        match result {
            Ok(class) => {
                debug!(
                    "Decoded {} ({} methods) from {}",
                    class.class.qualified_name,
                    class.class.methods.len(),
                    class.path.display()
                );
                classes.push(class);
            }
            Err(e @ BuildError::Decode { .. }) if skip_invalid => warn!("Skipping: {}", e),
            Err(e) => return Err(e),
        }
    }

    Ok(classes)
}

/// Fails if two classes would be emitted under the same C++ identifier,
/// e.g. the same class compiled into two places.
pub fn check_symbols(classes: &[EmbeddedClass]) -> Result<()> {
    let mut seen = HashMap::with_capacity(classes.len());
    for embedded in classes {
        let symbol = emit::identifier(&embedded.class.qualified_name);
        if let Some(first) = seen.insert(symbol.clone(), &embedded.path) {
            return Err(BuildError::DuplicateSymbol {
                symbol,
                first: first.clone(),
                second: embedded.path.clone(),
            });
        }
    }
    Ok(())
}

pub fn write_table(cpp_output: &Path, classes: &[EmbeddedClass]) -> Result<()> {
    check_symbols(classes)?;
    fs::write(cpp_output, emit::render_table(classes)).map_err(BuildError::io(cpp_output))?;
    info!(
        "Generated {} with {} embedded classes",
        cpp_output.display(),
        classes.len()
    );
    Ok(())
}

/// Renders one class file on its own, without lookup tables.
pub fn embed_single(class_file: &Path, cpp_output: &Path) -> Result<EmbeddedClass> {
    let class = EmbeddedClass::read(class_file)?;
    fs::write(cpp_output, emit::render_single(&class)).map_err(BuildError::io(cpp_output))?;
    info!(
        "Generated {} ({} bytes) for class {}",
        cpp_output.display(),
        class.class.raw_bytes.len(),
        class.class.qualified_name
    );
    Ok(class)
}
