use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::Command,
};

use log::info;

use crate::{BuildError, Result};

/// A command line for one of the external tools. Succeeds only if the
/// process exits with status zero.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn run(&self) -> Result<()> {
        info!("Running: {}", self);

        let program = self.program.to_string_lossy().into_owned();
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| BuildError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::ToolFailed {
                program,
                code: status.code(),
            })
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// `javac --release <release> <sources...> -d <class_dir>`
pub fn javac(program: &str, release: &str, sources: &[PathBuf], class_dir: &Path) -> Invocation {
    Invocation::new(program)
        .args(["--release", release])
        .args(sources)
        .arg("-d")
        .arg(class_dir)
}

/// `jar -c -f <jar_path> -C <class_dir> .`
pub fn jar(program: &str, jar_path: &Path, class_dir: &Path) -> Invocation {
    Invocation::new(program)
        .args(["-c", "-f"])
        .arg(jar_path)
        .arg("-C")
        .arg(class_dir)
        .arg(".")
}
