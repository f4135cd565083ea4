//! Compiles Java sources with the JDK toolchain and embeds the resulting
//! class files into a C++ translation unit.
//!
//! - **discover**: finds `.java` sources and compiled `.class` files
//! - **toolchain**: runs `javac` and `jar`
//! - **emit**: renders decoded classes as C++ byte tables
//! - **build**: ties the steps together and decodes classes in parallel

pub mod build;
pub mod discover;
pub mod emit;
mod error;
pub mod toolchain;

pub use build::{BuildConfig, EmbeddedClass};
pub use error::BuildError;

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
