// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

mod access_flags;
mod class_file;
#[macro_use]
pub mod constant_pool;
pub mod cursor;
mod error;
mod parser;

pub use self::class_file::{ClassDescriptor, MethodDescriptor};
pub use access_flags::AccessFlags;
pub use constant_pool::{ConstantPool, ConstantTag, CpInfo};
pub use cursor::ByteCursor;
pub use error::ClassFileError;
pub use parser::Parser;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;
