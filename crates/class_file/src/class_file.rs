use std::fmt;

use crate::{parser::Parser, AccessFlags, Result};

/// What a class file looks like from the outside: its name, its methods and
/// the bytes it was decoded from.
#[derive(Clone, PartialEq)]
pub struct ClassDescriptor {
    /// Binary name in dotted form, e.g. `java.lang.Object`.
    pub qualified_name: String,
    pub methods: Vec<MethodDescriptor>,
    pub raw_bytes: Vec<u8>,
}
impl ClassDescriptor {
    /// Decodes `bytes` and keeps them as [`ClassDescriptor::raw_bytes`].
    pub fn decode(bytes: Vec<u8>) -> Result<ClassDescriptor> {
        let (qualified_name, methods) = Parser::new(&bytes).parse()?;

        Ok(ClassDescriptor {
            qualified_name,
            methods,
            raw_bytes: bytes,
        })
    }

    /// The name in internal form, e.g. `java/lang/Object`.
    pub fn internal_name(&self) -> String {
        self.qualified_name.replace('.', "/")
    }
}
impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("qualified_name", &self.qualified_name)
            .field("methods", &self.methods)
            .field("raw_bytes", &format!("({} bytes)", self.raw_bytes.len()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    /// Raw type signature, e.g. `(Ljava/lang/String;)V`.
    pub descriptor: String,
    pub access: AccessFlags,
}
impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.descriptor)?;
        if !self.access.is_empty() {
            write!(f, " [{}]", self.access)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(qualified_name: &str) -> ClassDescriptor {
        ClassDescriptor {
            qualified_name: qualified_name.to_owned(),
            methods: vec![MethodDescriptor {
                name: "run".into(),
                descriptor: "()V".into(),
                access: AccessFlags::PUBLIC | AccessFlags::STATIC,
            }],
            raw_bytes: vec![0xca, 0xfe],
        }
    }

    #[test]
    fn it_should_use_slashes_in_the_internal_name() {
        assert_eq!("a/b/C", descriptor("a.b.C").internal_name());
        assert_eq!("Main", descriptor("Main").internal_name());
    }

    #[test]
    fn it_should_display_methods_with_their_flags() {
        let class = descriptor("Main");

        assert_eq!("run ()V [public static]", class.methods[0].to_string());
    }

    #[test]
    fn it_should_not_dump_raw_bytes_in_debug_output() {
        assert!(format!("{:?}", descriptor("Main")).contains("(2 bytes)"));
    }
}
