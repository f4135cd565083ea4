use thiserror::Error;

/// Every variant records the byte offset at which decoding stopped.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ClassFileError {
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("Invalid magic identifier: 0x{found:X}")]
    InvalidMagic { offset: usize, found: u32 },
    #[error("Unknown constant pool tag {tag} for entry #{index} at offset {offset}")]
    UnknownConstantTag { offset: usize, tag: u8, index: u16 },
    #[error("Malformed class reference #{index} at offset {offset}: expected {expected}, found {found}")]
    MalformedClassRef {
        offset: usize,
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Malformed method reference #{index} at offset {offset}: expected Utf8, found {found}")]
    MalformedMethodRef {
        offset: usize,
        index: u16,
        found: &'static str,
    },
}

impl ClassFileError {
    pub fn offset(&self) -> usize {
        match *self {
            ClassFileError::TruncatedInput { offset, .. }
            | ClassFileError::InvalidMagic { offset, .. }
            | ClassFileError::UnknownConstantTag { offset, .. }
            | ClassFileError::MalformedClassRef { offset, .. }
            | ClassFileError::MalformedMethodRef { offset, .. } => offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_report_the_offset_of_every_kind() {
        let errors = [
            ClassFileError::TruncatedInput {
                offset: 3,
                needed: 2,
                remaining: 1,
            },
            ClassFileError::InvalidMagic {
                offset: 3,
                found: 0,
            },
            ClassFileError::UnknownConstantTag {
                offset: 3,
                tag: 99,
                index: 1,
            },
            ClassFileError::MalformedClassRef {
                offset: 3,
                index: 1,
                expected: "Class",
                found: "Utf8",
            },
            ClassFileError::MalformedMethodRef {
                offset: 3,
                index: 1,
                found: "Unusable",
            },
        ];

        assert!(errors.iter().all(|e| e.offset() == 3));
    }

    #[test]
    fn it_should_format_the_magic_in_hex() {
        assert_eq!(
            "Invalid magic identifier: 0xDEADBEEF",
            ClassFileError::InvalidMagic {
                offset: 0,
                found: 0xDEADBEEF
            }
            .to_string()
        );
    }
}
