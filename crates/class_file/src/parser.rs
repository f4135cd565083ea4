use std::convert::TryFrom;

use crate::{
    class_file::MethodDescriptor,
    constant_pool::{ClassInfo, ConstantTag, CpInfo},
    AccessFlags, ByteCursor, ClassFileError, ConstantPool, Result,
};

const MAGIC_IDENTIFIER: u32 = 0xCAFEBABE;

/// Single forward pass over a class file. Anything that is not needed to
/// name the class and its methods is skipped by length.
pub struct Parser<'a> {
    r: ByteCursor<'a>,
}
impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            r: ByteCursor::new(buf),
        }
    }

    pub(crate) fn parse(mut self) -> Result<(String, Vec<MethodDescriptor>)> {
        let _ = self.parse_magic_identifier()?;
        let _version = self.parse_version()?;

        let constant_pool = self.parse_constant_pool()?;
        // access_flags
        self.r.skip(2)?;
        let qualified_name = self.parse_this_class(&constant_pool)?;
        // super_class
        self.r.skip(2)?;

        let interfaces_count = self.r.read_u2()?;
        self.r.skip(interfaces_count as usize * 2)?;

        let fields_count = self.r.read_u2()?;
        for _ in 0..fields_count {
            self.skip_field_info()?;
        }

        let methods = self.parse_methods(&constant_pool)?;

        Ok((qualified_name, methods))
    }

    fn parse_magic_identifier(&mut self) -> Result<()> {
        let offset = self.r.position();
        match self.r.read_u4()? {
            MAGIC_IDENTIFIER => Ok(()),
            found => Err(ClassFileError::InvalidMagic { offset, found }),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.r.read_u2()?;
        let major = self.r.read_u2()?;
        Ok((major, minor))
    }

    /// Reads `constant_pool_count` and the `constant_pool_count - 1` slots
    /// that follow it.
    pub fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.r.read_u2()?;

        let slots = (constant_pool_count as usize).saturating_sub(1);
        let mut constant_pool = ConstantPool::with_capacity(slots);
        while constant_pool.len() < slots {
            let index = constant_pool.len() as u16 + 1;
            let cp_info = self.parse_cp_info(index)?;
            constant_pool.push(cp_info);
        }
        Ok(constant_pool)
    }

    fn parse_cp_info(&mut self, index: u16) -> Result<CpInfo> {
        let offset = self.r.position();
        let tag = ConstantTag::try_from(self.r.read_u1()?)
            .map_err(|tag| ClassFileError::UnknownConstantTag { offset, tag, index })?;

        let cp_info = match tag {
            ConstantTag::Utf8 => self.parse_utf8()?,
            ConstantTag::Class => CpInfo::Class(ClassInfo {
                name_index: self.r.read_u2()?,
            }),
            ConstantTag::String => CpInfo::String {
                string_index: self.r.read_u2()?,
            },
            ConstantTag::Integer => self.discard(4, CpInfo::Integer)?,
            ConstantTag::Float => self.discard(4, CpInfo::Float)?,
            ConstantTag::Long => self.discard(8, CpInfo::Long)?,
            ConstantTag::Double => self.discard(8, CpInfo::Double)?,
            ConstantTag::FieldRef => self.discard(4, CpInfo::FieldRef)?,
            ConstantTag::MethodRef => self.discard(4, CpInfo::MethodRef)?,
            ConstantTag::InterfaceMethodRef => self.discard(4, CpInfo::InterfaceMethodRef)?,
            ConstantTag::NameAndType => self.discard(4, CpInfo::NameAndType)?,
            ConstantTag::MethodHandle => self.discard(3, CpInfo::MethodHandle)?,
            ConstantTag::MethodType => self.discard(2, CpInfo::MethodType)?,
            ConstantTag::InvokeDynamic => self.discard(4, CpInfo::InvokeDynamic)?,
        };

        Ok(cp_info)
    }

    fn parse_utf8(&mut self) -> Result<CpInfo> {
        let length = self.r.read_u2()?;
        let bytes = self.r.read_bytes(length as usize)?;

        Ok(CpInfo::Utf8(String::from_utf8_lossy(bytes).into()))
    }

    fn discard(&mut self, payload_size: usize, cp_info: CpInfo) -> Result<CpInfo> {
        self.r.skip(payload_size)?;
        Ok(cp_info)
    }

    fn parse_this_class(&mut self, constant_pool: &ConstantPool) -> Result<String> {
        let offset = self.r.position();
        let this_class = self.r.read_u2()?;

        let ClassInfo { name_index } = matches_cp_info!(constant_pool, this_class, Class, |found| {
            ClassFileError::MalformedClassRef {
                offset,
                index: this_class,
                expected: "Class",
                found,
            }
        })?;
        let name = matches_cp_info!(constant_pool, *name_index, Utf8, |found| {
            ClassFileError::MalformedClassRef {
                offset,
                index: *name_index,
                expected: "Utf8",
                found,
            }
        })?;

        Ok(name.replace('/', "."))
    }

    fn skip_field_info(&mut self) -> Result<()> {
        // access_flags, name_index, descriptor_index
        self.r.skip(6)?;
        let attributes_count = self.r.read_u2()?;
        self.skip_attributes(attributes_count)
    }

    fn parse_methods(&mut self, constant_pool: &ConstantPool) -> Result<Vec<MethodDescriptor>> {
        let methods_count = self.r.read_u2()?;
        (0..methods_count)
            .map(|_| self.parse_method_info(constant_pool))
            .collect::<Result<Vec<_>>>()
    }

    fn parse_method_info(&mut self, constant_pool: &ConstantPool) -> Result<MethodDescriptor> {
        let access = AccessFlags::from_bits_truncate(self.r.read_u2()?);
        let name_offset = self.r.position();
        let name_index = self.r.read_u2()?;
        let descriptor_offset = self.r.position();
        let descriptor_index = self.r.read_u2()?;
        let attributes_count = self.r.read_u2()?;

        let name = Self::method_utf8(constant_pool, name_index, name_offset)?;
        let descriptor = Self::method_utf8(constant_pool, descriptor_index, descriptor_offset)?;
        self.skip_attributes(attributes_count)?;

        Ok(MethodDescriptor {
            name,
            descriptor,
            access,
        })
    }

    fn method_utf8(constant_pool: &ConstantPool, index: u16, offset: usize) -> Result<String> {
        matches_cp_info!(constant_pool, index, Utf8, |found| {
            ClassFileError::MalformedMethodRef {
                offset,
                index,
                found,
            }
        })
        .map(String::clone)
    }

    // Shared by fields and methods: u2 name index, u4 length, then `length`
    // opaque bytes.
    fn skip_attributes(&mut self, attributes_count: u16) -> Result<()> {
        for _ in 0..attributes_count {
            let _attribute_name_index = self.r.read_u2()?;
            let attribute_length = self.r.read_u4()?;
            self.r.skip(attribute_length as usize)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod parse_version_tests {
    use super::*;

    #[test]
    fn it_should_be_able_to_parse_a_version() {
        assert_eq!(
            Parser::new(&[0x00, 0x03, 0x00, 0x34])
                .parse_version()
                .unwrap(),
            (0x34, 0x03)
        );
    }
}


#[cfg(test)]
mod skip_attributes_tests {
    use super::*;

    #[test]
    fn it_should_skip_by_declared_length() {
        #[rustfmt::skip]
        let bytes = [
            0x00, 0x01, 0x00, 0x00, 0x00, 0x03, 0xaa, 0xbb, 0xcc,
            0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
            0x7f,
        ];
        let mut parser = Parser::new(&bytes);

        parser.skip_attributes(2).unwrap();
        assert_eq!(15, parser.r.position());
    }

    #[test]
    fn it_should_fail_if_the_length_overruns_the_buffer() {
        let bytes = [0x00, 0x01, 0x00, 0x00, 0x00, 0x09, 0xaa];

        assert!(matches!(
            Parser::new(&bytes).skip_attributes(1),
            Err(ClassFileError::TruncatedInput { offset: 6, .. })
        ));
    }
}
