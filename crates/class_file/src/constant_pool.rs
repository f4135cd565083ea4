use std::{convert::TryFrom, ops::Index};

/// The constant pool, addressed from 1 like the class file does.
///
/// Long and Double constants take up two slots; the second one is stored as
/// [`CpInfo::Unusable`] by [`ConstantPool::push`], so indices taken from the
/// class file can be used as-is.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ConstantPool {
    cp_infos: Vec<CpInfo>,
}
impl ConstantPool {
    pub fn with_capacity(slots: usize) -> Self {
        Self {
            cp_infos: Vec::with_capacity(slots),
        }
    }

    /// Appends an entry and, for wide entries, its placeholder slot.
    /// Returns the index of the pushed entry.
    pub fn push(&mut self, cp_info: CpInfo) -> u16 {
        let wide = cp_info.is_wide();
        self.cp_infos.push(cp_info);
        let index = self.cp_infos.len() as u16;
        if wide {
            self.cp_infos.push(CpInfo::Unusable);
        }
        index
    }

    /// Number of occupied slots, placeholders included.
    pub fn len(&self) -> usize {
        self.cp_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cp_infos.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<&CpInfo> {
        (index as usize)
            .checked_sub(1)
            .and_then(|i| self.cp_infos.get(i))
    }
}
impl Index<u16> for ConstantPool {
    type Output = CpInfo;

    fn index(&self, index: u16) -> &Self::Output {
        &self.cp_infos[index as usize - 1]
    }
}
impl<'a> IntoIterator for &'a ConstantPool {
    type Item = &'a CpInfo;
    type IntoIter = std::slice::Iter<'a, CpInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.cp_infos.iter()
    }
}

/// Looks up `$index` in `$cp` and yields the payload of variant `$i`, or
/// `Err($err(found))` where `found` names whatever sits at that slot.
#[macro_export]
macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident, $err:expr) => {
        match $cp.get($index) {
            Some($crate::constant_pool::CpInfo::$i(ref n)) => Ok(n),
            c => Err($err(c.map_or("nothing", |c| c.name()))),
        }
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConstantTag {
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    InvokeDynamic,
}

impl TryFrom<u8> for ConstantTag {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(ConstantTag::Utf8),
            3 => Ok(ConstantTag::Integer),
            4 => Ok(ConstantTag::Float),
            5 => Ok(ConstantTag::Long),
            6 => Ok(ConstantTag::Double),
            7 => Ok(ConstantTag::Class),
            8 => Ok(ConstantTag::String),
            9 => Ok(ConstantTag::FieldRef),
            10 => Ok(ConstantTag::MethodRef),
            11 => Ok(ConstantTag::InterfaceMethodRef),
            12 => Ok(ConstantTag::NameAndType),
            15 => Ok(ConstantTag::MethodHandle),
            16 => Ok(ConstantTag::MethodType),
            18 => Ok(ConstantTag::InvokeDynamic),
            _ => Err(value),
        }
    }
}

/// A constant pool slot. Only the payloads needed to name classes and
/// members are kept; literal values and member references are dropped.
#[derive(Debug, PartialEq, Clone)]
pub enum CpInfo {
    Utf8(String),
    Class(ClassInfo),
    String { string_index: u16 },
    Integer,
    Float,
    Long,
    Double,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    InvokeDynamic,
    Unusable,
}

impl CpInfo {
    pub fn is_wide(&self) -> bool {
        matches!(self, CpInfo::Long | CpInfo::Double)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CpInfo::Utf8(_) => "Utf8",
            CpInfo::Class(_) => "Class",
            CpInfo::String { .. } => "String",
            CpInfo::Integer => "Integer",
            CpInfo::Float => "Float",
            CpInfo::Long => "Long",
            CpInfo::Double => "Double",
            CpInfo::FieldRef => "FieldRef",
            CpInfo::MethodRef => "MethodRef",
            CpInfo::InterfaceMethodRef => "InterfaceMethodRef",
            CpInfo::NameAndType => "NameAndType",
            CpInfo::MethodHandle => "MethodHandle",
            CpInfo::MethodType => "MethodType",
            CpInfo::InvokeDynamic => "InvokeDynamic",
            CpInfo::Unusable => "Unusable",
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassInfo {
    // Must point at a CONSTANT_Utf8_info holding the binary name in internal
    // form (§4.2.1), e.g. java/lang/Object.
    pub name_index: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_be_addressed_from_one() {
        let mut pool = ConstantPool::default();
        assert_eq!(1, pool.push(CpInfo::Utf8("a".into())));
        assert_eq!(2, pool.push(CpInfo::Class(ClassInfo { name_index: 1 })));

        assert_eq!(None, pool.get(0));
        assert_eq!(Some(&CpInfo::Utf8("a".into())), pool.get(1));
        assert_eq!(CpInfo::Class(ClassInfo { name_index: 1 }), pool[2]);
        assert_eq!(None, pool.get(3));
    }

    #[test]
    fn it_should_reserve_a_placeholder_after_wide_entries() {
        let mut pool = ConstantPool::default();
        assert_eq!(1, pool.push(CpInfo::Long));
        assert_eq!(3, pool.push(CpInfo::Double));
        assert_eq!(5, pool.push(CpInfo::Integer));

        assert_eq!(5, pool.len());
        assert_eq!(CpInfo::Unusable, pool[2]);
        assert_eq!(CpInfo::Unusable, pool[4]);
        assert_eq!(CpInfo::Integer, pool[5]);
    }

    #[test]
    fn it_should_only_accept_known_tags() {
        assert_eq!(Ok(ConstantTag::Utf8), ConstantTag::try_from(1));
        assert_eq!(Ok(ConstantTag::InvokeDynamic), ConstantTag::try_from(18));
        for tag in [0u8, 2, 13, 14, 17, 19, 20, 99] {
            assert_eq!(Err(tag), ConstantTag::try_from(tag));
        }
    }
}
