//! Wrappers around the raw ELF section attributes that the garbage collector cares about. The
//! values come from the `object` crate so that we can't get out of sync with the ELF spec.

/// Section flag bit values.
#[allow(unused)]
pub mod shf {
    use super::SectionFlags;

    pub const WRITE: SectionFlags = SectionFlags::from_u32(object::elf::SHF_WRITE);
    pub const ALLOC: SectionFlags = SectionFlags::from_u32(object::elf::SHF_ALLOC);
    pub const EXECINSTR: SectionFlags = SectionFlags::from_u32(object::elf::SHF_EXECINSTR);
    pub const MERGE: SectionFlags = SectionFlags::from_u32(object::elf::SHF_MERGE);
    pub const STRINGS: SectionFlags = SectionFlags::from_u32(object::elf::SHF_STRINGS);
    pub const TLS: SectionFlags = SectionFlags::from_u32(object::elf::SHF_TLS);
}

/// Section type values.
#[allow(unused)]
pub mod sht {
    use super::SectionType;

    pub const NULL: SectionType = SectionType::from_u32(object::elf::SHT_NULL);
    pub const PROGBITS: SectionType = SectionType::from_u32(object::elf::SHT_PROGBITS);
    pub const NOBITS: SectionType = SectionType::from_u32(object::elf::SHT_NOBITS);
    pub const NOTE: SectionType = SectionType::from_u32(object::elf::SHT_NOTE);
    pub const INIT_ARRAY: SectionType = SectionType::from_u32(object::elf::SHT_INIT_ARRAY);
    pub const FINI_ARRAY: SectionType = SectionType::from_u32(object::elf::SHT_FINI_ARRAY);
    pub const PREINIT_ARRAY: SectionType = SectionType::from_u32(object::elf::SHT_PREINIT_ARRAY);
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SectionFlags(u32);

impl SectionFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_u32(raw: u32) -> SectionFlags {
        SectionFlags(raw)
    }

    pub fn contains(self, flag: SectionFlags) -> bool {
        self.0 & flag.0 != 0
    }

    /// Returns self with the specified flags set.
    #[must_use]
    pub const fn with(self, flags: SectionFlags) -> SectionFlags {
        SectionFlags(self.0 | flags.0)
    }

    /// Returns self with the specified flags cleared.
    #[must_use]
    pub const fn without(self, flags: SectionFlags) -> SectionFlags {
        SectionFlags(self.0 & !flags.0)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for SectionFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SectionFlags(0x{:x})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionType(u32);

impl SectionType {
    pub const fn from_u32(raw: u32) -> SectionType {
        SectionType(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SectionType({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_flags_bit_ops() {
        let flags = shf::ALLOC.with(shf::EXECINSTR);
        assert!(flags.contains(shf::ALLOC));
        assert!(flags.contains(shf::EXECINSTR));
        assert!(!flags.contains(shf::WRITE));
        assert!(!flags.without(shf::ALLOC).contains(shf::ALLOC));
        assert_eq!(SectionFlags::empty().raw(), 0);
    }

    #[test]
    fn section_types_are_distinct() {
        assert_ne!(sht::INIT_ARRAY, sht::FINI_ARRAY);
        assert_eq!(sht::NOTE.raw(), object::elf::SHT_NOTE);
    }
}
