//! Liveness tracking for fragments of merged sections. Mergeable string/constant sections are
//! split into fragments and deduplicated before garbage collection runs; here we only decide
//! which of the surviving fragments are referenced.

use crate::elf::SectionFlags;
use crate::input_section::SectionName;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MergedSectionId(u32);

impl MergedSectionId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FragmentId(u32);

impl FragmentId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// An output section built by merging the contents of mergeable input sections.
pub struct MergedSection<'data> {
    pub name: SectionName<'data>,
    pub flags: SectionFlags,
}

impl<'data> MergedSection<'data> {
    pub fn new(name: &'data [u8], flags: SectionFlags) -> Self {
        Self {
            name: SectionName(name),
            flags,
        }
    }
}

/// One deduplicated piece of a merged section, shared by all references to equal content.
pub struct SectionFragment {
    pub merged_section: MergedSectionId,
    is_alive: AtomicBool,
}

impl SectionFragment {
    pub fn new(merged_section: MergedSectionId) -> Self {
        Self {
            merged_section,
            is_alive: AtomicBool::new(false),
        }
    }

    /// Liveness of fragments only ever goes from false to true, so concurrent callers don't need
    /// to coordinate.
    pub(crate) fn mark_alive(&self) {
        self.is_alive.store(true, Ordering::Relaxed);
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive.load(Ordering::Relaxed)
    }
}
