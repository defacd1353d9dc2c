use crate::eh_frame::FdeRecord;
use crate::elf::SectionFlags;
use crate::elf::SectionType;
use crate::elf::shf;
use crate::input_data::FileId;
use crate::string_merging::FragmentId;
use object::SectionIndex;
use object::SymbolIndex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Identifies one input section across all input files.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SectionRef {
    pub file_id: FileId,

    /// The offset of the section within the file's sections. i.e. the same as
    /// object::SectionIndex, but stored as a u32 for compactness.
    section_index: u32,
}

impl SectionRef {
    pub fn new(file_id: FileId, section_index: SectionIndex) -> Self {
        Self {
            file_id,
            section_index: section_index.0 as u32,
        }
    }

    pub fn section_index(self) -> SectionIndex {
        SectionIndex(self.section_index as usize)
    }
}

/// A relocation, reduced to the only part the section graph cares about: which symbol it
/// references. The index is into the owning file's symbol table.
#[derive(Clone, Copy, Debug)]
pub struct Rela {
    pub symbol_index: SymbolIndex,
}

pub struct InputSection<'data> {
    pub name: SectionName<'data>,
    pub flags: SectionFlags,
    pub section_type: SectionType,
    pub relocations: Vec<Rela>,

    /// Relocations that refer directly to fragments of merged sections rather than to symbols.
    pub fragment_refs: Vec<FragmentId>,

    /// FDEs covering this section, when it's a text section with unwind information.
    pub fdes: Vec<FdeRecord>,

    /// Whether the section is still part of the link. Earlier phases may have already dropped the
    /// section, in which case the collector never looks at it again. The sweep phase clears this
    /// for sections that the mark phase didn't reach.
    pub is_alive: bool,

    is_visited: AtomicBool,
}

impl<'data> InputSection<'data> {
    pub fn new(name: &'data [u8], flags: SectionFlags, section_type: SectionType) -> Self {
        Self {
            name: SectionName(name),
            flags,
            section_type,
            relocations: Vec::new(),
            fragment_refs: Vec::new(),
            fdes: Vec::new(),
            is_alive: true,
            is_visited: AtomicBool::new(false),
        }
    }

    pub fn is_alloc(&self) -> bool {
        self.flags.contains(shf::ALLOC)
    }

    /// Claims the visited flag for the calling thread. Returns true if the caller was first, in
    /// which case it is responsible for traversing the section's outgoing edges. At most one call
    /// per section ever returns true.
    pub(crate) fn try_visit(&self) -> bool {
        !self.is_visited.swap(true, Ordering::AcqRel)
    }

    /// Sets the visited flag without claiming responsibility for traversal. Used for sections
    /// that the collector should never consider, such as non-alloc sections.
    pub(crate) fn mark_visited(&self) {
        self.is_visited.store(true, Ordering::Relaxed);
    }

    pub fn is_visited(&self) -> bool {
        self.is_visited.load(Ordering::Acquire)
    }

    /// Drops the section from the link, releasing the storage it owns.
    pub(crate) fn kill(&mut self) {
        self.is_alive = false;
        self.relocations = Vec::new();
        self.fragment_refs = Vec::new();
        self.fdes = Vec::new();
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SectionName<'data>(pub &'data [u8]);

impl SectionName<'_> {
    pub fn bytes(&self) -> &[u8] {
        self.0
    }

    pub(crate) fn starts_with(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for SectionName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.0))
    }
}
