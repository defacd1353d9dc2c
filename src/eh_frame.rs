//! Exception handling unwind records. .eh_frame is parsed into CIE and FDE records before
//! garbage collection; the records matter to us because they are units of inclusion with their
//! own reference edges.

use crate::symbol_db::SymbolId;
use smallvec::SmallVec;

/// A relocation from within a CIE or FDE. Only the referenced symbol is relevant here.
#[derive(Clone, Copy, Debug)]
pub struct EhFrameReloc {
    pub symbol_id: SymbolId,
}

/// A common information entry. CIEs are shared unwind prologues and are always retained, so
/// whatever they reference must be retained too.
pub struct CieRecord {
    pub rels: SmallVec<[EhFrameReloc; 2]>,
}

/// A frame description entry, attached to the text section whose unwinding it describes.
///
/// `rels[0]` is always the reference back to the covered text section. An FDE is only emitted if
/// its text section survives, so that first relocation must not be treated as an outgoing edge.
pub struct FdeRecord {
    pub rels: SmallVec<[EhFrameReloc; 2]>,
}

impl CieRecord {
    pub fn new(rels: impl IntoIterator<Item = EhFrameReloc>) -> Self {
        Self {
            rels: rels.into_iter().collect(),
        }
    }
}

impl FdeRecord {
    pub fn new(rels: impl IntoIterator<Item = EhFrameReloc>) -> Self {
        Self {
            rels: rels.into_iter().collect(),
        }
    }
}
