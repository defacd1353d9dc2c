//! The global symbol table. Symbol resolution has already happened by the time the garbage
//! collector runs, so each name maps to at most one definition and each file's local symbol
//! indexes have been rewritten to global `SymbolId`s.

use crate::debug_assert_bail;
use crate::error::Result;
use crate::input_data::FileId;
use crate::input_section::SectionRef;
use crate::string_merging::FragmentId;
use foldhash::HashMap;
use object::SectionIndex;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) fn from_usize(raw: usize) -> Self {
        Self(raw as u32)
    }

    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SymbolName<'data>(&'data [u8]);

impl<'data> SymbolName<'data> {
    pub fn new(bytes: &'data [u8]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &'data [u8] {
        self.0
    }
}

impl std::fmt::Display for SymbolName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.0))
    }
}

pub struct Symbol<'data> {
    pub name: SymbolName<'data>,

    /// The file that defines the symbol.
    pub file_id: FileId,

    /// The section within `file_id` that defines the symbol. Empty for undefined and absolute
    /// symbols and for symbols that name a merged fragment.
    pub section: Option<SectionIndex>,

    /// Set when the symbol names a piece of a merged section instead of an input section.
    pub fragment: Option<FragmentId>,

    /// Whether the symbol is exported to the dynamic symbol table.
    pub is_exported: bool,
}

/// What a reference to a symbol keeps alive.
pub(crate) enum SymbolReferent {
    Section(SectionRef),
    Fragment(FragmentId),

    /// Undefined and absolute symbols anchor nothing.
    None,
}

impl Symbol<'_> {
    /// Classifies what this symbol's definition points at. A symbol claiming both a section and
    /// a merged fragment indicates a resolution bug; in release builds the fragment wins.
    pub(crate) fn referent(&self) -> Result<SymbolReferent> {
        debug_assert_bail!(
            self.fragment.is_none() || self.section.is_none(),
            "Symbol `{}` resolves to both a section and a merged fragment",
            self.name
        );

        if let Some(fragment_id) = self.fragment {
            return Ok(SymbolReferent::Fragment(fragment_id));
        }
        Ok(match self.section {
            Some(index) => SymbolReferent::Section(SectionRef::new(self.file_id, index)),
            None => SymbolReferent::None,
        })
    }
}

/// Symbol names are interned into a foldhash map. Each name is looked up at most a handful of
/// times (once when added, once per named root), so hashes are computed on use rather than
/// cached.
#[derive(Default)]
pub struct SymbolDb<'data> {
    symbols: Vec<Symbol<'data>>,
    name_to_id: HashMap<SymbolName<'data>, SymbolId>,
}

impl<'data> SymbolDb<'data> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a symbol, making it findable by name. If the name is already taken then the
    /// existing definition wins, matching how resolution keeps the first strong definition.
    pub fn add_symbol(&mut self, symbol: Symbol<'data>) -> SymbolId {
        let symbol_id = SymbolId::from_usize(self.symbols.len());
        let name = symbol.name;
        self.symbols.push(symbol);
        self.name_to_id.entry(name).or_insert(symbol_id);
        symbol_id
    }

    pub fn get(&self, name: &[u8]) -> Option<SymbolId> {
        self.name_to_id.get(&SymbolName::new(name)).copied()
    }

    pub fn symbol(&self, symbol_id: SymbolId) -> &Symbol<'data> {
        &self.symbols[symbol_id.as_usize()]
    }

    pub fn symbols(&self) -> &[Symbol<'data>] {
        &self.symbols
    }

    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }
}
