//! Everything the garbage collector operates on, borrowed together. The driver builds this from
//! its parse and resolution outputs, runs [`crate::gc_sections`], then reads section and fragment
//! liveness back out during layout.

use crate::args::Args;
use crate::diagnostics::Diagnostics;
use crate::input_data::FileId;
use crate::input_data::ObjectFile;
use crate::input_section::InputSection;
use crate::input_section::SectionRef;
use crate::string_merging::FragmentId;
use crate::string_merging::MergedSection;
use crate::string_merging::MergedSectionId;
use crate::string_merging::SectionFragment;
use crate::symbol_db::SymbolDb;

pub struct LinkContext<'data> {
    pub args: Args,
    pub objects: Vec<ObjectFile<'data>>,
    pub symbol_db: SymbolDb<'data>,
    pub merged_sections: Vec<MergedSection<'data>>,
    pub fragments: Vec<SectionFragment>,
    pub diagnostics: Diagnostics,
}

impl<'data> LinkContext<'data> {
    pub fn new(args: Args) -> Self {
        Self {
            args,
            objects: Vec::new(),
            symbol_db: SymbolDb::new(),
            merged_sections: Vec::new(),
            fragments: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn object(&self, file_id: FileId) -> &ObjectFile<'data> {
        &self.objects[file_id.as_usize()]
    }

    pub fn section(&self, section_ref: SectionRef) -> Option<&InputSection<'data>> {
        self.object(section_ref.file_id)
            .section(section_ref.section_index())
    }

    pub fn fragment(&self, fragment_id: FragmentId) -> &SectionFragment {
        &self.fragments[fragment_id.as_usize()]
    }

    pub fn merged_section(&self, id: MergedSectionId) -> &MergedSection<'data> {
        &self.merged_sections[id.as_usize()]
    }
}
