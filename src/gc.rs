//! Decides which input sections to keep. This is a mark-sweep collector over the merged section
//! graph: sections are the vertices, relocations the edges, and anything not reachable from a
//! root gets dropped from the link.
//!
//! Only alloc sections take part. Non-alloc content (debug info, comments) is kept regardless,
//! since trimming it is a job for `strip`, not the linker.

use crate::context::LinkContext;
use crate::debug_assert_bail;
use crate::elf::shf;
use crate::elf::sht;
use crate::error::Error;
use crate::error::Result;
use crate::input_data::FileId;
use crate::input_section::InputSection;
use crate::input_section::SectionRef;
use crate::symbol_db::Symbol;
use crate::symbol_db::SymbolReferent;
use crate::threading;
use crate::threading::Scope;
use crate::timing_phase;
use anyhow::bail;
use crossbeam_queue::ArrayQueue;
use crossbeam_queue::SegQueue;
use object::SectionIndex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// How many levels of newly discovered sections a worker processes recursively before handing
/// further discoveries back to the thread pool.
const MAX_INLINE_DEPTH: u32 = 3;

/// What the sweep did, returned so that the driver can log or assert on it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GcStats {
    pub discarded_section_count: usize,
}

pub fn gc_sections(ctx: &mut LinkContext) -> Result<GcStats> {
    timing_phase!("Garbage collect sections");

    mark_nonalloc_fragments(ctx);

    {
        let resources = GcResources {
            ctx,
            errors: ArrayQueue::new(1),
        };
        let roots = collect_root_set(&resources);
        mark(&resources, roots);
        if let Some(error) = resources.errors.pop() {
            return Err(error);
        }
    }

    let stats = sweep(ctx);

    tracing::debug!(
        discarded = stats.discarded_section_count,
        "gc_sections done"
    );
    Ok(stats)
}

/// Fragments of non-alloc merged sections are not candidates for discard, so their liveness
/// doesn't depend on reachability.
fn mark_nonalloc_fragments(ctx: &LinkContext) {
    timing_phase!("Mark non-alloc fragments");

    threading::par_for_each(&ctx.objects, |file| {
        for &fragment_id in &file.fragments {
            let fragment = ctx.fragment(fragment_id);
            if !ctx
                .merged_section(fragment.merged_section)
                .flags
                .contains(shf::ALLOC)
            {
                fragment.mark_alive();
            }
        }
    });
}

/// A section is accepted for traversal if its slot is occupied, it hasn't been discarded by an
/// earlier phase, and no other caller got there first. At most one call per section ever returns
/// true, which is what lets the mark phase run without locks.
fn mark_section(section: Option<&InputSection>) -> bool {
    section.is_some_and(|section| section.is_alive && section.try_visit())
}

fn is_unconditional_root(section: &InputSection) -> bool {
    const ROOT_NAME_PREFIXES: [&[u8]; 4] = [b".ctors", b".dtors", b".init", b".fini"];

    matches!(
        section.section_type,
        sht::INIT_ARRAY | sht::FINI_ARRAY | sht::PREINIT_ARRAY | sht::NOTE
    ) || ROOT_NAME_PREFIXES
        .iter()
        .any(|prefix| section.name.starts_with(prefix))
}

struct GcResources<'data, 'ctx> {
    ctx: &'ctx LinkContext<'data>,

    /// The first invariant violation encountered by any worker. Later ones are dropped.
    errors: ArrayQueue<Error>,
}

fn collect_root_set(resources: &GcResources) -> Vec<SectionRef> {
    timing_phase!("Collect root set");

    let ctx = resources.ctx;
    let roots = SegQueue::new();

    let enqueue_section = |section_ref: SectionRef| {
        if mark_section(ctx.section(section_ref)) {
            roots.push(section_ref);
        }
    };

    let enqueue_symbol = |symbol: &Symbol| match symbol.referent() {
        Ok(SymbolReferent::Fragment(fragment_id)) => ctx.fragment(fragment_id).mark_alive(),
        Ok(SymbolReferent::Section(section_ref)) => enqueue_section(section_ref),
        Ok(SymbolReferent::None) => {}
        Err(error) => {
            let _ = resources.errors.push(error);
        }
    };

    // Only alloc sections are candidates for discard, so everything else is marked visited up
    // front and thereby kept. Init/fini arrays and note sections are entry points that no
    // relocation refers to.
    threading::par_for_each(0..ctx.objects.len(), |file_index| {
        let file = &ctx.objects[file_index];
        for (section_index, slot) in file.sections.iter().enumerate() {
            let Some(section) = slot else { continue };

            if !section.is_alloc() {
                section.mark_visited();
            }

            if is_unconditional_root(section) {
                enqueue_section(SectionRef::new(
                    FileId::from_usize(file_index),
                    SectionIndex(section_index),
                ));
            }
        }
    });

    // Exported symbols can be referenced from outside the output file, so their definitions
    // stay.
    threading::par_for_each(ctx.symbol_db.symbols(), |symbol| {
        if symbol.is_exported {
            enqueue_symbol(symbol);
        }
    });

    // The entry symbol and anything forced undefined on the command line. A name that doesn't
    // resolve contributes no root.
    for name in ctx.args.entry.iter().chain(ctx.args.undefined.iter()) {
        if let Some(symbol_id) = ctx.symbol_db.get(name.as_bytes()) {
            enqueue_symbol(ctx.symbol_db.symbol(symbol_id));
        }
    }

    // CIE records are shared unwind prologues. They're retained as a group rather than per
    // function, so everything they reference is live.
    threading::par_for_each(&ctx.objects, |file| {
        for cie in &file.cies {
            for rel in &cie.rels {
                match ctx.symbol_db.symbol(rel.symbol_id).referent() {
                    Ok(SymbolReferent::Section(section_ref)) => enqueue_section(section_ref),
                    Ok(_) => {}
                    Err(error) => {
                        let _ = resources.errors.push(error);
                    }
                }
            }
        }
    });

    Vec::from_iter(std::iter::from_fn(|| roots.pop()))
}

/// Marks every section reachable from `roots`.
fn mark(resources: &GcResources, roots: Vec<SectionRef>) {
    timing_phase!("Mark live sections");

    threading::in_place_scope(|scope| {
        threading::par_for_each(roots, |root| resources.visit(root, scope, 0));
    });
}

impl GcResources<'_, '_> {
    fn visit<'scope>(&'scope self, section_ref: SectionRef, scope: &Scope<'scope>, depth: u32) {
        if let Err(error) = self.visit_section(section_ref, scope, depth) {
            let _ = self.errors.push(error);
        }
    }

    /// Traverses the outgoing edges of a section that was just accepted by `mark_section`.
    fn visit_section<'scope>(
        &'scope self,
        section_ref: SectionRef,
        scope: &Scope<'scope>,
        depth: u32,
    ) -> Result {
        let file = self.ctx.object(section_ref.file_id);
        let Some(section) = file.section(section_ref.section_index()) else {
            bail!("Attempted to visit an empty section slot in {file}");
        };
        debug_assert!(section.is_visited());

        // References to fragments are terminal: a fragment has no outgoing edges.
        for &fragment_id in &section.fragment_refs {
            self.ctx.fragment(fragment_id).mark_alive();
        }

        // Keep the unwind records covering this section. rels[0] of an FDE points back at the
        // section the FDE covers, which is the section being visited, so only the remaining
        // relocations (LSDA, personality routine) are edges.
        for fde in &section.fdes {
            debug_assert_bail!(
                !fde.rels.is_empty(),
                "FDE for section `{}` in {file} has no relocations",
                section.name
            );
            for rel in fde.rels.iter().skip(1) {
                if let SymbolReferent::Section(target) =
                    self.ctx.symbol_db.symbol(rel.symbol_id).referent()?
                    && mark_section(self.ctx.section(target))
                {
                    scope.spawn(move |scope| self.visit(target, scope, 0));
                }
            }
        }

        for rel in &section.relocations {
            let Some(symbol_id) = file.symbol_id(rel.symbol_index) else {
                bail!(
                    "Relocation in section `{}` of {file} references symbol index {}, which is \
                     outside the file's symbol table",
                    section.name,
                    rel.symbol_index.0
                );
            };

            let target = match self.ctx.symbol_db.symbol(symbol_id).referent()? {
                SymbolReferent::Fragment(fragment_id) => {
                    self.ctx.fragment(fragment_id).mark_alive();
                    continue;
                }
                SymbolReferent::None => continue,
                SymbolReferent::Section(target) => target,
            };

            if !mark_section(self.ctx.section(target)) {
                continue;
            }

            // Recursing is cheaper than spawning, but a long reference chain would overflow the
            // stack, so past a fixed depth the section goes back to the pool.
            if depth < MAX_INLINE_DEPTH {
                self.visit_section(target, scope, depth + 1)?;
            } else {
                scope.spawn(move |scope| self.visit(target, scope, 0));
            }
        }

        Ok(())
    }
}

/// Kills every alloc section that the mark phase didn't reach.
fn sweep(ctx: &mut LinkContext) -> GcStats {
    timing_phase!("Sweep unreferenced sections");

    let print_gc_sections = ctx.args.print_gc_sections;
    let diagnostics = &ctx.diagnostics;
    let discarded = AtomicUsize::new(0);

    threading::par_for_each(&mut ctx.objects, |file| {
        let file_name = file.name;
        for slot in &mut file.sections {
            let Some(section) = slot else { continue };

            if section.is_alive && !section.is_visited() {
                if print_gc_sections {
                    diagnostics.report(format_args!(
                        "removing unused section {file_name}:({})",
                        section.name
                    ));
                }
                section.kill();
                discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    GcStats {
        discarded_section_count: discarded.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elf::SectionFlags;

    fn section(name: &'static [u8], flags: SectionFlags) -> InputSection<'static> {
        InputSection::new(name, flags, sht::PROGBITS)
    }

    #[test]
    fn mark_section_accepts_at_most_once() {
        let section = section(b".text.f", shf::ALLOC);
        assert!(mark_section(Some(&section)));
        assert!(!mark_section(Some(&section)));
        assert!(!mark_section(None));
    }

    #[test]
    fn mark_section_skips_previously_discarded() {
        let mut section = section(b".text.g", shf::ALLOC);
        section.is_alive = false;
        assert!(!mark_section(Some(&section)));
        assert!(!section.is_visited());
    }

    #[test]
    fn init_fini_roots() {
        assert!(is_unconditional_root(&section(b".init.special", shf::ALLOC)));
        assert!(is_unconditional_root(&section(b".ctors.65535", shf::ALLOC)));
        assert!(!is_unconditional_root(&section(b".text.init", shf::ALLOC)));

        let init_array = InputSection::new(b".init_array", shf::ALLOC, sht::INIT_ARRAY);
        assert!(is_unconditional_root(&init_array));
    }
}
