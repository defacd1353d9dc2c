//! Section-level dead code elimination for a static ELF linker.
//!
//! After symbol resolution, a link job holds the union of every input file's sections, most of
//! which nothing references. This crate walks the section graph (sections as vertices,
//! relocations as edges) from a configurable root set and discards whatever it can't reach.
//! Parsing the inputs, resolving symbols and writing the output are the driver's business; the
//! driver hands us a [`LinkContext`] and reads liveness flags back out afterwards.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub mod args;
pub mod context;
pub mod diagnostics;
pub mod eh_frame;
pub mod elf;
pub mod error;
pub mod gc;
pub mod input_data;
pub mod input_section;
pub mod string_merging;
pub mod symbol_db;
#[cfg(not(feature = "single-threaded"))]
#[path = "threading_rayon.rs"]
pub(crate) mod threading;
#[cfg(feature = "single-threaded")]
#[path = "threading_none.rs"]
pub(crate) mod threading;
pub(crate) mod timing;

pub use crate::args::Args;
pub use crate::context::LinkContext;
pub use crate::error::Result;
pub use crate::gc::GcStats;
pub use crate::gc::gc_sections;

/// Sends tracing output to stderr, filtered by `RUST_LOG`. Phase timings are recorded as info
/// level spans, so e.g. `RUST_LOG=linker_gc=info` shows them.
pub fn setup_tracing() -> Result {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()?;
    Ok(())
}

/// Builds the global thread pool with the requested number of threads. May only be called once
/// per process; tests that need particular thread counts build local pools instead.
#[cfg(not(feature = "single-threaded"))]
pub fn setup_thread_pool(args: &Args) -> Result {
    threading::ThreadPoolBuilder::new()
        .num_threads(args.available_threads().get())
        .build_global()?;
    Ok(())
}
