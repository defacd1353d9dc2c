//! Parallel execution backed by rayon. GC code calls these wrappers rather than rayon directly
//! so that the serial twin of this module (threading_none.rs) can slot in unchanged.

use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use std::num::NonZeroUsize;

pub(crate) use rayon::Scope;
pub(crate) use rayon::ThreadPoolBuilder;
pub(crate) use rayon::in_place_scope;

pub(crate) fn available_parallelism() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Applies `func` to every item, fanning the items out across the current thread pool.
pub(crate) fn par_for_each<I, F>(items: I, func: F)
where
    I: IntoParallelIterator,
    F: Fn(I::Item) + Sync + Send,
{
    items.into_par_iter().for_each(func);
}
