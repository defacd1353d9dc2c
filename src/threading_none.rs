//! Serial stand-ins for the helpers in threading_rayon.rs. Mostly useful when profiling, since
//! rayon's work-stealing makes profiles harder to read.

use std::marker::PhantomData;
use std::num::NonZeroUsize;

pub(crate) fn available_parallelism() -> NonZeroUsize {
    NonZeroUsize::MIN
}

pub(crate) fn par_for_each<I, F>(items: I, func: F)
where
    I: IntoIterator,
    F: Fn(I::Item),
{
    for item in items {
        func(item);
    }
}

/// Matches the shape of rayon's scope so that spawning call sites compile unchanged. Spawned
/// work runs immediately on the calling thread.
pub(crate) struct Scope<'scope> {
    _marker: PhantomData<&'scope ()>,
}

impl<'scope> Scope<'scope> {
    pub(crate) fn spawn<F>(&self, func: F)
    where
        F: FnOnce(&Scope<'scope>) + Send + 'scope,
    {
        func(self);
    }
}

pub(crate) fn in_place_scope<'scope, F>(func: F)
where
    F: FnOnce(&Scope<'scope>),
{
    func(&Scope {
        _marker: PhantomData,
    });
}
