//! Settings that affect garbage collection. The driver usually fills this in from its own
//! argument parser, but we also accept the relevant subset of linker command line syntax
//! directly.

use crate::error::Result;
use crate::threading;
use anyhow::bail;
use std::num::NonZeroUsize;

#[derive(Default)]
pub struct Args {
    /// The name of the entry symbol. The section defining it becomes a GC root.
    pub entry: Option<String>,

    /// Symbol names forced undefined on the command line (`-u`). Their definitions become GC
    /// roots.
    pub undefined: Vec<String>,

    /// Report each discarded section on the diagnostics sink.
    pub print_gc_sections: bool,

    pub num_threads: Option<NonZeroUsize>,

    pub time_phases: bool,
}

pub(crate) fn parse<S: AsRef<str>, I: Iterator<Item = S>>(mut input: I) -> Result<Args> {
    let mut args = Args::default();

    while let Some(arg) = input.next() {
        let arg = arg.as_ref();
        if let Some(rest) = arg.strip_prefix("--entry=") {
            args.entry = Some(rest.to_owned());
        } else if arg == "--entry" || arg == "-e" {
            args.entry = input.next().map(|a| a.as_ref().to_owned());
        } else if let Some(rest) = arg.strip_prefix("--undefined=") {
            args.undefined.push(rest.to_owned());
        } else if arg == "--undefined" || arg == "-u" {
            if let Some(name) = input.next() {
                args.undefined.push(name.as_ref().to_owned());
            }
        } else if arg == "--print-gc-sections" {
            args.print_gc_sections = true;
        } else if arg == "--no-print-gc-sections" {
            args.print_gc_sections = false;
        } else if let Some(rest) = arg.strip_prefix("--threads=") {
            args.num_threads = Some(NonZeroUsize::try_from(rest.parse::<usize>()?)?);
        } else if arg == "--threads" {
            if let Some(n) = input.next() {
                args.num_threads = Some(NonZeroUsize::try_from(n.as_ref().parse::<usize>()?)?);
            }
        } else if arg == "--time" {
            args.time_phases = true;
        } else {
            bail!("Unrecognized argument `{arg}`");
        }
    }

    Ok(args)
}

impl Args {
    pub fn parse<S: AsRef<str>, I: Iterator<Item = S>>(input: I) -> Result<Args> {
        parse(input)
    }

    pub(crate) fn available_threads(&self) -> NonZeroUsize {
        self.num_threads
            .unwrap_or_else(threading::available_parallelism)
    }
}
