//! A line-oriented output sink for diagnostics that are emitted from parallel phases. Writes go
//! through a mutex so that lines from different worker threads never interleave.

use std::io::Write;
use std::sync::Mutex;

pub struct Diagnostics {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Diagnostics {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Writes one line. Failure to write a diagnostic shouldn't fail the link, so errors are
    /// dropped.
    pub(crate) fn report(&self, args: std::fmt::Arguments) {
        let mut out = self.out.lock().unwrap();
        let _ = out.write_fmt(args);
        let _ = out.write_all(b"\n");
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}
