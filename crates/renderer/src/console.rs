//! Plain-text lines the harness prints for the user.
//!
//! These are separate from `tracing` output: the exact wording is part of the
//! command-line interface, so start-up code writes them through a [`Console`]
//! that the window path binds to stdout/stderr and tests bind to buffers.
use std::io::{self, Write};

/// Line printed on stdout when a shader file cannot be opened.
pub const OPEN_FAILURE_MESSAGE: &str = "Error opening shader file.";
/// Prefix of the compile diagnostic written to stderr.
pub const COMPILE_FAILURE_PREFIX: &str = "Compile failure in shader: ";
/// Prefix of the link diagnostic written to stderr.
pub const LINK_FAILURE_PREFIX: &str = "Linker failure: ";
/// Written to stderr when no usable GPU device can be created.
pub const DEVICE_FAILURE_MESSAGE: &str = "Unable to initialize GPU device ...exiting.";
/// Written to stdout once the device is up.
pub const DEVICE_SUCCESS_MESSAGE: &str = "GPU initialization successful!";

pub struct Console<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }

    /// Writes one line to the standard-output side.
    pub fn out_line(&mut self, line: &str) {
        if let Err(error) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            tracing::debug!(%error, "failed to write console line");
        }
    }

    /// Writes one line to the standard-error side.
    pub fn err_line(&mut self, line: &str) {
        if let Err(error) = writeln!(self.err, "{line}").and_then(|_| self.err.flush()) {
            tracing::debug!(%error, "failed to write console line");
        }
    }
}

/// Runs `f` with a console bound to the process's stdout and stderr.
pub fn with_stdio<T>(f: impl FnOnce(&mut Console<'_>) -> T) -> T {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut console = Console::new(&mut stdout, &mut stderr);
    f(&mut console)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_go_to_their_own_stream() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut console = Console::new(&mut out, &mut err);
            console.out_line(OPEN_FAILURE_MESSAGE);
            console.err_line("Linker failure: missing main");
        }
        assert_eq!(String::from_utf8(out).unwrap(), "Error opening shader file.\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Linker failure: missing main\n"
        );
    }
}
