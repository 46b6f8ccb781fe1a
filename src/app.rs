//! The request pipeline: assemble, send once, render, write

use std::io::{Read, Write};

use crossterm::tty::IsTty;

use crate::cli::Options;
use crate::error::AppError;
use crate::network::Transport;
use crate::pretty::Formatter;
use crate::render::render_response;
use crate::request::assemble_request;

/// Whether the standard streams are attached to a terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtyState {
    pub stdin_is_tty: bool,
    pub stdout_is_tty: bool,
}

impl TtyState {
    pub fn detect() -> Self {
        TtyState {
            stdin_is_tty: std::io::stdin().is_tty(),
            stdout_is_tty: std::io::stdout().is_tty(),
        }
    }
}

/// Run one invocation against `transport`, writing the rendered response
/// to `out`
pub fn run<R: Read, W: Write>(
    options: &Options,
    stdin: R,
    tty: TtyState,
    transport: &dyn Transport,
    formatter: &dyn Formatter,
    mut out: W,
) -> Result<(), AppError> {
    let request = assemble_request(options, stdin, tty.stdin_is_tty)?;

    // Attachments stay open only for the duration of the call
    let response = {
        let request = request;
        transport.send(&request)
    }?;

    let text = render_response(
        &response,
        formatter,
        &options.render_settings(),
        tty.stdout_is_tty,
    );
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Describe a failed run on `stderr` and return the process exit code.
///
/// An interrupt prints only a newline. With `traceback` the whole cause
/// chain is printed. Assembly errors get the `http: error:` prefix.
pub fn report<W: Write>(err: AppError, traceback: bool, stderr: &mut W) -> u8 {
    let code = err.exit_code();

    // Nothing useful can be done if stderr itself is gone
    let _ = if err.is_interrupt() {
        writeln!(stderr)
    } else if traceback {
        writeln!(stderr, "{:?}", anyhow::Error::new(err))
    } else if matches!(err, AppError::Assemble(_)) {
        writeln!(stderr, "http: error: {err}")
    } else {
        writeln!(stderr, "{err}")
    };
    code
}
