//! `http` - HTTPie command-line entry point
//!
//! Pipeline:
//! - parse arguments (clap usage errors exit with clap's own status)
//! - assemble the request, reading piped stdin if any
//! - send it once through the reqwest transport
//! - render the response to stdout

use std::io;
use std::process::ExitCode;
use std::str::FromStr;

use crossterm::tty::IsTty;
use tracing::Level;

use httpie::constants::LOG_ENV;
use httpie::{Config, Options, PrettyHttp, ReqwestTransport, TtyState};

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| Level::from_str(value.trim()).ok())
        .unwrap_or(Level::WARN);

    let (non_blocking, guard) = tracing_appender::non_blocking(io::stderr());
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(io::stderr().is_tty())
        .with_max_level(level)
        .init();
    guard
}

fn main() -> ExitCode {
    let _guard = init_logging();

    let config = Config::load();
    let options = match Options::parse_from(std::env::args_os(), &config) {
        Ok(options) => options,
        Err(e) => e.exit(),
    };

    let transport = match ReqwestTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("http: error: could not start the HTTP runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        method = %options.method,
        url = %options.url,
        items = options.items.len(),
        style = options.style.as_str(),
        "Parsed arguments"
    );
    let formatter = PrettyHttp::new(options.style);
    let tty = TtyState::detect();

    let result = httpie::run(
        &options,
        io::stdin().lock(),
        tty,
        &transport,
        &formatter,
        io::stdout().lock(),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(httpie::report(err, options.traceback, &mut io::stderr())),
    }
}
