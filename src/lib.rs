//! # HTTPie
//!
//! A command-line HTTP client for humans.
//!
//! ## Features
//! - `key:value` items become request headers
//! - `key=value` items become JSON (default) or form fields
//! - Piped stdin is sent verbatim as the request body
//! - Basic auth, proxies, CA bundles, timeouts, multipart file upload
//! - Colorized, indented response output when writing to a terminal
//!
//! ## Architecture
//! A single sequential pipeline:
//! - Items (classification of `key:value` / `key=value`)
//! - Request (assembly into a descriptor, content negotiation)
//! - Network (one blocking call through the `Transport` trait)
//! - Render (decoding and optional prettifying through a `Formatter`)

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod items;
pub mod models;
pub mod network;
pub mod pretty;
pub mod render;
pub mod request;

// Re-export commonly used types
pub use app::{report, run, TtyState};
pub use cli::Options;
pub use config::Config;
pub use error::{AppError, AssembleError, ItemError, TransportError};
pub use items::{classify, parse_item};
pub use models::{
    Body, DataMap, HeaderMap, PrettifyMode, RawResponse, RequestDescriptor, ResponseView, Token,
};
pub use network::{ReqwestTransport, Transport};
pub use pretty::{Formatter, PrettyHttp, Style};
pub use render::{render_response, RenderSettings};
pub use request::assemble_request;
