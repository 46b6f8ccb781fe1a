//! Network layer - the transport boundary
//!
//! The rest of the pipeline only sees the [`Transport`] trait; the reqwest
//! client behind it is an implementation detail.

pub mod client;

pub use client::ReqwestTransport;

use crate::error::TransportError;
use crate::models::{RawResponse, RequestDescriptor};

/// Performs exactly one HTTP exchange per call, without retries
pub trait Transport {
    fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError>;
}
