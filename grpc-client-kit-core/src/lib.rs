//! Core types for extracting structured error details from gRPC statuses.
//!
//! This crate provides the protocol-level pieces shared by producers and
//! consumers of the gRPC rich error model:
//!
//! - [`pb`]: wire types for the `google.rpc.Status` envelope and the
//!   well-known detail messages
//! - [`detail`]: the [`WellKnownStatusDetail`] capability, the decode
//!   registry, and typed lookup on a decoded envelope
//! - [`error`]: the decode failure raised by bulk enumeration

mod detail;
mod error;
pub mod pb;

pub use detail::*;
pub use error::*;
