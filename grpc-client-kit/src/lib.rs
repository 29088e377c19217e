//! Client support utilities for tonic-based API clients.
//!
//! Two independent pieces, consumed by higher-level client code:
//!
//! - **Status detail extraction**: [`StatusDetailsExt`] decodes the
//!   `grpc-status-details-bin` payload of a failed [`tonic::Status`] into
//!   a `google.rpc.Status` envelope and retrieves well-known typed
//!   details from it. [`RichStatusBuilder`] is the encode-side dual for
//!   producing such statuses.
//! - **Version headers**: [`VersionHeaderBuilder`] accumulates uniquely
//!   named `name/version` pairs into a single space-separated header
//!   value identifying the client stack.
//!
//! ## Example
//!
//! ```
//! use grpc_client_kit::{pb, RichStatusBuilder, StatusDetailsExt, VersionHeaderBuilder};
//!
//! // A server (or a test) attaches structured details to a failure:
//! let status = RichStatusBuilder::new(tonic::Code::InvalidArgument, "name is required")
//!     .with_detail(&pb::BadRequest {
//!         field_violations: vec![pb::FieldViolation {
//!             field: "name".to_string(),
//!             description: "must not be empty".to_string(),
//!         }],
//!     })
//!     .build();
//!
//! // The client gets them back, typed:
//! let bad_request = status.detail::<pb::BadRequest>().unwrap();
//! assert_eq!(bad_request.field_violations[0].field, "name");
//!
//! // And identifies itself with a version header:
//! let mut versions = VersionHeaderBuilder::new();
//! versions
//!     .append_crate_version("my-client", env!("CARGO_PKG_VERSION"))
//!     .unwrap()
//!     .append_rust_environment()
//!     .unwrap();
//! assert!(versions.to_string().contains("gl-rust/"));
//! ```

mod extract;
mod header;
mod rich;

pub use extract::*;
pub use header::*;
pub use rich::*;

pub use grpc_client_kit_core::{
    DetailDecodeError, StatusDetail, WellKnownDetails, WellKnownStatusDetail, pack_detail, pb,
};
