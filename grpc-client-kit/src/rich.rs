//! Construction of statuses carrying structured error details.
//!
//! The encode-side dual of [`StatusDetailsExt`](crate::StatusDetailsExt):
//! servers and test fixtures use this to attach the rich error model to a
//! failure they are about to return.

use bytes::Bytes;
use prost::Message;
use prost_types::Any;

use grpc_client_kit_core::{WellKnownStatusDetail, pack_detail, pb};

/// Builder for a [`tonic::Status`] with an attached `google.rpc.Status`
/// envelope.
///
/// # Example
///
/// ```
/// use grpc_client_kit::{RichStatusBuilder, StatusDetailsExt, pb};
///
/// let status = RichStatusBuilder::new(tonic::Code::ResourceExhausted, "quota exceeded")
///     .with_detail(&pb::Help {
///         links: vec![pb::HelpLink {
///             description: "quota docs".to_string(),
///             url: "https://example.com/quota".to_string(),
///         }],
///     })
///     .build();
///
/// assert!(status.detail::<pb::Help>().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct RichStatusBuilder {
    code: tonic::Code,
    message: String,
    details: Vec<Any>,
}

impl RichStatusBuilder {
    /// Start a builder for a failure with the given code and message.
    pub fn new(code: tonic::Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Attach a well-known detail payload.
    pub fn with_detail<T: WellKnownStatusDetail>(mut self, detail: &T) -> Self {
        self.details.push(pack_detail(detail));
        self
    }

    /// Attach a pre-packed `Any` payload, e.g. a type this crate does not
    /// enumerate.
    pub fn with_any(mut self, any: Any) -> Self {
        self.details.push(any);
        self
    }

    /// Encode the envelope and build the status.
    ///
    /// The envelope mirrors the status code and message, matching how
    /// servers populate `grpc-status-details-bin`.
    pub fn build(self) -> tonic::Status {
        let envelope = pb::Status {
            code: self.code as i32,
            message: self.message,
            details: self.details,
        };
        let bytes = Bytes::from(envelope.encode_to_vec());
        tonic::Status::with_details(self.code, envelope.message, bytes)
    }
}
