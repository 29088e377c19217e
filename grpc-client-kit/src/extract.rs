//! Extraction of structured error details from a failed RPC.
//!
//! A gRPC server attaches the rich error model to a failure as a binary
//! `google.rpc.Status` in the `grpc-status-details-bin` trailer. tonic
//! surfaces those bytes on [`tonic::Status`]; this module decodes them
//! into the typed envelope and detail payloads from
//! [`grpc_client_kit_core`].
//!
//! Two failure policies, on purpose:
//!
//! - single lookups ([`rpc_status`](StatusDetailsExt::rpc_status),
//!   [`detail`](StatusDetailsExt::detail)) suppress malformed wire data
//!   and return `None` — a broken diagnostic must never crash the code
//!   that was already handling an error
//! - bulk enumeration ([`well_known_details`](StatusDetailsExt::well_known_details))
//!   surfaces a decode failure at the entry that is broken, after every
//!   well-formed entry before it

use bytes::Bytes;
use prost::Message;

use grpc_client_kit_core::{WellKnownDetails, WellKnownStatusDetail, pb};

/// Reserved trailer key carrying the binary `google.rpc.Status` envelope.
pub const STATUS_DETAILS_KEY: &str = "grpc-status-details-bin";

/// Typed access to the rich error details of a [`tonic::Status`].
pub trait StatusDetailsExt {
    /// Decode the `google.rpc.Status` envelope attached to this failure.
    ///
    /// Returns `None` when no envelope is attached or when its bytes are
    /// malformed. Decoding happens on every call; hold the returned
    /// envelope to decode at most once per failure.
    fn rpc_status(&self) -> Option<pb::Status>;

    /// First detail payload of type `T`, if present and well formed.
    fn detail<T: WellKnownStatusDetail>(&self) -> Option<T>;

    /// All recognized detail payloads, decoded lazily in encoding order.
    ///
    /// Unrecognized type identifiers are skipped; a recognized entry with
    /// malformed bytes yields an error when reached. Each call re-decodes
    /// from the source status, so re-iteration is a fresh pass.
    fn well_known_details(&self) -> WellKnownDetails;
}

impl StatusDetailsExt for tonic::Status {
    fn rpc_status(&self) -> Option<pb::Status> {
        let bytes = if !self.details().is_empty() {
            Bytes::copy_from_slice(self.details())
        } else {
            // Statuses assembled from raw metadata carry the envelope in
            // the reserved -bin trailer instead.
            self.metadata()
                .get_bin(STATUS_DETAILS_KEY)?
                .to_bytes()
                .ok()?
        };

        match pb::Status::decode(bytes) {
            Ok(envelope) => Some(envelope),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_err, "ignoring malformed status details envelope");
                None
            }
        }
    }

    fn detail<T: WellKnownStatusDetail>(&self) -> Option<T> {
        self.rpc_status().and_then(|envelope| envelope.detail())
    }

    fn well_known_details(&self) -> WellKnownDetails {
        self.rpc_status()
            .map(|envelope| envelope.well_known_details())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use grpc_client_kit_core::pack_detail;
    use tonic::metadata::MetadataValue;
    use tonic::{Code, Status};

    fn error_info() -> pb::ErrorInfo {
        pb::ErrorInfo {
            reason: "PROJECT_SUSPENDED".to_string(),
            domain: "example.com".to_string(),
            metadata: [("project".to_string(), "alpha".to_string())].into(),
        }
    }

    fn envelope() -> pb::Status {
        pb::Status {
            code: Code::PermissionDenied as i32,
            message: "project suspended".to_string(),
            details: vec![pack_detail(&error_info())],
        }
    }

    #[test]
    fn test_rpc_status_absent() {
        let status = Status::new(Code::PermissionDenied, "project suspended");
        assert_eq!(status.rpc_status(), None);
    }

    #[test]
    fn test_rpc_status_malformed_envelope_suppressed() {
        let status = Status::with_details(
            Code::PermissionDenied,
            "project suspended",
            Bytes::from_static(&[0xff, 0xff]),
        );
        assert_eq!(status.rpc_status(), None);
    }

    #[test]
    fn test_rpc_status_from_details() {
        let status = Status::with_details(
            Code::PermissionDenied,
            "project suspended",
            envelope().encode_to_vec().into(),
        );

        let decoded = status.rpc_status().expect("envelope attached");
        assert_eq!(decoded.code, Code::PermissionDenied as i32);
        assert_eq!(decoded.message, "project suspended");
        assert_eq!(decoded.details.len(), 1);
    }

    #[test]
    fn test_rpc_status_falls_back_to_metadata() {
        let mut status = Status::new(Code::PermissionDenied, "project suspended");
        status.metadata_mut().insert_bin(
            STATUS_DETAILS_KEY,
            MetadataValue::from_bytes(&envelope().encode_to_vec()),
        );

        let decoded = status.rpc_status().expect("envelope in metadata");
        assert_eq!(decoded.message, "project suspended");
    }

    #[test]
    fn test_detail_through_status() {
        let status = Status::with_details(
            Code::PermissionDenied,
            "project suspended",
            envelope().encode_to_vec().into(),
        );

        assert_eq!(status.detail::<pb::ErrorInfo>(), Some(error_info()));
        assert_eq!(status.detail::<pb::Help>(), None);
    }

    #[test]
    fn test_well_known_details_empty_without_envelope() {
        let status = Status::new(Code::Internal, "boom");
        assert_eq!(status.well_known_details().count(), 0);
    }

    #[test]
    fn test_well_known_details_reiterates_from_source() {
        let status = Status::with_details(
            Code::PermissionDenied,
            "project suspended",
            envelope().encode_to_vec().into(),
        );

        assert_eq!(status.well_known_details().count(), 1);
        // A second call decodes again from the same source bytes.
        assert_eq!(status.well_known_details().count(), 1);
    }
}
