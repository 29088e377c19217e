//! Shared fixtures for grpc-client-kit scenario tests.
//!
//! Builds failures the way a real service would and pushes them through
//! the gRPC trailer representation, so the scenario tests in `tests/`
//! exercise the same wire shape a client sees.

use grpc_client_kit::{RichStatusBuilder, pb};
use tonic::{Code, Status};

pub fn bad_request() -> pb::BadRequest {
    pb::BadRequest {
        field_violations: vec![pb::FieldViolation {
            field: "name".to_string(),
            description: "must not be empty".to_string(),
        }],
    }
}

pub fn help() -> pb::Help {
    pb::Help {
        links: vec![pb::HelpLink {
            description: "field reference".to_string(),
            url: "https://example.com/docs/fields".to_string(),
        }],
    }
}

pub fn localized_message() -> pb::LocalizedMessage {
    pb::LocalizedMessage {
        locale: "en-US".to_string(),
        message: "The name field is required.".to_string(),
    }
}

/// A failure shaped like a validation error from a real service.
pub fn invalid_argument_status() -> Status {
    RichStatusBuilder::new(Code::InvalidArgument, "name is required")
        .with_detail(&bad_request())
        .with_detail(&help())
        .with_detail(&localized_message())
        .build()
}

/// Send a status through its gRPC trailer representation and back, the
/// way it reaches a client over the wire.
pub fn trailer_round_trip(status: &Status) -> Status {
    let mut trailers = http::HeaderMap::new();
    status
        .add_header(&mut trailers)
        .expect("status renders to trailers");
    Status::from_header_map(&trailers).expect("trailers parse back to a status")
}
