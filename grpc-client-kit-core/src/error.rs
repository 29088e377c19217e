//! Decode failure raised by bulk detail enumeration.

/// A recognized detail payload whose bytes did not decode.
///
/// Only [`pb::Status::well_known_details`](crate::pb::Status::well_known_details)
/// raises this, at the point the broken entry is consumed. Single-detail
/// lookups suppress the same condition and return `None` instead.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("malformed {type_url} detail payload: {source}")]
pub struct DetailDecodeError {
    pub(crate) type_url: String,
    pub(crate) source: prost::DecodeError,
}

impl DetailDecodeError {
    /// Type URL of the entry that failed to decode.
    pub fn type_url(&self) -> &str {
        &self.type_url
    }
}
