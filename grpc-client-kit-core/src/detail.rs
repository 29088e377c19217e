//! Typed access to the detail payloads of a status envelope.
//!
//! The gRPC rich error model packs structured sub-errors into the
//! `details` field of a `google.rpc.Status` as `google.protobuf.Any`
//! values. This module provides:
//!
//! - [`WellKnownStatusDetail`]: the capability shared by every recognized
//!   detail kind (registered type identifier + protobuf decode)
//! - [`StatusDetail`]: the closed enumeration produced by bulk decoding
//! - typed lookup on a decoded envelope: [`pb::Status::detail`] and
//!   [`pb::Status::well_known_details`]

use prost::Message;
use prost_types::Any;

use crate::error::DetailDecodeError;
use crate::pb;

/// A detail message kind with a registered type identifier.
///
/// Implementors pair a protobuf message with the type URL under which it
/// is packed into the `Any` values of a status envelope. All google.rpc
/// error model types in [`pb`] implement this; client code may implement
/// it for additional kinds and look them up with [`pb::Status::detail`].
pub trait WellKnownStatusDetail: Message + Default {
    /// Fully-qualified type URL, e.g. `type.googleapis.com/google.rpc.Help`.
    const TYPE_URL: &'static str;
}

impl WellKnownStatusDetail for pb::RetryInfo {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.RetryInfo";
}

impl WellKnownStatusDetail for pb::DebugInfo {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.DebugInfo";
}

impl WellKnownStatusDetail for pb::QuotaFailure {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.QuotaFailure";
}

impl WellKnownStatusDetail for pb::ErrorInfo {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.ErrorInfo";
}

impl WellKnownStatusDetail for pb::PreconditionFailure {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.PreconditionFailure";
}

impl WellKnownStatusDetail for pb::BadRequest {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.BadRequest";
}

impl WellKnownStatusDetail for pb::RequestInfo {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.RequestInfo";
}

impl WellKnownStatusDetail for pb::ResourceInfo {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.ResourceInfo";
}

impl WellKnownStatusDetail for pb::Help {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.Help";
}

impl WellKnownStatusDetail for pb::LocalizedMessage {
    const TYPE_URL: &'static str = "type.googleapis.com/google.rpc.LocalizedMessage";
}

/// Pack a detail message into the `Any` representation carried by a
/// status envelope.
pub fn pack_detail<T: WellKnownStatusDetail>(detail: &T) -> Any {
    Any {
        type_url: T::TYPE_URL.to_string(),
        value: detail.encode_to_vec(),
    }
}

/// One decoded well-known detail payload.
#[derive(Clone, Debug, PartialEq)]
pub enum StatusDetail {
    RetryInfo(pb::RetryInfo),
    DebugInfo(pb::DebugInfo),
    QuotaFailure(pb::QuotaFailure),
    ErrorInfo(pb::ErrorInfo),
    PreconditionFailure(pb::PreconditionFailure),
    BadRequest(pb::BadRequest),
    RequestInfo(pb::RequestInfo),
    ResourceInfo(pb::ResourceInfo),
    Help(pb::Help),
    LocalizedMessage(pb::LocalizedMessage),
}

impl StatusDetail {
    /// The registered type URL of this detail kind.
    pub fn type_url(&self) -> &'static str {
        match self {
            StatusDetail::RetryInfo(_) => pb::RetryInfo::TYPE_URL,
            StatusDetail::DebugInfo(_) => pb::DebugInfo::TYPE_URL,
            StatusDetail::QuotaFailure(_) => pb::QuotaFailure::TYPE_URL,
            StatusDetail::ErrorInfo(_) => pb::ErrorInfo::TYPE_URL,
            StatusDetail::PreconditionFailure(_) => pb::PreconditionFailure::TYPE_URL,
            StatusDetail::BadRequest(_) => pb::BadRequest::TYPE_URL,
            StatusDetail::RequestInfo(_) => pb::RequestInfo::TYPE_URL,
            StatusDetail::ResourceInfo(_) => pb::ResourceInfo::TYPE_URL,
            StatusDetail::Help(_) => pb::Help::TYPE_URL,
            StatusDetail::LocalizedMessage(_) => pb::LocalizedMessage::TYPE_URL,
        }
    }
}

type DecodeFn = fn(&[u8]) -> Result<StatusDetail, prost::DecodeError>;

/// Registered decoders for the google.rpc error model, keyed by type name.
/// Looked up once per decoded entry.
const WELL_KNOWN: &[(&str, DecodeFn)] = &[
    ("google.rpc.RetryInfo", |b| {
        pb::RetryInfo::decode(b).map(StatusDetail::RetryInfo)
    }),
    ("google.rpc.DebugInfo", |b| {
        pb::DebugInfo::decode(b).map(StatusDetail::DebugInfo)
    }),
    ("google.rpc.QuotaFailure", |b| {
        pb::QuotaFailure::decode(b).map(StatusDetail::QuotaFailure)
    }),
    ("google.rpc.ErrorInfo", |b| {
        pb::ErrorInfo::decode(b).map(StatusDetail::ErrorInfo)
    }),
    ("google.rpc.PreconditionFailure", |b| {
        pb::PreconditionFailure::decode(b).map(StatusDetail::PreconditionFailure)
    }),
    ("google.rpc.BadRequest", |b| {
        pb::BadRequest::decode(b).map(StatusDetail::BadRequest)
    }),
    ("google.rpc.RequestInfo", |b| {
        pb::RequestInfo::decode(b).map(StatusDetail::RequestInfo)
    }),
    ("google.rpc.ResourceInfo", |b| {
        pb::ResourceInfo::decode(b).map(StatusDetail::ResourceInfo)
    }),
    ("google.rpc.Help", |b| pb::Help::decode(b).map(StatusDetail::Help)),
    ("google.rpc.LocalizedMessage", |b| {
        pb::LocalizedMessage::decode(b).map(StatusDetail::LocalizedMessage)
    }),
];

/// Trailing segment of a type URL: `type.googleapis.com/google.rpc.Help`
/// and a bare `google.rpc.Help` both name `google.rpc.Help`.
fn type_name(type_url: &str) -> &str {
    type_url.rsplit('/').next().unwrap_or(type_url)
}

fn decoder_for(type_url: &str) -> Option<DecodeFn> {
    let name = type_name(type_url);
    WELL_KNOWN.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

impl pb::Status {
    /// First detail payload of type `T`, if present and well formed.
    ///
    /// A payload whose bytes do not decode is treated the same as an
    /// absent detail: the caller gets `None`, never an error. Use
    /// [`well_known_details`](Self::well_known_details) when decode
    /// failures must be visible.
    pub fn detail<T: WellKnownStatusDetail>(&self) -> Option<T> {
        let name = type_name(T::TYPE_URL);
        self.details
            .iter()
            .find(|any| type_name(&any.type_url) == name)
            .and_then(|any| T::decode(any.value.as_slice()).ok())
    }

    /// All recognized detail payloads, decoded lazily in encoding order.
    ///
    /// Entries with unrecognized type identifiers are skipped. A
    /// recognized entry whose bytes do not decode yields an error when
    /// the iterator reaches it, so consumers see every well-formed detail
    /// before the broken one instead of losing the whole sequence.
    pub fn well_known_details(&self) -> WellKnownDetails {
        WellKnownDetails {
            inner: self.details.clone().into_iter(),
        }
    }
}

/// Lazy iterator over the recognized detail payloads of an envelope.
///
/// Produced by [`pb::Status::well_known_details`]. Each call to that
/// method yields an independent pass over the source entries; nothing is
/// cached between passes.
#[derive(Clone, Debug)]
pub struct WellKnownDetails {
    inner: std::vec::IntoIter<Any>,
}

impl Default for WellKnownDetails {
    fn default() -> Self {
        Self {
            inner: Vec::new().into_iter(),
        }
    }
}

impl Iterator for WellKnownDetails {
    type Item = Result<StatusDetail, DetailDecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let any = self.inner.next()?;
            if let Some(decode) = decoder_for(&any.type_url) {
                return Some(decode(&any.value).map_err(|source| DetailDecodeError {
                    type_url: any.type_url,
                    source,
                }));
            }
        }
    }
}
