//! Version identification headers for API clients.
//!
//! API clients identify the stack they run on by sending a single header
//! whose value is a space-separated list of `name/version` pairs, e.g.
//! `gccl/1.4.0 gl-rust/1.89.0`. [`VersionHeaderBuilder`] accumulates
//! those pairs, enforcing that names stay unique and that neither side
//! can break the `name/version` framing.

use std::collections::HashSet;
use std::fmt;

/// Header under which the rendered version value is conventionally sent.
pub const API_CLIENT_HEADER: &str = "x-api-client";

/// Version of the toolchain this crate was built with, captured by the
/// build script.
const RUSTC_VERSION: &str = env!("GRPC_CLIENT_KIT_RUSTC_VERSION");

/// Append-only builder for a version identification header.
///
/// Entries render as `name/version`, space-joined in insertion order.
/// Names are unique per builder (case-sensitive); cloning produces an
/// independent copy whose later mutations do not affect the original.
///
/// # Example
///
/// ```
/// use grpc_client_kit::VersionHeaderBuilder;
///
/// let mut versions = VersionHeaderBuilder::new();
/// versions
///     .append("gccl", "1.4.0")?
///     .append_rust_environment()?;
/// assert!(versions.to_string().starts_with("gccl/1.4.0 gl-rust/"));
/// # Ok::<(), grpc_client_kit::VersionHeaderError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct VersionHeaderBuilder {
    entries: Vec<(String, String)>,
    names: HashSet<String>,
}

/// Rejected version entry. The builder is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionHeaderError {
    /// Entry names must be non-empty and free of whitespace and `/`.
    #[error("version entry name {0:?} is empty or contains whitespace or '/'")]
    InvalidName(String),

    /// Versions may be empty but must be free of whitespace and `/`.
    #[error("version {0:?} contains whitespace or '/'")]
    InvalidVersion(String),

    /// Each entry name may be appended once per builder.
    #[error("version entry name {0:?} was already appended")]
    DuplicateName(String),
}

fn breaks_framing(c: char) -> bool {
    c.is_whitespace() || c == '/'
}

impl VersionHeaderBuilder {
    /// Create an empty builder. Renders as the empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `name/version` entry.
    ///
    /// Fails without mutating the builder when `name` is empty, when
    /// either side contains whitespace or `/`, or when `name` was already
    /// appended. `version` may be empty.
    pub fn append(
        &mut self,
        name: &str,
        version: &str,
    ) -> Result<&mut Self, VersionHeaderError> {
        if name.is_empty() || name.contains(breaks_framing) {
            return Err(VersionHeaderError::InvalidName(name.to_string()));
        }
        if version.contains(breaks_framing) {
            return Err(VersionHeaderError::InvalidVersion(version.to_string()));
        }
        if self.names.contains(name) {
            return Err(VersionHeaderError::DuplicateName(name.to_string()));
        }

        self.names.insert(name.to_string());
        self.entries.push((name.to_string(), version.to_string()));
        Ok(self)
    }

    /// Append an entry for a crate, normalizing an informational version.
    ///
    /// Callers typically pass `env!("CARGO_PKG_VERSION")`, or a version
    /// string that embeds a commit hash the way release pipelines do; the
    /// hash suffix is trimmed via [`format_informational_version`].
    pub fn append_crate_version(
        &mut self,
        name: &str,
        informational_version: &str,
    ) -> Result<&mut Self, VersionHeaderError> {
        self.append(name, format_informational_version(informational_version))
    }

    /// Append the `gl-rust` entry identifying the Rust toolchain.
    pub fn append_rust_environment(&mut self) -> Result<&mut Self, VersionHeaderError> {
        self.append("gl-rust", RUSTC_VERSION)
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been appended.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the header value for transmission.
    ///
    /// Validation keeps entries free of whitespace and `/`, but not of
    /// non-ASCII text, so the conversion is fallible.
    pub fn header_value(&self) -> Result<http::HeaderValue, http::header::InvalidHeaderValue> {
        http::HeaderValue::from_str(&self.to_string())
    }
}

impl fmt::Display for VersionHeaderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, version)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}/{version}")?;
        }
        Ok(())
    }
}

/// Trim a trailing source-commit hash from an informational version.
///
/// Release pipelines publish versions shaped like
/// `MAJOR.MINOR.PATCH[-PRERELEASE]+<40-hex-hash>` or
/// `...+build.<40-hex-hash>`. The hash suffix is dropped (the literal
/// `+build` marker is kept in the second form); any string not matching
/// either shape exactly is returned verbatim. Idempotent: a trimmed
/// string no longer matches either shape.
///
/// # Example
///
/// ```
/// use grpc_client_kit::format_informational_version;
///
/// let hash = "8d7efbd2c3c2429ecd73e3ea3491dc9f1fdbbf9f";
/// assert_eq!(format_informational_version(&format!("1.2.3+{hash}")), "1.2.3");
/// assert_eq!(
///     format_informational_version(&format!("1.2.3-preview+build.{hash}")),
///     "1.2.3-preview+build",
/// );
/// assert_eq!(format_informational_version("1.2.3"), "1.2.3");
/// ```
pub fn format_informational_version(info: &str) -> &str {
    const HASH_LEN: usize = 40;

    let bytes = info.as_bytes();
    if bytes.len() <= HASH_LEN {
        return info;
    }
    let split = bytes.len() - HASH_LEN;
    if !bytes[split..].iter().all(u8::is_ascii_hexdigit) {
        return info;
    }

    // The trailing bytes are ASCII, so `split` is a char boundary.
    let head = &info[..split];
    if let Some(stem) = head.strip_suffix("+build.") {
        return &info[..stem.len() + "+build".len()];
    }
    if head.ends_with('+') {
        return &info[..split - 1];
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "8d7efbd2c3c2429ecd73e3ea3491dc9f1fdbbf9f";

    #[test]
    fn test_empty_builder_renders_empty_string() {
        assert_eq!(VersionHeaderBuilder::new().to_string(), "");
    }

    #[test]
    fn test_entries_render_in_insertion_order() {
        let mut versions = VersionHeaderBuilder::new();
        versions
            .append("foo", "1.2.3-bar")
            .unwrap()
            .append("baz", "1.0.0")
            .unwrap();
        assert_eq!(versions.to_string(), "foo/1.2.3-bar baz/1.0.0");
        assert_eq!(versions.len(), 2);
        assert!(!versions.is_empty());
    }

    #[test]
    fn test_empty_version_allowed() {
        let mut versions = VersionHeaderBuilder::new();
        versions.append("foo", "").unwrap();
        assert_eq!(versions.to_string(), "foo/");
    }

    #[test]
    fn test_duplicate_name_rejected_without_mutation() {
        let mut versions = VersionHeaderBuilder::new();
        versions.append("name", "1.0.0").unwrap();
        let rendered = versions.to_string();

        let err = versions.append("name", "2.0.0").unwrap_err();
        assert_eq!(err, VersionHeaderError::DuplicateName("name".to_string()));
        assert_eq!(versions.to_string(), rendered);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut versions = VersionHeaderBuilder::new();
        for name in ["", "with space", "with/slash", "with\ttab"] {
            let err = versions.append(name, "1.0.0").unwrap_err();
            assert_eq!(err, VersionHeaderError::InvalidName(name.to_string()));
        }
        assert!(versions.is_empty());
    }

    #[test]
    fn test_invalid_versions_rejected() {
        let mut versions = VersionHeaderBuilder::new();
        for version in ["1 0", "1/0"] {
            let err = versions.append("foo", version).unwrap_err();
            assert_eq!(err, VersionHeaderError::InvalidVersion(version.to_string()));
        }
        assert!(versions.is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut versions = VersionHeaderBuilder::new();
        versions.append("name", "1.0.0").unwrap();
        versions.append("Name", "2.0.0").unwrap();
        assert_eq!(versions.to_string(), "name/1.0.0 Name/2.0.0");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut builder1 = VersionHeaderBuilder::new();
        builder1.append("x", "1.0.0").unwrap();

        let mut builder2 = builder1.clone();
        builder1.append("y", "2.0.0").unwrap();
        builder2.append("z", "3.0.0").unwrap();

        assert_eq!(builder1.to_string(), "x/1.0.0 y/2.0.0");
        assert_eq!(builder2.to_string(), "x/1.0.0 z/3.0.0");

        // The clone tracks its own uniqueness state too.
        assert!(builder2.append("y", "9.9.9").is_ok());
        assert!(builder1.append("y", "9.9.9").is_err());
    }

    #[test]
    fn test_append_crate_version_trims_hash() {
        let mut versions = VersionHeaderBuilder::new();
        versions
            .append_crate_version("gccl", &format!("1.4.0+{HASH}"))
            .unwrap();
        assert_eq!(versions.to_string(), "gccl/1.4.0");
    }

    #[test]
    fn test_append_rust_environment() {
        let mut versions = VersionHeaderBuilder::new();
        versions.append_rust_environment().unwrap();
        assert_eq!(versions.len(), 1);
        assert!(versions.to_string().starts_with("gl-rust/"));
    }

    #[test]
    fn test_header_value_round_trip() {
        let mut versions = VersionHeaderBuilder::new();
        versions.append("gccl", "1.4.0").unwrap();
        let value = versions.header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), "gccl/1.4.0");
    }

    #[test]
    fn test_format_trims_plain_hash() {
        assert_eq!(
            format_informational_version(&format!("1.2.3+{HASH}")),
            "1.2.3"
        );
    }

    #[test]
    fn test_format_keeps_build_marker() {
        assert_eq!(
            format_informational_version(&format!("1.2.3-preview+build.{HASH}")),
            "1.2.3-preview+build"
        );
    }

    #[test]
    fn test_format_leaves_non_matching_input_verbatim() {
        let wrong_length_short = format!("1.2.3+{}", &HASH[..39]);
        let wrong_length_long = format!("1.2.3+{HASH}0");
        let non_hex = format!("1.2.3+{}zz", &HASH[..38]);
        let dash_before_hash = format!("1.2.3-{HASH}");
        let trailing_text = format!("1.2.3+{HASH}-dirty");

        for input in [
            "1.2.3",
            "1.2.3-preview",
            "",
            wrong_length_short.as_str(),
            wrong_length_long.as_str(),
            non_hex.as_str(),
            dash_before_hash.as_str(),
            trailing_text.as_str(),
        ] {
            assert_eq!(format_informational_version(input), input, "{input:?}");
        }
    }

    #[test]
    fn test_format_is_idempotent() {
        let inputs = [
            format!("1.2.3+{HASH}"),
            format!("1.2.3-preview+build.{HASH}"),
            "1.2.3".to_string(),
            format!("1.2.3-{HASH}"),
        ];
        for input in &inputs {
            let once = format_informational_version(input);
            assert_eq!(format_informational_version(once), once, "{input:?}");
        }
    }

    #[test]
    fn test_format_handles_non_ascii_input() {
        // Multibyte text must not panic near the split point.
        let input = format!("1.2.3-prévïew+{HASH}");
        assert_eq!(format_informational_version(&input), "1.2.3-prévïew");
        assert_eq!(format_informational_version("날짜-버전"), "날짜-버전");
    }
}
