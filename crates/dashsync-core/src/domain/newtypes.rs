//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and values.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::errors::DomainError;

/// Collection that receives asset writes on the device
const WEBFILES_PATH: &str = "/api/webfiles";

/// Characters escaped in a single URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

// ============================================================================
// RunId
// ============================================================================

/// Identifier for a single synchronization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid RunId: {e}")))
    }
}

// ============================================================================
// AssetKind / AssetName
// ============================================================================

/// Kind of dashboard asset, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Html,
    Js,
    Css,
}

impl AssetKind {
    /// Extensions accepted by the device, including the leading dot
    pub const EXTENSIONS: [&'static str; 3] = [".html", ".js", ".css"];

    /// Classifies a file name by its extension (case-sensitive)
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".html") {
            Some(Self::Html)
        } else if name.ends_with(".js") {
            Some(Self::Js)
        } else if name.ends_with(".css") {
            Some(Self::Css)
        } else {
            None
        }
    }
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Html => "html",
            Self::Js => "js",
            Self::Css => "css",
        };
        f.write_str(s)
    }
}

/// Name of a dashboard asset, unique within a sync run
///
/// The name becomes the last segment of the remote resource path, so it
/// must be a bare file name: no separators, no parent references, and an
/// extension the device accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetName(String);

impl AssetName {
    /// Creates a new AssetName after validation
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();

        if name.is_empty() {
            return Err(DomainError::InvalidAssetName("name is empty".to_string()));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(DomainError::InvalidAssetName(format!(
                "'{name}' contains a path separator"
            )));
        }
        if name == "." || name == ".." {
            return Err(DomainError::InvalidAssetName(format!(
                "'{name}' is not a file name"
            )));
        }
        if AssetKind::from_file_name(&name).is_none() {
            return Err(DomainError::InvalidAssetName(format!(
                "'{name}' must end with one of {}",
                AssetKind::EXTENSIONS.join(", ")
            )));
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the asset kind implied by the extension
    pub fn kind(&self) -> AssetKind {
        // Validated in `new`
        AssetKind::from_file_name(&self.0).unwrap_or(AssetKind::Html)
    }

    /// Remote resource path that receives this asset's content
    ///
    /// The name is percent-encoded as one path segment, so `#`, `?` and `%`
    /// stay part of the name instead of starting a fragment or query.
    pub fn remote_path(&self) -> String {
        format!(
            "{WEBFILES_PATH}/{}",
            utf8_percent_encode(&self.0, PATH_SEGMENT)
        )
    }
}

impl Display for AssetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssetName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetName> for String {
    fn from(name: AssetName) -> Self {
        name.0
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// Address of the target device
///
/// Operators usually pass a bare host (`kc.local`, `192.168.0.215`); that is
/// normalized to `https://{host}`. An explicit `http://` or `https://` URL is
/// kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    /// Parses an operator-supplied host or URL into a base URL
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidEndpoint("address is empty".to_string()));
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let url = Url::parse(&candidate)
            .map_err(|e| DomainError::InvalidEndpoint(format!("{trimmed}: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DomainError::InvalidEndpoint(format!(
                    "{trimmed}: unsupported scheme '{other}'"
                )))
            }
        }
        if url.host_str().is_none() {
            return Err(DomainError::InvalidEndpoint(format!("{trimmed}: missing host")));
        }

        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    /// Returns the base URL without a trailing slash
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins an absolute API path onto the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }

    /// Returns true if the endpoint uses TLS
    pub fn is_https(&self) -> bool {
        self.0.starts_with("https://")
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Endpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

// ============================================================================
// FlashTarget
// ============================================================================

/// Chip variant targeted by the USB build/flash path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashTarget {
    /// ESP32-C6: cloud-only firmware, no dashboard
    C6,
    /// ESP32-S3: serves the dashboard from its asset partition
    S3,
}

impl FlashTarget {
    /// Whether firmware for this target serves the dashboard
    pub fn has_dashboard(&self) -> bool {
        matches!(self, Self::S3)
    }

    /// Lowercase identifier passed to the build tool
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C6 => "c6",
            Self::S3 => "s3",
        }
    }
}

impl Display for FlashTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlashTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c6" => Ok(Self::C6),
            "s3" => Ok(Self::S3),
            other => Err(DomainError::InvalidTarget(format!(
                "'{other}'; valid options: c6, s3"
            ))),
        }
    }
}
