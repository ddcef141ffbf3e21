//! NVS partition encryption audit
//!
//! Inspects a raw dump of the device's non-volatile storage partition for
//! WiFi credentials stored in plain text. With NVS encryption working, none
//! of the markers should appear and the used area should look random.

use serde::{Deserialize, Serialize};

/// Byte strings that only appear in a dump if credentials are unencrypted
pub const CREDENTIAL_MARKERS: [&str; 9] = [
    "wifi",
    "ssid",
    "password",
    "sta.ssid",
    "sta.password",
    "sta.authmode",
    "WiFi",
    "SSID",
    "PASSWORD",
];

/// Bytes shown in the preview dump
const PREVIEW_BYTES: usize = 256;
const ROW_WIDTH: usize = 16;

/// Whether one marker appears in the dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerHit {
    pub marker: String,
    pub found: bool,
}

/// Byte distribution of the dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NvsStatistics {
    pub total_bytes: usize,
    /// Bytes that are neither 0x00 nor 0xFF
    pub used_bytes: usize,
    /// `used_bytes` as a percentage of `total_bytes`; 0 for an empty dump
    pub used_percent: f64,
}

impl NvsStatistics {
    pub fn blank_bytes(&self) -> usize {
        self.total_bytes - self.used_bytes
    }

    pub fn blank_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            100.0 - self.used_percent
        }
    }
}

/// One line of the hex preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexRow {
    pub offset: usize,
    pub hex: String,
    pub ascii: String,
}

impl std::fmt::Display for HexRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}:  {:<48}  {}", self.offset, self.hex, self.ascii)
    }
}

/// Full audit result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NvsReport {
    pub markers: Vec<MarkerHit>,
    pub statistics: NvsStatistics,
    pub preview: Vec<HexRow>,
}

impl NvsReport {
    /// True if any credential marker was found in plain text
    pub fn plaintext_found(&self) -> bool {
        self.markers.iter().any(|m| m.found)
    }
}

/// Audits a raw NVS partition dump
pub fn audit(data: &[u8]) -> NvsReport {
    let markers = CREDENTIAL_MARKERS
        .iter()
        .map(|marker| MarkerHit {
            marker: (*marker).to_string(),
            found: contains(data, marker.as_bytes()),
        })
        .collect();

    NvsReport {
        markers,
        statistics: statistics(data),
        preview: preview(data),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn statistics(data: &[u8]) -> NvsStatistics {
    let used_bytes = data.iter().filter(|&&b| b != 0x00 && b != 0xFF).count();
    let used_percent = if data.is_empty() {
        0.0
    } else {
        used_bytes as f64 / data.len() as f64 * 100.0
    };

    NvsStatistics {
        total_bytes: data.len(),
        used_bytes,
        used_percent,
    }
}

fn preview(data: &[u8]) -> Vec<HexRow> {
    let head = &data[..data.len().min(PREVIEW_BYTES)];
    head.chunks(ROW_WIDTH)
        .enumerate()
        .map(|(i, chunk)| HexRow {
            offset: i * ROW_WIDTH,
            hex: chunk
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" "),
            ascii: chunk
                .iter()
                .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
                .collect(),
        })
        .collect()
}
