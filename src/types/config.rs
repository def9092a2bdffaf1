//! Configuration structures.
//!
//! Every section has defaults, so an empty document is a valid config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::serialization::WireEncoding;

/// Global framing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Wire format configuration.
    #[serde(default)]
    pub wire: WireConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from a JSON document.
    pub fn from_json(s: &str) -> crate::types::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// How `msg_type` is rendered into its text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeRendering {
    /// Canonical label, e.g. `CALL`.
    #[default]
    Name,
    /// Decimal discriminant, e.g. `1`.
    Code,
}

/// Wire format configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WireConfig {
    /// Encoding of context, payload and full-envelope frames.
    pub encoding: WireEncoding,

    /// Text rendering of the message type frame.
    pub type_rendering: TypeRendering,

    /// Maximum accepted frame body size in bytes when decoding.
    pub max_frame_bytes: u64,

    /// Per-frame write timeout for stream sockets. Slow consumers that cannot
    /// accept a frame within this window fail the send.
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            encoding: WireEncoding::default(),
            type_rendering: TypeRendering::default(),
            max_frame_bytes: 5 * 1024 * 1024,
            write_timeout: Duration::from_secs(10),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.wire.encoding, WireEncoding::MsgPack);
        assert_eq!(config.wire.type_rendering, TypeRendering::Name);
        assert_eq!(config.wire.max_frame_bytes, 5 * 1024 * 1024);
        assert_eq!(config.wire.write_timeout, Duration::from_secs(10));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_wire_section() {
        let config = Config::from_json(
            r#"{"wire": {"encoding": "json", "type_rendering": "code", "write_timeout": "250ms"}}"#,
        )
        .unwrap();
        assert_eq!(config.wire.encoding, WireEncoding::Json);
        assert_eq!(config.wire.type_rendering, TypeRendering::Code);
        assert_eq!(config.wire.write_timeout, Duration::from_millis(250));
        assert_eq!(config.wire.max_frame_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        assert!(Config::from_json(r#"{"wire": {"encoding": "pickle"}}"#).is_err());
    }
}
