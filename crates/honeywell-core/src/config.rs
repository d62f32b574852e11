// ── Runtime platform configuration ──
//
// Describes the validated platform block handed in by the host. Core never
// reads config files; the config crate (or a test) constructs this.

use url::Url;

use crate::error::CoreError;

/// Platform name the host keys registrations under.
pub const PLATFORM_NAME: &str = "honeywell-wifi";

/// Plugin name the host keys registrations under.
pub const PLUGIN_NAME: &str = "homebridge-honeywell-wifi";

/// Port the debug trigger server listens on.
pub const DEBUG_PORT: u16 = 18081;

/// Plugin version, taken from the crate manifest at build time.
pub fn plugin_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Validated configuration for a single platform instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Service endpoint. Required, even though no operation talks to it yet.
    pub url: Url,
    /// Optional display name for this platform instance.
    pub name: Option<String>,
}

impl PlatformConfig {
    /// Build from the raw `url` field, failing when it is absent or unparsable.
    pub fn from_raw(url: Option<&str>, name: Option<String>) -> Result<Self, CoreError> {
        let raw = url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::MissingConfigField {
                field: "url".into(),
            })?;

        let url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid url '{raw}': {e}"),
        })?;

        Ok(Self { url, name })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_is_rejected() {
        let err = PlatformConfig::from_raw(None, None).unwrap_err();
        assert!(matches!(err, CoreError::MissingConfigField { ref field } if field == "url"));
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let err = PlatformConfig::from_raw(Some("   "), None).unwrap_err();
        assert!(matches!(err, CoreError::MissingConfigField { .. }));
    }

    #[test]
    fn unparsable_url_is_a_config_error() {
        let err = PlatformConfig::from_raw(Some("not a url"), None).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn valid_url_is_kept() {
        let cfg =
            PlatformConfig::from_raw(Some("https://example.com/portal"), Some("Home".into()))
                .unwrap();
        assert_eq!(cfg.url.as_str(), "https://example.com/portal");
        assert_eq!(cfg.name.as_deref(), Some("Home"));
    }
}
