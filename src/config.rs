use std::env;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CSRF_COOKIE: &str = "csrf_token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub port: u16,
    pub api_base_url: String,
    pub csrf_cookie: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_base_url: DEFAULT_API_BASE.to_string(),
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
        }
    }
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves settings through `lookup`; blank or unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            port: non_empty("PORT")
                .and_then(|value| value.trim().parse::<u16>().ok())
                .unwrap_or(defaults.port),
            api_base_url: non_empty("PORTAL_API_BASE").unwrap_or(defaults.api_base_url),
            csrf_cookie: non_empty("PORTAL_CSRF_COOKIE").unwrap_or(defaults.csrf_cookie),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = PortalConfig::from_lookup(|_| None);
        assert_eq!(config, PortalConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = PortalConfig::from_lookup(|key| match key {
            "PORT" => Some("9090".to_string()),
            "PORTAL_API_BASE" => Some("http://api.local".to_string()),
            "PORTAL_CSRF_COOKIE" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 9090);
        assert_eq!(config.api_base_url, "http://api.local");
        assert_eq!(config.csrf_cookie, DEFAULT_CSRF_COOKIE);
    }

    #[test]
    fn bad_port_falls_back() {
        let config = PortalConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
