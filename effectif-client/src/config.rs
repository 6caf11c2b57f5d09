//! Client configuration

/// IP-echo service used for the best-effort client IP lookup
const DEFAULT_IP_ECHO_URL: &str = "https://api.ipify.org?format=json";

/// Address reported when the IP lookup fails or times out
const DEFAULT_IP_FALLBACK: &str = "192.168.1.1";

/// Configuration for connecting to the admin backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, prefixed to every relative path
    /// (e.g. "http://localhost:8081/api/v1")
    pub base_url: String,

    /// Absolute URL of the token refresh endpoint
    pub refresh_url: String,

    /// IP-echo service URL (ipify-compatible `{"ip": ...}` body)
    pub ip_echo_url: String,

    /// Bound on the whole IP lookup, in milliseconds
    pub ip_timeout_ms: u64,

    /// Fallback address when the lookup fails or exceeds its bound
    pub ip_fallback: String,
}

impl ClientConfig {
    /// Create a configuration for the given API base URL
    ///
    /// The refresh endpoint defaults to `{base}/auth/refresh`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let refresh_url = format!("{}/auth/refresh", base_url);
        Self {
            base_url,
            refresh_url,
            ip_echo_url: DEFAULT_IP_ECHO_URL.to_string(),
            ip_timeout_ms: 3000,
            ip_fallback: DEFAULT_IP_FALLBACK.to_string(),
        }
    }

    /// Override the refresh endpoint URL
    pub fn with_refresh_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_url = url.into();
        self
    }

    /// Override the IP-echo service URL
    pub fn with_ip_echo_url(mut self, url: impl Into<String>) -> Self {
        self.ip_echo_url = url.into();
        self
    }

    /// Override the IP lookup bound
    pub fn with_ip_timeout_ms(mut self, millis: u64) -> Self {
        self.ip_timeout_ms = millis;
        self
    }

    /// Override the IP fallback address
    pub fn with_ip_fallback(mut self, address: impl Into<String>) -> Self {
        self.ip_fallback = address.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8081/api/v1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_url_derives_from_base() {
        let config = ClientConfig::new("http://localhost:8081/api/v1/");
        assert_eq!(config.base_url, "http://localhost:8081/api/v1");
        assert_eq!(config.refresh_url, "http://localhost:8081/api/v1/auth/refresh");
    }
}
