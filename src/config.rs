//! NNTP server configuration

/// NNTP server configuration
///
/// Contains the information needed to connect to an NNTP server.
///
/// # Example
///
/// ```
/// use newswire::ServerConfig;
///
/// // Recommended: use the constructor methods
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
///
/// // Or construct manually
/// let config = ServerConfig {
///     host: "news.example.com".to_string(),
///     port: 563,
///     tls: true,
///     allow_insecure_tls: false,
///     username: "user".to_string(),
///     password: "pass".to_string(),
/// };
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// Server hostname (e.g., "news.example.com")
    pub host: String,

    /// Server port (typically 119 for plain, 563 for TLS)
    pub port: u16,

    /// Use TLS/SSL encryption
    #[cfg_attr(feature = "serde", serde(default = "default_tls"))]
    pub tls: bool,

    /// Allow insecure TLS connections (self-signed or expired certificates)
    ///
    /// **Security Warning:** Setting this to `true` disables certificate
    /// validation, making your connection vulnerable to man-in-the-middle
    /// attacks. Only use this for testing or with servers you trust on a
    /// secure network.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_insecure_tls: bool,

    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

#[cfg(feature = "serde")]
fn default_tls() -> bool {
    true
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(
        host: impl Into<String>,
        port: u16,
        tls: bool,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            tls,
            allow_insecure_tls: false,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create a configuration for a TLS connection on the standard secure port (563)
    pub fn tls(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 563, true, username, password)
    }

    /// Create a configuration for a plain connection on the standard port (119)
    ///
    /// **Warning:** Plain connections transmit credentials in clear text.
    /// Use TLS connections whenever possible.
    pub fn plain(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 119, false, username, password)
    }

    /// Create a TLS configuration that accepts self-signed certificates
    ///
    /// **Security Warning:** This configuration disables certificate
    /// validation. Only use it for testing or with servers you trust on a
    /// secure network.
    pub fn tls_insecure(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mut config = Self::tls(host, username, password);
        config.allow_insecure_tls = true;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let config = ServerConfig::new("news.example.com", 563, true, "user", "pass");
        assert_eq!(config.host, "news.example.com");
        assert_eq!(config.port, 563);
        assert!(config.tls);
        assert!(!config.allow_insecure_tls);
        assert_eq!(config.username, "user");
        assert_eq!(config.password, "pass");
    }

    #[test]
    fn test_tls_helper() {
        let config = ServerConfig::tls("news.example.com", "user", "pass");
        assert_eq!(config.port, 563);
        assert!(config.tls);
        assert!(!config.allow_insecure_tls);
    }

    #[test]
    fn test_plain_helper() {
        let config = ServerConfig::plain("news.example.com", "user", "pass");
        assert_eq!(config.port, 119);
        assert!(!config.tls);
        assert!(!config.allow_insecure_tls);
    }

    #[test]
    fn test_tls_insecure_helper() {
        let config = ServerConfig::tls_insecure("localhost", "user", "pass");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 563);
        assert!(config.tls);
        assert!(config.allow_insecure_tls);
    }
}
