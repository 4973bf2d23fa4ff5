//! Proxy descriptors
//!
//! Each wallet's RPC traffic leaves through its own HTTP proxy. Proxies are
//! read from a flat file with one `ip:port:username:password` entry per line.

use crate::{Error, Result};
use alloy::transports::http::reqwest;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::str::FromStr;

/// A single egress proxy
pub struct ProxyDescriptor {
    pub host: String,
    pub port: u16,
    pub username: String,
    password: SecretString,
}

impl ProxyDescriptor {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Proxy URL with embedded credentials, used for both HTTP and HTTPS
    pub fn url(&self) -> String {
        format!(
            "http://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    /// `host:port` without credentials, safe to log
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Convert into a proxy applied to all schemes
    ///
    /// Must be alloy's re-exported reqwest, the one `Http` is implemented for.
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy> {
        reqwest::Proxy::all(self.url())
            .map_err(|e| Error::Proxy(format!("{}: {}", self.endpoint(), e)))
    }
}

impl FromStr for ProxyDescriptor {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.trim().split(':').collect();
        let [host, port, username, password] = fields.as_slice() else {
            return Err(Error::Proxy(format!(
                "expected 4 fields (ip:port:username:password), got {}",
                fields.len()
            )));
        };

        if host.is_empty() {
            return Err(Error::Proxy("empty host".to_string()));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| Error::Proxy(format!("invalid port {:?}", port)))?;

        Ok(Self::new(*host, port, *username, *password))
    }
}

// Manual Debug keeps the password out of logs
impl std::fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Parse every non-blank line of `content` as a proxy descriptor
pub fn parse_proxies(content: &str) -> Result<Vec<ProxyDescriptor>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.parse::<ProxyDescriptor>().map_err(|e| match e {
                Error::Proxy(reason) => Error::Proxy(format!("line {}: {}", idx + 1, reason)),
                other => other,
            })
        })
        .collect()
}

/// Load the proxy file
pub fn load_proxies(path: &Path) -> Result<Vec<ProxyDescriptor>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let proxies = parse_proxies(&content)?;
    tracing::info!(count = proxies.len(), path = %path.display(), "Loaded proxies");
    Ok(proxies)
}
