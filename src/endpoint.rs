use crate::error::EndpointError;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use tracing::warn;

/// Port used when a target carries none
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Endpoint is one target host and port. Hosts are kept as given
/// and resolved by whoever dials them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // IPv6 literals need brackets to stay parseable as host:port
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    /// Accepts `host`, `host:port`, `[v6]`, `[v6]:port` and bare IPv6
    /// literals. Missing ports default to 22.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EndpointError::EmptyHost(s.to_string()));
        }

        // Bracketed IPv6
        if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| EndpointError::UnterminatedBracket(s.to_string()))?;
            if host.is_empty() {
                return Err(EndpointError::EmptyHost(s.to_string()));
            }
            let port = match tail {
                "" => DEFAULT_SSH_PORT,
                _ => {
                    let raw = tail
                        .strip_prefix(':')
                        .ok_or_else(|| EndpointError::InvalidPort(s.to_string()))?;
                    parse_port(raw, s)?
                }
            };
            return Ok(Endpoint::new(host, port));
        }

        // Bare IPv6 has colons but no port
        if s.parse::<Ipv6Addr>().is_ok() {
            return Ok(Endpoint::new(s, DEFAULT_SSH_PORT));
        }

        match s.rsplit_once(':') {
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(EndpointError::EmptyHost(s.to_string()));
                }
                Ok(Endpoint::new(host, parse_port(port, s)?))
            }
            None => Ok(Endpoint::new(s, DEFAULT_SSH_PORT)),
        }
    }
}

fn parse_port(raw: &str, target: &str) -> Result<u16, EndpointError> {
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(EndpointError::InvalidPort(target.to_string())),
        Ok(port) => Ok(port),
    }
}

/// parse_targets splits a comma separated target list and normalises
/// every entry to carry a port. Blank entries are skipped, malformed
/// ones are logged and dropped so the rest of the list still runs.
pub fn parse_targets(list: &str) -> Vec<Endpoint> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("skipping target: {}", e);
                None
            }
        })
        .collect()
}
