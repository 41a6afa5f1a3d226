use crate::address::TargetAddress;
use crate::auth::{UserPass, negotiate_auth};
use crate::commands::request_connect;
use crate::endpoint::Endpoint;
use crate::error::DialError;
use anyhow::{Context, Result, anyhow};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpStream, lookup_host};
use tracing::{debug, info};

/// Dialer opens the TCP transport for every login attempt. It is picked
/// once at startup and shared read-only by all bursts.
#[derive(Debug, Clone)]
pub enum Dialer {
    Direct,
    Socks5(Socks5Dialer),
}

impl Dialer {
    /// from_proxy builds a direct dialer, or a SOCKS5 dialer when a proxy
    /// address is given. Proxy problems are configuration errors.
    pub async fn from_proxy(proxy: Option<&str>, auth: Option<UserPass>) -> Result<Self> {
        match proxy {
            Some(addr) => Ok(Dialer::Socks5(Socks5Dialer::new(addr, auth).await?)),
            None => {
                if auth.is_some() {
                    return Err(anyhow!("[ERR] proxy credentials given without --proxy"));
                }
                Ok(Dialer::Direct)
            }
        }
    }

    /// connect returns a stream to `endpoint`. No limit is imposed here,
    /// callers bound concurrency themselves.
    pub async fn connect(&self, endpoint: &Endpoint) -> Result<TcpStream, DialError> {
        match self {
            Dialer::Direct => TcpStream::connect((endpoint.host(), endpoint.port()))
                .await
                .map_err(|source| DialError::Connect {
                    addr: endpoint.to_string(),
                    source,
                }),
            Dialer::Socks5(socks) => socks.connect(endpoint).await,
        }
    }
}

/// Socks5Dialer tunnels connections through a SOCKS5 proxy
#[derive(Debug, Clone)]
pub struct Socks5Dialer {
    proxy_addr: SocketAddr,
    auth: Option<Arc<UserPass>>,
}

impl Socks5Dialer {
    /// new resolves the proxy address and connects to it once, so a bad
    /// proxy fails before any attempt is scheduled
    pub async fn new(proxy: &str, auth: Option<UserPass>) -> Result<Self> {
        let trimmed = proxy
            .trim()
            .trim_start_matches("socks5://")
            .trim_start_matches("socks5h://");

        let proxy_addr = lookup_host(trimmed)
            .await
            .with_context(|| format!("[ERR] invalid proxy address {proxy:?}"))?
            .next()
            .ok_or_else(|| anyhow!("[ERR] proxy address {proxy:?} did not resolve"))?;

        // Reach the relay once, then drop the connection
        TcpStream::connect(proxy_addr)
            .await
            .with_context(|| format!("[ERR] proxy {proxy_addr} is unreachable"))?;

        info!("routing attempts through SOCKS5 proxy {}", proxy_addr);

        Ok(Self::with_addr(proxy_addr, auth))
    }

    /// with_addr builds a dialer for an already resolved proxy, no startup connect
    pub fn with_addr(proxy_addr: SocketAddr, auth: Option<UserPass>) -> Self {
        Self {
            proxy_addr,
            auth: auth.map(Arc::new),
        }
    }

    /// connect opens a fresh proxy connection and asks it to CONNECT to
    /// `endpoint`. The returned stream carries the tunnelled bytes only.
    pub async fn connect(&self, endpoint: &Endpoint) -> Result<TcpStream, DialError> {
        let mut stream = TcpStream::connect(self.proxy_addr)
            .await
            .map_err(|source| DialError::Connect {
                addr: self.proxy_addr.to_string(),
                source,
            })?;

        negotiate_auth(&mut stream, self.auth.as_deref()).await?;

        let target = TargetAddress::from(endpoint);
        request_connect(&mut stream, &target).await?;

        // DEBUG
        debug!("tunnel open: {} via {}", endpoint, self.proxy_addr);

        Ok(stream)
    }
}
