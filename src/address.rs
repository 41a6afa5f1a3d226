use crate::endpoint::Endpoint;
use crate::error::DialError;
use crate::protocol::AddressType;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::io::{AsyncRead, AsyncReadExt};

/// TargetAddress is the DST.ADDR / DST.PORT pair of a CONNECT request.
/// Hostnames are handed to the proxy unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetAddress {
    Ip(IpAddr, u16),
    Domain(String, u16),
}

impl From<&Endpoint> for TargetAddress {
    fn from(endpoint: &Endpoint) -> Self {
        match endpoint.host().parse::<IpAddr>() {
            Ok(ip) => TargetAddress::Ip(ip, endpoint.port()),
            Err(_) => TargetAddress::Domain(endpoint.host().to_string(), endpoint.port()),
        }
    }
}

impl TargetAddress {
    /// encode appends ATYP | DST.ADDR | DST.PORT to a request buffer
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), DialError> {
        match self {
            TargetAddress::Ip(IpAddr::V4(ip), port) => {
                // ATYP -> 1 byte
                buf.push(AddressType::IPv4 as u8);

                // Address -> 4 bytes
                buf.extend_from_slice(&ip.octets());

                // Port in BE -> 2 bytes
                buf.extend_from_slice(&port.to_be_bytes());
            }
            TargetAddress::Ip(IpAddr::V6(ip), port) => {
                buf.push(AddressType::IPv6 as u8);

                // Address -> 16 bytes
                buf.extend_from_slice(&ip.octets());
                buf.extend_from_slice(&port.to_be_bytes());
            }
            TargetAddress::Domain(domain, port) => {
                // First octet holds the number of octets to follow
                let len = u8::try_from(domain.len())
                    .ok()
                    .filter(|len| *len > 0)
                    .ok_or_else(|| DialError::InvalidTarget(domain.clone()))?;

                buf.push(AddressType::DomainName as u8);
                buf.push(len);
                buf.extend_from_slice(domain.as_bytes());
                buf.extend_from_slice(&port.to_be_bytes());
            }
        }
        Ok(())
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAddress::Ip(ip, port) => write!(f, "{}", SocketAddr::new(*ip, *port)),
            TargetAddress::Domain(domain, port) => write!(f, "{domain}:{port}"),
        }
    }
}

/// read_bound_address consumes BND.ADDR / BND.PORT from a proxy reply
/// and returns it as a printable string: IPv4, IPv6, or domain name
pub async fn read_bound_address<S>(stream: &mut S, atyp: u8) -> Result<String, DialError>
where
    S: AsyncRead + Unpin,
{
    // Match type and extract address or domain name
    let host = match AddressType::from_byte(atyp) {
        Some(AddressType::IPv4) => {
            let mut addr = [0u8; 4];
            stream.read_exact(&mut addr).await?;
            Ipv4Addr::from(addr).to_string()
        }
        Some(AddressType::DomainName) => {
            let mut len = [0u8; 1];
            stream.read_exact(&mut len).await?;

            // Read domain and convert to string
            let mut domain = vec![0u8; len[0] as usize];
            stream.read_exact(&mut domain).await?;
            String::from_utf8(domain)
                .map_err(|e| DialError::Protocol(format!("invalid bound domain: {e}")))?
        }
        Some(AddressType::IPv6) => {
            let mut addr = [0u8; 16];
            stream.read_exact(&mut addr).await?;
            format!("[{}]", Ipv6Addr::from(addr))
        }
        None => {
            return Err(DialError::Protocol(format!(
                "unknown address type in reply: {atyp:#04x}"
            )));
        }
    };

    //Read port
    let mut port_buf = [0u8; 2];
    stream.read_exact(&mut port_buf).await?;
    let port = u16::from_be_bytes(port_buf);

    Ok(format!("{host}:{port}"))
}
