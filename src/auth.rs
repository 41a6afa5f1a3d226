use crate::error::DialError;
use crate::protocol::{AuthMethod, AuthStatus, USERPASS_VERSION, Version};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// UserPass holds the username/password the dialer presents to the proxy
#[derive(Clone)]
pub struct UserPass {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for UserPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPass")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// negotiate_auth runs the client half of SOCKS5 method selection and,
/// when the proxy picks it, the username/password sub-negotiation
pub async fn negotiate_auth<S>(stream: &mut S, auth: Option<&UserPass>) -> Result<(), DialError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // ClientHello format
    // +----+----------+----------+
    // |VER | NMETHODS | METHODS  |
    // +----+----------+----------+
    // | 1  |    1     | 1 to 255 |
    // +----+----------+----------+

    // Only offer user/pass when we actually have credentials
    let methods: &[AuthMethod] = match auth {
        Some(_) => &[AuthMethod::NoAuth, AuthMethod::UserPass],
        None => &[AuthMethod::NoAuth],
    };

    let mut hello = vec![Version::SOCKS5 as u8, methods.len() as u8];
    hello.extend(methods.iter().map(|m| *m as u8));
    stream.write_all(&hello).await?;

    // ServerChoice method selection reply format
    // +----+--------+
    // |VER | METHOD |
    // +----+--------+
    // | 1  |   1    |
    // +----+--------+
    let mut choice = [0u8; 2];
    stream.read_exact(&mut choice).await?;

    if choice[0] != Version::SOCKS5 as u8 {
        return Err(DialError::Protocol(format!(
            "proxy answered with version {:#04x}",
            choice[0]
        )));
    }

    // DEBUG
    debug!("proxy selected auth method {:#04x}", choice[1]);

    match (AuthMethod::from_byte(choice[1]), auth) {
        (AuthMethod::NoAuth, _) => Ok(()),
        (AuthMethod::UserPass, Some(creds)) => authenticate_userpass(stream, creds).await,
        (AuthMethod::UserPass, None) => Err(DialError::Protocol(
            "proxy selected username/password but none were offered".into(),
        )),
        (AuthMethod::NoAcceptable, _) => Err(DialError::NoAcceptableMethod),
    }
}

/// authenticate_userpass sends credentials according to RFC 1929
async fn authenticate_userpass<S>(stream: &mut S, creds: &UserPass) -> Result<(), DialError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // Client Username/Password Request
    // +----+------+----------+------+----------+
    // |VER | ULEN |  UNAME   | PLEN |  PASSWD  |
    // +----+------+----------+------+----------+
    // | 1  |  1   | 1 to 255 |  1   | 1 to 255 |
    // +----+------+----------+------+----------+
    let ulen = field_len(&creds.username, "username")?;
    let plen = field_len(&creds.password, "password")?;

    let mut request = Vec::with_capacity(3 + ulen as usize + plen as usize);
    request.push(USERPASS_VERSION);
    request.push(ulen);
    request.extend_from_slice(creds.username.as_bytes());
    request.push(plen);
    request.extend_from_slice(creds.password.as_bytes());
    stream.write_all(&request).await?;

    // Username/Password Server response
    // +----+--------+
    // |VER | STATUS |
    // +----+--------+
    // | 1  |   1    |
    // +----+--------+
    let mut reply = [0u8; 2];
    stream.read_exact(&mut reply).await?;

    if reply[0] != USERPASS_VERSION {
        return Err(DialError::Protocol(format!(
            "invalid username/password sub-negotiation version {:#04x}",
            reply[0]
        )));
    }

    if reply[1] == AuthStatus::Success as u8 {
        Ok(())
    } else {
        Err(DialError::ProxyAuthRejected)
    }
}

fn field_len(value: &str, name: &str) -> Result<u8, DialError> {
    u8::try_from(value.len())
        .ok()
        .filter(|len| *len > 0)
        .ok_or_else(|| DialError::Protocol(format!("proxy {name} must be 1 to 255 bytes")))
}
