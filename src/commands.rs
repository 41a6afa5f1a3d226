use crate::address::{TargetAddress, read_bound_address};
use crate::error::DialError;
use crate::protocol::{Command, RSV, ReplyCode, Version};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

// ================
// CONNECT COMMAND
// ================

/// request_connect asks the proxy to open a TCP connection to the target
/// and waits for the reply. On success the stream is positioned right
/// after the reply and carries the tunnelled connection. Returns the
/// address the proxy bound for the outbound leg.
pub async fn request_connect<S>(stream: &mut S, target: &TargetAddress) -> Result<String, DialError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // SOCKS5 request format
    // +----+-----+-------+------+----------+----------+
    // |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
    // +----+-----+-------+------+----------+----------+
    // | 1  |  1  | X'00' |  1   | Variable |    2     |
    // +----+-----+-------+------+----------+----------+
    let mut request = vec![Version::SOCKS5 as u8, Command::Connect as u8, RSV];
    target.encode(&mut request)?;
    stream.write_all(&request).await?;

    // SOCKS5 reply format
    // +----+-----+-------+------+----------+----------+
    // |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
    // +----+-----+-------+------+----------+----------+
    // | 1  |  1  | X'00' |  1   | Variable |    2     |
    // +----+-----+-------+------+----------+----------+
    let mut header = [0u8; 4];
    stream.read_exact(&mut header).await?;

    if header[0] != Version::SOCKS5 as u8 {
        return Err(DialError::Protocol(format!(
            "proxy replied with version {:#04x}",
            header[0]
        )));
    }

    let reply = ReplyCode::from_byte(header[1])
        .ok_or_else(|| DialError::Protocol(format!("unassigned reply code {:#04x}", header[1])))?;

    if reply != ReplyCode::Succeeded {
        return Err(DialError::Rejected {
            target: target.to_string(),
            reply,
        });
    }

    // Drain BND.ADDR / BND.PORT so the caller sees only tunnel bytes
    let bound = read_bound_address(stream, header[3]).await?;

    // DEBUG
    debug!("proxy tunnel to {} bound at {}", target, bound);

    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use tokio::io::duplex;

    #[tokio::test]
    async fn connect_success_leaves_tunnel_bytes() {
        let (mut client, mut proxy) = duplex(128);

        let server = tokio::spawn(async move {
            // VER CMD RSV ATYP(domain) LEN "box" PORT
            let mut req = [0u8; 3 + 1 + 1 + 3 + 2];
            proxy.read_exact(&mut req).await.unwrap();
            proxy
                .write_all(&[0x05, 0x00, 0x00, 0x01, 10, 0, 0, 1, 0x1F, 0x90])
                .await
                .unwrap();
            proxy.write_all(b"SSH-2.0-test\r\n").await.unwrap();
            req
        });

        let target = TargetAddress::from(&Endpoint::new("box", 22));
        let bound = request_connect(&mut client, &target).await.unwrap();
        assert_eq!(bound, "10.0.0.1:8080");

        let req = server.await.unwrap();
        assert_eq!(&req[..5], &[0x05, 0x01, 0x00, 0x03, 3]);
        assert_eq!(&req[5..8], b"box");
        assert_eq!(&req[8..], &[0x00, 0x16]);

        let mut banner = [0u8; 14];
        client.read_exact(&mut banner).await.unwrap();
        assert_eq!(&banner, b"SSH-2.0-test\r\n");
    }

    #[tokio::test]
    async fn connect_refusal_maps_reply_code() {
        let (mut client, mut proxy) = duplex(128);

        tokio::spawn(async move {
            let mut req = [0u8; 3 + 1 + 4 + 2];
            proxy.read_exact(&mut req).await.unwrap();
            proxy
                .write_all(&[0x05, 0x05, 0x00, 0x01, 0, 0, 0, 0, 0, 0])
                .await
                .unwrap();
        });

        let target = TargetAddress::from(&Endpoint::new("192.0.2.7", 22));
        let err = request_connect(&mut client, &target).await.unwrap_err();
        match err {
            DialError::Rejected { target, reply } => {
                assert_eq!(target, "192.0.2.7:22");
                assert_eq!(reply, ReplyCode::ConnectionRefused);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
