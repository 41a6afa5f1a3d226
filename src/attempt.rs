use crate::credentials::Credential;
use crate::dialer::Dialer;
use crate::endpoint::Endpoint;
use crate::error::AttemptError;
use async_trait::async_trait;
use ssh2::Session;
use std::net::TcpStream as StdTcpStream;
use std::sync::Arc;
use tokio::task;
use tracing::debug;

/// Detail controls which attempt outcomes reach stdout. Successes are
/// always printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detail {
    #[default]
    Quiet,
    Failures,
}

impl From<u8> for Detail {
    fn from(level: u8) -> Self {
        match level {
            0 => Detail::Quiet,
            _ => Detail::Failures,
        }
    }
}

/// Attempt is one connect-and-authenticate trial. Bursts only care about
/// the boolean; reporting is the implementation's business.
#[async_trait]
pub trait Attempt: Send + Sync + 'static {
    async fn try_login(&self, endpoint: &Endpoint, credential: &Credential) -> bool;
}

/// SshLogin performs SSH password logins over the shared dialer
#[derive(Debug, Clone)]
pub struct SshLogin {
    dialer: Arc<Dialer>,
    detail: Detail,
}

impl SshLogin {
    pub fn new(dialer: Arc<Dialer>, detail: Detail) -> Self {
        Self { dialer, detail }
    }
}

#[async_trait]
impl Attempt for SshLogin {
    async fn try_login(&self, endpoint: &Endpoint, credential: &Credential) -> bool {
        attempt(endpoint, credential, &self.dialer, self.detail).await
    }
}

/// attempt runs one login and prints its outcome
pub async fn attempt(
    endpoint: &Endpoint,
    credential: &Credential,
    dialer: &Dialer,
    detail: Detail,
) -> bool {
    let outcome = login(endpoint, credential, dialer).await;
    if let Err(e) = &outcome {
        debug!("{}@{}: {}", credential.username, endpoint, e);
    }

    if let Some(line) = report_line(outcome.as_ref().map(|_| ()), detail, endpoint, credential) {
        println!("{line}");
    }
    outcome.is_ok()
}

/// report_line picks the stdout line for an outcome. Successes always
/// print, failures only at `Detail::Failures`.
fn report_line(
    outcome: Result<(), &AttemptError>,
    detail: Detail,
    endpoint: &Endpoint,
    credential: &Credential,
) -> Option<String> {
    let prefix = match outcome {
        Ok(()) => "Success",
        Err(_) if detail == Detail::Quiet => return None,
        Err(e) if e.is_dial() => "Failed to dial",
        Err(_) => "Failed to create SSH client",
    };
    Some(format!(
        "{prefix}: {}@{} with password {}",
        credential.username, endpoint, credential.password
    ))
}

/// login dials the endpoint and authenticates with a password. The
/// session is torn down before returning in every case.
pub async fn login(
    endpoint: &Endpoint,
    credential: &Credential,
    dialer: &Dialer,
) -> Result<(), AttemptError> {
    let stream = dialer.connect(endpoint).await?;

    // libssh2 drives a blocking socket on the blocking pool
    let stream = stream.into_std()?;
    stream.set_nonblocking(false)?;

    let credential = credential.clone();
    task::spawn_blocking(move || password_login(stream, &credential))
        .await
        .map_err(|e| AttemptError::Aborted(e.to_string()))?
}

fn password_login(stream: StdTcpStream, credential: &Credential) -> Result<(), AttemptError> {
    let mut session = Session::new()?;
    session.set_tcp_stream(stream);

    // Host keys are never checked against known_hosts
    session.handshake()?;
    session.userauth_password(&credential.username, &credential.password)?;

    if !session.authenticated() {
        return Err(AttemptError::Rejected);
    }

    if let Err(e) = session.disconnect(None, "done", None) {
        debug!("disconnect after login failed: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DialError;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn detail_levels() {
        assert_eq!(Detail::from(0), Detail::Quiet);
        assert_eq!(Detail::from(1), Detail::Failures);
        assert_eq!(Detail::default(), Detail::Quiet);
    }

    #[test]
    fn result_lines() {
        let endpoint = Endpoint::new("10.0.0.5", 2222);
        let credential = Credential::new("root", "hunter2");
        let dial = AttemptError::Dial(DialError::InvalidTarget("10.0.0.5".into()));
        let auth = AttemptError::Rejected;

        assert_eq!(
            report_line(Ok(()), Detail::Quiet, &endpoint, &credential).as_deref(),
            Some("Success: root@10.0.0.5:2222 with password hunter2")
        );
        assert_eq!(
            report_line(Err(&dial), Detail::Failures, &endpoint, &credential).as_deref(),
            Some("Failed to dial: root@10.0.0.5:2222 with password hunter2")
        );
        assert_eq!(
            report_line(Err(&auth), Detail::Failures, &endpoint, &credential).as_deref(),
            Some("Failed to create SSH client: root@10.0.0.5:2222 with password hunter2")
        );
    }

    #[test]
    fn quiet_detail_hides_failures() {
        let endpoint = Endpoint::new("10.0.0.5", 22);
        let credential = Credential::new("admin", "admin");
        let dial = AttemptError::Dial(DialError::InvalidTarget("10.0.0.5".into()));

        assert!(report_line(Err(&dial), Detail::Quiet, &endpoint, &credential).is_none());
        assert!(
            report_line(Err(&AttemptError::Rejected), Detail::Quiet, &endpoint, &credential)
                .is_none()
        );
    }

    #[test]
    fn ipv6_targets_are_bracketed_in_lines() {
        let endpoint = Endpoint::new("fe80::1", 22);
        let credential = Credential::new("pi", "raspberry");

        assert_eq!(
            report_line(Ok(()), Detail::Failures, &endpoint, &credential).as_deref(),
            Some("Success: pi@[fe80::1]:22 with password raspberry")
        );
    }

    #[tokio::test]
    async fn dial_failure_is_reported_as_dial() {
        let endpoint = Endpoint::new("127.0.0.1", closed_port().await);
        let credential = Credential::new("root", "toor");

        let err = login(&endpoint, &credential, &Dialer::Direct)
            .await
            .unwrap_err();
        assert!(err.is_dial());

        assert!(!attempt(&endpoint, &credential, &Dialer::Direct, Detail::Failures).await);
    }

    #[tokio::test]
    async fn non_ssh_peer_fails_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    break;
                };
                let _ = sock.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n").await;
            }
        });

        let endpoint = Endpoint::new("127.0.0.1", port);
        let credential = Credential::new("admin", "admin");

        let err = login(&endpoint, &credential, &Dialer::Direct)
            .await
            .unwrap_err();
        assert!(!err.is_dial());

        let login = SshLogin::new(Arc::new(Dialer::Direct), Detail::Quiet);
        assert!(!login.try_login(&endpoint, &credential).await);
    }
}
