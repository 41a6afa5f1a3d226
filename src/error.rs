use crate::protocol::ReplyCode;
use std::io;
use thiserror::Error;

/// DialError covers everything that can go wrong while opening a
/// transport to a target, directly or through the proxy
#[derive(Debug, Error)]
pub enum DialError {
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("proxy I/O error: {0}")]
    ProxyIo(#[from] io::Error),

    #[error("proxy protocol error: {0}")]
    Protocol(String),

    #[error("proxy offered no acceptable authentication method")]
    NoAcceptableMethod,

    #[error("proxy rejected credentials")]
    ProxyAuthRejected,

    #[error("proxy refused CONNECT to {target}: {reply}")]
    Rejected { target: String, reply: ReplyCode },

    #[error("invalid target address {0:?}")]
    InvalidTarget(String),
}

/// AttemptError is the coarse failure reason of a single login attempt
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("dial failed: {0}")]
    Dial(#[from] DialError),

    #[error("authentication failed: {0}")]
    Handshake(#[from] ssh2::Error),

    #[error("authentication failed: server did not accept the password")]
    Rejected,

    #[error("authentication failed: {0}")]
    Transport(#[from] io::Error),

    #[error("login task aborted: {0}")]
    Aborted(String),
}

impl AttemptError {
    /// is_dial reports whether the attempt never reached the SSH layer
    pub fn is_dial(&self) -> bool {
        matches!(self, AttemptError::Dial(_))
    }
}

/// EndpointError is returned when a target string cannot be parsed
#[derive(Debug, Error, PartialEq)]
pub enum EndpointError {
    #[error("empty host in target {0:?}")]
    EmptyHost(String),

    #[error("invalid port in target {0:?}")]
    InvalidPort(String),

    #[error("unterminated IPv6 literal in target {0:?}")]
    UnterminatedBracket(String),
}
