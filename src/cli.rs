use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command line surface. `-h` names the targets, so help is `--help` only.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concurrent SSH password auditing, optionally through a SOCKS5 proxy",
    long_about = None,
    disable_help_flag = true
)]
pub struct Args {
    /// File containing usernames, one per line
    #[arg(short = 'u', long = "user-file")]
    pub user_file: Option<PathBuf>,

    /// File containing passwords, one per line
    #[arg(short = 'p', long = "pass-file")]
    pub pass_file: Option<PathBuf>,

    /// Comma separated usernames
    #[arg(short = 'U', long = "users")]
    pub users: Option<String>,

    /// Comma separated passwords
    #[arg(short = 'P', long = "passwords")]
    pub passwords: Option<String>,

    /// Comma separated targets, port 22 when omitted
    #[arg(short = 'h', long = "hosts")]
    pub hosts: Option<String>,

    /// SOCKS5 proxy address (host:port)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Username for the SOCKS5 proxy
    #[arg(long)]
    pub proxy_user: Option<String>,

    /// Password for the SOCKS5 proxy
    #[arg(long)]
    pub proxy_pass: Option<String>,

    /// Attempts in flight per target
    #[arg(short = 't', long = "threads", default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Detail level: 0 prints successes only, 1 also prints failures
    #[arg(short = 'd', long = "detail", default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub detail: u8,

    /// Maximum number of targets worked on at once (unbounded by default)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_hosts: Option<u32>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}
