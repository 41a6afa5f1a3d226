use crate::attempt::Detail;
use crate::auth::UserPass;
use crate::cli::Args;
use crate::credentials::{Wordlists, read_lines, split_inline};
use crate::dialer::Dialer;
use crate::endpoint::{Endpoint, parse_targets};
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::debug;

/// Config is the validated run configuration. Building one performs
/// every check that can fail, so nothing is attempted on bad input.
#[derive(Debug)]
pub struct Config {
    pub targets: Vec<Endpoint>,
    pub wordlists: Wordlists,
    pub dialer: Dialer,
    pub budget: usize,
    pub detail: Detail,
    pub max_hosts: Option<usize>,
}

impl Config {
    pub async fn from_args(args: Args) -> Result<Self> {
        // Inline entries first, then file entries
        let usernames =
            gather(args.users.as_deref(), args.user_file.as_deref(), "username").await?;
        let passwords =
            gather(args.passwords.as_deref(), args.pass_file.as_deref(), "password").await?;

        if usernames.is_empty() || passwords.is_empty() {
            bail!("[ERR] specify both usernames and passwords via files or directly");
        }

        // Bad entries are dropped, only an empty result is fatal
        let targets = parse_targets(args.hosts.as_deref().unwrap_or_default());
        if targets.is_empty() {
            bail!("[ERR] no usable targets given");
        }

        // Check for proxy auth and grab it if present
        let proxy_auth = match (args.proxy_user, args.proxy_pass) {
            (Some(u), Some(p)) => Some(UserPass {
                username: u,
                password: p,
            }),
            (None, None) => None,
            _ => bail!("[ERR] must provide both proxy username and password (or neither)"),
        };

        let dialer = Dialer::from_proxy(args.proxy.as_deref(), proxy_auth).await?;

        // DEBUG
        debug!(
            "{} username(s), {} password(s), {} target(s)",
            usernames.len(),
            passwords.len(),
            targets.len()
        );

        Ok(Self {
            targets,
            wordlists: Wordlists::new(usernames, passwords),
            dialer,
            budget: args.threads as usize,
            detail: Detail::from(args.detail),
            max_hosts: args.max_hosts.map(|n| n as usize),
        })
    }
}

async fn gather(inline: Option<&str>, file: Option<&Path>, what: &str) -> Result<Vec<String>> {
    let mut entries = match inline {
        Some(list) if !list.is_empty() => split_inline(list),
        _ => Vec::new(),
    };

    if let Some(path) = file {
        let lines = read_lines(path)
            .await
            .with_context(|| format!("[ERR] reading {what} file {}", path.display()))?;
        entries.extend(lines);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["sshburst"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn merges_inline_and_file_entries() {
        let mut users = tempfile::NamedTempFile::new().unwrap();
        writeln!(users, "alice\nbob").unwrap();

        let path = users.path().to_str().unwrap().to_string();
        let config = Config::from_args(args(&[
            "-U", "root", "-u", &path, "-P", "x,y", "-h", "127.0.0.1", "-t", "3",
        ]))
        .await
        .unwrap();

        assert_eq!(&*config.wordlists.usernames, ["root", "alice", "bob"]);
        assert_eq!(&*config.wordlists.passwords, ["x", "y"]);
        assert_eq!(config.targets, vec![Endpoint::new("127.0.0.1", 22)]);
        assert_eq!(config.budget, 3);
        assert_eq!(config.detail, Detail::Quiet);
        assert!(matches!(config.dialer, Dialer::Direct));
    }

    #[tokio::test]
    async fn missing_credentials_are_fatal() {
        let err = Config::from_args(args(&["-U", "root", "-h", "127.0.0.1"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("usernames and passwords"));

        assert!(
            Config::from_args(args(&["-P", "pw", "-h", "127.0.0.1"]))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn unreadable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = Config::from_args(args(&[
            "-U",
            "root",
            "-p",
            missing.to_str().unwrap(),
            "-h",
            "127.0.0.1",
        ]))
        .await
        .unwrap_err();
        assert!(err.to_string().contains("password file"));
    }

    #[tokio::test]
    async fn malformed_proxy_is_fatal() {
        let err = Config::from_args(args(&[
            "-U", "root", "-P", "pw", "-h", "127.0.0.1", "--proxy", "nonsense",
        ]))
        .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn half_proxy_credentials_are_rejected() {
        let err = Config::from_args(args(&[
            "-U",
            "root",
            "-P",
            "pw",
            "-h",
            "127.0.0.1",
            "--proxy-user",
            "only",
        ]))
        .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn malformed_target_keeps_the_others() {
        let config = Config::from_args(args(&[
            "-U",
            "root",
            "-P",
            "pw",
            "-h",
            "10.0.0.1,10.0.0.2:ssh",
        ]))
        .await
        .unwrap();
        assert_eq!(config.targets, vec![Endpoint::new("10.0.0.1", 22)]);

        // Nothing usable left is still a configuration error
        assert!(
            Config::from_args(args(&["-U", "root", "-P", "pw", "-h", "10.0.0.2:ssh"]))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn empty_target_list_is_rejected() {
        assert!(
            Config::from_args(args(&["-U", "root", "-P", "pw"]))
                .await
                .is_err()
        );
    }
}
