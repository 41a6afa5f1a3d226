use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};

/// Credential is one username/password pair tried against an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Wordlists holds the candidate usernames and passwords. Both lists
/// are shared read-only by every burst, so they live behind Arcs.
#[derive(Debug, Clone, Default)]
pub struct Wordlists {
    pub usernames: Arc<[String]>,
    pub passwords: Arc<[String]>,
}

impl Wordlists {
    pub fn new(usernames: Vec<String>, passwords: Vec<String>) -> Self {
        Self {
            usernames: usernames.into(),
            passwords: passwords.into(),
        }
    }

    /// Size of the full username x password cross product
    pub fn combinations(&self) -> usize {
        self.usernames.len() * self.passwords.len()
    }

    /// pairs walks the cross product username-major, password-minor
    pub fn pairs(&self) -> impl Iterator<Item = Credential> + '_ {
        self.usernames.iter().flat_map(move |user| {
            self.passwords
                .iter()
                .map(move |pass| Credential::new(user.as_str(), pass.as_str()))
        })
    }
}

/// read_lines reads one entry per line from a file. Line terminators
/// are stripped, everything else (including blank lines) is kept.
pub async fn read_lines(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let file = File::open(path.as_ref()).await?;
    let mut lines = BufReader::new(file).lines();

    let mut entries = Vec::new();
    while let Some(line) = lines.next_line().await? {
        entries.push(line);
    }
    Ok(entries)
}

/// split_inline splits a comma separated list given on the command line.
/// Entries are kept verbatim, so `a,,b` yields an empty candidate.
pub fn split_inline(list: &str) -> Vec<String> {
    list.split(',').map(str::to_string).collect()
}
