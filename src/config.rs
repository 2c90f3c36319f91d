use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const CONFIG_FNAME: &str = "imdb_backup.toml";
pub const COOKIE_FNAME: &str = "imdb_cookie.txt";
pub const ZIP_FNAME: &str = "imdb_exported_lists.zip";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_cookies_file")]
    pub cookies_file: PathBuf,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Pause before every export request
    #[serde(default = "default_export_delay_ms")]
    pub export_delay_ms: u64,
    #[serde(default = "default_required_cookies")]
    pub required_cookies: Vec<String>,
    #[serde(default = "default_keep_open")]
    pub keep_open: bool,
}

fn default_cookies_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(COOKIE_FNAME)))
        .unwrap_or_else(|| PathBuf::from(COOKIE_FNAME))
}
fn default_output_file() -> PathBuf {
    PathBuf::from(ZIP_FNAME)
}
fn default_base_url() -> String {
    String::from("https://www.imdb.com")
}
fn default_export_delay_ms() -> u64 {
    500
}
fn default_required_cookies() -> Vec<String> {
    vec!["at-main".into(), "ubid-main".into(), "uu".into()]
}
fn default_keep_open() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cookies_file: default_cookies_file(),
            output_file: default_output_file(),
            base_url: default_base_url(),
            export_delay_ms: default_export_delay_ms(),
            required_cookies: default_required_cookies(),
            keep_open: default_keep_open(),
        }
    }
}

impl Config {
    pub fn export_delay(&self) -> Duration {
        Duration::from_millis(self.export_delay_ms)
    }

    /// Apply the command line on top of the config file.
    pub fn with_overrides(mut self, cookies_file: Option<PathBuf>, no_pause: bool) -> Self {
        if let Some(path) = cookies_file {
            self.cookies_file = path;
        }
        if no_pause {
            self.keep_open = false;
        }
        self
    }
}

/// Read the optional config file; a missing file means defaults everywhere.
pub fn read_config(path: &Path) -> Result<Config> {
    let conf_contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(Error::config(format!(
                "Error reading {}: {}",
                path.display(),
                e
            )))
        }
    };
    let conf: Config = toml::from_str(&conf_contents)
        .map_err(|e| Error::config(format!("Error parsing {}: {}", path.display(), e)))?;
    tracing::debug!(?conf, "loaded config");
    Ok(conf)
}

/// Cookies sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// The single `id` cookie the site used to accept on its own
    LegacyToken(String),
    CookieSet(BTreeMap<String, String>),
}

impl Credentials {
    pub fn load(path: &Path, required: &[String]) -> Result<Credentials> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "can't read {} ({}).\nCreate this file and put your IMDb cookie inside.\n\
                 For more info see README.md.",
                path.display(),
                e
            ))
        })?;
        Credentials::parse(&contents, path, required)
    }

    pub fn parse(contents: &str, source: &Path, required: &[String]) -> Result<Credentials> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Err(Error::config(format!(
                "{} is empty, put your IMDb cookie inside",
                source.display()
            )));
        }

        if !contents.starts_with('{') {
            let token = contents.strip_prefix("id=").unwrap_or(contents);
            return Ok(Credentials::LegacyToken(token.to_owned()));
        }

        let cookies: BTreeMap<String, String> = serde_json::from_str(contents).map_err(|e| {
            Error::config(format!("Error parsing {}: {}", source.display(), e))
        })?;
        let missing: Vec<&str> = required
            .iter()
            .filter(|name| !cookies.contains_key(name.as_str()))
            .map(|name| name.as_str())
            .collect();
        if let Some(first) = missing.first() {
            return Err(Error::Config {
                message: format!(
                    "{} is missing cookie(s) {}; expected all of {}",
                    source.display(),
                    missing.join(", "),
                    required.join(", ")
                ),
                key: Some((*first).to_owned()),
            });
        }
        Ok(Credentials::CookieSet(cookies))
    }

    /// Value for the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        match self {
            Credentials::LegacyToken(token) => format!("id={}", token),
            Credentials::CookieSet(cookies) => cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}
