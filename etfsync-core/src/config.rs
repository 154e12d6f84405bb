//! Credentials and run configuration.
//!
//! Secrets come from a key=value credential file (default `.env.local`) and
//! the process environment. Environment values take precedence over file
//! values. The resulting [`SyncConfig`] is built once in `main` and passed by
//! reference to every component.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_KEY";
pub const ANON_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
pub const USER_AGENT_VAR: &str = "EDGAR_USER_AGENT";

/// Client identifier sent to EDGAR, which rejects anonymous agents.
pub const DEFAULT_USER_AGENT: &str = "ETFMonitor contact@etf-monitor.app";

pub const DEFAULT_ENV_FILE: &str = ".env.local";
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Number of key characters shown in the startup banner.
const KEY_PREFIX_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing NEXT_PUBLIC_SUPABASE_URL or SUPABASE_SERVICE_KEY \
         (set them in the credential file or as environment variables)"
    )]
    MissingCredentials,

    #[error("cannot read credential file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,
}

/// Datastore endpoint and API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL without a trailing slash.
    pub supabase_url: String,
    pub api_key: String,
}

impl Credentials {
    /// Resolve credentials from a merged variable map.
    ///
    /// The service key is preferred; the anon key is the fallback. Empty
    /// values count as missing.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let url = non_empty(vars, URL_VAR)
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        let key = non_empty(vars, SERVICE_KEY_VAR).or_else(|| non_empty(vars, ANON_KEY_VAR));

        match (url, key) {
            (Some(supabase_url), Some(key)) => Ok(Self {
                supabase_url,
                api_key: key.to_string(),
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    /// Leading characters of the key, for display.
    pub fn key_prefix(&self) -> &str {
        match self.api_key.char_indices().nth(KEY_PREFIX_LEN) {
            Some((idx, _)) => &self.api_key[..idx],
            None => &self.api_key,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("supabase_url", &self.supabase_url)
            .field("api_key", &format_args!("{}...", self.key_prefix()))
            .finish()
    }
}

/// Everything a sync run needs to know, resolved at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub credentials: Credentials,
    /// `User-Agent` sent to EDGAR.
    pub user_agent: String,
    /// Timeout for EDGAR fetches and upsert batches.
    pub http_timeout: Duration,
    /// Timeout for the verification count queries.
    pub count_timeout: Duration,
    pub batch_size: usize,
}

impl SyncConfig {
    /// Load configuration from a credential file and the process environment.
    ///
    /// A missing credential file is not an error; missing credentials are.
    pub fn load(env_file: &Path) -> Result<Self, ConfigError> {
        let mut vars = read_env_file(env_file)?;
        merge_environment(&mut vars, std::env::vars_os());
        Self::from_vars(&vars)
    }

    /// Build configuration from an already merged variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let credentials = Credentials::from_vars(vars)?;
        let user_agent = non_empty(vars, USER_AGENT_VAR)
            .unwrap_or(DEFAULT_USER_AGENT)
            .to_string();

        Ok(Self {
            credentials,
            user_agent,
            http_timeout: Duration::from_secs(30),
            count_timeout: Duration::from_secs(15),
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Override the upsert batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        self.batch_size = batch_size;
        Ok(self)
    }
}

/// Parse a key=value credential file without touching the process environment.
///
/// Returns an empty map when the file does not exist. Lines that cannot be
/// parsed are logged and skipped.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return Ok(vars);
    }

    let env_file_error = |reason: String| ConfigError::EnvFile {
        path: path.display().to_string(),
        reason,
    };

    let entries = dotenvy::from_path_iter(path).map_err(|e| env_file_error(e.to_string()))?;
    for entry in entries {
        match entry {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(dotenvy::Error::LineParse(_, index)) => {
                tracing::warn!(path = %path.display(), index, "skipping unparsable credential line");
            }
            Err(e) => return Err(env_file_error(e.to_string())),
        }
    }
    Ok(vars)
}

/// Overlay environment pairs on `vars`, skipping pairs that are not valid
/// UTF-8.
pub fn merge_environment<I>(vars: &mut HashMap<String, String>, env: I)
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut skipped = 0usize;
    for (key, value) in env {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => {
                vars.insert(key, value);
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "ignored non-UTF-8 environment variables");
    }
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn service_key_preferred_over_anon_key() {
        let creds = Credentials::from_vars(&vars(&[
            (URL_VAR, "https://db.example.co/"),
            (SERVICE_KEY_VAR, "service"),
            (ANON_KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(creds.supabase_url, "https://db.example.co");
        assert_eq!(creds.api_key, "service");
    }

    #[test]
    fn anon_key_is_fallback() {
        let creds = Credentials::from_vars(&vars(&[
            (URL_VAR, "https://db.example.co"),
            (SERVICE_KEY_VAR, ""),
            (ANON_KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key, "anon");
    }

    #[test]
    fn missing_url_is_fatal() {
        let err = Credentials::from_vars(&vars(&[(SERVICE_KEY_VAR, "service")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = Credentials::from_vars(&vars(&[(URL_VAR, "https://db.example.co")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn key_prefix_truncates() {
        let creds = Credentials {
            supabase_url: "https://db.example.co".into(),
            api_key: "abcdefghijklmnopqrstuvwxyz".into(),
        };
        assert_eq!(creds.key_prefix(), "abcdefghijklmnopqrst");

        let short = Credentials {
            supabase_url: "https://db.example.co".into(),
            api_key: "abc".into(),
        };
        assert_eq!(short.key_prefix(), "abc");
    }

    #[test]
    fn debug_output_hides_full_key() {
        let creds = Credentials {
            supabase_url: "https://db.example.co".into(),
            api_key: "abcdefghijklmnopqrstuvwxyz".into(),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("uvwxyz"));
    }

    #[test]
    fn env_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "{URL_VAR}=https://file.example.co").unwrap();
        writeln!(file, "{SERVICE_KEY_VAR}=from-file").unwrap();

        let parsed = read_env_file(file.path()).unwrap();
        assert_eq!(parsed[URL_VAR], "https://file.example.co");
        assert_eq!(parsed[SERVICE_KEY_VAR], "from-file");
    }

    #[test]
    fn missing_env_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let parsed = read_env_file(&dir.path().join("absent.env")).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{URL_VAR}=https://file.example.co").unwrap();
        writeln!(file, "{SERVICE_KEY_VAR}=from-file").unwrap();

        let mut merged = read_env_file(file.path()).unwrap();
        merged.extend(vars(&[(SERVICE_KEY_VAR, "from-env")]));

        let config = SyncConfig::from_vars(&merged).unwrap();
        assert_eq!(config.credentials.supabase_url, "https://file.example.co");
        assert_eq!(config.credentials.api_key, "from-env");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn unparsable_lines_are_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{URL_VAR}=https://file.example.co").unwrap();
        writeln!(file, "garbage line without equals").unwrap();
        writeln!(file, "{SERVICE_KEY_VAR}=from-file").unwrap();

        let parsed = read_env_file(file.path()).unwrap();
        assert_eq!(parsed[URL_VAR], "https://file.example.co");
        assert_eq!(parsed[SERVICE_KEY_VAR], "from-file");
    }

    #[test]
    fn environment_pairs_override_file_values() {
        let mut merged = vars(&[(SERVICE_KEY_VAR, "from-file")]);
        merge_environment(
            &mut merged,
            [
                (OsString::from(SERVICE_KEY_VAR), OsString::from("from-env")),
                (OsString::from(URL_VAR), OsString::from("https://env.example.co")),
            ],
        );
        assert_eq!(merged[SERVICE_KEY_VAR], "from-env");
        assert_eq!(merged[URL_VAR], "https://env.example.co");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_environment_is_ignored() {
        use std::os::unix::ffi::OsStringExt;

        let mut merged = HashMap::new();
        merge_environment(
            &mut merged,
            [
                (OsString::from("BAD_VALUE"), OsString::from_vec(vec![0xff, 0xfe])),
                (OsString::from_vec(vec![0xff]), OsString::from("bad key")),
                (OsString::from(URL_VAR), OsString::from("https://env.example.co")),
                (OsString::from(SERVICE_KEY_VAR), OsString::from("k")),
            ],
        );

        assert_eq!(merged.len(), 2);
        let config = SyncConfig::from_vars(&merged).unwrap();
        assert_eq!(config.credentials.api_key, "k");
    }

    #[test]
    fn zero_batch_size_rejected() {
        let config = SyncConfig::from_vars(&vars(&[
            (URL_VAR, "https://db.example.co"),
            (SERVICE_KEY_VAR, "k"),
        ]))
        .unwrap();
        assert!(matches!(
            config.with_batch_size(0),
            Err(ConfigError::InvalidBatchSize)
        ));
    }
}
