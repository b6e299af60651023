//! Command-line configuration.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use pkgpaths::classify::DEFAULT_SOURCE_EXTENSIONS;
use pkgpaths::DEFAULT_REFRESH_INTERVAL;

pub const DEFAULT_HTTP_ADDR: &str = "localhost:6118";

/// Directory names skipped when no exclusion file is given.
pub const DEFAULT_EXCLUSIONS: &str = ".git .hg";

/// Resolves partial package paths to full import or directory paths.
#[derive(Debug, Parser)]
#[command(name = "pkgpaths", version)]
pub struct Cli {
    /// Listen on [HOST]:PORT. An empty HOST listens on all interfaces.
    #[arg(long, value_name = "[HOST]:PORT", default_value = DEFAULT_HTTP_ADDR)]
    pub http: String,

    /// Directories to index, separated by the platform path-list separator.
    /// Defaults to the `src` directories of GOROOT and GOPATH.
    #[arg(long, value_name = "DIRS")]
    pub root: Option<OsString>,

    /// File with whitespace-separated directory names to skip while indexing.
    #[arg(long, value_name = "FILE")]
    pub exclude: Option<PathBuf>,

    /// Seconds between scheduled index rebuilds.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
    pub interval: u64,

    /// Source file extension marking a package directory (repeatable).
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no root directories given and none found under GOROOT or GOPATH")]
    NoRoots,

    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
}

/// Where the exclusion names come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionSource {
    File(PathBuf),
    Default,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_addr: String,
    pub roots: Vec<PathBuf>,
    pub exclusions: ExclusionSource,
    pub refresh_interval: Duration,
    pub extensions: Vec<String>,
}

impl ServerConfig {
    /// Builds the configuration from parsed flags and the process environment.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Self::from_cli_with_env(cli, |key| std::env::var_os(key))
    }

    /// Builds the configuration, reading GOROOT/GOPATH through `env`.
    pub fn from_cli_with_env<F>(cli: Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if cli.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let roots = match cli.root.as_deref() {
            Some(list) if !list.is_empty() => std::env::split_paths(list)
                .filter(|path| !path.as_os_str().is_empty())
                .collect(),
            _ => default_roots(env),
        };
        if roots.is_empty() {
            return Err(ConfigError::NoRoots);
        }

        let extensions = if cli.extensions.is_empty() {
            DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect()
        } else {
            cli.extensions
        };

        Ok(Self {
            http_addr: listen_addr(&cli.http),
            roots,
            exclusions: cli
                .exclude
                .map(ExclusionSource::File)
                .unwrap_or(ExclusionSource::Default),
            refresh_interval: Duration::from_secs(cli.interval),
            extensions,
        })
    }
}

/// Expands the host-less `:PORT` form to every interface.
pub fn listen_addr(http: &str) -> String {
    if http.starts_with(':') {
        format!("0.0.0.0{http}")
    } else {
        http.to_string()
    }
}

/// `$GOROOT/src` and `<each GOPATH entry>/src`, keeping only existing ones.
pub fn default_roots<F>(env: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut roots = Vec::new();
    if let Some(goroot) = env("GOROOT").filter(|value| !value.is_empty()) {
        roots.push(PathBuf::from(goroot).join("src"));
    }
    if let Some(gopath) = env("GOPATH") {
        roots.extend(
            std::env::split_paths(&gopath)
                .filter(|path| !path.as_os_str().is_empty())
                .map(|path| path.join("src")),
        );
    }
    roots.retain(|root| root.is_dir());
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pkgpaths").chain(args.iter().copied()))
            .expect("flags parse")
    }

    fn env_of(vars: HashMap<&'static str, OsString>) -> impl Fn(&str) -> Option<OsString> {
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_flags_are_omitted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        let env = env_of(HashMap::from([("GOROOT", temp.path().as_os_str().to_owned())]));

        let config = ServerConfig::from_cli_with_env(parse(&[]), env).expect("config");
        assert_eq!(config.http_addr, DEFAULT_HTTP_ADDR);
        assert_eq!(config.roots, vec![temp.path().join("src")]);
        assert_eq!(config.exclusions, ExclusionSource::Default);
        assert_eq!(config.refresh_interval, Duration::from_secs(45 * 60));
        assert_eq!(config.extensions, vec!["go"]);
    }

    #[test]
    fn root_flag_splits_on_the_path_list_separator() {
        let joined = std::env::join_paths(["/one", "/two"]).unwrap();
        let root = joined.to_string_lossy().to_string();
        let cli = parse(&["--root", &root, "--http", ":7000", "--ext", "rs", "--ext", "go"]);

        let config = ServerConfig::from_cli_with_env(cli, |_| None).expect("config");
        assert_eq!(config.roots, vec![PathBuf::from("/one"), PathBuf::from("/two")]);
        assert_eq!(config.http_addr, "0.0.0.0:7000");
        assert_eq!(config.extensions, vec!["rs", "go"]);
    }

    #[test]
    fn listen_addr_keeps_explicit_hosts() {
        assert_eq!(listen_addr(":6118"), "0.0.0.0:6118");
        assert_eq!(listen_addr("localhost:6118"), "localhost:6118");
        assert_eq!(listen_addr("[::1]:6118"), "[::1]:6118");
    }

    #[test]
    fn gopath_entries_contribute_existing_src_dirs() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::create_dir(first.path().join("src")).unwrap();
        let gopath = std::env::join_paths([first.path(), second.path()]).unwrap();

        let roots = default_roots(env_of(HashMap::from([("GOPATH", gopath)])));
        assert_eq!(roots, vec![first.path().join("src")]);
    }

    #[test]
    fn missing_roots_are_an_error() {
        let error = ServerConfig::from_cli_with_env(parse(&[]), |_| None).expect_err("no roots");
        assert!(matches!(error, ConfigError::NoRoots));
    }

    #[test]
    fn zero_interval_is_an_error() {
        let cli = parse(&["--root", "/src", "--interval", "0"]);
        let error = ServerConfig::from_cli_with_env(cli, |_| None).expect_err("zero interval");
        assert!(matches!(error, ConfigError::ZeroInterval));
    }

    #[test]
    fn exclude_flag_names_a_file() {
        let cli = parse(&["--root", "/src", "--exclude", "/etc/pkgpaths.exclude"]);
        let config = ServerConfig::from_cli_with_env(cli, |_| None).expect("config");
        assert_eq!(
            config.exclusions,
            ExclusionSource::File(PathBuf::from("/etc/pkgpaths.exclude"))
        );
    }
}
