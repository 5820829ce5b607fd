//! Configuration management for hclfmt.
//!
//! Two layers feed a run:
//! - [`Config`]: settings from `hclfmt.toml` files (auto-discovered or explicit)
//! - [`RunConfig`]: the immutable per-run settings, built once from the parsed
//!   CLI arguments on top of a [`Config`] and passed explicitly to the pipeline
//!
//! Config files are auto-discovered in the user's home directory and in every
//! ancestor of the starting directory, from the root downwards. Files closer to
//! the starting directory override only the keys they set.

use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cli::{check_usage, CliArgs};
use crate::error::{Error, Result};
use crate::source::filter::{FileFilter, DEFAULT_EXTENSION};

/// Config file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["hclfmt.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

fn default_extensions() -> Vec<String> {
    vec![DEFAULT_EXTENSION.to_string()]
}

/// Settings loaded from `hclfmt.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Extensions picked up while walking directories (default: `["hcl"]`)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns excluding walked entries
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Continue past failures on explicitly named files (default: false)
    #[serde(default)]
    pub keep_going: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so unset keys never override a less specific file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub keep_going: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            extensions: default_extensions(),
            exclude: Vec::new(),
            keep_going: false,
        }
    }
}

impl Config {
    /// Validate configuration values
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.extensions.is_empty() {
            return Some("at least one extension is required".to_string());
        }
        for ext in &self.extensions {
            let bare = ext.strip_prefix('.').unwrap_or(ext);
            if bare.is_empty() {
                return Some("extensions must not be empty".to_string());
            }
            if bare.contains(['/', '\\']) {
                return Some(format!("extension {ext:?} contains a path separator"));
            }
        }
        for pattern in &self.exclude {
            if let Err(e) = Pattern::new(pattern) {
                return Some(format!("exclude pattern {pattern:?}: {e}"));
            }
        }
        None
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let partial: PartialConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        let mut config = Self::default();
        config.apply_partial(partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(v) = partial.extensions {
            self.extensions = v;
        }
        if let Some(v) = partial.exclude {
            self.exclude = v;
        }
        if let Some(v) = partial.keep_going {
            self.keep_going = v;
        }
    }

    /// Discover config files for a starting directory
    ///
    /// Returns paths in order of priority, least specific first: the home
    /// directory, then ancestors from the root down to `start_dir`.
    #[must_use]
    pub fn discover_config_files(start_dir: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let mut ancestors: Vec<&Path> = start_dir.ancestors().collect();
        ancestors.reverse();

        for ancestor in ancestors {
            for config_name in CONFIG_FILE_NAMES {
                let config_path = ancestor.join(config_name);
                if config_path.is_file() && !config_files.contains(&config_path) {
                    config_files.push(config_path);
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    /// Returns the default config if no files are found.
    #[must_use]
    pub fn from_discovered_files(start_dir: &Path) -> Self {
        let mut config = Self::default();
        for path in Self::discover_config_files(start_dir) {
            debug!("loading config {}", path.display());
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(partial),
                    Err(e) => warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }

    /// Load the config for a run: the explicit file if given, otherwise
    /// whatever is discovered from the current directory.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_toml_file(path),
            None => {
                let cwd = std::env::current_dir().unwrap_or_default();
                Ok(Self::from_discovered_files(&cwd))
            }
        }
    }
}

/// What the batch driver does when an item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the batch and return the error
    FailFast,
    /// Report the error and move on to the next item
    BestEffort,
}

/// Immutable settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Overwrite each source file instead of writing to the output stream
    pub write_in_place: bool,
    /// Path arguments in command-line order; empty means standard input
    pub inputs: Vec<PathBuf>,
    /// Where to write the timing profile, if requested
    pub profile_output: Option<PathBuf>,
    pub filter: FileFilter,
    /// Policy for explicitly named files. Stdin is always fail-fast and
    /// walked entries are always best-effort.
    pub explicit_policy: ErrorPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            write_in_place: false,
            inputs: Vec::new(),
            profile_output: None,
            filter: FileFilter::default(),
            explicit_policy: ErrorPolicy::FailFast,
        }
    }
}

impl RunConfig {
    /// Combine CLI arguments with file configuration. CLI extensions and
    /// exclude patterns are added to the configured ones.
    pub fn new(args: &CliArgs, config: &Config) -> Result<Self> {
        check_usage(args)?;

        let mut merged = config.clone();
        for ext in &args.extensions {
            if !merged.extensions.contains(ext) {
                merged.extensions.push(ext.clone());
            }
        }
        merged.exclude.extend(args.exclude.iter().cloned());
        merged.keep_going |= args.keep_going;

        if let Some(message) = merged.validate() {
            return Err(Error::Config(message));
        }

        let exclude = merged
            .exclude
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| Error::Config(format!("{p:?}: {e}"))))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            write_in_place: args.write,
            inputs: args.inputs.clone(),
            profile_output: args.cpuprofile.clone(),
            filter: FileFilter::new(&merged.extensions, exclude),
            explicit_policy: if merged.keep_going {
                ErrorPolicy::BestEffort
            } else {
                ErrorPolicy::FailFast
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::cli::parse_args_from;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extensions, vec!["hcl"]);
        assert!(config.exclude.is_empty());
        assert!(!config.keep_going);
        assert!(config.validate().is_none());
    }

    #[test]
    fn test_apply_partial_preserves_unset() {
        let mut base = Config {
            keep_going: true,
            ..Default::default()
        };
        let partial = PartialConfig {
            exclude: Some(vec!["vendor".to_string()]),
            ..Default::default()
        };

        base.apply_partial(partial);
        assert!(base.keep_going);
        assert_eq!(base.exclude, vec!["vendor"]);
        assert_eq!(base.extensions, vec!["hcl"]);
    }

    #[test]
    fn test_from_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hclfmt.toml");
        fs::write(&path, "extensions = [\"tf\", \"hcl\"]\nkeep_going = true\n").unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.extensions, vec!["tf", "hcl"]);
        assert!(config.keep_going);
    }

    #[test]
    fn test_from_toml_file_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hclfmt.toml");
        fs::write(&path, "indent = 4\n").unwrap();
        assert!(Config::from_toml_file(&path).is_err());
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = Config::from_toml_file(Path::new("/nonexistent/hclfmt.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }

    #[test]
    fn test_discovered_files_merge_closest_last() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            tmp.path().join("hclfmt.toml"),
            "extensions = [\"tf\"]\nkeep_going = true\n",
        )
        .unwrap();
        fs::write(nested.join("hclfmt.toml"), "keep_going = false\n").unwrap();

        let files = Config::discover_config_files(&nested);
        let outer = files.iter().position(|p| p == &tmp.path().join("hclfmt.toml"));
        let inner = files.iter().position(|p| p == &nested.join("hclfmt.toml"));
        assert!(outer.unwrap() < inner.unwrap());

        let config = Config::from_discovered_files(&nested);
        assert_eq!(config.extensions, vec!["tf"]);
        assert!(!config.keep_going);
    }

    #[test]
    fn test_discovery_skips_broken_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("hclfmt.toml"), "extensions = [").unwrap();
        let config = Config::from_discovered_files(tmp.path());
        assert_eq!(config.extensions, vec!["hcl"]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            extensions: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("extension"));

        let config = Config {
            extensions: vec![".".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_some());

        let config = Config {
            extensions: vec!["a/b".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("separator"));

        let config = Config {
            exclude: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("exclude"));
    }

    #[test]
    fn test_run_config_from_args() {
        let args = parse_args_from(["hclfmt", "-w", "-e", "tf", "-x", "vendor", "main.hcl"]);
        let run = RunConfig::new(&args, &Config::default()).unwrap();
        assert!(run.write_in_place);
        assert_eq!(run.inputs, vec![PathBuf::from("main.hcl")]);
        assert_eq!(run.explicit_policy, ErrorPolicy::FailFast);
        assert!(run.filter.matches_name("main.tf"));
        assert!(run.filter.matches_name("main.hcl"));
        assert!(run.filter.is_excluded(Path::new("vendor/x.hcl")));
    }

    #[test]
    fn test_run_config_keep_going() {
        let args = parse_args_from(["hclfmt", "a.hcl"]);
        let config = Config {
            keep_going: true,
            ..Default::default()
        };
        let run = RunConfig::new(&args, &config).unwrap();
        assert_eq!(run.explicit_policy, ErrorPolicy::BestEffort);

        let args = parse_args_from(["hclfmt", "--keep-going", "a.hcl"]);
        let run = RunConfig::new(&args, &Config::default()).unwrap();
        assert_eq!(run.explicit_policy, ErrorPolicy::BestEffort);
    }

    #[test]
    fn test_run_config_rejects_write_with_stdin() {
        let args = parse_args_from(["hclfmt", "-w"]);
        let err = RunConfig::new(&args, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn test_run_config_rejects_bad_pattern() {
        let args = parse_args_from(["hclfmt", "-x", "[", "dir"]);
        let err = RunConfig::new(&args, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
