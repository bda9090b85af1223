//! Command-line arguments.

use std::path::PathBuf;

use caliper_domain::settings::{DEFAULT_RESULTS_DIR, DEFAULT_TIMEOUT_MS};
use caliper_domain::{LiteralPolicy, PlaceholderPolicy, RunConfig, ValidationMode};
use clap::Parser;

/// Data-driven API test harness.
#[derive(Debug, Parser)]
#[command(name = "caliper", version, about = "Run data-driven API scenarios")]
pub struct Cli {
    /// Project directory containing config/, apischema/ and scenarios/.
    #[arg(long, env = "CALIPER_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Environment name (a key of config/envconfig.yml).
    #[arg(long = "env", env = "CALIPER_ENV")]
    pub environment: String,

    /// Only run scenarios carrying one of these tags.
    #[arg(long, env = "CALIPER_TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Directory receiving attachments and the run summary.
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Keep results from previous runs instead of cleaning the directory.
    #[arg(long)]
    pub keep_results: bool,

    /// Fail a scenario when a template placeholder has no dataset value.
    #[arg(long)]
    pub strict_placeholders: bool,

    /// Copy literal template values into payloads instead of dropping them.
    #[arg(long)]
    pub keep_literals: bool,

    /// Stop at the first failing validation row, or report all of them.
    #[arg(long, default_value = "fail-fast")]
    pub validation_mode: ValidationMode,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

impl Cli {
    /// Builds the run configuration.
    #[must_use]
    pub fn into_config(self) -> RunConfig {
        let tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let mut config = RunConfig::new(self.dir, self.environment)
            .with_tags(tags)
            .with_results_dir(self.results_dir);
        config.clean_results = !self.keep_results;
        config.placeholder_policy = if self.strict_placeholders {
            PlaceholderPolicy::Strict
        } else {
            PlaceholderPolicy::Lenient
        };
        config.literal_policy = if self.keep_literals {
            LiteralPolicy::Keep
        } else {
            LiteralPolicy::Drop
        };
        config.validation_mode = self.validation_mode;
        config.timeout_ms = self.timeout_ms;
        config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Cli::try_parse_from(["caliper", "--env", "dev"])
            .unwrap()
            .into_config();
        assert_eq!(config.environment, "dev");
        assert_eq!(config.project_dir, PathBuf::from("."));
        assert_eq!(config.results_dir, PathBuf::from(DEFAULT_RESULTS_DIR));
        assert!(config.clean_results);
        assert_eq!(config.placeholder_policy, PlaceholderPolicy::Lenient);
        assert_eq!(config.literal_policy, LiteralPolicy::Drop);
        assert_eq!(config.validation_mode, ValidationMode::FailFast);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "caliper",
            "--dir",
            "projects/shop",
            "--env",
            "qa",
            "--tags",
            "Smoke, Regression",
            "--results-dir",
            "out",
            "--keep-results",
            "--strict-placeholders",
            "--keep-literals",
            "--validation-mode",
            "collect-all",
            "--timeout-ms",
            "500",
        ])
        .unwrap();

        let config = cli.into_config();
        assert_eq!(config.tags, vec!["Smoke", "Regression"]);
        assert!(!config.clean_results);
        assert_eq!(config.placeholder_policy, PlaceholderPolicy::Strict);
        assert_eq!(config.literal_policy, LiteralPolicy::Keep);
        assert_eq!(config.validation_mode, ValidationMode::CollectAll);
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.api_dir("login"), PathBuf::from("projects/shop/apischema/qa/login"));
    }

    #[test]
    fn test_unknown_validation_mode() {
        assert!(
            Cli::try_parse_from(["caliper", "--env", "dev", "--validation-mode", "sometimes"])
                .is_err()
        );
    }
}
