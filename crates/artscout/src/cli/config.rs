//! The `artscout config` command: inspect the effective configuration and
//! check that every provider key resolves before starting the server.

use artscout_core::{Config, ConfigError, ImgbbHost, OpenAiCompatibleProvider, SerpApiClient};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + env overrides) as TOML
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file; API keys stay as ${ENV_VAR} references
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,

        /// Write here instead of the platform config directory
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Report which provider API keys resolve from the environment
    Check,
}

pub async fn execute(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => println!("{}", config.to_toml()?),
        ConfigCommand::Path => println!("{}", Config::default_path().display()),
        ConfigCommand::Init { force, path } => {
            let path = path.unwrap_or_else(Config::default_path);
            write_default(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
        ConfigCommand::Check => {
            let report = credential_report(&config);
            for (provider, status) in &report {
                match status {
                    Ok(()) => println!("{provider:<8} ok"),
                    Err(e) => println!("{provider:<8} {e}"),
                }
            }
            let missing = report.iter().filter(|(_, s)| s.is_err()).count();
            if missing > 0 {
                anyhow::bail!(
                    "{missing} provider key(s) missing; `artscout serve` will refuse to start"
                );
            }
        }
    }

    Ok(())
}

fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

/// Resolve each provider's key the same way `serve` does.
fn credential_report(config: &Config) -> Vec<(&'static str, Result<(), ConfigError>)> {
    vec![
        ("imgbb", ImgbbHost::from_config(&config.upload).map(drop)),
        ("serpapi", SerpApiClient::from_config(&config.search).map(drop)),
        ("llm", OpenAiCompatibleProvider::from_config(&config.llm).map(drop)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_default_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path, false).unwrap();
        let written = Config::load_from(&path).unwrap();
        assert_eq!(written.upload.api_key, "${IMGBB_API_KEY}");

        let err = write_default(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(write_default(&path, true).is_ok());
    }

    #[test]
    fn test_credential_report_names_missing_keys() {
        let mut config = Config::default();
        config.upload.api_key = "inline-imgbb".into();
        config.search.api_key = "${ARTSCOUT_TEST_UNSET_SERP}".into();
        config.llm.api_key = "inline-llm".into();

        let report = credential_report(&config);
        let names: Vec<_> = report.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["imgbb", "serpapi", "llm"]);
        assert!(report[0].1.is_ok());
        assert!(report[2].1.is_ok());

        let err = report[1].1.as_ref().unwrap_err().to_string();
        assert!(err.contains("ARTSCOUT_TEST_UNSET_SERP"));
    }
}
