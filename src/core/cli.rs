//! Command-line arguments.
//!
//! Values given here take precedence over the `MCP_*` environment variables.

use std::path::PathBuf;

use clap::Parser;

use super::config::Config;

/// MCP server exposing read-only image and video metadata for files under
/// the permitted directories.
#[derive(Parser, Debug)]
#[command(name = "media-info-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directories clients may read from (one or more)
    #[arg(long, num_args = 1.., value_name = "DIR")]
    pub permitted: Vec<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// ffprobe executable used to read video metadata
    #[arg(long, value_name = "PATH")]
    pub ffprobe: Option<PathBuf>,

    /// Reject requested paths that are themselves symlinks
    #[arg(long)]
    pub no_symlinks: bool,
}

impl Cli {
    /// Layer the command-line values over `config`.
    pub fn apply(self, mut config: Config) -> Config {
        if !self.permitted.is_empty() {
            config = config.with_permitted_roots(self.permitted);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(ffprobe) = self.ffprobe {
            config.media.ffprobe_path = ffprobe;
        }
        if self.no_symlinks {
            config.security.allow_symlinks = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_permitted_dirs() {
        let cli = Cli::try_parse_from([
            "media-info-mcp",
            "--permitted",
            "/srv/media",
            "/srv/archive",
        ])
        .unwrap();
        assert_eq!(
            cli.permitted,
            vec![PathBuf::from("/srv/media"), PathBuf::from("/srv/archive")]
        );
    }

    #[test]
    fn test_permitted_requires_a_value() {
        let result = Cli::try_parse_from(["media-info-mcp", "--permitted"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "media-info-mcp",
            "--permitted",
            "/srv/media",
            "--ffprobe",
            "/usr/local/bin/ffprobe",
            "--no-symlinks",
        ])
        .unwrap();

        let base = Config::default().with_permitted_roots(["/from/env"]);
        let config = cli.apply(base);

        assert_eq!(
            config.security.permitted_roots.as_slice(),
            &[PathBuf::from("/srv/media")]
        );
        assert_eq!(
            config.media.ffprobe_path,
            PathBuf::from("/usr/local/bin/ffprobe")
        );
        assert!(!config.security.allow_symlinks);
    }

    #[test]
    fn test_without_permitted_keeps_env_roots() {
        let cli = Cli::try_parse_from(["media-info-mcp"]).unwrap();
        let config = cli.apply(Config::default().with_permitted_roots(["/from/env"]));
        assert_eq!(
            config.security.permitted_roots.as_slice(),
            &[PathBuf::from("/from/env")]
        );
    }
}
