//! Command-line interface definitions.
use clap::{Parser, Subcommand};

use crate::theme::{PaletteRequest, Request, SchemeRequest};

/// Value accepted by `--scheme`/`--palette` meaning "as if not given".
const UNSET: &str = "unset";

/// Top-level CLI entry point for the theme switcher.
#[derive(Parser, Debug)]
#[command(
    name = "themeconf",
    about = "Switch application config files by color scheme and palette",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the configuration root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select and link theme files for a scheme and palette
    Set(SetOpts),
    /// Show the scheme and palette each application currently links
    Status(StatusOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Status(_) => "status",
            Self::Version => "version",
        }
    }
}

/// Options for the `set` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetOpts {
    /// Scheme: light, dark, any, auto or unset (default: auto)
    #[arg(short, long, value_parser = parse_scheme)]
    pub scheme: Option<SchemeRequest>,

    /// Palette name, any, auto or unset (default: any)
    #[arg(short, long, value_parser = parse_palette)]
    pub palette: Option<PaletteRequest>,

    /// Re-apply the current selection where the request selects nothing
    #[arg(long)]
    pub refresh: bool,

    /// Applications to theme (default: every required application)
    pub apps: Vec<String>,
}

impl SetOpts {
    /// The request these options describe, with defaults applied.
    #[must_use]
    pub fn request(&self) -> Request {
        Request::new(self.scheme, self.palette.clone())
    }
}

/// Options for the `status` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct StatusOpts {
    /// Applications to show (default: every registered application)
    pub apps: Vec<String>,
}

fn parse_scheme(s: &str) -> Result<SchemeRequest, String> {
    if s.eq_ignore_ascii_case(UNSET) {
        return Ok(SchemeRequest::default());
    }
    s.parse().map_err(|e: crate::error::NamingError| e.to_string())
}

fn parse_palette(s: &str) -> Result<PaletteRequest, String> {
    if s.eq_ignore_ascii_case(UNSET) {
        return Ok(PaletteRequest::default());
    }
    s.parse().map_err(|e: crate::error::NamingError| e.to_string())
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn set_opts(args: &[&str]) -> SetOpts {
        let cli = Cli::parse_from(args);
        match cli.command {
            Command::Set(opts) => opts,
            other => panic!("expected set, got {other:?}"),
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_set_defaults() {
        let opts = set_opts(&["themeconf", "set"]);
        assert_eq!(opts.scheme, None);
        assert_eq!(opts.palette, None);
        assert!(!opts.refresh);
        assert!(opts.apps.is_empty());
        let request = opts.request();
        assert_eq!(request.scheme, SchemeRequest::Auto);
        assert_eq!(request.palette, PaletteRequest::Any);
    }

    #[test]
    fn parse_set_scheme_palette_and_apps() {
        let opts = set_opts(&[
            "themeconf", "set", "-s", "dark", "-p", "blue", "kitty", "gnome",
        ]);
        assert_eq!(opts.scheme, Some(SchemeRequest::Dark));
        assert_eq!(opts.palette, Some("blue".parse().unwrap()));
        assert_eq!(opts.apps, vec!["kitty", "gnome"]);
    }

    #[test]
    fn parse_set_auto_and_refresh() {
        let opts = set_opts(&[
            "themeconf",
            "set",
            "--scheme",
            "auto",
            "--palette",
            "auto",
            "--refresh",
        ]);
        assert_eq!(opts.scheme, Some(SchemeRequest::Auto));
        assert_eq!(opts.palette, Some(PaletteRequest::Auto));
        assert!(opts.refresh);
    }

    #[test]
    fn unset_means_default() {
        let opts = set_opts(&["themeconf", "set", "-s", "unset", "-p", "unset"]);
        assert_eq!(opts.request(), Request::default());
    }

    #[test]
    fn invalid_scheme_is_rejected() {
        assert!(Cli::try_parse_from(["themeconf", "set", "-s", "dusk"]).is_err());
    }

    #[test]
    fn invalid_palette_is_rejected() {
        assert!(Cli::try_parse_from(["themeconf", "set", "-p", "two-words"]).is_err());
    }

    #[test]
    fn parse_status_and_version() {
        let cli = Cli::parse_from(["themeconf", "status", "kitty"]);
        assert!(matches!(&cli.command, Command::Status(o) if o.apps == vec!["kitty"]));
        assert_eq!(cli.command.name(), "status");
        let cli = Cli::parse_from(["themeconf", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["themeconf", "-v", "-d", "--root", "/tmp/t", "set"]);
        assert!(cli.verbose);
        assert!(cli.global.dry_run);
        assert_eq!(cli.global.root, Some(std::path::PathBuf::from("/tmp/t")));
    }
}
