//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No scaffolding logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use plinth_core::domain::ConflictPolicy;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "plinth",
    bin_name = "plinth",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold files from mixin-composed templates",
    long_about = "Plinth renders a batch of templates against one project \
                  configuration and writes them under a scaffold root, \
                  honouring a conflict policy for files that already exist.",
    after_help = "EXAMPLES:\n\
        \x20 plinth generate --project-name memcached-operator \\\n\
        \x20     --repo github.com/example/memcached-operator --boilerplate-file hack/boilerplate.go.txt\n\
        \x20 plinth generate --conflict skip --template e2e-test\n\
        \x20 plinth list\n\
        \x20 plinth completions bash > /usr/share/bash-completion/completions/plinth",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render templates and write them under the scaffold root.
    #[command(
        visible_alias = "g",
        about = "Scaffold files from templates",
        after_help = "EXAMPLES:\n\
            \x20 plinth generate --project-name demo --repo example.com/demo --boilerplate ''\n\
            \x20 plinth generate --root ./demo --conflict overwrite --var Owner=platform\n\
            \x20 plinth generate --dry-run --template e2e-suite"
    )]
    Generate(GenerateArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 plinth list\n\
            \x20 plinth list --format json\n\
            \x20 plinth list --templates-dir ./templates"
    )]
    List(ListArgs),

    /// Initialise a Plinth configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 plinth init           # user config directory\n\
            \x20 plinth init --local   # .plinth.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 plinth completions bash > ~/.local/share/bash-completion/completions/plinth\n\
            \x20 plinth completions zsh  > ~/.zfunc/_plinth\n\
            \x20 plinth completions fish > ~/.config/fish/completions/plinth.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Plinth configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 plinth config get scaffold.conflict_policy\n\
            \x20 plinth config list\n\
            \x20 plinth config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `plinth generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Directory every output path is relative to.
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        help = "Scaffold root (default: config scaffold.root, then the current directory)"
    )]
    pub root: Option<PathBuf>,

    /// Name of the generated project.
    #[arg(short = 'n', long = "project-name", value_name = "NAME")]
    pub project_name: Option<String>,

    /// Module or import root of the generated project.
    #[arg(long = "repo", value_name = "PATH")]
    pub repository: Option<String>,

    /// Boilerplate (license header) text.
    #[arg(long = "boilerplate", value_name = "TEXT", conflicts_with = "boilerplate_file")]
    pub boilerplate: Option<String>,

    /// Read the boilerplate from a file.
    #[arg(long = "boilerplate-file", value_name = "FILE")]
    pub boilerplate_file: Option<PathBuf>,

    /// Extra template variable (repeatable).
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_key_val,
        action = clap::ArgAction::Append
    )]
    pub vars: Vec<(String, String)>,

    /// What to do when a target file already exists.
    #[arg(long = "conflict", value_enum, value_name = "POLICY")]
    pub conflict: Option<ConflictArg>,

    /// Only run these templates (repeatable; default: all).
    #[arg(
        short = 't',
        long = "template",
        value_name = "NAME",
        action = clap::ArgAction::Append
    )]
    pub templates: Vec<String>,

    /// Directory of user templates (`<name>/template.toml`).
    #[arg(long = "templates-dir", value_name = "DIR", env = "PLINTH_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Render everything but write nothing.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Prompt for project values that are not configured.
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,
}

/// `--conflict` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    /// Keep the existing file.
    Skip,
    /// Replace the existing file.
    #[value(alias = "force")]
    Overwrite,
    /// Fail that template.
    #[value(alias = "fail")]
    Error,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Skip => ConflictPolicy::Skip,
            ConflictArg::Overwrite => ConflictPolicy::Overwrite,
            ConflictArg::Error => ConflictPolicy::Error,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `plinth list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory of user templates to include.
    #[arg(long = "templates-dir", value_name = "DIR", env = "PLINTH_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `plinth init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.plinth.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Pre-fill `project.name`.
    #[arg(long = "project-name", value_name = "NAME")]
    pub project_name: Option<String>,

    /// Pre-fill `project.repository`.
    #[arg(long = "repo", value_name = "PATH")]
    pub repository: Option<String>,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `plinth completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `plinth config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `scaffold.conflict_policy`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "plinth",
            "generate",
            "--project-name",
            "demo",
            "--repo",
            "example.com/demo",
            "--var",
            "Owner=platform=team",
            "--template",
            "e2e-test",
            "--template",
            "e2e-suite",
            "--conflict",
            "force",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.project_name.as_deref(), Some("demo"));
        assert_eq!(args.vars, vec![("Owner".into(), "platform=team".into())]);
        assert_eq!(args.templates, vec!["e2e-test", "e2e-suite"]);
        assert_eq!(args.conflict, Some(ConflictArg::Overwrite));
    }

    #[test]
    fn var_without_equals_is_rejected() {
        let result = Cli::try_parse_from(["plinth", "generate", "--var", "Owner"]);
        assert!(result.is_err());
    }

    #[test]
    fn boilerplate_sources_conflict() {
        let result = Cli::try_parse_from([
            "plinth",
            "generate",
            "--boilerplate",
            "x",
            "--boilerplate-file",
            "y",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn conflict_arg_maps_to_policy() {
        assert_eq!(ConflictPolicy::from(ConflictArg::Skip), ConflictPolicy::Skip);
        assert_eq!(ConflictPolicy::from(ConflictArg::Error), ConflictPolicy::Error);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["plinth", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
