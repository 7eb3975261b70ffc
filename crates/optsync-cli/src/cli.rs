use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use optsync_core::PanelKind;

#[derive(Parser)]
#[command(name = "optsync")]
#[command(about = "Inspect and edit server option panels from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Option store base URL (e.g. <https://console.example.com/api>)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Access token sent as `Authorization: Bearer <token>`
    #[arg(long, global = true, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current values of a panel
    Show {
        #[arg(value_enum)]
        panel: PanelArg,
        /// Print secret values instead of masking them
        #[arg(long)]
        reveal: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit options of a panel and save whatever changed
    Set {
        #[arg(value_enum)]
        panel: PanelArg,
        /// Assignments such as `QuotaResetEnabled=true`
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
        /// Show the diff without submitting it
        #[arg(long)]
        dry_run: bool,
        /// Submit `*Enabled` switches before other keys
        #[arg(long)]
        toggles_first: bool,
        /// Resubmit the whole diff on retry, not only failed keys
        #[arg(long)]
        whole_diff: bool,
        /// Retry a partially failed save this many times
        #[arg(long, default_value = "0", value_name = "COUNT")]
        retries: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the keys each panel declares
    Keys {
        /// Only this panel
        #[arg(value_enum)]
        panel: Option<PanelArg>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Model ratio side commands
    ModelRatio {
        #[command(subcommand)]
        command: ModelRatioCommands,
    },
    /// Quota reset job status, history and manual trigger
    QuotaReset {
        #[command(subcommand)]
        command: QuotaResetCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PanelArg {
    System,
    ModelRatio,
    QuotaReset,
}

impl From<PanelArg> for PanelKind {
    fn from(value: PanelArg) -> Self {
        match value {
            PanelArg::System => Self::System,
            PanelArg::ModelRatio => Self::ModelRatio,
            PanelArg::QuotaReset => Self::QuotaReset,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl From<CompletionShell> for clap_complete::Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
            CompletionShell::PowerShell => Self::PowerShell,
        }
    }
}

#[derive(Subcommand)]
pub enum ModelRatioCommands {
    /// Restore the server's built-in ratio tables
    Reset {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum QuotaResetCommands {
    /// Show whether the job is enabled, connected and idle
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent runs
    Logs {
        /// Number of runs to show (1-100)
        #[arg(short, long, value_name = "COUNT")]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the job now
    Trigger {
        /// Return as soon as the server accepts the run
        #[arg(long)]
        no_wait: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Option store base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Access token to store in the profile
        #[arg(long, value_name = "TOKEN")]
        access_token: Option<String>,
        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}
