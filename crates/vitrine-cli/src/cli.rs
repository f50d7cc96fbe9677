use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Manage Vitrine promotions from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Admin API base URL (falls back to VITRINE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Tenant identifier (falls back to VITRINE_TENANT)
    #[arg(long, global = true, value_name = "ID")]
    pub tenant: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List promotions for the tenant
    List {
        /// Only active (true) or inactive (false) promotions
        #[arg(long)]
        active: Option<bool>,
        /// Filter by name substring
        #[arg(long)]
        name: Option<String>,
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// Items per page
        #[arg(short, long, default_value = "25")]
        limit: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a promotion's active flag
    Toggle {
        /// Promotion ID
        id: String,
        /// Target state
        #[arg(value_enum)]
        state: ToggleState,
    },
    /// Show aggregate promotion metrics
    Metrics {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleState {
    On,
    Off,
}

impl ToggleState {
    #[must_use]
    pub const fn as_bool(self) -> bool {
        matches!(self, Self::On)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
