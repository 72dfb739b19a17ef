use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "album ranking aggregation and compatibility engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Create the database schema if it does not exist
    Init,
    /// Recompute the per-country global rankings once
    Aggregate,
    /// Recompute the global rankings periodically until interrupted
    Schedule {
        /// Minutes between runs (defaults to once a day)
        #[arg(short, long = "interval-minutes")]
        interval_minutes: Option<u64>,
    },
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Compare the rankings of two users
    Compare {
        user_a: i64,
        user_b: i64,
        /// Compare track rankings of this album instead of album rankings
        #[arg(short, long)]
        album: Option<i64>,
    },
    /// Show how coherent a group is on its matched albums
    Coherence { group_id: i64 },
    /// Print shell completions
    Completions { shell: Shell },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare_with_album() {
        let cli = Cli::parse_from(["album_rankings", "compare", "1", "2", "--album", "7"]);
        assert_eq!(cli.command, Command::Compare { user_a: 1, user_b: 2, album: Some(7) });
    }

    #[test]
    fn test_parse_serve_default_port() {
        let cli = Cli::parse_from(["album_rankings", "serve"]);
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }

    #[test]
    fn test_parse_schedule_interval() {
        let cli = Cli::parse_from(["album_rankings", "schedule", "--interval-minutes", "30"]);
        assert_eq!(cli.command, Command::Schedule { interval_minutes: Some(30) });
    }
}
