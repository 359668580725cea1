//! CLI argument definitions and parsing.

pub mod types;

use clap::{Parser, Subcommand};
use types::{PlayerId, Position, Week};

#[derive(Debug, Subcommand)]
pub enum GetCmd {
    /// List every configured league with its name and your roster id.
    Leagues,

    /// Preview your matchup for a week (the current week by default).
    Matchup {
        /// League hint: an account handle, league name fragment, or league id.
        #[clap(long, short)]
        league: Option<String>,

        /// Scoring period.
        #[clap(long, short)]
        week: Option<Week>,
    },

    /// Week-by-week results for the season so far.
    History {
        #[clap(long, short)]
        league: Option<String>,
    },

    /// Fantasy points one player scored in a week under the league's scoring.
    PlayerPoints {
        /// Sleeper player id.
        player: PlayerId,

        #[clap(long, short)]
        week: Option<Week>,

        #[clap(long, short)]
        league: Option<String>,
    },

    /// Evaluate a trade: repeat `--give` and `--receive` per player id.
    Trade {
        #[clap(long, short)]
        league: Option<String>,

        #[clap(long = "give", required = true)]
        give: Vec<PlayerId>,

        #[clap(long = "receive", required = true)]
        receive: Vec<PlayerId>,
    },

    /// Check your starters against your bench.
    Lineup {
        #[clap(long, short)]
        league: Option<String>,
    },

    /// Rank free agents by trend, positional need and projection.
    Waivers {
        #[clap(long, short)]
        league: Option<String>,

        /// Only consider one position.
        #[clap(long, short)]
        position: Option<Position>,

        /// Number of players to return.
        #[clap(long, default_value_t = crate::commands::waivers::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Players on other rosters that fill your thin positions.
    TradeTargets {
        #[clap(long, short)]
        league: Option<String>,

        #[clap(long, short)]
        position: Option<Position>,

        #[clap(long, default_value_t = crate::commands::waivers::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Adds, drops and trades from this week and last.
    Transactions {
        #[clap(long, short)]
        league: Option<String>,

        #[clap(long, short)]
        week: Option<Week>,
    },

    /// Draft boards for the league.
    Drafts {
        #[clap(long, short)]
        league: Option<String>,
    },

    /// Winners and losers playoff brackets.
    Bracket {
        #[clap(long, short)]
        league: Option<String>,
    },

    /// Active period and entry counts of the in-process caches.
    Cache,
}

#[derive(Debug, Parser)]
#[clap(name = "sleeper-ffl", about = "Sleeper Fantasy Football assistant")]
pub struct Sleeper {
    /// Log filter used when `RUST_LOG` is not set (error, warn, info, debug, trace).
    #[clap(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Get data from Sleeper, printed as JSON
    Get {
        #[clap(subcommand)]
        cmd: GetCmd,
    },
}
