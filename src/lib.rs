//! Sleeper Fantasy Football assistant library
//!
//! Read-only analytics over the public Sleeper API for one or more
//! configured accounts: matchup previews, trade and lineup evaluation,
//! waiver ranking, and league lookups.
//!
//! ## Layers
//!
//! - [`sleeper`]: wire types, the paced HTTP client and the scoring engine
//! - [`core`]: period cache, player directory and identity resolution
//! - [`commands`]: the operations, each returning a serializable result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sleeper_ffl::{commands::matchup::matchup_preview, AppConfig, SleeperService};
//!
//! # async fn example() -> sleeper_ffl::Result<()> {
//! let service = SleeperService::new(Arc::new(AppConfig::from_env()))?;
//! let preview = matchup_preview(&service, Some("dynasty"), None).await?;
//! println!("{}", serde_json::to_string_pretty(&preview)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export SLEEPER_USERNAME_A=my_handle
//! export SLEEPER_LEAGUE_ID_A=1048313545995296768,1121957064393834496
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod sleeper;

// Re-export commonly used types
pub use cli::types::{LeagueId, PlayerId, Position, RosterId, Season, UserId, Week};
pub use commands::{OperationOutput, SleeperService};
pub use config::AppConfig;
pub use error::{ErrorKind, Result, SleeperError};
pub use sleeper::{compute_points, ReceptionFormat};
