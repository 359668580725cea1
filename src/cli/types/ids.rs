//! ID types for Sleeper Fantasy Football.
//!
//! Sleeper identifies users, leagues and players with opaque strings
//! (numeric-looking, but too wide for `u32` and never used arithmetically),
//! while rosters are small integers scoped to one league.

use crate::error::{Result, SleeperError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = SleeperError;

            fn from_str(s: &str) -> Result<Self> {
                Ok(Self(s.trim().to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Type-safe wrapper for Sleeper league IDs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sleeper_ffl::LeagueId;
    ///
    /// let league_id = LeagueId::new("784512345678901234");
    /// assert_eq!(league_id.as_str(), "784512345678901234");
    /// ```
    LeagueId
);

string_id!(
    /// Sleeper user identifier (distinct from the user's handle).
    UserId
);

string_id!(
    /// Sleeper player identifier. Team defenses use the team abbreviation.
    PlayerId
);

/// Roster number within a single league (1..=total_rosters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterId(pub u32);

impl RosterId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RosterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RosterId {
    type Err = SleeperError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}
