//! Fantasy football position types and utilities.

use crate::error::SleeperError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fantasy football player positions and lineup slots.
///
/// Represents the positions Sleeper reports on players (`position`,
/// `fantasy_positions`) and the slot names it uses in a league's
/// `roster_positions`.
///
/// # Examples
///
/// ```rust
/// use sleeper_ffl::Position;
///
/// let qb: Position = "qb".parse().unwrap();
/// assert_eq!(qb, Position::QB);
/// assert_eq!(Position::SuperFlex.to_string(), "SUPER_FLEX");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
    FLEX,
    #[serde(rename = "SUPER_FLEX")]
    SuperFlex,
    BN,
    IR,
}

impl Position {
    /// Positions a player can actually hold (no lineup-only slots).
    pub const PLAYER_POSITIONS: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::DEF,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "DEF",
            Position::FLEX => "FLEX",
            Position::SuperFlex => "SUPER_FLEX",
            Position::BN => "BN",
            Position::IR => "IR",
        }
    }

    pub fn is_player_position(&self) -> bool {
        Self::PLAYER_POSITIONS.contains(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = SleeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "K" => Ok(Position::K),
            "DEF" | "DST" | "D/ST" => Ok(Position::DEF),
            "FLEX" => Ok(Position::FLEX),
            "SUPER_FLEX" | "SUPERFLEX" => Ok(Position::SuperFlex),
            "BN" | "BE" | "BENCH" => Ok(Position::BN),
            "IR" => Ok(Position::IR),
            other => Err(SleeperError::InvalidPosition {
                position: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_string_conversion() {
        assert_eq!(Position::QB.to_string(), "QB");
        assert_eq!(Position::DEF.to_string(), "DEF");
        assert_eq!(Position::SuperFlex.to_string(), "SUPER_FLEX");
        assert_eq!(Position::BN.to_string(), "BN");
    }

    #[test]
    fn test_position_parse_aliases() {
        assert_eq!("d/st".parse::<Position>().unwrap(), Position::DEF);
        assert_eq!("Bench".parse::<Position>().unwrap(), Position::BN);
        assert_eq!("superflex".parse::<Position>().unwrap(), Position::SuperFlex);
        match "LB".parse::<Position>() {
            Err(SleeperError::InvalidPosition { position }) => assert_eq!(position, "LB"),
            other => panic!("Expected InvalidPosition, got {:?}", other),
        }
    }

    #[test]
    fn test_position_serde_matches_sleeper_slot_names() {
        let slots: Vec<Position> =
            serde_json::from_str(r#"["QB","RB","FLEX","SUPER_FLEX","BN"]"#).unwrap();
        assert_eq!(
            slots,
            vec![
                Position::QB,
                Position::RB,
                Position::FLEX,
                Position::SuperFlex,
                Position::BN
            ]
        );
    }

    #[test]
    fn test_player_positions_exclude_slots() {
        assert!(Position::TE.is_player_position());
        assert!(!Position::FLEX.is_player_position());
        assert!(!Position::BN.is_player_position());
    }
}
