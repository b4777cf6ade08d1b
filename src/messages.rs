// Wire-level types crossing the HTTP surface

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::motor::state::{Direction, MotorState};

/// Directional trigger received as a route segment from the web page.
///
/// Wire names follow the route set of the control page: `stop`, `forward`,
/// `reverse`, `left`, `right`, `rev_left`, `rev_right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveCommand {
    Stop,
    Forward,
    Reverse,
    #[serde(rename = "left")]
    TurnLeft,
    #[serde(rename = "right")]
    TurnRight,
    #[serde(rename = "rev_left")]
    ReverseLeft,
    #[serde(rename = "rev_right")]
    ReverseRight,
}

/// Rejected at the dispatch boundary; the interpreter only ever sees the
/// seven mapped commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown drive command: {name:?}")]
pub struct UnknownCommand {
    pub name: String,
}

impl DriveCommand {
    /// Every mapped command, in table order.
    pub const ALL: [DriveCommand; 7] = [
        DriveCommand::Stop,
        DriveCommand::Forward,
        DriveCommand::Reverse,
        DriveCommand::TurnLeft,
        DriveCommand::TurnRight,
        DriveCommand::ReverseLeft,
        DriveCommand::ReverseRight,
    ];

    /// Route segment this command answers to.
    pub fn wire_name(&self) -> &'static str {
        match self {
            DriveCommand::Stop => "stop",
            DriveCommand::Forward => "forward",
            DriveCommand::Reverse => "reverse",
            DriveCommand::TurnLeft => "left",
            DriveCommand::TurnRight => "right",
            DriveCommand::ReverseLeft => "rev_left",
            DriveCommand::ReverseRight => "rev_right",
        }
    }
}

impl FromStr for DriveCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop" => Ok(DriveCommand::Stop),
            "forward" => Ok(DriveCommand::Forward),
            "reverse" => Ok(DriveCommand::Reverse),
            "left" => Ok(DriveCommand::TurnLeft),
            "right" => Ok(DriveCommand::TurnRight),
            "rev_left" => Ok(DriveCommand::ReverseLeft),
            "rev_right" => Ok(DriveCommand::ReverseRight),
            other => Err(UnknownCommand {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DriveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Snapshot of one motor channel, as reported on `/state`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelReport {
    pub duty: u8,
    pub direction: Direction,
}

/// Snapshot of the whole actuation state, as reported on `/state`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StateReport {
    pub left: ChannelReport,
    pub right: ChannelReport,
}

impl From<&MotorState> for StateReport {
    fn from(state: &MotorState) -> Self {
        Self {
            left: ChannelReport {
                duty: state.left.duty(),
                direction: state.left.direction(),
            },
            right: ChannelReport {
                duty: state.right.duty(),
                direction: state.right.direction(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for cmd in DriveCommand::ALL {
            let parsed: DriveCommand = cmd.wire_name().parse().unwrap();
            assert_eq!(parsed, cmd);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "sideways".parse::<DriveCommand>().unwrap_err();
        assert_eq!(err.name, "sideways");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("Forward".parse::<DriveCommand>().is_err());
        assert!("STOP".parse::<DriveCommand>().is_err());
    }

    #[test]
    fn test_serde_names_match_wire_names() {
        for cmd in DriveCommand::ALL {
            let json = serde_json::to_string(&cmd).unwrap();
            assert_eq!(json, format!("\"{}\"", cmd.wire_name()));
        }
    }
}
