//! Assignment mode state machine.
//!
//! The engine runs in one of two modes. `Random` draws a free name from the
//! pool, `Name` derives the nickname from the member's display name. The mode
//! only changes through an explicit [`ModeController::set_mode`] call.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::AlreadySet;

/// How a joining member's nickname is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Random,
    Name,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Random => "random",
            Mode::Name => "name",
        }
    }

    /// Numeric alias accepted by the mode command (`0` or `1`).
    pub fn index(self) -> u8 {
        match self {
            Mode::Random => 0,
            Mode::Name => 1,
        }
    }

    /// Parse a command token. Accepts `0`, `random`, `1` and `name`,
    /// case-insensitive.
    pub fn from_token(token: &str) -> Option<Mode> {
        match token.trim().to_lowercase().as_str() {
            "0" | "random" => Some(Mode::Random),
            "1" | "name" => Some(Mode::Name),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.index())
    }
}

/// Result of a successful mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub previous: Mode,
    pub current: Mode,
}

/// Holds the community's current mode.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch to `requested`. Fails with [`AlreadySet`] when the mode would
    /// not change; the caller reports that as a no-op.
    pub fn set_mode(&mut self, requested: Mode) -> Result<ModeChange, AlreadySet> {
        if requested == self.mode {
            return Err(AlreadySet(requested));
        }
        let previous = std::mem::replace(&mut self.mode, requested);
        Ok(ModeChange {
            previous,
            current: requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_random_mode() {
        assert_eq!(ModeController::default().mode(), Mode::Random);
    }

    #[test]
    fn test_set_same_mode_is_already_set() {
        let mut ctl = ModeController::default();
        assert_eq!(ctl.set_mode(Mode::Random), Err(AlreadySet(Mode::Random)));
        assert_eq!(ctl.mode(), Mode::Random);
    }

    #[test]
    fn test_switch_to_name_reports_previous() {
        let mut ctl = ModeController::default();
        let change = ctl.set_mode(Mode::Name).unwrap();
        assert_eq!(change.previous, Mode::Random);
        assert_eq!(change.current, Mode::Name);
        assert_eq!(ctl.mode(), Mode::Name);

        assert_eq!(ctl.set_mode(Mode::Name), Err(AlreadySet(Mode::Name)));
        let back = ctl.set_mode(Mode::Random).unwrap();
        assert_eq!(back.previous, Mode::Name);
    }

    #[test]
    fn test_from_token() {
        assert_eq!(Mode::from_token("0"), Some(Mode::Random));
        assert_eq!(Mode::from_token("RANDOM"), Some(Mode::Random));
        assert_eq!(Mode::from_token("1"), Some(Mode::Name));
        assert_eq!(Mode::from_token("Name"), Some(Mode::Name));
        assert_eq!(Mode::from_token("2"), None);
        assert_eq!(Mode::from_token(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Mode::Random.to_string(), "random (0)");
        assert_eq!(Mode::Name.to_string(), "name (1)");
    }
}
