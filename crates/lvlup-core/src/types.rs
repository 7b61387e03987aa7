//! Value types shared by the lvlup endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Lowest port accepted in a whitelist rule.
pub const MIN_PORT: u16 = 1;
/// Highest port accepted in a whitelist rule.
pub const MAX_PORT: u16 = 65535;

/// Inclusive UDP port range of a whitelist rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortRange {
    /// First port of the range
    pub from: u16,
    /// Last port of the range
    pub to: u16,
}

impl PortRange {
    /// Create a validated port range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a bound is 0 or `from > to`.
    pub fn new(from: u16, to: u16) -> Result<Self> {
        if from < MIN_PORT || to < MIN_PORT {
            return Err(Error::InvalidArgument(format!(
                "Invalid Ports! Range: {MIN_PORT}-{MAX_PORT}"
            )));
        }
        if from > to {
            return Err(Error::InvalidArgument(
                "Invalid Ports! (ports.from cannot be greater than ports.to)".to_string(),
            ));
        }
        Ok(Self { from, to })
    }

    /// A range covering a single port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for port 0.
    pub fn single(port: u16) -> Result<Self> {
        Self::new(port, port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Game or service protocol that a whitelist rule lets through UDP filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Protocol {
    /// ARK: Survival Evolved
    ArkSurvivalEvolved,
    /// Arma
    Arma,
    /// GTA Multi Theft Auto: San Andreas
    GtaMultiTheftAutoSanAndreas,
    /// GTA San Andreas Multiplayer
    GtaSanAndreasMultiplayerMod,
    /// Half-Life 2 / Source engine
    Hl2Source,
    /// Minecraft Pocket Edition
    MinecraftPocketEdition,
    /// Minecraft query protocol
    MinecraftQuery,
    /// Mumble
    Mumble,
    /// Rust
    Rust,
    /// TeamSpeak 2
    Teamspeak2,
    /// TeamSpeak 3
    Teamspeak3,
    /// Trackmania / Shootmania
    TrackmaniaShootmania,
    /// Anything not listed
    Other,
}

impl Protocol {
    /// Returns the wire name of the protocol.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ArkSurvivalEvolved => "arkSurvivalEvolved",
            Self::Arma => "arma",
            Self::GtaMultiTheftAutoSanAndreas => "gtaMultiTheftAutoSanAndreas",
            Self::GtaSanAndreasMultiplayerMod => "gtaSanAndreasMultiplayerMod",
            Self::Hl2Source => "hl2Source",
            Self::MinecraftPocketEdition => "minecraftPocketEdition",
            Self::MinecraftQuery => "minecraftQuery",
            Self::Mumble => "mumble",
            Self::Rust => "rust",
            Self::Teamspeak2 => "teamspeak2",
            Self::Teamspeak3 => "teamspeak3",
            Self::TrackmaniaShootmania => "trackmaniaShootmania",
            Self::Other => "other",
        }
    }

    /// Returns every accepted protocol.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ArkSurvivalEvolved,
            Self::Arma,
            Self::GtaMultiTheftAutoSanAndreas,
            Self::GtaSanAndreasMultiplayerMod,
            Self::Hl2Source,
            Self::MinecraftPocketEdition,
            Self::MinecraftQuery,
            Self::Mumble,
            Self::Rust,
            Self::Teamspeak2,
            Self::Teamspeak3,
            Self::TrackmaniaShootmania,
            Self::Other,
        ]
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|protocol| protocol.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Unknown protocol `{s}`, use \"other\" if game is not listed"
                ))
            })
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// VPS uptime split into calendar components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpTime {
    /// Whole days
    pub days: u64,
    /// Remaining hours
    pub hours: u64,
    /// Remaining minutes
    pub minutes: u64,
    /// Remaining seconds
    pub seconds: u64,
}

impl UpTime {
    /// Decompose a number of seconds.
    #[must_use]
    pub const fn from_seconds(total: u64) -> Self {
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    /// Total number of seconds represented.
    #[must_use]
    pub const fn as_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}
