//! Protocol version gate.
//!
//! The client version decides what a few status bits mean. It is stored as a
//! single packed value so comparisons are plain integer comparisons.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::Resource;

/// Packed `major.minor.revision.prototype` client version.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientVersion(pub u32);

impl ClientVersion {
    /// First version with the Stygian Abyss flag layout: the `0x04` status
    /// bit means flying and poison moves to its own sub-flag.
    pub const CV_7000: ClientVersion = ClientVersion::new(7, 0, 0, 0);

    pub const fn new(major: u8, minor: u8, revision: u8, prototype: u8) -> Self {
        ClientVersion(
            (major as u32) << 24 | (minor as u32) << 16 | (revision as u32) << 8 | prototype as u32,
        )
    }

    pub fn has_stygian_abyss(self) -> bool {
        self >= Self::CV_7000
    }
}

impl Default for ClientVersion {
    fn default() -> Self {
        Self::CV_7000
    }
}

impl fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, revision, prototype] = self.0.to_be_bytes();
        write!(f, "{major}.{minor}.{revision}.{prototype}")
    }
}

impl FromStr for ClientVersion {
    type Err = String;

    /// Parse `"7.0.15.1"`; missing trailing parts count as zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = [0u8; 4];
        let pieces: Vec<&str> = s.trim().split('.').collect();
        if pieces.is_empty() || pieces.len() > 4 || pieces[0].is_empty() {
            return Err(format!("Invalid client version '{}'", s));
        }
        for (slot, piece) in parts.iter_mut().zip(&pieces) {
            *slot = piece
                .parse::<u8>()
                .map_err(|e| format!("Invalid client version '{}': {}", s, e))?;
        }
        Ok(ClientVersion::new(parts[0], parts[1], parts[2], parts[3]))
    }
}
