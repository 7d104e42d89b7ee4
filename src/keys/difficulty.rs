// Derived from the pow module of github.com/feeless/feeless@978eba7.
use std::convert::TryFrom;
use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::{expect_len, to_hex, Error};

/// A work threshold. Higher is more difficult.
#[derive(Eq, PartialEq, Clone, Copy, PartialOrd, Ord)]
pub struct Difficulty(u64);

impl Difficulty {
    /// fffffff800000000
    pub const LIVE: Self = Self(18446744039349813248);
    /// ffff000000000000
    pub const TEST: Self = Self(18446462598732840960);
    const LEN: usize = 8;
    const HEX_LEN: usize = Self::LEN * 2;

    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    pub fn from_le_fixed(s: &[u8; Self::LEN]) -> Self {
        Difficulty(u64::from_le_bytes(*s))
    }

    pub fn from_be_slice(s: &[u8]) -> Result<Self, Error> {
        let b = <[u8; Self::LEN]>::try_from(s).map_err(|_| Error::InvalidFormat {
            what: "difficulty",
            reason: format!("expected {} bytes, got {}", Self::LEN, s.len()),
        })?;
        Ok(Difficulty(u64::from_be_bytes(b)))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Debug for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", to_hex(&self.0.to_be_bytes()))
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        expect_len(s.len(), Self::HEX_LEN, "difficulty")?;
        let mut slice = [0u8; Self::LEN];
        hex::decode_to_slice(s, &mut slice).map_err(|source| Error::InvalidFormat {
            what: "difficulty",
            reason: source.to_string(),
        })?;
        Difficulty::from_be_slice(&slice)
    }
}

/// Which network a block is destined for. The test network runs a lower work
/// threshold and is the only place the zero-work sentinel is honored.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    Live,
    Test,
}

impl NetworkMode {
    pub const fn threshold(self) -> Difficulty {
        match self {
            NetworkMode::Live => Difficulty::LIVE,
            NetworkMode::Test => Difficulty::TEST,
        }
    }
}
