//! Process-group descriptors handed to builders at initialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned when describing a process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommError {
    #[error("a process group must contain at least one process")]
    Empty,
    #[error("rank {rank} is outside a group of {size} processes")]
    RankOutOfRange { rank: usize, size: usize },
}

/// The process group a builder is initialized on.
///
/// Assembly never communicates; it only records which scope each builder
/// was initialized with so parallel execution groups line up with discipline
/// ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawComm")]
pub struct Comm {
    rank: usize,
    size: usize,
}

impl Comm {
    /// Describes the calling process's place in a group.
    ///
    /// # Errors
    ///
    /// Returns a [`CommError`] if the group is empty or the rank is out of range.
    pub fn new(rank: usize, size: usize) -> Result<Self, CommError> {
        if size == 0 {
            return Err(CommError::Empty);
        }
        if rank >= size {
            return Err(CommError::RankOutOfRange { rank, size });
        }
        Ok(Self { rank, size })
    }

    /// A group containing only the calling process.
    #[must_use]
    pub const fn solo() -> Self {
        Self { rank: 0, size: 1 }
    }

    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// True on the group's lowest rank.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.rank == 0
    }
}

#[derive(Deserialize)]
struct RawComm {
    rank: usize,
    size: usize,
}

impl TryFrom<RawComm> for Comm {
    type Error = CommError;

    fn try_from(raw: RawComm) -> Result<Self, Self::Error> {
        Self::new(raw.rank, raw.size)
    }
}

impl Default for Comm {
    fn default() -> Self {
        Self::solo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_outcomes() {
        assert_eq!(Comm::new(0, 0), Err(CommError::Empty));
        assert_eq!(
            Comm::new(4, 4),
            Err(CommError::RankOutOfRange { rank: 4, size: 4 })
        );
        assert_eq!(Comm::new(0, 1), Ok(Comm::solo()));
        assert!(!Comm::new(3, 4).unwrap().is_root());
    }
}
