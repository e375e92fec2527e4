use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one opened modal (`modal-<n>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModalId(String);

impl ModalId {
    /// Build the id for the `seq`-th modal opened by a manager.
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("modal-{}", seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for ModalId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModalId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Lifecycle of a modal reference.
///
/// Transitions only move forward: `Opening -> Open -> Closing -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalState {
    Opening,
    Open,
    Closing,
    Closed,
}

impl ModalState {
    fn rank(self) -> u8 {
        match self {
            ModalState::Opening => 0,
            ModalState::Open => 1,
            ModalState::Closing => 2,
            ModalState::Closed => 3,
        }
    }

    /// `Opening` and `Open` are both shown to the user.
    pub fn is_visible(self) -> bool {
        matches!(self, ModalState::Opening | ModalState::Open)
    }

    /// True once `close` has been accepted.
    pub fn is_closing_or_closed(self) -> bool {
        matches!(self, ModalState::Closing | ModalState::Closed)
    }

    /// Whether moving from `self` to `next` goes forward.
    pub fn can_advance_to(self, next: ModalState) -> bool {
        next.rank() > self.rank()
    }

    pub fn code(self) -> &'static str {
        match self {
            ModalState::Opening => "opening",
            ModalState::Open => "open",
            ModalState::Closing => "closing",
            ModalState::Closed => "closed",
        }
    }
}

impl fmt::Display for ModalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
