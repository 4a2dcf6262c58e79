use core::fmt;

use serde::{Deserialize, Serialize};

/// Chopping progress stored in a custom log's block state.
///
/// `0` is a freshly converted log, `1..=3` are intermediate hits and
/// [`Phase::TERMINAL`] marks a log whose next sneaking break fells the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Phase(u8);

impl Phase {
    pub const ZERO: Phase = Phase(0);
    pub const TERMINAL: Phase = Phase(4);

    /// Values above the terminal phase are clamped.
    #[inline]
    pub const fn new(v: u8) -> Self {
        if v > Self::TERMINAL.0 {
            Self::TERMINAL
        } else {
            Phase(v)
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    /// One hit further, or `None` at the terminal phase.
    #[inline]
    pub fn advanced(self) -> Option<Phase> {
        if self.is_terminal() {
            None
        } else {
            Some(Phase(self.0 + 1))
        }
    }

    /// One step back, or `None` at zero.
    #[inline]
    pub fn demoted(self) -> Option<Phase> {
        self.0.checked_sub(1).map(Phase)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
