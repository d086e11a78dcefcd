//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two kinds of agent handle exist and must not be confused:
//!
//! - [`AgentId`] is an individual's identity.  It is handed out in increasing
//!   order and never reused, so it stays meaningful after death (ledgers and
//!   offspring refer to it).
//! - [`Slot`] is a position in the population arena.  Slots are recycled when
//!   an agent dies and a new one is born.

use std::fmt;

/// Newtype over an integer index, displayed as `Name(n)`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Unique identity of one stoat.  Monotonically increasing, never reused.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a slot in the population arena.  Reused after death.
    pub struct Slot(u32);
}

typed_id! {
    /// Index of a lure station within the realisation's `LureField`.
    pub struct LureId(u32);
}
