//! Message severities and the bit masks streams subscribe with.

use crate::error::LogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Sub};

/// The severity of a logged message.
///
/// Each severity occupies its own bit so that several can be combined into a
/// [`SeverityMask`]. The bit values are fixed and match the values used by
/// external callers that pass integer masks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Verbose output only useful while debugging an importer.
    #[serde(rename = "debug", alias = "debugging")]
    Debugging,
    /// General progress information.
    Info,
    /// Something unexpected that the importer recovered from.
    Warn,
    /// A failure that aborts or corrupts the current import.
    Error,
}

impl Severity {
    /// All severities in ascending bit order.
    pub const ALL: [Severity; 4] = [
        Severity::Debugging,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Returns the single bit representing this severity.
    pub const fn bits(self) -> u32 {
        match self {
            Severity::Debugging => 0x1,
            Severity::Info => 0x2,
            Severity::Warn => 0x4,
            Severity::Error => 0x8,
        }
    }

    /// Returns the severity whose bit is exactly `bits`, if any.
    pub fn from_bits(bits: u32) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| s.bits() == bits)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debugging => write!(f, "debug"),
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A set of [`Severity`] flags.
///
/// Masks combine with `|`, intersect with `&` and subtract with `-`. At the
/// attach/detach boundary an empty mask means "every severity", matching the
/// raw-integer convention where `0` selects all messages; see
/// [`normalized`](Self::normalized).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SeverityMask(u32);

impl SeverityMask {
    /// The mask with no severity set.
    pub const EMPTY: SeverityMask = SeverityMask(0);

    /// The mask with every severity set.
    pub const ALL: SeverityMask = SeverityMask(0xF);

    /// Converts an externally supplied integer mask.
    ///
    /// `0` maps to [`ALL`](Self::ALL). Bits outside the four known severities
    /// are rejected.
    pub fn from_raw(bits: u32) -> Result<SeverityMask, LogError> {
        if bits & !Self::ALL.0 != 0 {
            return Err(LogError::UnknownSeverityBits(bits));
        }
        Ok(SeverityMask(bits).normalized())
    }

    /// Returns the raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no severity is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `severity` is part of this mask.
    pub const fn contains(self, severity: Severity) -> bool {
        self.0 & severity.bits() != 0
    }

    /// Returns `true` if the two masks share at least one severity.
    pub const fn intersects(self, other: SeverityMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the set union of both masks.
    pub const fn union(self, other: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 | other.0)
    }

    /// Returns the severities in `self` that are not in `other`.
    pub const fn difference(self, other: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 & !other.0)
    }

    /// Maps the empty mask to [`ALL`](Self::ALL), leaving any other mask unchanged.
    pub const fn normalized(self) -> SeverityMask {
        if self.is_empty() {
            Self::ALL
        } else {
            self
        }
    }

    /// Iterates over the contained severities in ascending bit order.
    pub fn iter(self) -> impl Iterator<Item = Severity> {
        Severity::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl From<Severity> for SeverityMask {
    fn from(severity: Severity) -> Self {
        SeverityMask(severity.bits())
    }
}

impl FromIterator<Severity> for SeverityMask {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        iter.into_iter().fold(SeverityMask::EMPTY, |mask, s| mask | s)
    }
}

impl BitOr for SeverityMask {
    type Output = SeverityMask;

    fn bitor(self, rhs: SeverityMask) -> SeverityMask {
        self.union(rhs)
    }
}

impl BitOr<Severity> for SeverityMask {
    type Output = SeverityMask;

    fn bitor(self, rhs: Severity) -> SeverityMask {
        self.union(rhs.into())
    }
}

impl BitOr for Severity {
    type Output = SeverityMask;

    fn bitor(self, rhs: Severity) -> SeverityMask {
        SeverityMask::from(self) | rhs
    }
}

impl BitOrAssign for SeverityMask {
    fn bitor_assign(&mut self, rhs: SeverityMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SeverityMask {
    type Output = SeverityMask;

    fn bitand(self, rhs: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 & rhs.0)
    }
}

impl Sub for SeverityMask {
    type Output = SeverityMask;

    fn sub(self, rhs: SeverityMask) -> SeverityMask {
        self.difference(rhs)
    }
}

impl fmt::Display for SeverityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        for (i, severity) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{severity}")?;
        }
        Ok(())
    }
}
