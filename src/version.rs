//! Three-component version numbers stamped into every configuration document.

use crate::error::{MigrationError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// `MAJOR[.MINOR[.PATCH]]`, surrounding whitespace allowed.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)(?:\.(\d+))?(?:\.(\d+))?\s*$").expect("version pattern is valid")
});

/// A `(major, minor, patch)` version where any component may be unset.
///
/// Ordering compares major, then minor, then patch, with an unset component
/// sorting below every set one. Equality is exact; the wildcard reading of
/// unset components is only available through [`Version::agrees_with`], which
/// the loader uses to check that a tree is consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    major: Option<u32>,
    minor: Option<u32>,
    patch: Option<u32>,
}

impl Version {
    /// The fully unset version carried by freshly created documents.
    pub const UNSET: Self = Self {
        major: None,
        minor: None,
        patch: None,
    };

    /// Creates a fully specified version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            patch: Some(patch),
        }
    }

    /// Parses `MAJOR[.MINOR[.PATCH]]`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidVersion`] if the text does not have that shape
    /// or a component overflows.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || MigrationError::InvalidVersion(text.to_string());
        let caps = VERSION_PATTERN.captures(text).ok_or_else(invalid)?;

        let component = |idx: usize| -> Result<Option<u32>> {
            caps.get(idx)
                .map(|m| m.as_str().parse::<u32>().map_err(|_| invalid()))
                .transpose()
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
        })
    }

    /// Major component, if set.
    #[must_use]
    pub const fn major(&self) -> Option<u32> {
        self.major
    }

    /// Minor component, if set.
    #[must_use]
    pub const fn minor(&self) -> Option<u32> {
        self.minor
    }

    /// Patch component, if set.
    #[must_use]
    pub const fn patch(&self) -> Option<u32> {
        self.patch
    }

    /// True when no component is set.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.major.is_none() && self.minor.is_none() && self.patch.is_none()
    }

    /// Number of set components, used to prefer the more specific of two agreeing versions.
    fn specificity(&self) -> usize {
        [self.major, self.minor, self.patch]
            .iter()
            .filter(|c| c.is_some())
            .count()
    }

    /// Load-time agreement: unset components match anything.
    #[must_use]
    pub fn agrees_with(&self, other: &Self) -> bool {
        fn same(a: Option<u32>, b: Option<u32>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
        }
        same(self.major, other.major) && same(self.minor, other.minor) && same(self.patch, other.patch)
    }

    /// Of two agreeing versions, returns the one with more components set.
    #[must_use]
    pub fn most_specific(self, other: Self) -> Self {
        if other.specificity() > self.specificity() {
            other
        } else {
            self
        }
    }
}

impl FromStr for Version {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    /// Renders as `MAJOR.MM.PP`, minor and patch zero-padded to two digits and
    /// trailing unset components omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(major) = self.major else {
            return write!(f, "unset");
        };
        write!(f, "{major}")?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor:02}")?;
            if let Some(patch) = self.patch {
                write!(f, ".{patch:02}")?;
            }
        }
        Ok(())
    }
}
