//! Forward-zone value types and set difference.

use std::collections::BTreeSet;
use std::fmt;

/// A single forward zone: one domain forwarded to one IPv4 address.
///
/// Identity is the full `(name, address)` pair, so the same name pointing at
/// a different address is a different zone.
///
/// # Example
///
/// ```
/// use unbound_forwards::Zone;
///
/// let zone = Zone::new("example.com.", "192.0.2.1");
/// assert_eq!(zone.name, "example.com");
/// assert_eq!(zone.address, "192.0.2.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Zone {
    /// Domain name without a trailing dot, except the root zone `.`.
    pub name: String,

    /// Forward target. Not validated as an address.
    pub address: String,
}

impl Zone {
    /// Creates a zone, stripping one trailing dot from `name`.
    ///
    /// The root zone `.` is kept as is.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        let mut name = name.into();
        if name.len() > 1 && name.ends_with('.') {
            name.pop();
        }
        Self {
            name,
            address: address.into(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.address)
    }
}

/// An immutable set of zones. Iteration is ordered by name, then address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneSet(BTreeSet<Zone>);

impl ZoneSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, zone: &Zone) -> bool {
        self.0.contains(zone)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.0.iter()
    }

    /// Zones in `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl FromIterator<Zone> for ZoneSet {
    fn from_iter<I: IntoIterator<Item = Zone>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ZoneSet {
    type Item = Zone;
    type IntoIter = std::collections::btree_set::IntoIter<Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ZoneSet {
    type Item = &'a Zone;
    type IntoIter = std::collections::btree_set::Iter<'a, Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Changes needed to turn the live set into the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// Declared in config but missing from the resolver.
    pub to_add: ZoneSet,

    /// Present in the resolver but not declared in config.
    pub to_remove: ZoneSet,
}

impl Delta {
    /// Returns `true` when there is nothing to add or remove.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the delta between `desired` and `actual`.
#[must_use]
pub fn diff(desired: &ZoneSet, actual: &ZoneSet) -> Delta {
    Delta {
        to_add: desired.difference(actual),
        to_remove: actual.difference(desired),
    }
}
