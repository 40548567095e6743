//! Operation categories eligible for caching.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Immutable selection of operation groups a caching facade memoizes.
///
/// Membership is decided once, at facade construction, and never changes
/// afterwards. An operation in a disabled category has no backing cache
/// at all; every call passes straight through to the base provider.
///
/// Categories combine by bitwise union; the default enables everything:
///
/// ```
/// use introcache::facade::Categories;
///
/// let only_reads = Categories::GET | Categories::ATTRIBUTES;
/// assert!(only_reads.contains(Categories::GET));
/// assert!(!only_reads.contains(Categories::CONSTRUCTION));
/// assert_eq!(Categories::default(), Categories::ALL);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Categories(u8);

impl Categories {
    /// Cache nothing.
    pub const NONE: Categories = Categories(0);
    /// Parameterized generic type and method construction.
    pub const CONSTRUCTION: Categories = Categories(1 << 0);
    /// Structural introspection: members, fields, methods, constructors,
    /// properties, events, nested types, interfaces, generic parameters,
    /// custom modifiers.
    pub const GET: Categories = Categories(1 << 1);
    /// Custom-attribute retrieval and defined-checks, including the
    /// per-method return-attribute sub-caches.
    pub const ATTRIBUTES: Categories = Categories(1 << 2);
    /// Filtered member, interface, and type search.
    pub const FIND: Categories = Categories(1 << 3);
    /// Every category.
    pub const ALL: Categories = Categories(0b1111);

    /// Whether every category in `other` is enabled in `self`.
    #[inline]
    pub const fn contains(self, other: Categories) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no category is enabled.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The union of two category sets.
    #[inline]
    pub const fn union(self, other: Categories) -> Categories {
        Categories(self.0 | other.0)
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for Categories {
    type Output = Categories;

    fn bitor(self, rhs: Categories) -> Categories {
        self.union(rhs)
    }
}

impl BitOrAssign for Categories {
    fn bitor_assign(&mut self, rhs: Categories) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Categories {
    type Output = Categories;

    fn bitand(self, rhs: Categories) -> Categories {
        Categories(self.0 & rhs.0)
    }
}

impl fmt::Debug for Categories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return write!(f, "Categories(ALL)");
        }
        let mut names = Vec::new();
        if self.contains(Self::CONSTRUCTION) {
            names.push("CONSTRUCTION");
        }
        if self.contains(Self::GET) {
            names.push("GET");
        }
        if self.contains(Self::ATTRIBUTES) {
            names.push("ATTRIBUTES");
        }
        if self.contains(Self::FIND) {
            names.push("FIND");
        }
        if names.is_empty() {
            write!(f, "Categories(NONE)")
        } else {
            write!(f, "Categories({})", names.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all() {
        assert_eq!(Categories::default(), Categories::ALL);
        assert!(Categories::ALL.contains(Categories::CONSTRUCTION));
        assert!(Categories::ALL.contains(Categories::GET));
        assert!(Categories::ALL.contains(Categories::ATTRIBUTES));
        assert!(Categories::ALL.contains(Categories::FIND));
    }

    #[test]
    fn test_union_is_order_independent() {
        assert_eq!(
            Categories::GET | Categories::FIND,
            Categories::FIND | Categories::GET
        );
    }

    #[test]
    fn test_none_contains_nothing() {
        assert!(Categories::NONE.is_empty());
        assert!(!Categories::NONE.contains(Categories::GET));
        // Every set contains the empty set.
        assert!(Categories::NONE.contains(Categories::NONE));
    }

    #[test]
    fn test_debug_renders_flag_names() {
        let rendered = format!("{:?}", Categories::GET | Categories::ATTRIBUTES);
        assert!(rendered.contains("GET"));
        assert!(rendered.contains("ATTRIBUTES"));
        assert_eq!(format!("{:?}", Categories::ALL), "Categories(ALL)");
    }
}
