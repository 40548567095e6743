//! Bitmask filters for member queries.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Visibility and binding filter applied to structural member queries.
///
/// A member matches when its visibility flag (`PUBLIC` or `NON_PUBLIC`)
/// and its binding flag (`INSTANCE` or `STATIC`) are both present in the
/// filter. `DECLARED_ONLY` restricts results to members declared directly
/// on the queried type, excluding inherited ones.
///
/// Filters combine with `|`:
///
/// ```
/// use introcache::meta::MemberFilter;
///
/// let filter = MemberFilter::PUBLIC | MemberFilter::STATIC;
/// assert!(filter.contains(MemberFilter::PUBLIC));
/// assert!(!filter.contains(MemberFilter::INSTANCE));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberFilter(u8);

impl MemberFilter {
    /// Match nothing.
    pub const NONE: MemberFilter = MemberFilter(0);
    /// Include public members.
    pub const PUBLIC: MemberFilter = MemberFilter(1 << 0);
    /// Include non-public members.
    pub const NON_PUBLIC: MemberFilter = MemberFilter(1 << 1);
    /// Include instance members.
    pub const INSTANCE: MemberFilter = MemberFilter(1 << 2);
    /// Include static members.
    pub const STATIC: MemberFilter = MemberFilter(1 << 3);
    /// Only members declared on the queried type itself.
    pub const DECLARED_ONLY: MemberFilter = MemberFilter(1 << 4);

    /// The default filter: public instance and static members, including
    /// inherited ones.
    pub const DEFAULT: MemberFilter =
        MemberFilter(Self::PUBLIC.0 | Self::INSTANCE.0 | Self::STATIC.0);

    /// Whether every flag in `other` is present in `self`.
    #[inline]
    pub const fn contains(self, other: MemberFilter) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The union of two filters.
    #[inline]
    pub const fn union(self, other: MemberFilter) -> MemberFilter {
        MemberFilter(self.0 | other.0)
    }
}

impl Default for MemberFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for MemberFilter {
    type Output = MemberFilter;

    fn bitor(self, rhs: MemberFilter) -> MemberFilter {
        self.union(rhs)
    }
}

impl BitOrAssign for MemberFilter {
    fn bitor_assign(&mut self, rhs: MemberFilter) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for MemberFilter {
    type Output = MemberFilter;

    fn bitand(self, rhs: MemberFilter) -> MemberFilter {
        MemberFilter(self.0 & rhs.0)
    }
}

impl fmt::Debug for MemberFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::PUBLIC) {
            names.push("PUBLIC");
        }
        if self.contains(Self::NON_PUBLIC) {
            names.push("NON_PUBLIC");
        }
        if self.contains(Self::INSTANCE) {
            names.push("INSTANCE");
        }
        if self.contains(Self::STATIC) {
            names.push("STATIC");
        }
        if self.contains(Self::DECLARED_ONLY) {
            names.push("DECLARED_ONLY");
        }
        if names.is_empty() {
            write!(f, "MemberFilter(NONE)")
        } else {
            write!(f, "MemberFilter({})", names.join(" | "))
        }
    }
}

/// Which kinds of members a filtered search should consider.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKinds(u8);

impl MemberKinds {
    /// Match no member kind.
    pub const NONE: MemberKinds = MemberKinds(0);
    /// Fields.
    pub const FIELD: MemberKinds = MemberKinds(1 << 0);
    /// Methods.
    pub const METHOD: MemberKinds = MemberKinds(1 << 1);
    /// Constructors.
    pub const CONSTRUCTOR: MemberKinds = MemberKinds(1 << 2);
    /// Properties.
    pub const PROPERTY: MemberKinds = MemberKinds(1 << 3);
    /// Events.
    pub const EVENT: MemberKinds = MemberKinds(1 << 4);
    /// Nested types.
    pub const NESTED_TYPE: MemberKinds = MemberKinds(1 << 5);
    /// Every member kind.
    pub const ALL: MemberKinds = MemberKinds(0b11_1111);

    /// Whether every kind in `other` is present in `self`.
    #[inline]
    pub const fn contains(self, other: MemberKinds) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the two masks share any kind.
    #[inline]
    pub const fn intersects(self, other: MemberKinds) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for MemberKinds {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for MemberKinds {
    type Output = MemberKinds;

    fn bitor(self, rhs: MemberKinds) -> MemberKinds {
        MemberKinds(self.0 | rhs.0)
    }
}

impl BitOrAssign for MemberKinds {
    fn bitor_assign(&mut self, rhs: MemberKinds) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MemberKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return write!(f, "MemberKinds(ALL)");
        }
        let mut names = Vec::new();
        if self.contains(Self::FIELD) {
            names.push("FIELD");
        }
        if self.contains(Self::METHOD) {
            names.push("METHOD");
        }
        if self.contains(Self::CONSTRUCTOR) {
            names.push("CONSTRUCTOR");
        }
        if self.contains(Self::PROPERTY) {
            names.push("PROPERTY");
        }
        if self.contains(Self::EVENT) {
            names.push("EVENT");
        }
        if self.contains(Self::NESTED_TYPE) {
            names.push("NESTED_TYPE");
        }
        if names.is_empty() {
            write!(f, "MemberKinds(NONE)")
        } else {
            write!(f, "MemberKinds({})", names.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_union_and_contains() {
        let filter = MemberFilter::PUBLIC | MemberFilter::INSTANCE;
        assert!(filter.contains(MemberFilter::PUBLIC));
        assert!(filter.contains(MemberFilter::INSTANCE));
        assert!(!filter.contains(MemberFilter::STATIC));
        assert!(filter.contains(MemberFilter::PUBLIC | MemberFilter::INSTANCE));
    }

    #[test]
    fn test_filter_default_matches_public_either_binding() {
        let filter = MemberFilter::default();
        assert!(filter.contains(MemberFilter::PUBLIC));
        assert!(filter.contains(MemberFilter::INSTANCE));
        assert!(filter.contains(MemberFilter::STATIC));
        assert!(!filter.contains(MemberFilter::NON_PUBLIC));
        assert!(!filter.contains(MemberFilter::DECLARED_ONLY));
    }

    #[test]
    fn test_filter_debug_names() {
        let filter = MemberFilter::PUBLIC | MemberFilter::DECLARED_ONLY;
        let rendered = format!("{filter:?}");
        assert!(rendered.contains("PUBLIC"));
        assert!(rendered.contains("DECLARED_ONLY"));
        assert_eq!(format!("{:?}", MemberFilter::NONE), "MemberFilter(NONE)");
    }

    #[test]
    fn test_kinds_intersects() {
        let kinds = MemberKinds::FIELD | MemberKinds::PROPERTY;
        assert!(kinds.intersects(MemberKinds::FIELD));
        assert!(!kinds.intersects(MemberKinds::METHOD));
        assert!(MemberKinds::ALL.contains(kinds));
    }

    #[test]
    fn test_masks_are_value_equal() {
        assert_eq!(
            MemberFilter::PUBLIC | MemberFilter::STATIC,
            MemberFilter::STATIC | MemberFilter::PUBLIC
        );
        assert_eq!(MemberKinds::default(), MemberKinds::ALL);
    }
}
