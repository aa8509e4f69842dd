use semver::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparator {
    Exact(Version),
    GreaterThan(Version),
    GreaterThanOrEqual(Version),
    LessThan(Version),
    LessThanOrEqual(Version),
    /// `^`: compatible within the leading non-zero segment
    Compatible(Version),
    /// `~`: compatible within the same minor
    Tilde(Version),
    /// x-range on the minor, e.g. `1.x`
    SameMajor(u64),
    /// x-range on the patch, e.g. `1.2.x`
    SameMinor(u64, u64),
    /// `*`
    Wildcard,
}

impl Comparator {
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(v) => version == v,
            Self::GreaterThan(v) => version > v,
            Self::GreaterThanOrEqual(v) => version >= v,
            Self::LessThan(v) => version < v,
            Self::LessThanOrEqual(v) => version <= v,
            Self::Wildcard => true,
            Self::SameMajor(major) => version.major == *major,
            Self::SameMinor(major, minor) => version.major == *major && version.minor == *minor,
            Self::Compatible(v) => {
                // ^1.2.3 admits >=1.2.3 <2.0.0
                // ^0.2.3 admits >=0.2.3 <0.3.0
                // ^0.0.3 admits only 0.0.3
                if version < v {
                    return false;
                }
                if v.major > 0 {
                    version.major == v.major
                } else if v.minor > 0 {
                    version.major == 0 && version.minor == v.minor
                } else {
                    version.major == 0 && version.minor == 0 && version.patch == v.patch
                }
            }
            Self::Tilde(v) => {
                // ~1.2.3 admits >=1.2.3 <1.3.0
                version >= v && version.major == v.major && version.minor == v.minor
            }
        }
    }
}

/// One AND-clause of a range expression: every comparator must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub comparators: Vec<Comparator>,
}

impl Range {
    #[must_use]
    pub fn new(comparators: Vec<Comparator>) -> Self {
        Self { comparators }
    }

    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.comparators.iter().all(|comp| comp.matches(version))
    }
}
