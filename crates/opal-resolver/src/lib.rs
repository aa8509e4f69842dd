pub mod comparators;
pub mod range;
pub mod resolver;
pub mod version;

pub use comparators::{Comparator, Range};
pub use range::VersionRange;
pub use resolver::{
    PackageId, Resolution, ResolutionFailure, ResolutionSession,
};
pub use version::parse_partial_version;
