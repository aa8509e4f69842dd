pub mod package_spec;
pub mod path_utils;
pub mod version_utils;

pub use package_spec::parse_pkg_spec;
pub use path_utils::*;
pub use version_utils::*;
