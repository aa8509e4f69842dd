#[must_use]
pub fn format_version_string(version: &str, save_exact: bool) -> String {
    if save_exact {
        version.to_string()
    } else if version.starts_with('^') || version.starts_with('~') || version.contains('-') {
        version.to_string()
    } else {
        format!("^{version}")
    }
}

#[must_use]
pub fn is_exact_version(version: &str) -> bool {
    !version.starts_with('^') && !version.starts_with('~') && !version.contains('-')
}

#[must_use]
pub fn extract_exact_version(version: &str) -> String {
    version
        .strip_prefix('^')
        .or_else(|| version.strip_prefix('~'))
        .unwrap_or(version)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_added_by_default() {
        assert_eq!(format_version_string("1.2.3", false), "^1.2.3");
    }

    #[test]
    fn exact_kept_verbatim() {
        assert_eq!(format_version_string("1.2.3", true), "1.2.3");
        assert_eq!(format_version_string("^1.2.3", false), "^1.2.3");
    }

    #[test]
    fn prefix_stripping() {
        assert_eq!(extract_exact_version("^1.2.3"), "1.2.3");
        assert_eq!(extract_exact_version("~1.2.3"), "1.2.3");
        assert_eq!(extract_exact_version("1.2.3"), "1.2.3");
    }
}
