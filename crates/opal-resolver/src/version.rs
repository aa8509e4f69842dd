use semver::Version;

/// How much of a version token was written out before a wildcard (or
/// nothing) cut it short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Full,
    Major,
    MajorMinor,
    None,
}

/// Parse a version token into a `Version` plus how precise it was.
/// Accepts full semver (`1.2.3-beta.1`), partials (`1`, `1.2`), x-ranges
/// (`1.x`, `1.2.*`), a bare wildcard, and a leading `v`.
pub fn parse_version_token(token: &str) -> Result<(Version, Precision), String> {
    let cleaned = token.trim().trim_start_matches('v');

    if cleaned.is_empty() || is_wildcard_segment(cleaned) {
        return Ok((Version::new(0, 0, 0), Precision::None));
    }

    if let Ok(version) = Version::parse(cleaned) {
        return Ok((version, Precision::Full));
    }

    let mut numeric: Vec<u64> = Vec::new();
    for segment in cleaned.splitn(3, '.') {
        if is_wildcard_segment(segment) {
            break;
        }
        let value = segment
            .parse::<u64>()
            .map_err(|_| format!("invalid version segment '{segment}'"))?;
        numeric.push(value);
    }

    match numeric.as_slice() {
        [] => Ok((Version::new(0, 0, 0), Precision::None)),
        [major] => Ok((Version::new(*major, 0, 0), Precision::Major)),
        [major, minor] => Ok((Version::new(*major, *minor, 0), Precision::MajorMinor)),
        // Three numeric segments that semver itself rejected (leading
        // zeros and the like) stay rejected.
        _ => Err(format!("invalid version '{cleaned}'")),
    }
}

/// Complete a partial version string with zeros: `1` -> 1.0.0, `1.2` -> 1.2.0.
pub fn parse_partial_version(version_str: &str) -> Result<Version, String> {
    parse_version_token(version_str).map(|(version, _)| version)
}

fn is_wildcard_segment(segment: &str) -> bool {
    matches!(segment, "x" | "X" | "*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_versions_parse() {
        let (v, p) = parse_version_token("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
        assert_eq!(p, Precision::Full);
    }

    #[test]
    fn prerelease_versions_parse() {
        let (v, p) = parse_version_token("1.2.3-beta.1").unwrap();
        assert_eq!(v.to_string(), "1.2.3-beta.1");
        assert_eq!(p, Precision::Full);
    }

    #[test]
    fn partials_complete_with_zeros() {
        assert_eq!(
            parse_version_token("1").unwrap(),
            (Version::new(1, 0, 0), Precision::Major)
        );
        assert_eq!(
            parse_version_token("1.2").unwrap(),
            (Version::new(1, 2, 0), Precision::MajorMinor)
        );
    }

    #[test]
    fn x_segments_truncate() {
        assert_eq!(
            parse_version_token("1.x").unwrap(),
            (Version::new(1, 0, 0), Precision::Major)
        );
        assert_eq!(
            parse_version_token("1.2.*").unwrap(),
            (Version::new(1, 2, 0), Precision::MajorMinor)
        );
    }

    #[test]
    fn leading_v_is_tolerated() {
        assert_eq!(
            parse_partial_version("v2.0.1").unwrap(),
            Version::new(2, 0, 1)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_version_token("not-a-version").is_err());
        assert!(parse_version_token("1.two.3").is_err());
    }
}
