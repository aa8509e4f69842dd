use semver::Version;

use opal_error::{PackageManagerError, Result};

use crate::comparators::{Comparator, Range};
use crate::version::{Precision, parse_version_token};

/// A parsed range expression. The raw text is kept verbatim so manifests
/// round-trip unchanged.
#[derive(Debug, Clone)]
pub struct VersionRange {
    raw: String,
    clauses: Vec<Range>,
    latest: bool,
}

impl VersionRange {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        if trimmed == "latest" {
            return Ok(Self {
                raw: raw.to_string(),
                clauses: Vec::new(),
                latest: true,
            });
        }

        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self {
                raw: raw.to_string(),
                clauses: vec![Range::new(vec![Comparator::Wildcard])],
                latest: false,
            });
        }

        let mut clauses = Vec::new();
        for clause in trimmed.split("||") {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            clauses.push(parse_clause(clause).map_err(|detail| {
                PackageManagerError::InvalidRange(raw.to_string(), detail)
            })?);
        }

        if clauses.is_empty() {
            return Err(PackageManagerError::InvalidRange(
                raw.to_string(),
                "no comparators".to_string(),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            clauses,
            latest: false,
        })
    }

    /// The textual form this range was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.latest
    }

    /// Whether `version` is admitted. `latest` admits everything; versions
    /// that are not semver fall back to exact-string equality with the raw
    /// range text; pre-releases are only admitted by ranges that mention one.
    #[must_use]
    pub fn satisfies(&self, version: &str) -> bool {
        if self.latest {
            return true;
        }

        match Version::parse(version.trim()) {
            Ok(parsed) => {
                if !parsed.pre.is_empty() && !self.raw.contains('-') {
                    return false;
                }
                self.clauses.iter().any(|clause| clause.matches(&parsed))
            }
            Err(_) => version == self.raw,
        }
    }

    /// The greatest satisfying version under semver ordering. Candidates
    /// that are not semver only win if no semver candidate satisfies, and
    /// tie-break among themselves lexicographically descending.
    #[must_use]
    pub fn max_satisfying(&self, versions: &[String]) -> Option<String> {
        let mut best_semver: Option<(Version, &str)> = None;
        let mut best_plain: Option<&str> = None;

        for candidate in versions {
            if !self.satisfies(candidate) {
                continue;
            }
            match Version::parse(candidate.trim()) {
                Ok(parsed) => {
                    let better = best_semver
                        .as_ref()
                        .is_none_or(|(best, _)| parsed > *best);
                    if better {
                        best_semver = Some((parsed, candidate));
                    }
                }
                Err(_) => {
                    if best_plain.is_none_or(|best| candidate.as_str() > best) {
                        best_plain = Some(candidate);
                    }
                }
            }
        }

        best_semver
            .map(|(_, text)| text.to_string())
            .or_else(|| best_plain.map(ToString::to_string))
    }
}

/// Parse one AND-clause, e.g. `>=1.2.0 <2.0.0` or `^1.4`.
fn parse_clause(clause: &str) -> std::result::Result<Range, String> {
    const OPERATORS: &[(&str, fn(Version) -> Comparator)] = &[
        (">=", Comparator::GreaterThanOrEqual),
        ("<=", Comparator::LessThanOrEqual),
        (">", Comparator::GreaterThan),
        ("<", Comparator::LessThan),
        ("^", Comparator::Compatible),
        ("~", Comparator::Tilde),
        ("=", Comparator::Exact),
    ];

    let mut comparators = Vec::new();
    let mut tokens = clause.split_whitespace();

    while let Some(token) = tokens.next() {
        let (make, version_text) = OPERATORS
            .iter()
            .find_map(|(op, make)| token.strip_prefix(op).map(|rest| (Some(*make), rest)))
            .unwrap_or((None, token));

        // The operator may be separated from its version by whitespace.
        let version_text = if version_text.is_empty() {
            tokens.next().ok_or("dangling operator")?
        } else {
            version_text
        };

        let (version, precision) = parse_version_token(version_text)?;
        comparators.push(build_comparator(make, version, precision));
    }

    if comparators.is_empty() {
        return Err("empty clause".to_string());
    }

    Ok(Range::new(comparators))
}

fn build_comparator(
    make: Option<fn(Version) -> Comparator>,
    version: Version,
    precision: Precision,
) -> Comparator {
    if let Some(make) = make {
        return make(version);
    }

    // A bare version: exact when fully written, an x-range otherwise.
    match precision {
        Precision::Full => Comparator::Exact(version),
        Precision::Major => Comparator::SameMajor(version.major),
        Precision::MajorMinor => Comparator::SameMinor(version.major, version.minor),
        Precision::None => Comparator::Wildcard,
    }
}
