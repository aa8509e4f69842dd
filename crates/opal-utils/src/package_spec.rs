/// Split a `name@version` spec into its parts. Scoped names keep their
/// leading `@scope/` intact; a spec without a version maps to `latest`.
#[must_use]
pub fn parse_pkg_spec(spec: &str) -> (String, String) {
    if let Some(rest) = spec.strip_prefix('@') {
        // The first '@' belongs to the scope, so only an '@' after the
        // scope separator starts a version.
        if let Some(slash) = rest.find('/') {
            let name_start = slash + 2;
            if let Some(at) = spec.get(name_start..).and_then(|s| s.find('@')) {
                let name = spec.get(..name_start + at).unwrap_or(spec).to_string();
                let version = spec.get(name_start + at + 1..).unwrap_or("").to_string();
                return (name, version);
            }
            return (spec.to_string(), "latest".to_string());
        }
    }

    match spec.split_once('@') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => {
            (name.to_string(), version.to_string())
        }
        _ => (spec.to_string(), "latest".to_string()),
    }
}
