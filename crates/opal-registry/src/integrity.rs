use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha512};

use opal_error::{PackageManagerError, Result};

/// Check tarball bytes against an SRI string (`sha512-<base64 digest>`).
/// Unknown digest algorithms are not checked; the digest is advisory there.
pub fn verify_integrity(name: &str, tarball_bytes: &[u8], expected: &str) -> Result<()> {
    let Some(encoded) = expected.strip_prefix("sha512-") else {
        return Ok(());
    };

    let digest = Sha512::digest(tarball_bytes);
    let computed = STANDARD.encode(digest);

    if computed == encoded {
        Ok(())
    } else {
        Err(PackageManagerError::IntegrityMismatch(
            name.to_string(),
            format!("expected sha512-{encoded}, computed sha512-{computed}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_digest_passes() {
        let bytes = b"tarball contents";
        let digest = Sha512::digest(bytes);
        let sri = format!("sha512-{}", STANDARD.encode(digest));
        assert!(verify_integrity("pkg", bytes, &sri).is_ok());
    }

    #[test]
    fn wrong_digest_fails() {
        let sri = format!("sha512-{}", STANDARD.encode(Sha512::digest(b"other")));
        let err = verify_integrity("pkg", b"tarball contents", &sri).unwrap_err();
        assert!(matches!(err, PackageManagerError::IntegrityMismatch(..)));
    }

    #[test]
    fn unknown_algorithm_is_advisory() {
        assert!(verify_integrity("pkg", b"bytes", "sha1-deadbeef").is_ok());
    }
}
