use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use crate::error::Result;

pub const CHALLENGE_LABEL: &str = "_acme-challenge";

/// The contract an ACME client drives while solving DNS-01 challenges.
///
/// `present` and `clean_up` may be called concurrently for different domains.
#[async_trait]
pub trait ChallengeProvider {
    async fn present(&self, domain: &str, token: &str, key_auth: &str) -> Result<()>;

    async fn clean_up(&self, domain: &str, token: &str, key_auth: &str) -> Result<()>;

    /// How long, and how often, the caller should poll DNS for the record.
    fn timeout(&self) -> (Duration, Duration);
}

/// Returns the record FQDN and TXT value for a DNS-01 challenge on `domain`.
pub fn challenge_record(domain: &str, key_auth: &str) -> (String, String) {
    let digest = Sha256::digest(key_auth.as_bytes());
    let value = URL_SAFE_NO_PAD.encode(digest);
    let fqdn = to_fqdn(&format!("{}.{}", CHALLENGE_LABEL, un_fqdn(domain)));
    (fqdn, value)
}

pub fn to_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Host label of `fqdn` relative to `zone`, e.g. `_acme-challenge.www` for
/// `_acme-challenge.www.example.com.` in `example.com`. The zone is matched
/// case-insensitively and only on a label boundary; the host keeps its case.
pub fn host_label(fqdn: &str, zone: &str) -> String {
    let name = un_fqdn(fqdn);
    let zone = un_fqdn(zone);

    if name.eq_ignore_ascii_case(zone) {
        return String::new();
    }

    let split = name.len().saturating_sub(zone.len());
    match (name.get(..split), name.get(split..)) {
        (Some(host), Some(suffix)) if suffix.eq_ignore_ascii_case(zone) && split > 0 => host
            .strip_suffix('.')
            .map(str::to_string)
            .unwrap_or_else(|| name.to_string()),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_record() {
        let (fqdn, value) = challenge_record("example.com", "foobar");
        assert_eq!(fqdn, "_acme-challenge.example.com.");
        assert_eq!(value, "w6uP8Tcg6K2QR905Rms8iXTlksL6OD1KOWBxTK7wxPI");

        let (fqdn, _) = challenge_record("www.example.com.", "foobar");
        assert_eq!(fqdn, "_acme-challenge.www.example.com.");
    }

    #[test]
    fn test_fqdn_helpers() {
        assert_eq!(to_fqdn("example.com"), "example.com.");
        assert_eq!(to_fqdn("example.com."), "example.com.");
        assert_eq!(un_fqdn("example.com."), "example.com");
        assert_eq!(un_fqdn("example.com"), "example.com");
    }

    #[test]
    fn test_host_label() {
        assert_eq!(
            host_label("_acme-challenge.example.com.", "example.com."),
            "_acme-challenge"
        );
        assert_eq!(
            host_label("_acme-challenge.www.example.com.", "example.com"),
            "_acme-challenge.www"
        );
        assert_eq!(
            host_label("_acme-challenge.a.b.example.co.uk.", "example.co.uk."),
            "_acme-challenge.a.b"
        );
        assert_eq!(host_label("example.com.", "example.com."), "");
    }

    #[test]
    fn test_host_label_ignores_case() {
        assert_eq!(
            host_label("_acme-challenge.WWW.Example.com.", "example.com."),
            "_acme-challenge.WWW"
        );
        assert_eq!(
            host_label("_acme-challenge.example.com.", "EXAMPLE.COM"),
            "_acme-challenge"
        );
        assert_eq!(host_label("Example.COM", "example.com."), "");
    }

    #[test]
    fn test_host_label_needs_label_boundary() {
        assert_eq!(
            host_label("_acme-challenge.badexample.com.", "example.com."),
            "_acme-challenge.badexample.com"
        );
    }
}
