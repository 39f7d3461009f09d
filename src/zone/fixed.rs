use async_trait::async_trait;

use super::ZoneFinder;
use crate::challenge::{to_fqdn, un_fqdn};
use crate::error::{Error, Result};

/// Resolves zones from a fixed list instead of the live DNS. The longest
/// zone that the name falls under wins.
#[derive(Debug, Clone, Default)]
pub struct StaticZoneFinder {
    zones: Vec<String>,
}

impl StaticZoneFinder {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            zones: zones
                .into_iter()
                .map(|z| un_fqdn(z.as_ref()).to_ascii_lowercase())
                .collect(),
        }
    }

    fn lookup(&self, fqdn: &str) -> Option<&str> {
        let name = un_fqdn(fqdn).to_ascii_lowercase();

        self.zones
            .iter()
            .filter(|zone| {
                name == **zone
                    || name
                        .strip_suffix(zone.as_str())
                        .is_some_and(|host| host.ends_with('.'))
            })
            .max_by_key(|zone| zone.len())
            .map(|zone| zone.as_str())
    }
}

#[async_trait]
impl ZoneFinder for StaticZoneFinder {
    async fn find_zone(&self, fqdn: &str) -> Result<String> {
        self.lookup(fqdn).map(to_fqdn).ok_or_else(|| {
            Error::ZoneNotFound(format!("could not determine zone for domain: '{}'", fqdn))
        })
    }
}
