use async_trait::async_trait;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{Record, RecordType};
use hickory_resolver::{Resolver, TokioResolver};
use log::debug;

use super::ZoneFinder;
use crate::challenge::{to_fqdn, un_fqdn};
use crate::error::{Error, Result};

/// Walks up the name one label at a time and stops at the first name that
/// owns an SOA record in the live DNS.
pub struct SoaZoneFinder {
    resolver: TokioResolver,
}

impl Default for SoaZoneFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl SoaZoneFinder {
    pub fn new() -> Self {
        let resolver = Resolver::builder_tokio()
            .unwrap_or_else(|_| {
                Resolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
            })
            .build();
        Self { resolver }
    }

    pub fn with_resolver(resolver: TokioResolver) -> Self {
        Self { resolver }
    }
}

/// A CNAME'd name can answer with the SOA of its target, only an SOA owned
/// by `name` itself makes it a zone apex.
fn owns_soa(records: &[Record], name: &str) -> bool {
    records.iter().any(|r| {
        r.record_type() == RecordType::SOA && r.name().to_string().eq_ignore_ascii_case(name)
    })
}

#[async_trait]
impl ZoneFinder for SoaZoneFinder {
    async fn find_zone(&self, fqdn: &str) -> Result<String> {
        let labels: Vec<&str> = un_fqdn(fqdn).split('.').collect();

        for idx in 0..labels.len() {
            let candidate = to_fqdn(&labels[idx..].join("."));

            match self.resolver.soa_lookup(candidate.as_str()).await {
                Ok(lookup) if owns_soa(lookup.as_lookup().records(), &candidate) => {
                    return Ok(candidate);
                }
                Ok(_) => debug!("SOA answer for {} belongs to another name", candidate),
                Err(e) => debug!("no SOA at {}: {}", candidate, e),
            }
        }

        Err(Error::ZoneNotFound(format!(
            "could not determine zone for domain: '{}'",
            fqdn
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::rr::rdata::{CNAME, SOA};
    use hickory_resolver::proto::rr::{Name, RData};

    fn name(s: &str) -> Name {
        Name::from_ascii(s).unwrap()
    }

    fn soa(owner: &str) -> Record {
        let rdata = SOA::new(
            name("ns1.example.net."),
            name("hostmaster.example.net."),
            2024010101,
            3600,
            600,
            86400,
            300,
        );
        Record::from_rdata(name(owner), 3600, RData::SOA(rdata))
    }

    fn cname(owner: &str, target: &str) -> Record {
        Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
    }

    #[test]
    fn test_owns_soa() {
        let records = vec![soa("example.com.")];
        assert!(owns_soa(&records, "example.com."));
        assert!(owns_soa(&records, "EXAMPLE.com."));
        assert!(!owns_soa(&records, "www.example.com."));
    }

    #[test]
    fn test_owns_soa_rejects_cname_target() {
        // www.example.com is an alias into another zone; the SOA in the
        // answer is that zone's, not www's.
        let records = vec![
            cname("www.example.com.", "edge.cdn.example.net."),
            soa("cdn.example.net."),
        ];
        assert!(!owns_soa(&records, "www.example.com."));
        assert!(owns_soa(&records, "cdn.example.net."));
    }

    #[test]
    fn test_owns_soa_ignores_other_types() {
        let records = vec![cname("example.com.", "example.org.")];
        assert!(!owns_soa(&records, "example.com."));
        assert!(!owns_soa(&[], "example.com."));
    }
}
