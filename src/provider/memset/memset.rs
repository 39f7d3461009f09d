use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::challenge::{ChallengeProvider, challenge_record, host_label, to_fqdn, un_fqdn};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::zone::{SoaZoneFinder, ZoneFinder};

use super::client::MemsetClient;
use super::record_ids::RecordIdentityTable;
use super::types::{TxtRecord, TxtRecordDescriptor, ZoneReference};

/// Solves DNS-01 challenges by creating TXT records through Memset's API.
///
/// Memset hands out an opaque ID for every record it creates and only
/// deletes by that ID, so the ID of each presented record is remembered
/// until the matching cleanup. Nothing is persisted: a record presented by
/// another process cannot be cleaned up by this one.
pub struct DnsProvider {
    config: Config,
    client: MemsetClient,
    zones: Box<dyn ZoneFinder + Send + Sync>,
    record_ids: RecordIdentityTable,
}

impl DnsProvider {
    /// Reads the `MEMSET_*` variables, `MEMSET_AUTH_TOKEN` is required.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        Self::new(config)
    }

    /// Uses the live DNS to find the zone of each challenge record.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_zone_finder(config, SoaZoneFinder::new())
    }

    pub fn with_zone_finder<Z>(config: Config, zones: Z) -> Result<Self>
    where
        Z: ZoneFinder + Send + Sync + 'static,
    {
        let config = config.validate()?;
        let client = MemsetClient::new(&config.base_url, &config.auth_token, config.http_timeout)?;

        Ok(Self {
            config,
            client,
            zones: Box::new(zones),
            record_ids: RecordIdentityTable::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The ID of the record presented for `fqdn`, if it is still tracked.
    pub fn tracked_record_id(&self, fqdn: &str) -> Result<Option<String>> {
        self.record_ids.get(fqdn)
    }

    pub fn tracked_count(&self) -> Result<usize> {
        self.record_ids.len()
    }

    /// The zone apex hosting `fqdn` and the Memset zone behind it. Looked up
    /// afresh on every call.
    pub async fn find_zone(&self, fqdn: &str) -> Result<(String, ZoneReference)> {
        let apex = self.zones.find_zone(&to_fqdn(fqdn)).await?;
        let zone = self.client.resolve_zone(un_fqdn(&apex)).await?;
        debug!("memset: zone {} has id {}", apex, zone.id);
        Ok((apex, zone))
    }

    /// Finds the zone, creates the record and kicks off a reload. Returns as
    /// soon as the record exists, the reload is left to finish on its own.
    async fn add_txt_record(&self, fqdn: &str, value: &str) -> Result<TxtRecord> {
        let (apex, zone) = self.find_zone(fqdn).await?;

        let descriptor = TxtRecordDescriptor::new(
            &zone.id,
            &host_label(fqdn, &apex),
            value,
            self.config.ttl,
        );
        let record = self.client.create_txt_record(&descriptor).await?;
        info!("memset: created TXT record {} for {}", record.id, fqdn);

        // A failed reload does not undo the record, Memset publishes it on
        // its next reload anyway.
        match self.client.trigger_reload().await {
            Ok(job) if job.error => warn!(
                "memset: dns reload job {} reported an error (status: {})",
                job.id, job.status
            ),
            Ok(job) => debug!(
                "memset: dns reload job {} is {} (finished: {})",
                job.id, job.status, job.finished
            ),
            Err(e) => warn!("memset: dns reload after creating {} failed: {}", fqdn, e),
        }

        Ok(record)
    }

    async fn remove_txt_record(&self, fqdn: &str, id: &str) -> Result<()> {
        let removed = self.client.delete_txt_record(id).await?;
        info!("memset: removed TXT record {} for {}", removed.id, fqdn);
        Ok(())
    }
}

#[async_trait]
impl ChallengeProvider for DnsProvider {
    async fn present(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        let (fqdn, value) = challenge_record(domain, key_auth);

        let record = self
            .add_txt_record(&fqdn, &value)
            .await
            .map_err(|e| Error::PresentFailed(Box::new(e)))?;

        if let Some(previous) = self
            .record_ids
            .insert(&fqdn, &record.id)
            .map_err(|e| Error::PresentFailed(Box::new(e)))?
        {
            warn!(
                "memset: {} was still tracked with record {}, replaced by {}",
                fqdn, previous, record.id
            );
        }

        Ok(())
    }

    async fn clean_up(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        let (fqdn, _) = challenge_record(domain, key_auth);

        let id = self
            .record_ids
            .get(&fqdn)
            .map_err(|e| Error::CleanUpFailed(Box::new(e)))?
            .ok_or_else(|| Error::UnknownRecord(fqdn.clone()))?;

        // On failure the ID stays tracked so the cleanup can be retried.
        self.remove_txt_record(&fqdn, &id)
            .await
            .map_err(|e| Error::CleanUpFailed(Box::new(e)))?;

        self.record_ids
            .remove(&fqdn)
            .map_err(|e| Error::CleanUpFailed(Box::new(e)))?;

        Ok(())
    }

    fn timeout(&self) -> (Duration, Duration) {
        (self.config.propagation_timeout, self.config.polling_interval)
    }
}
