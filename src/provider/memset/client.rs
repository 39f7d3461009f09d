use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::wrapper::http::Client;

use super::types::{
    Authed, JobStatus, NoParams, RecordRef, Reply, TxtRecord, TxtRecordDescriptor, ZoneQuery,
    ZoneReference,
};

const FORM_FIELD: &str = "parameters";

/// Talks to Memset's JSON API. Each call POSTs its parameters as a JSON
/// document inside a single form field.
pub(super) struct MemsetClient {
    base_url: String,
    api_key: String,
    cli: Client,
}

impl MemsetClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            cli: Client::new(timeout)?,
        })
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}/v1/json/{}", self.base_url, method);
        let parameters = serde_json::to_string(&Authed {
            params,
            api_key: &self.api_key,
        })?;

        debug!("memset: POST {}", url);
        let resp = self.cli.post_form(&url, &[(FORM_FIELD, parameters.as_str())]).await?;
        if !resp.is_success() {
            debug!("memset: {} answered with status {}", method, resp.status);
        }

        Reply::<T>::decode(resp.status, resp.body).into_result()
    }
}

impl MemsetClient {
    /// Looks up the provider zone that serves `apex` (no trailing dot).
    pub async fn resolve_zone(&self, apex: &str) -> Result<ZoneReference> {
        let query = ZoneQuery { domain: apex };
        self.call("dns.zone_domain_info", &query)
            .await
            .map_err(|e| match e {
                Error::ProviderError(envelope) => Error::ZoneNotFound(format!(
                    "{}: {} - {}",
                    apex, envelope.error_type, envelope.error
                )),
                e => e,
            })
    }

    pub async fn create_txt_record(&self, descriptor: &TxtRecordDescriptor) -> Result<TxtRecord> {
        self.call("dns.zone_record_create", descriptor).await
    }

    /// Asks Memset to publish pending zone changes. The returned job is
    /// usually still running.
    pub async fn trigger_reload(&self) -> Result<JobStatus> {
        self.call("dns.reload", &NoParams {}).await
    }

    pub async fn delete_txt_record(&self, id: &str) -> Result<TxtRecord> {
        self.call("dns.zone_record_delete", &RecordRef { id }).await
    }
}
