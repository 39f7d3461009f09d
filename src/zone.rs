use async_trait::async_trait;

use crate::error::Result;

mod fixed;
mod soa;

pub use fixed::StaticZoneFinder;
pub use soa::SoaZoneFinder;

/// Finds the zone apex that hosts a name, e.g. `example.com.` for
/// `_acme-challenge.www.example.com.`.
#[async_trait]
pub trait ZoneFinder {
    /// Takes and returns trailing-dot terminated names.
    async fn find_zone(&self, fqdn: &str) -> Result<String>;
}
