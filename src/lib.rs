pub mod error;
pub use error::*;

pub mod challenge;
pub mod config;
pub mod provider;
pub mod zone;

mod wrapper;

pub use challenge::ChallengeProvider;
pub use config::Config;
pub use provider::DnsProvider;
