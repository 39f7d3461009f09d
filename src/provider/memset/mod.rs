mod client;
mod memset;
mod record_ids;
mod types;

pub use memset::DnsProvider;
pub use record_ids::RecordIdentityTable;
pub use types::{ErrorEnvelope, JobStatus, TxtRecord, TxtRecordDescriptor, ZoneReference};
