pub mod memset;

pub use memset::DnsProvider;
