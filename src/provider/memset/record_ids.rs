use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};

/// FQDN -> provider record ID for every record this process created and has
/// not removed yet. The lock is only ever held for the map access itself.
#[derive(Debug, Default)]
pub struct RecordIdentityTable {
    ids: Mutex<HashMap<String, String>>,
}

impl RecordIdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.ids
            .lock()
            .map_err(|_| Error::LockError("failed to lock record id table".to_string()))
    }

    /// Returns the ID previously stored for `fqdn`, if any.
    pub fn insert(&self, fqdn: &str, id: &str) -> Result<Option<String>> {
        Ok(self.lock()?.insert(fqdn.to_string(), id.to_string()))
    }

    pub fn get(&self, fqdn: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(fqdn).cloned())
    }

    pub fn remove(&self, fqdn: &str) -> Result<Option<String>> {
        Ok(self.lock()?.remove(fqdn))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_identity_table() {
        let table = RecordIdentityTable::new();
        assert!(table.is_empty().unwrap());

        assert_eq!(table.insert("_acme-challenge.a.com.", "1").unwrap(), None);
        assert_eq!(
            table.insert("_acme-challenge.a.com.", "2").unwrap(),
            Some("1".to_string())
        );
        table.insert("_acme-challenge.b.com.", "3").unwrap();
        assert_eq!(table.len().unwrap(), 2);

        assert_eq!(
            table.get("_acme-challenge.a.com.").unwrap(),
            Some("2".to_string())
        );
        assert_eq!(
            table.remove("_acme-challenge.a.com.").unwrap(),
            Some("2".to_string())
        );
        assert_eq!(table.get("_acme-challenge.a.com.").unwrap(), None);
        assert_eq!(table.remove("_acme-challenge.a.com.").unwrap(), None);
        assert_eq!(table.len().unwrap(), 1);
    }
}
