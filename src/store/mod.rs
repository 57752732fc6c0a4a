mod blob;
mod entry;
mod id;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use entry::{
    coerce_amount, coerce_quantity, parse_decimal, Entry, EntryField, EntryInput, EntryUpdate,
};
pub use id::IdGenerator;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{LogisticsError, Result};
use entry::coerce_sr_no;

/// Blob key holding the whole entry collection.
pub const ENTRIES_KEY: &str = "logistics_entries";

/// Owns the entry collection persisted under [`ENTRIES_KEY`].
///
/// Every mutation reads the whole collection, applies the change and writes the
/// whole collection back. Two writers sharing one backend race at collection
/// granularity (last write wins), so callers with more than one writer must
/// serialize access around each operation.
pub struct EntryStore<B> {
    backend: B,
    ids: IdGenerator,
}

impl<B: BlobStore> EntryStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ids: IdGenerator::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All entries in insertion order. Missing or undecodable data is an empty
    /// collection; only an unavailable medium is an error.
    pub fn list(&self) -> Result<Vec<Entry>> {
        let Some(raw) = self.backend.get_blob(ENTRIES_KEY)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Entry>>(&raw) {
            Ok(entries) => {
                debug!(count = entries.len(), "loaded entries");
                Ok(entries)
            }
            Err(e) => {
                warn!(error = %e, "stored entries could not be decoded, starting empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Entry>> {
        Ok(self.list()?.into_iter().find(|entry| entry.id == id))
    }

    /// Append a new entry built from form input and persist the collection.
    pub fn create(&mut self, input: EntryInput) -> Result<Entry> {
        let mut entries = self.list()?;

        // Keep created_at in insertion order even if the wall clock steps back.
        let now = Utc::now();
        let created_at = entries
            .last()
            .map_or(now, |last| now.max(last.created_at));

        let entry = Entry {
            id: self.ids.generate(),
            sr_no: coerce_sr_no(&input.sr_no, entries.len()),
            date: input.date,
            particular: input.particular,
            chalan_no: input.chalan_no,
            vehicle_no: input.vehicle_no.to_uppercase(),
            driver_name: input.driver_name,
            from: input.from,
            to: input.to,
            quantity: coerce_quantity(&input.quantity),
            amount: coerce_amount(&input.amount),
            created_at,
        };

        entries.push(entry.clone());
        self.save(&entries)?;
        debug!(id = %entry.id, sr_no = entry.sr_no, "entry created");

        Ok(entry)
    }

    /// Merge `changes` over the entry with `id`. Unknown ids are a silent no-op.
    pub fn update(&mut self, id: &str, changes: EntryUpdate) -> Result<()> {
        let mut entries = self.list()?;

        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            debug!(id, "update skipped, no such entry");
            return Ok(());
        };
        changes.apply(entry);

        self.save(&entries)?;
        debug!(id, "entry updated");
        Ok(())
    }

    /// Remove the entry with `id` if present. Deleting twice is the same as deleting once.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        if entries.len() == before {
            debug!(id, "delete found no such entry");
        }

        self.save(&entries)?;
        Ok(())
    }

    fn save(&mut self, entries: &[Entry]) -> Result<()> {
        let encoded = serde_json::to_string_pretty(entries).map_err(|e| {
            LogisticsError::StorageUnavailable {
                key: ENTRIES_KEY.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            }
        })?;
        self.backend.set_blob(ENTRIES_KEY, &encoded)?;
        debug!(count = entries.len(), "entries persisted");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::date;
    use super::*;
    use std::collections::HashSet;

    fn input(vehicle: &str, amount: &str) -> EntryInput {
        EntryInput {
            particular: "Gravel".to_string(),
            chalan_no: "CH-101".to_string(),
            vehicle_no: vehicle.to_string(),
            driver_name: "Ramesh".to_string(),
            from: "Nashik".to_string(),
            to: "Thane".to_string(),
            quantity: "12".to_string(),
            amount: amount.to_string(),
            ..EntryInput::new(date("2026-10-03"))
        }
    }

    fn store() -> EntryStore<MemoryBlobStore> {
        EntryStore::new(MemoryBlobStore::new())
    }

    #[test]
    fn empty_store_lists_nothing() {
        assert!(store().list().unwrap().is_empty());
    }

    #[test]
    fn create_assigns_identity_and_normalizes() {
        let mut store = store();
        let entry = store.create(input("mh12ab1234", "")).unwrap();

        assert!(!entry.id.is_empty());
        assert_eq!(entry.vehicle_no, "MH12AB1234");
        assert_eq!(entry.sr_no, 1);
        assert_eq!(entry.quantity, 12.0);
        assert_eq!(entry.amount, None);
        assert_eq!(store.list().unwrap(), vec![entry]);
    }

    #[test]
    fn create_keeps_zero_amount_distinct_from_absent() {
        let mut store = store();
        let zero = store.create(input("A", "0")).unwrap();
        let absent = store.create(input("B", "")).unwrap();

        assert_eq!(zero.amount, Some(0.0));
        assert_eq!(absent.amount, None);

        let raw = store.backend().get_blob(ENTRIES_KEY).unwrap().unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded[0]["amount"], serde_json::json!(0.0));
        assert!(decoded[1].get("amount").is_none());
    }

    #[test]
    fn ids_are_unique_across_creates() {
        let mut store = store();
        for i in 0..50 {
            store.create(input(&format!("V{i}"), "10")).unwrap();
        }

        let entries = store.list().unwrap();
        let ids: HashSet<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
        assert!(entries
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at));
        assert_eq!(entries[49].sr_no, 50);
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut store = store();
        let first = store.create(input("A", "100")).unwrap();
        let second = store.create(input("B", "200")).unwrap();

        store
            .update(
                &first.id,
                EntryUpdate {
                    driver_name: Some("Suresh".to_string()),
                    amount: Some(Some(150.0)),
                    ..Default::default()
                },
            )
            .unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries[0].driver_name, "Suresh");
        assert_eq!(entries[0].amount, Some(150.0));
        assert_eq!(entries[0].id, first.id);
        assert_eq!(entries[0].created_at, first.created_at);
        assert_eq!(entries[0].particular, first.particular);
        assert_eq!(entries[1], second);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store = store();
        let entry = store.create(input("A", "100")).unwrap();

        store
            .update(
                "missing",
                EntryUpdate {
                    particular: Some("Cement".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(store.list().unwrap(), vec![entry]);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = store();
        let keep = store.create(input("A", "100")).unwrap();
        let gone = store.create(input("B", "200")).unwrap();

        store.delete(&gone.id).unwrap();
        let after_once = store.list().unwrap();
        store.delete(&gone.id).unwrap();

        assert_eq!(after_once, vec![keep]);
        assert_eq!(store.list().unwrap(), after_once);
    }

    #[test]
    fn corrupt_blob_degrades_to_empty() {
        let backend = MemoryBlobStore::new().with_blob(ENTRIES_KEY, "{not json");
        let mut store = EntryStore::new(backend);

        assert!(store.list().unwrap().is_empty());

        let entry = store.create(input("A", "5")).unwrap();
        assert_eq!(store.list().unwrap(), vec![entry]);
    }

    #[test]
    fn reads_legacy_blob_with_null_amount() {
        let raw = r#"[{
            "id": "lx1abc",
            "srNo": 3,
            "date": "2026-09-14",
            "particular": "Bricks",
            "chalanNo": "77",
            "vehicleNo": "KA01AA0001",
            "driverName": "Anil",
            "from": "Hubli",
            "to": "Dharwad",
            "quantity": 4,
            "amount": null,
            "createdAt": "2026-09-14T08:30:00.000Z"
        }]"#;
        let store = EntryStore::new(MemoryBlobStore::new().with_blob(ENTRIES_KEY, raw));

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sr_no, 3);
        assert_eq!(entries[0].amount, None);
        assert_eq!(entries[0].quantity, 4.0);
        assert_eq!(store.get("lx1abc").unwrap(), Some(entries[0].clone()));
    }

    #[test]
    fn negative_sr_no_survives_reload_and_create() {
        let raw = r#"[
            {"id": "a1", "srNo": 1, "date": "2026-09-14", "particular": "Bricks",
             "quantity": 4, "createdAt": "2026-09-14T08:30:00Z"},
            {"id": "a2", "srNo": -3, "date": "2026-09-15", "particular": "Sand",
             "quantity": 2, "createdAt": "2026-09-15T08:30:00Z"}
        ]"#;
        let mut store = EntryStore::new(MemoryBlobStore::new().with_blob(ENTRIES_KEY, raw));
        assert_eq!(store.list().unwrap().len(), 2);

        let created = store
            .create(EntryInput {
                sr_no: "-3".to_string(),
                ..input("A", "10")
            })
            .unwrap();

        assert_eq!(created.sr_no, -3);
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["a1".to_string(), "a2".to_string(), created.id]);
    }

    /// Reads like a memory store but every write fails.
    struct ReadOnlyBlobStore(MemoryBlobStore);

    impl BlobStore for ReadOnlyBlobStore {
        fn get_blob(&self, key: &str) -> Result<Option<String>> {
            self.0.get_blob(key)
        }

        fn set_blob(&mut self, key: &str, _value: &str) -> Result<()> {
            Err(LogisticsError::StorageUnavailable {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn failed_writes_surface_and_leave_collection_unchanged() {
        let mut seed = store();
        let existing = seed.create(input("A", "100")).unwrap();
        let raw = seed.backend().get_blob(ENTRIES_KEY).unwrap().unwrap();
        let mut store = EntryStore::new(ReadOnlyBlobStore(
            MemoryBlobStore::new().with_blob(ENTRIES_KEY, &raw),
        ));

        let err = store.create(input("B", "200")).unwrap_err();
        assert!(matches!(err, LogisticsError::StorageUnavailable { .. }));

        let err = store
            .update(
                &existing.id,
                EntryUpdate {
                    particular: Some("Cement".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LogisticsError::StorageUnavailable { .. }));

        let err = store.delete(&existing.id).unwrap_err();
        assert!(matches!(err, LogisticsError::StorageUnavailable { .. }));

        assert_eq!(store.list().unwrap(), vec![existing]);
    }
}
