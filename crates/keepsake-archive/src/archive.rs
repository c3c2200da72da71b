//! The [`Archive`]: durable CRUD over journal entries with validation,
//! one-time schema migration, and chronological reads.

use std::sync::{Arc, Mutex};

use keepsake_types::{date_key, Entry, EntryKind, EntryPatch, DEFAULT_DOMINANT_COLOR};

use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, ArchiveResult};
use crate::record::{LegacyRecord, StoredRecord};
use crate::traits::KvStore;

/// Prefix for the current per-entry layout.
const ENTRY_PREFIX: &str = "entry/";
/// Key of the legacy whole-collection blob.
const LEGACY_KEY: &str = "memories";
/// Durable flag marking migration to the current layout as complete.
const SCHEMA_FLAG_KEY: &str = "meta/schema-version";
const SCHEMA_VERSION: &[u8] = b"2";

/// One archive partition: a serialized owner of a journal entry collection.
///
/// All mutations (and the first-access migration) go through a single write
/// guard, so one in-flight mutating operation completes durably before the
/// next is observed. Reads recompute their sorted view from durable state.
pub struct Archive {
    kv: Arc<dyn KvStore>,
    config: ArchiveConfig,
    write_guard: Mutex<()>,
}

impl Archive {
    /// Open an archive over `kv` with the given policy.
    pub fn new(kv: Arc<dyn KvStore>, config: ArchiveConfig) -> Self {
        Self {
            kv,
            config,
            write_guard: Mutex::new(()),
        }
    }

    /// The active validation policy.
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// All entries, chronologically sorted (ascending by date; entries with
    /// unparsable dates sink to the start; insertion order breaks ties).
    ///
    /// Missing defaults are backfilled and persisted as a side effect, so
    /// subsequent reads are migration-free.
    pub fn list(&self) -> ArchiveResult<Vec<Entry>> {
        let _guard = self.write_guard.lock().expect("lock poisoned");
        self.ensure_migrated()?;
        let records = self.load_backfilled()?;
        Ok(sorted_entries(records))
    }

    /// Validate and persist `entry` under its id, overwriting silently if
    /// the id already exists (client retries stay idempotent). Returns the
    /// freshly sorted full list.
    pub fn add(&self, entry: Entry) -> ArchiveResult<Vec<Entry>> {
        self.validate(&entry)?;
        let _guard = self.write_guard.lock().expect("lock poisoned");
        self.ensure_migrated()?;
        let mut records = self.load_backfilled()?;
        let seq = records.iter().map(|r| r.seq).max().unwrap_or(0) + 1;
        let record = StoredRecord { seq, entry };
        self.put_record(&record)?;
        records.retain(|r| r.entry.id != record.entry.id);
        records.push(record);
        Ok(sorted_entries(records))
    }

    /// Merge `patch` over the entry with `id`, field by field, and persist
    /// the result. A missing id is a silent no-op that still returns the
    /// current list, which keeps racing deletes harmless.
    pub fn update(&self, id: &str, patch: &EntryPatch) -> ArchiveResult<Vec<Entry>> {
        let _guard = self.write_guard.lock().expect("lock poisoned");
        self.ensure_migrated()?;
        let mut records = self.load_backfilled()?;
        if let Some(record) = records.iter_mut().find(|r| r.entry.id == id) {
            let mut merged = record.entry.clone();
            patch.apply_to(&mut merged);
            self.validate(&merged)?;
            record.entry = merged;
            let updated = record.clone();
            self.put_record(&updated)?;
        }
        Ok(sorted_entries(records))
    }

    /// Remove the entry with `id` if present; a missing id is a no-op.
    pub fn delete(&self, id: &str) -> ArchiveResult<Vec<Entry>> {
        let _guard = self.write_guard.lock().expect("lock poisoned");
        self.ensure_migrated()?;
        self.kv.delete(&entry_key(id))?;
        let records = self.load_backfilled()?;
        Ok(sorted_entries(records))
    }

    /// Remove every entry unconditionally.
    ///
    /// The explicit confirmation step guarding this lives at the caller
    /// boundary; the archive itself wipes without ceremony. The legacy blob
    /// is wiped too, so a clear before first migration cannot resurrect old
    /// records.
    pub fn clear(&self) -> ArchiveResult<Vec<Entry>> {
        let _guard = self.write_guard.lock().expect("lock poisoned");
        for (key, _) in self.kv.list(ENTRY_PREFIX)? {
            self.kv.delete(&key)?;
        }
        self.kv.delete(LEGACY_KEY)?;
        self.kv.put(SCHEMA_FLAG_KEY, SCHEMA_VERSION)?;
        Ok(Vec::new())
    }

    // -- internals ----------------------------------------------------------

    fn validate(&self, entry: &Entry) -> ArchiveResult<()> {
        if entry.id.trim().is_empty() {
            return Err(ArchiveError::Validation("entry id must not be blank".into()));
        }
        if entry.content.trim().is_empty() {
            return Err(ArchiveError::Validation(
                "entry content must not be blank".into(),
            ));
        }
        if self.config.require_media_for_non_text
            && entry.kind.is_media()
            && !entry.has_media_reference()
        {
            return Err(ArchiveError::Validation(format!(
                "{:?} entries must reference media under the strict policy",
                entry.kind
            )));
        }
        Ok(())
    }

    /// One-time migration to the per-entry layout. Must be called with the
    /// write guard held.
    ///
    /// Interrupt-safe ordering: new-format records first, legacy blob
    /// deletion next, completion flag last. A retry after any interruption
    /// rewrites the same records and converges on the same final state.
    fn ensure_migrated(&self) -> ArchiveResult<()> {
        if self.kv.get(SCHEMA_FLAG_KEY)?.is_some() {
            return Ok(());
        }
        if let Some(blob) = self.kv.get(LEGACY_KEY)? {
            let legacy: Vec<LegacyRecord> = serde_json::from_slice(&blob)?;
            tracing::info!(records = legacy.len(), "migrating legacy journal blob");
            let today = today();
            for (index, legacy_record) in legacy.into_iter().enumerate() {
                let record = StoredRecord {
                    seq: index as u64 + 1,
                    entry: legacy_record.into_entry(&today),
                };
                self.put_record(&record)?;
            }
            self.kv.delete(LEGACY_KEY)?;
        } else if self.config.seed_demo_entries && self.kv.list(ENTRY_PREFIX)?.is_empty() {
            tracing::debug!("seeding demo entries into empty archive");
            for (index, entry) in demo_entries().into_iter().enumerate() {
                self.put_record(&StoredRecord {
                    seq: index as u64 + 1,
                    entry,
                })?;
            }
        }
        self.kv.put(SCHEMA_FLAG_KEY, SCHEMA_VERSION)?;
        Ok(())
    }

    /// Load all records, backfilling missing `date` (today) and missing
    /// `dominantColor` on non-text entries. Backfilled records are
    /// persisted immediately.
    fn load_backfilled(&self) -> ArchiveResult<Vec<StoredRecord>> {
        let today = today();
        let mut records = Vec::new();
        for (key, value) in self.kv.list(ENTRY_PREFIX)? {
            let mut record: StoredRecord = serde_json::from_slice(&value).map_err(|err| {
                ArchiveError::Serialization(format!("corrupt record at {key}: {err}"))
            })?;
            let mut changed = false;
            if record.entry.date.trim().is_empty() {
                record.entry.date = today.clone();
                changed = true;
            }
            if record.entry.kind.is_media() && record.entry.dominant_color.is_none() {
                record.entry.dominant_color = Some(DEFAULT_DOMINANT_COLOR.to_string());
                changed = true;
            }
            if changed {
                self.put_record(&record)?;
            }
            records.push(record);
        }
        Ok(records)
    }

    fn put_record(&self, record: &StoredRecord) -> ArchiveResult<()> {
        let bytes = serde_json::to_vec(record)?;
        self.kv.put(&entry_key(&record.entry.id), &bytes)
    }
}

fn entry_key(id: &str) -> String {
    format!("{ENTRY_PREFIX}{id}")
}

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Sort records chronologically and strip the storage envelope.
fn sorted_entries(mut records: Vec<StoredRecord>) -> Vec<Entry> {
    records.sort_by_key(|r| (date_key(&r.entry.date), r.seq));
    records.into_iter().map(|r| r.entry).collect()
}

/// Demonstration entries for brand-new archives.
fn demo_entries() -> Vec<Entry> {
    vec![
        Entry::new(
            "demo-1",
            "The day the archive began. Everything after this is ours to keep.",
            "2023-09-02",
            EntryKind::Text,
        ),
        Entry::new(
            "demo-2",
            "Watched the sunset from the pier and decided to start writing things down.",
            "2023-09-15",
            EntryKind::Text,
        ),
        Entry::new(
            "demo-3",
            "First photograph in the journal.",
            "2023-10-10",
            EntryKind::Image,
        )
        .with_media_url("https://images.unsplash.com/photo-1518133910546-b6c2fb7d79e3?w=800"),
    ]
}
