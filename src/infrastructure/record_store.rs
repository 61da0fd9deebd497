use crate::domain::models::{DailyCollection, WeeklyCollection};
use crate::infrastructure::error::TrackerError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The two persisted documents of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    Daily,
    Weekly,
}

impl Document {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Daily => "daily_data.json",
            Self::Weekly => "weekly_data.json",
        }
    }
}

/// Local persistence for the two record collections.
///
/// Loads never fail: an absent document yields an empty collection, and
/// an unreadable or corrupt document resets that document's view to
/// empty with a warning. Saves surface failures to the caller.
pub trait RecordStore: Send + Sync {
    fn load_daily(&self) -> Result<DailyCollection, TrackerError>;
    fn save_daily(&self, collection: &DailyCollection) -> Result<(), TrackerError>;
    fn load_weekly(&self) -> Result<WeeklyCollection, TrackerError>;
    fn save_weekly(&self, collection: &WeeklyCollection) -> Result<(), TrackerError>;
}

#[derive(Debug, Clone)]
pub struct FsRecordStore {
    data_dir: PathBuf,
}

impl FsRecordStore {
    /// Opens the store, creating the data directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|error| {
            TrackerError::Persistence(format!(
                "failed to create data directory {}: {error}",
                data_dir.display()
            ))
        })?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn document_path(&self, document: Document) -> PathBuf {
        self.data_dir.join(document.file_name())
    }

    fn load_document<D>(&self, document: Document) -> D
    where
        D: DeserializeOwned + Default,
    {
        let path = self.document_path(document);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return D::default();
            }
            Err(error) => {
                log::warn!(
                    "failed to read {}, treating document as empty: {error}",
                    path.display()
                );
                return D::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(collection) => collection,
            Err(error) => {
                // Corrupt document resets to empty; distinct from the
                // silent absent-file path so the data loss is visible.
                log::warn!(
                    "{} is corrupt, resetting document view to empty: {error}",
                    path.display()
                );
                D::default()
            }
        }
    }

    fn save_document<D>(&self, document: Document, collection: &D) -> Result<(), TrackerError>
    where
        D: Serialize,
    {
        fs::create_dir_all(&self.data_dir).map_err(|error| {
            TrackerError::Persistence(format!(
                "failed to create data directory {}: {error}",
                self.data_dir.display()
            ))
        })?;

        let path = self.document_path(document);
        let formatted = serde_json::to_string_pretty(collection).map_err(|error| {
            TrackerError::Persistence(format!(
                "failed to serialize {}: {error}",
                document.file_name()
            ))
        })?;

        // Write to a sibling temp file and rename, so a half-written
        // file can never be the on-disk state.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, format!("{formatted}\n")).map_err(|error| {
            TrackerError::Persistence(format!(
                "failed to write {}: {error}",
                temp_path.display()
            ))
        })?;
        fs::rename(&temp_path, &path).map_err(|error| {
            TrackerError::Persistence(format!(
                "failed to replace {}: {error}",
                path.display()
            ))
        })
    }
}

impl RecordStore for FsRecordStore {
    fn load_daily(&self) -> Result<DailyCollection, TrackerError> {
        Ok(self.load_document(Document::Daily))
    }

    fn save_daily(&self, collection: &DailyCollection) -> Result<(), TrackerError> {
        self.save_document(Document::Daily, collection)
    }

    fn load_weekly(&self) -> Result<WeeklyCollection, TrackerError> {
        Ok(self.load_document(Document::Weekly))
    }

    fn save_weekly(&self, collection: &WeeklyCollection) -> Result<(), TrackerError> {
        self.save_document(Document::Weekly, collection)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    daily: Mutex<DailyCollection>,
    weekly: Mutex<WeeklyCollection>,
}

impl RecordStore for InMemoryRecordStore {
    fn load_daily(&self) -> Result<DailyCollection, TrackerError> {
        let daily = self
            .daily
            .lock()
            .map_err(|error| TrackerError::Persistence(format!("daily lock poisoned: {error}")))?;
        Ok(daily.clone())
    }

    fn save_daily(&self, collection: &DailyCollection) -> Result<(), TrackerError> {
        let mut daily = self
            .daily
            .lock()
            .map_err(|error| TrackerError::Persistence(format!("daily lock poisoned: {error}")))?;
        *daily = collection.clone();
        Ok(())
    }

    fn load_weekly(&self) -> Result<WeeklyCollection, TrackerError> {
        let weekly = self
            .weekly
            .lock()
            .map_err(|error| TrackerError::Persistence(format!("weekly lock poisoned: {error}")))?;
        Ok(weekly.clone())
    }

    fn save_weekly(&self, collection: &WeeklyCollection) -> Result<(), TrackerError> {
        let mut weekly = self
            .weekly
            .lock()
            .map_err(|error| TrackerError::Persistence(format!("weekly lock poisoned: {error}")))?;
        *weekly = collection.clone();
        Ok(())
    }
}
