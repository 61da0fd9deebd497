use crate::domain::models::{DailyCollection, WeeklyCollection};
use crate::infrastructure::error::TrackerError;
use crate::infrastructure::gist_store::GistStore;
use crate::infrastructure::record_store::RecordStore;
use std::sync::Arc;

/// Outcome of the best-effort remote half of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSync {
    Synced,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub remote: RemoteSync,
}

/// Coordinates the local record store with the optional remote gist.
///
/// Remote is the preferred source of truth on load, but a remote outage
/// or an empty remote document never blocks reading locally cached data.
/// On save, local storage is the durability guarantee: a local failure is
/// fatal to the operation, a remote failure is a non-blocking warning.
pub struct SyncService<G, L>
where
    G: GistStore,
    L: RecordStore,
{
    remote: Option<Arc<G>>,
    local: Arc<L>,
}

impl<G, L> SyncService<G, L>
where
    G: GistStore,
    L: RecordStore,
{
    pub fn local_only(local: Arc<L>) -> Self {
        Self {
            remote: None,
            local,
        }
    }

    pub fn with_remote(remote: Arc<G>, local: Arc<L>) -> Self {
        Self {
            remote: Some(remote),
            local,
        }
    }

    pub async fn load_daily(&self) -> Result<DailyCollection, TrackerError> {
        if let Some(remote) = &self.remote {
            match remote.load_daily().await {
                Ok(Some(collection)) if !collection.is_empty() => {
                    if let Err(error) = self.local.save_daily(&collection) {
                        log::warn!("failed to back up remote daily data locally: {error}");
                    }
                    return Ok(collection);
                }
                Ok(_) => {
                    // An empty remote result is ambiguous between
                    // "genuinely empty" and "not yet populated"; the
                    // local copy wins either way.
                    log::debug!("remote daily document missing or empty, using local copy");
                }
                Err(error) => {
                    log::warn!("remote daily load failed, falling back to local: {error}");
                }
            }
        }
        self.local.load_daily()
    }

    pub async fn load_weekly(&self) -> Result<WeeklyCollection, TrackerError> {
        if let Some(remote) = &self.remote {
            match remote.load_weekly().await {
                Ok(Some(collection)) if !collection.is_empty() => {
                    if let Err(error) = self.local.save_weekly(&collection) {
                        log::warn!("failed to back up remote weekly data locally: {error}");
                    }
                    return Ok(collection);
                }
                Ok(_) => {
                    log::debug!("remote weekly document missing or empty, using local copy");
                }
                Err(error) => {
                    log::warn!("remote weekly load failed, falling back to local: {error}");
                }
            }
        }
        self.local.load_weekly()
    }

    pub async fn save_daily(
        &self,
        collection: &DailyCollection,
    ) -> Result<SaveReport, TrackerError> {
        self.local.save_daily(collection)?;
        let remote = match &self.remote {
            None => RemoteSync::Skipped,
            Some(store) => match store.save_daily(collection).await {
                Ok(()) => RemoteSync::Synced,
                Err(error) => {
                    log::warn!("remote daily save failed, local copy kept: {error}");
                    RemoteSync::Failed(error.to_string())
                }
            },
        };
        Ok(SaveReport { remote })
    }

    pub async fn save_weekly(
        &self,
        collection: &WeeklyCollection,
    ) -> Result<SaveReport, TrackerError> {
        self.local.save_weekly(collection)?;
        let remote = match &self.remote {
            None => RemoteSync::Skipped,
            Some(store) => match store.save_weekly(collection).await {
                Ok(()) => RemoteSync::Synced,
                Err(error) => {
                    log::warn!("remote weekly save failed, local copy kept: {error}");
                    RemoteSync::Failed(error.to_string())
                }
            },
        };
        Ok(SaveReport { remote })
    }
}
