use crate::application::sync::SyncService;
use crate::infrastructure::error::TrackerError;
use crate::infrastructure::gist_store::ReqwestGistStore;
use crate::infrastructure::record_store::FsRecordStore;
use crate::infrastructure::remote_config::GistConfig;
use std::path::Path;
use std::sync::Arc;

/// Wires up the tracker: local store over `data_dir` (created if
/// absent), remote gist attached when credentials resolve.
pub fn bootstrap_tracker(
    data_dir: impl AsRef<Path>,
) -> Result<SyncService<ReqwestGistStore, FsRecordStore>, TrackerError> {
    let local = Arc::new(FsRecordStore::new(data_dir)?);
    match GistConfig::resolve() {
        Some(config) => {
            let remote = Arc::new(ReqwestGistStore::new(config)?);
            Ok(SyncService::with_remote(remote, local))
        }
        None => {
            log::info!("remote sync is not configured, using local storage only");
            Ok(SyncService::local_only(local))
        }
    }
}
