pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::bootstrap::bootstrap_tracker;
pub use application::summary::{DailyMetric, TrendPoint, WeeklyMetric};
pub use application::sync::{RemoteSync, SaveReport, SyncService};
pub use domain::catalog::{DailyActivity, MOOD_SCALE, WeeklyActivity, mood_label};
pub use domain::models::{
    ActivityValue, DailyCollection, DailyRecord, WeeklyCollection, WeeklyRecord,
};
pub use infrastructure::error::TrackerError;
pub use infrastructure::gist_store::{GistStore, ReqwestGistStore};
pub use infrastructure::record_store::{
    Document, FsRecordStore, InMemoryRecordStore, RecordStore,
};
pub use infrastructure::remote_config::GistConfig;
