use crate::domain::models::{DailyCollection, WeeklyCollection};
use crate::infrastructure::error::TrackerError;
use crate::infrastructure::record_store::Document;
use crate::infrastructure::remote_config::GistConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

const GIST_API_BASE: &str = "https://api.github.com/gists/";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("nekocal/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote persistence inside one multi-file gist container.
///
/// `Ok(None)` from a load means the named file is missing from the
/// container, which is distinct from a present-but-empty collection.
#[async_trait]
pub trait GistStore: Send + Sync {
    async fn load_daily(&self) -> Result<Option<DailyCollection>, TrackerError>;
    async fn save_daily(&self, collection: &DailyCollection) -> Result<(), TrackerError>;
    async fn load_weekly(&self) -> Result<Option<WeeklyCollection>, TrackerError>;
    async fn save_weekly(&self, collection: &WeeklyCollection) -> Result<(), TrackerError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGistStore {
    client: Client,
    config: GistConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct GistPayload {
    #[serde(default)]
    files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct GistFile {
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Serialize)]
struct GistUpdateRequest {
    files: BTreeMap<String, GistFilePatch>,
}

#[derive(Debug, Serialize)]
struct GistFilePatch {
    content: String,
}

impl ReqwestGistStore {
    pub fn new(config: GistConfig) -> Result<Self, TrackerError> {
        if config.gist_id.trim().is_empty() {
            return Err(TrackerError::NotConfigured("gist id is empty".to_string()));
        }
        if config.token.trim().is_empty() {
            return Err(TrackerError::NotConfigured(
                "github token is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| {
                TrackerError::RemoteUnavailable(format!("failed to build http client: {error}"))
            })?;
        Ok(Self { client, config })
    }

    fn gist_endpoint(&self) -> Result<Url, TrackerError> {
        let mut url = Url::parse(GIST_API_BASE).map_err(|error| {
            TrackerError::RemoteUnavailable(format!("invalid gist api base url: {error}"))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                TrackerError::RemoteUnavailable("gist api base URL cannot be a base".to_string())
            })?;
            segments.push(&self.config.gist_id);
        }
        Ok(url)
    }

    fn remote_http_error(status: reqwest::StatusCode, body: &str) -> TrackerError {
        let message = if body.trim().is_empty() {
            format!("gist api error: http {}", status.as_u16())
        } else {
            format!("gist api error: http {}; body={body}", status.as_u16())
        };
        TrackerError::RemoteUnavailable(message)
    }

    async fn fetch_container(&self) -> Result<GistPayload, TrackerError> {
        let endpoint = self.gist_endpoint()?;
        let response = self
            .client
            .get(endpoint)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|error| {
                TrackerError::RemoteUnavailable(format!(
                    "network error while fetching gist: {error}"
                ))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            TrackerError::RemoteUnavailable(format!("failed reading gist response: {error}"))
        })?;

        if !status.is_success() {
            return Err(Self::remote_http_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|error| {
            TrackerError::RemoteUnavailable(format!("invalid gist payload: {error}"))
        })
    }

    async fn load_document<D>(&self, document: Document) -> Result<Option<D>, TrackerError>
    where
        D: DeserializeOwned,
    {
        let container = self.fetch_container().await?;
        let Some(file) = container.files.get(document.file_name()) else {
            return Ok(None);
        };
        let content = file_content(document.file_name(), file)?;

        serde_json::from_str(content)
            .map(Some)
            .map_err(|error| {
                TrackerError::RemoteUnavailable(format!(
                    "invalid content in gist file {}: {error}",
                    document.file_name()
                ))
            })
    }

    async fn save_document<D>(&self, document: Document, collection: &D) -> Result<(), TrackerError>
    where
        D: Serialize,
    {
        let content = serde_json::to_string_pretty(collection).map_err(|error| {
            TrackerError::RemoteUnavailable(format!(
                "failed to serialize {}: {error}",
                document.file_name()
            ))
        })?;

        // One PATCH carries the full file map, so the update either
        // applies as a whole or leaves the container unchanged.
        let container = self.fetch_container().await?;
        let update = build_update_request(&container, document.file_name(), content)?;

        let endpoint = self.gist_endpoint()?;
        let response = self
            .client
            .patch(endpoint)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .json(&update)
            .send()
            .await
            .map_err(|error| {
                TrackerError::RemoteUnavailable(format!(
                    "network error while updating gist: {error}"
                ))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            TrackerError::RemoteUnavailable(format!("failed reading gist update response: {error}"))
        })?;

        if !status.is_success() {
            return Err(Self::remote_http_error(status, &body));
        }
        Ok(())
    }
}

fn file_content<'a>(name: &str, file: &'a GistFile) -> Result<&'a str, TrackerError> {
    if file.truncated {
        return Err(TrackerError::RemoteUnavailable(format!(
            "gist file {name} is truncated in the api payload"
        )));
    }
    file.content.as_deref().ok_or_else(|| {
        TrackerError::RemoteUnavailable(format!("gist file {name} has no content in the payload"))
    })
}

/// Builds the PATCH body: the named file replaced, every sibling file
/// re-submitted verbatim so an update can never drop unrelated files.
fn build_update_request(
    container: &GistPayload,
    file_name: &str,
    content: String,
) -> Result<GistUpdateRequest, TrackerError> {
    let mut files = BTreeMap::new();
    for (name, file) in &container.files {
        if name == file_name {
            continue;
        }
        files.insert(
            name.clone(),
            GistFilePatch {
                content: file_content(name, file)?.to_string(),
            },
        );
    }
    files.insert(file_name.to_string(), GistFilePatch { content });
    Ok(GistUpdateRequest { files })
}

#[async_trait]
impl GistStore for ReqwestGistStore {
    async fn load_daily(&self) -> Result<Option<DailyCollection>, TrackerError> {
        self.load_document(Document::Daily).await
    }

    async fn save_daily(&self, collection: &DailyCollection) -> Result<(), TrackerError> {
        self.save_document(Document::Daily, collection).await
    }

    async fn load_weekly(&self) -> Result<Option<WeeklyCollection>, TrackerError> {
        self.load_document(Document::Weekly).await
    }

    async fn save_weekly(&self, collection: &WeeklyCollection) -> Result<(), TrackerError> {
        self.save_document(Document::Weekly, collection).await
    }
}
