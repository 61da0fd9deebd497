use crate::infrastructure::error::TrackerError;

const GIST_ID_ENV: &str = "GIST_ID";
const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
const KEYRING_SERVICE: &str = "nekocal.sync";
const GIST_ID_ACCOUNT: &str = "gist-id";
const GITHUB_TOKEN_ACCOUNT: &str = "github-token";

/// Credentials for the remote gist container.
///
/// Resolved once at bootstrap and immutable afterwards; either value
/// missing simply disables the remote store.
#[derive(Clone, PartialEq, Eq)]
pub struct GistConfig {
    pub gist_id: String,
    pub token: String,
}

impl std::fmt::Debug for GistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GistConfig")
            .field("gist_id", &self.gist_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Secondary lookup for credentials not present in the environment.
pub trait SecretSource {
    fn get(&self, account: &str) -> Result<Option<String>, TrackerError>;
}

/// OS keyring entries under the `nekocal.sync` service.
#[derive(Debug, Clone, Default)]
pub struct KeyringSecretSource;

impl SecretSource for KeyringSecretSource {
    fn get(&self, account: &str) -> Result<Option<String>, TrackerError> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, account)
            .map_err(|error| TrackerError::Credential(error.to_string()))?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(TrackerError::Credential(error.to_string())),
        }
    }
}

impl GistConfig {
    /// Resolves credentials from the process environment, falling back
    /// to the OS keyring. `None` means remote sync stays disabled.
    pub fn resolve() -> Option<Self> {
        Self::resolve_with(|name| std::env::var(name).ok(), &KeyringSecretSource)
    }

    pub fn resolve_with(
        env: impl Fn(&str) -> Option<String>,
        secrets: &dyn SecretSource,
    ) -> Option<Self> {
        let gist_id = resolve_value(&env, secrets, GIST_ID_ENV, GIST_ID_ACCOUNT)?;
        let token = resolve_value(&env, secrets, GITHUB_TOKEN_ENV, GITHUB_TOKEN_ACCOUNT)?;
        Some(Self { gist_id, token })
    }
}

fn resolve_value(
    env: &impl Fn(&str) -> Option<String>,
    secrets: &dyn SecretSource,
    env_name: &str,
    account: &str,
) -> Option<String> {
    if let Some(value) = env(env_name).map(|value| value.trim().to_string()) {
        if !value.is_empty() {
            return Some(value);
        }
    }
    match secrets.get(account) {
        Ok(value) => value
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
        Err(error) => {
            log::warn!("secret lookup for '{account}' failed, remote sync stays disabled: {error}");
            None
        }
    }
}
