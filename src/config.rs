use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Default database used when nothing is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://userbase.db?mode=rwc";

/// Default directory the avatar blobs are written below.
pub const DEFAULT_MEDIA_ROOT: &str = "media";

/// Application settings.
///
/// Layered from defaults, a `.env` file and `USERBASE_*` environment variables
/// (`USERBASE_DATABASE_URL`, `USERBASE_MEDIA_ROOT`). Command line flags override these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub media_root: PathBuf,
}

impl Settings {
    /// Load settings from the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env_source(config::Environment::with_prefix("USERBASE"))
    }

    fn from_env_source(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("media_root", DEFAULT_MEDIA_ROOT)?
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Apply command line overrides.
    pub fn with_overrides(mut self, database_url: Option<String>, media_root: Option<PathBuf>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(media_root) = media_root {
            self.media_root = media_root;
        }
        self
    }
}
