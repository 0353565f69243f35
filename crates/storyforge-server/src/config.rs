//! Environment-driven server configuration.

use std::env;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_PUBLIC_DIR: &str = "public";

/// Everything the server reads from the environment, resolved once at
/// startup. Identity values stay optional so the static host keeps
/// working in a half-configured deploy.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub public_dir: PathBuf,
    pub identity_url: Option<String>,
    pub identity_public_key: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(%raw, default = DEFAULT_PORT, "unparseable PORT, using default");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Self {
            port,
            public_dir,
            identity_url: non_empty_var("IDENTITY_URL"),
            identity_public_key: non_empty_var("IDENTITY_PUBLIC_KEY"),
        }
    }
}

/// Reads an env var, treating empty strings the same as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
