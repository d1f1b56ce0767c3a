use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

pub const DB_FILE_NAME: &str = "snbp.db";
pub const SESSION_SECRET_FILE: &str = ".session_secret";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 120;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Secret used to sign session tokens. Falls back to the secret file written by `admin init`.
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: i64,
    /// Public URL of the student-facing app, used for links in notification messages.
    pub public_url: Option<String>,
    /// Directory that receives one file per outgoing notification. Tracing-only when unset.
    pub mail_outbox: Option<PathBuf>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    #[must_use]
    pub fn secret_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_SECRET_FILE)
    }

    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.token_ttl_minutes)
    }

    /// Resolves the signing secret: explicit value first, then the initialized secret file.
    pub fn resolve_secret(&self) -> crate::error::Result<String> {
        if let Some(secret) = self.jwt_secret.as_ref().filter(|s| !s.trim().is_empty()) {
            return Ok(secret.clone());
        }

        let path = self.secret_path();
        let secret = std::fs::read_to_string(&path).map_err(|_| {
            crate::error::Error::Config(format!(
                "session secret not found at {}; run 'snbp admin init' or pass --jwt-secret",
                path.display()
            ))
        })?;

        let secret = secret.trim().to_string();
        if secret.is_empty() {
            return Err(crate::error::Error::Config(format!(
                "session secret file {} is empty",
                path.display()
            )));
        }
        Ok(secret)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            data_dir: PathBuf::from("./data"),
            jwt_secret: None,
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            public_url: None,
            mail_outbox: None,
        }
    }
}
