//! Selection-result notifications.
//!
//! Notifications are best-effort: [`dispatch`] hands the message to the blocking pool and
//! returns immediately. Failures are logged and never reach the request that triggered them.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::types::RegistrationStatus;

const LOOKUP_PATH: &str = "/cek-pengumuman-standalone";

/// A rendered "hasil seleksi" message for one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEmail {
    pub to: String,
    pub name: Option<String>,
    pub status: RegistrationStatus,
    pub registration_number: String,
    pub program: String,
    /// Public app base URL, used to build the lookup link.
    pub public_url: Option<String>,
}

impl SelectionEmail {
    fn status_text(&self) -> &'static str {
        match self.status {
            RegistrationStatus::Diterima => "LULUS",
            _ => "TIDAK LULUS",
        }
    }

    #[must_use]
    pub fn subject(&self) -> String {
        format!("Hasil Seleksi SNBP: {}", self.status_text())
    }

    #[must_use]
    pub fn lookup_link(&self) -> Option<String> {
        self.public_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| format!("{}{LOOKUP_PATH}", url.trim_end_matches('/')))
    }

    /// Plain-text body.
    #[must_use]
    pub fn body(&self) -> String {
        let greeting = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.to);

        let mut lines = vec![
            format!("Halo {greeting},"),
            String::new(),
            "Hasil seleksi SNBP Anda telah tersedia.".to_string(),
            format!("Status: {}", self.status_text()),
            format!("Nomor Pendaftaran: {}", self.registration_number),
            format!("Program Studi: {}", self.program),
        ];

        if let Some(link) = self.lookup_link() {
            lines.push(String::new());
            lines.push(format!("Cek juga melalui web: {link}"));
        }

        lines.join("\n")
    }
}

pub trait Notifier: Send + Sync {
    fn send(&self, email: &SelectionEmail) -> Result<()>;
}

/// Logs the message instead of delivering it.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, email: &SelectionEmail) -> Result<()> {
        tracing::info!(
            to = %email.to,
            status = %email.status,
            nomor = %email.registration_number,
            "selection email (not delivered): {}",
            email.subject()
        );
        Ok(())
    }
}

/// Writes each message as an `.eml` text file into a directory, for pickup by a mail relay.
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, email: &SelectionEmail) -> Result<()> {
        let now = Utc::now();
        let file_name = format!(
            "{}-{}-{}.eml",
            now.format("%Y%m%dT%H%M%S%.f"),
            email.registration_number,
            email.status.as_str().to_lowercase()
        );
        let path = self.dir.join(file_name);

        let message = format!(
            "To: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            email.to,
            email.subject(),
            now.to_rfc2822(),
            email.body().replace('\n', "\r\n")
        );
        fs::write(&path, message)?;

        tracing::info!("Queued selection email to={} at {}", email.to, path.display());
        Ok(())
    }
}

/// Sends without waiting. The returned handle is only useful to tests.
pub fn dispatch(notifier: Arc<dyn Notifier>, email: SelectionEmail) -> tokio::task::JoinHandle<()> {
    tracing::info!(
        "Trigger selection email to={} status={} nomor={}",
        email.to,
        email.status,
        email.registration_number
    );

    tokio::task::spawn_blocking(move || {
        if let Err(e) = notifier.send(&email) {
            tracing::warn!("Failed to send selection email to {}: {e}", email.to);
        }
    })
}
