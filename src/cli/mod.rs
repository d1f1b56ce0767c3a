mod commands;
mod info;
mod init;
mod program;
mod user;

pub use commands::{AdminCommands, ProgramCommands, UserCommands};
pub use info::run_info;
pub use init::run_init;
pub use program::run_program_import;
pub use user::{run_user_add, run_user_list};

use crate::config::DB_FILE_NAME;
use crate::server::validation::{normalize_email, validate_email};
use crate::store::SqliteStore;

/// Initialize store from data directory, checking it exists
pub fn init_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let data_path: std::path::PathBuf = data_dir.into();
    let db_path = data_path.join(DB_FILE_NAME);

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'snbp admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}

/// Normalized, validated account email.
fn account_email(raw: &str) -> anyhow::Result<String> {
    let email = normalize_email(raw);
    validate_email(&email).map_err(|e| anyhow::anyhow!(e.message))?;
    Ok(email)
}
