use std::fs;
use std::path::{Path, PathBuf};

use anyhow::bail;
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::auth::{PasswordHasher, validate_password};
use crate::config::{DB_FILE_NAME, SESSION_SECRET_FILE};
use crate::store::{SqliteStore, Store};
use crate::types::Role;

use super::account_email;

const SECRET_LEN: usize = 64;

#[cfg(unix)]
fn set_restrictive_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
fn set_restrictive_permissions(_path: &Path) {}

fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

pub fn run_init(data_dir: String, admin_email: String, admin_password: String) -> anyhow::Result<()> {
    let email = account_email(&admin_email)?;
    validate_password(&admin_password).map_err(anyhow::Error::msg)?;

    let data_path: PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let store = SqliteStore::new(data_path.join(DB_FILE_NAME))?;
    store.initialize()?;

    let secret_file = data_path.join(SESSION_SECRET_FILE);

    if store.has_admin()? {
        bail!(
            "Server already initialized. Session secret exists at: {}",
            secret_file.display()
        );
    }

    let hash = PasswordHasher::new().hash(&admin_password)?;
    let admin = store.create_user(&email, &hash, Role::Admin)?;

    if !secret_file.exists() {
        fs::write(&secret_file, generate_secret())?;
        set_restrictive_permissions(&secret_file);
    }

    tracing::info!(user_id = admin.id, "created first admin");

    println!();
    println!("========================================");
    println!("SNBP server initialized");
    println!();
    println!("  Admin:          {}", admin.email);
    println!("  Database:       {}", data_path.join(DB_FILE_NAME).display());
    println!("  Session secret: {}", secret_file.display());
    println!();
    println!("========================================");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secret_is_alphanumeric() {
        let secret = generate_secret();
        assert_eq!(secret.len(), SECRET_LEN);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_secret());
    }
}
