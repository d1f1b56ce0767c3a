use anyhow::bail;
use serde::Serialize;

use crate::auth::{PasswordHasher, validate_password};
use crate::error::Error;
use crate::store::Store;
use crate::types::Role;

use super::{account_email, init_store};

#[derive(Serialize)]
struct UserOutput {
    id: i64,
    email: String,
    role: Role,
    created_at: String,
}

pub fn run_user_add(
    data_dir: String,
    email: String,
    role: String,
    password: String,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let email = account_email(&email)?;
    let Some(role) = Role::parse(&role.trim().to_ascii_uppercase()) else {
        let names: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        bail!("Role must be one of {}", names.join(", "));
    };
    validate_password(&password).map_err(anyhow::Error::msg)?;

    let hash = PasswordHasher::new().hash(&password)?;
    let user = match store.create_user(&email, &hash, role) {
        Ok(user) => user,
        Err(Error::AlreadyExists) => bail!("An account with email '{email}' already exists"),
        Err(e) => return Err(e.into()),
    };

    println!("Created {} account '{}' (id {})", user.role, user.email, user.id);
    Ok(())
}

pub fn run_user_list(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let users = store.list_users()?;

    if json {
        let output: Vec<UserOutput> = users
            .into_iter()
            .map(|u| UserOutput {
                id: u.id,
                email: u.email,
                role: u.role,
                created_at: u.created_at.to_rfc3339(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No accounts.");
        return Ok(());
    }

    for user in users {
        println!("{:>5}  {:<15} {}", user.id, user.role.as_str(), user.email);
    }
    Ok(())
}
