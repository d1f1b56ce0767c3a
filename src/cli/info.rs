use serde::Serialize;

use crate::store::{RegistrationFilter, Store};
use crate::types::{RegistrationStatus, Role};

use super::init_store;

#[derive(Serialize)]
struct RoleCount {
    role: Role,
    count: usize,
}

#[derive(Serialize)]
struct StatusCount {
    status: RegistrationStatus,
    count: usize,
}

#[derive(Serialize)]
struct ServerInfo {
    users: Vec<RoleCount>,
    student_profiles: usize,
    registrations: Vec<StatusCount>,
    sent_to_principal: usize,
    universities: usize,
    programs: usize,
}

pub fn run_info(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let users = store.list_users()?;
    let profiles = store.list_profiles()?;
    let registrations = store.list_registrations(RegistrationFilter::All)?;
    let universities = store.list_universities()?;
    let programs = store.list_programs(None)?;

    let info = ServerInfo {
        users: Role::ALL
            .into_iter()
            .map(|role| RoleCount {
                role,
                count: users.iter().filter(|u| u.role == role).count(),
            })
            .collect(),
        student_profiles: profiles.len(),
        registrations: RegistrationStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: registrations.iter().filter(|r| r.status == status).count(),
            })
            .collect(),
        sent_to_principal: registrations.iter().filter(|r| r.sent_to_principal).count(),
        universities: universities.len(),
        programs: programs.len(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!();
    println!("SNBP Server Status");
    println!("{}", "─".repeat(18));
    println!("Accounts:");
    for entry in &info.users {
        println!("  {:<15} {}", entry.role.as_str(), entry.count);
    }
    println!("Student profiles:  {}", info.student_profiles);
    println!("Registrations:");
    for entry in &info.registrations {
        println!("  {:<15} {}", entry.status.as_str(), entry.count);
    }
    println!("Sent to principal: {}", info.sent_to_principal);
    println!(
        "Programs:          {} ({} universities)",
        info.programs, info.universities
    );
    println!();

    Ok(())
}
