use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the server (create database, session secret and first admin)
    Init {
        /// Data directory for the database and session secret
        #[arg(long, env = "SNBP_DATA_DIR", default_value = "./data")]
        data_dir: String,

        /// Email of the first admin account
        #[arg(long, env = "SNBP_ADMIN_EMAIL")]
        admin_email: String,

        /// Password of the first admin account
        #[arg(long, env = "SNBP_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: String,
    },

    /// Manage accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage university programs
    Program {
        #[command(subcommand)]
        command: ProgramCommands,
    },

    /// Show server status information
    Info {
        /// Data directory for the database
        #[arg(long, env = "SNBP_DATA_DIR", default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add an account with the given role
    Add {
        /// Data directory for the database
        #[arg(long, env = "SNBP_DATA_DIR", default_value = "./data")]
        data_dir: String,

        /// Login email
        #[arg(long)]
        email: String,

        /// One of SISWA, GURU_BK, KEPALA_SEKOLAH, ADMIN
        #[arg(long)]
        role: String,

        /// Initial password
        #[arg(long)]
        password: String,
    },

    /// List accounts
    List {
        /// Data directory for the database
        #[arg(long, env = "SNBP_DATA_DIR", default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ProgramCommands {
    /// Import programs from a CSV file with `universitas,prodi` columns
    Import {
        /// Data directory for the database
        #[arg(long, env = "SNBP_DATA_DIR", default_value = "./data")]
        data_dir: String,

        /// CSV file to import
        #[arg(long)]
        file: PathBuf,
    },
}
