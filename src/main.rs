use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use snbp::auth::SessionKeys;
use snbp::cli::{
    AdminCommands, ProgramCommands, UserCommands, run_info, run_init, run_program_import,
    run_user_add, run_user_list,
};
use snbp::config::{DEFAULT_TOKEN_TTL_MINUTES, ServerConfig};
use snbp::notify::{LogNotifier, Notifier, OutboxNotifier};
use snbp::server::{AppState, create_router};
use snbp::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "snbp")]
#[command(about = "School portal for the SNBP admission track", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, env = "SNBP_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, env = "SNBP_PORT", default_value = "4000")]
        port: u16,

        /// Data directory for the database and session secret
        #[arg(long, env = "SNBP_DATA_DIR", default_value = "./data")]
        data_dir: String,

        /// Secret for signing session tokens. Defaults to the secret written by `admin init`.
        #[arg(long, env = "SNBP_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,

        /// Session token lifetime in minutes
        #[arg(long, env = "SNBP_TOKEN_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)]
        token_ttl_minutes: i64,

        /// Public URL of the student app (e.g., "https://snbp.sekolah.sch.id").
        /// Used for the result-lookup link in notification emails.
        #[arg(long, env = "SNBP_PUBLIC_URL")]
        public_url: Option<String>,

        /// Directory that receives outgoing notification emails as .eml files.
        /// If not set, notifications are only logged.
        #[arg(long, env = "SNBP_MAIL_OUTBOX")]
        mail_outbox: Option<PathBuf>,
    },
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    if config.token_ttl_minutes <= 0 {
        bail!("--token-ttl-minutes must be positive");
    }

    if !config.db_path().exists() {
        bail!("Server not initialized. Run 'snbp admin init' first to create the database.");
    }

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;
    if !store.has_admin()? {
        bail!("Server not initialized. Run 'snbp admin init' first to create the first admin.");
    }

    let secret = config.resolve_secret()?;
    let sessions = SessionKeys::new(&secret, config.token_ttl());

    let notifier: Arc<dyn Notifier> = match &config.mail_outbox {
        Some(dir) => {
            info!("Writing notification emails to {}", dir.display());
            Arc::new(OutboxNotifier::new(dir.clone())?)
        }
        None => Arc::new(LogNotifier),
    };

    let state = Arc::new(
        AppState::new(Arc::new(store), sessions, notifier)
            .with_public_url(config.public_url.clone()),
    );

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("snbp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                admin_email,
                admin_password,
            } => run_init(data_dir, admin_email, admin_password)?,
            AdminCommands::User { command } => match command {
                UserCommands::Add {
                    data_dir,
                    email,
                    role,
                    password,
                } => run_user_add(data_dir, email, role, password)?,
                UserCommands::List { data_dir, json } => run_user_list(data_dir, json)?,
            },
            AdminCommands::Program { command } => match command {
                ProgramCommands::Import { data_dir, file } => {
                    run_program_import(data_dir, &file)?;
                }
            },
            AdminCommands::Info { data_dir, json } => run_info(data_dir, json)?,
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            jwt_secret,
            token_ttl_minutes,
            public_url,
            mail_outbox,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                jwt_secret,
                token_ttl_minutes,
                public_url,
                mail_outbox,
            };
            serve(config).await?;
        }
    }

    Ok(())
}
