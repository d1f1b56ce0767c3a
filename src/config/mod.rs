mod server;

pub use server::{DB_FILE_NAME, DEFAULT_TOKEN_TTL_MINUTES, SESSION_SECRET_FILE, ServerConfig};
