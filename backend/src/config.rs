use clap::Parser;
use std::path::PathBuf;

use crate::storage::connection::{DATABASE_URL, DEFAULT_MAX_CONNECTIONS};

/// Runtime configuration, read from flags or the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "portfolio-analytics")]
#[command(about = "Account officer portfolio dashboard API")]
pub struct Config {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = DATABASE_URL)]
    pub database_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind_addr: String,

    /// CORS origin allowed to call the API ("*" for any)
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "*")]
    pub allowed_origin: String,

    /// Directory holding clients.csv and loan_accounts.csv to load at startup
    #[arg(long, env = "SEED_DIR")]
    pub seed_dir: Option<PathBuf>,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}
