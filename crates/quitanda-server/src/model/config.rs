//! Configuration management for the Quitanda server
//!
//! Layered configuration: `conf/application.yml`, environment variables
//! with the `QUITANDA` prefix, and CLI overrides.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use quitanda_payment::DEFAULT_FAILURE_AMOUNT;

use crate::startup::logging::LoggingConfig;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_METRICS_PORT: u16 = 9000;
const DEFAULT_DB_URL: &str = "sqlite::memory:";

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command()]
struct Cli {
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> Self {
        let args = Cli::parse();
        let config_file = args
            .config_file
            .unwrap_or_else(|| "conf/application.yml".to_string());

        let mut config_builder = Config::builder()
            .add_source(
                Environment::with_prefix("quitanda")
                    .separator(".")
                    .try_parsing(true),
            )
            .add_source(config::File::with_name(&config_file).required(false));

        if let Some(v) = args.database_url {
            config_builder = config_builder
                .set_override("db.url", v)
                .expect("Failed to set database URL override");
        }
        if let Some(v) = args.port {
            config_builder = config_builder
                .set_override("server.port", i64::from(v))
                .expect("Failed to set server port override");
        }

        let app_config = config_builder
            .build()
            .expect("Failed to build configuration - check conf/application.yml");

        Configuration { config: app_config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .unwrap_or(DEFAULT_SERVER_PORT.into()) as u16
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn db_url(&self) -> String {
        self.config
            .get_string("db.url")
            .unwrap_or(DEFAULT_DB_URL.to_string())
    }

    pub fn db_auto_migrate(&self) -> bool {
        self.config.get_bool("db.auto-migrate").unwrap_or(true)
    }

    pub async fn database_connection(
        &self,
    ) -> std::result::Result<DatabaseConnection, Box<dyn std::error::Error>> {
        let url = self.db_url();

        let mut max_connections = self
            .config
            .get_int("db.pool.config.maximumPoolSize")
            .unwrap_or(100) as u32;
        let mut min_connections = self
            .config
            .get_int("db.pool.config.minimumPoolSize")
            .unwrap_or(1) as u32;
        let connect_timeout = self
            .config
            .get_int("db.pool.config.connectionTimeout")
            .unwrap_or(30) as u64;
        let acquire_timeout = self
            .config
            .get_int("db.pool.config.initializationFailTimeout")
            .unwrap_or(8) as u64;
        let idle_timeout = self
            .config
            .get_int("db.pool.config.idleTimeout")
            .unwrap_or(10) as u64;
        let max_lifetime = self
            .config
            .get_int("db.pool.config.maxLifetime")
            .unwrap_or(1800) as u64;
        let sqlx_logging = self
            .config
            .get_bool("db.pool.config.sqlxLogging")
            .unwrap_or(false);

        // A pooled in-memory SQLite URL would give every pool connection its
        // own empty database; pin the pool to a single connection.
        if url.contains(":memory:") {
            max_connections = 1;
            min_connections = 1;
        }

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections,
            min_connections,
            connect_timeout,
            idle_timeout,
            max_lifetime,
            sqlx_logging,
            "Database connection pool configured"
        );

        let database_connection: DatabaseConnection = Database::connect(opt).await?;

        Ok(database_connection)
    }

    // ========================================================================
    // Outbox Configuration
    // ========================================================================

    pub fn outbox_poll_interval(&self) -> Duration {
        let millis = self
            .config
            .get_int("outbox.poll-interval-ms")
            .unwrap_or(200) as u64;
        Duration::from_millis(millis)
    }

    pub fn outbox_batch_size(&self) -> u64 {
        self.config.get_int("outbox.batch-size").unwrap_or(50) as u64
    }

    pub fn outbox_retry_max_attempts(&self) -> u32 {
        self.config
            .get_int("outbox.retry.max-attempts")
            .unwrap_or(3) as u32
    }

    pub fn outbox_retry_backoff(&self) -> Duration {
        let millis = self
            .config
            .get_int("outbox.retry.backoff-ms")
            .unwrap_or(100) as u64;
        Duration::from_millis(millis)
    }

    // ========================================================================
    // Payment Configuration
    // ========================================================================

    pub fn payment_failure_amount(&self) -> i64 {
        self.config
            .get_int("payment.failure-amount")
            .unwrap_or(DEFAULT_FAILURE_AMOUNT)
    }

    // ========================================================================
    // Metrics Configuration
    // ========================================================================

    pub fn metrics_enabled(&self) -> bool {
        self.config.get_bool("metrics.enabled").unwrap_or(true)
    }

    pub fn metrics_port(&self) -> u16 {
        self.config
            .get_int("metrics.port")
            .unwrap_or(DEFAULT_METRICS_PORT.into()) as u16
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string("logging.path").ok(),
            self.config.get_bool("logging.console").unwrap_or(true),
            self.config.get_bool("logging.file").unwrap_or(true),
            self.config
                .get_string("logging.level")
                .unwrap_or("info".to_string()),
        )
    }
}
