//! Configuration management for the Garment Costing server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with GCE_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{CostingPolicy, JobWorkCostBasis};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// Costing rules applied to every report
    pub costing: CostingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CostingConfig {
    /// `paid` or `billed`
    pub job_work_cost_basis: JobWorkCostBasis,

    /// Percentage used when GST is switched on for a batch that has none saved
    pub default_gst_percentage: Decimal,
}

impl CostingConfig {
    pub fn policy(&self) -> CostingPolicy {
        CostingPolicy {
            job_work_cost_basis: self.job_work_cost_basis,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("GCE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("costing.job_work_cost_basis", "paid")?
            .set_default("costing.default_gst_percentage", "5")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GCE_ prefix)
            .add_source(
                Environment::with_prefix("GCE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            job_work_cost_basis: JobWorkCostBasis::default(),
            default_gst_percentage: Decimal::from(5),
        }
    }
}
