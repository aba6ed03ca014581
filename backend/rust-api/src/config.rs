use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub catalog_path: String,
    pub metrics_auth: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            // Load base config from TOML file
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let host = settings
            .get_string("server.host")
            .or_else(|_| env::var("HOST"))
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = settings
            .get_int("server.port")
            .ok()
            .and_then(|p| u16::try_from(p).ok())
            .or_else(|| env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(8081);

        let catalog_path = settings
            .get_string("catalog.path")
            .or_else(|_| env::var("CATALOG_PATH"))
            .unwrap_or_else(|_| {
                eprintln!("WARNING: CATALOG_PATH not set, using config/catalog.json");
                "config/catalog.json".to_string()
            });

        let metrics_auth = settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    panic!("FATAL: METRICS_AUTH must be set in production!");
                }
                eprintln!("WARNING: Using default METRICS_AUTH (dev mode only!)");
                "admin:changeme".to_string()
            });

        Ok(Config {
            host,
            port,
            catalog_path,
            metrics_auth,
        })
    }
}
