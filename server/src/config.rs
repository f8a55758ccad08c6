use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Roomcast relay server
#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[command(name = "roomcast-server", version, about = "Roomcast room chat relay server")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "ROOMCAST_PORT", default_value = "3001")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "ROOMCAST_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Allowed cross-origin caller (the UI origin)
    #[arg(
        long,
        env = "ROOMCAST_ALLOWED_ORIGIN",
        default_value = "http://localhost:3000"
    )]
    pub allowed_origin: String,

    /// Path to TOML config file
    #[arg(long, default_value = "./roomcast.toml")]
    pub config: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long, env = "ROOMCAST_JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            bind_address: "0.0.0.0".to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
            config: "./roomcast.toml".to_string(),
            json_logs: false,
            generate_config: false,
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (ROOMCAST_*) < CLI args
    pub fn load() -> Result<Self, figment::Error> {
        let cli = Config::parse();
        let config_path = cli.config.clone();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("ROOMCAST_"))
            .merge(Serialized::defaults(cli))
            .extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# Roomcast Relay Server Configuration
# Place this file at ./roomcast.toml or specify with --config <path>
# All settings can be overridden via environment variables (ROOMCAST_PORT, etc.)
# or CLI flags (--port, etc.)

# Server port (default: 3001)
# port = 3001

# Bind address (default: 0.0.0.0 — all interfaces)
# bind_address = "0.0.0.0"

# Origin the browser UI is served from; the only origin allowed to make
# cross-origin calls (default: http://localhost:3000)
# allowed_origin = "http://localhost:3000"

# Enable structured JSON logging for Docker/production
# json_logs = false
"#
    .to_string()
}
