use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub registration: RegistrationMode,
    pub max_body_size: usize,
    pub max_import_rows: usize,
    pub cache_ttl_secs: u64,
    pub db_max_connections: u32,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationMode {
    /// Anyone may register a new company.
    Open,
    /// Only the very first company can be registered.
    Closed,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        if jwt_secret.len() < 16 {
            return Err("JWT_SECRET must be at least 16 characters".to_string());
        }

        let host: IpAddr = env_or("ASSETDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_HOST: {e}"))?;

        let port: u16 = env_or("ASSETDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_PORT: {e}"))?;

        let registration = match env_or("ASSETDESK_REGISTRATION", "closed").as_str() {
            "open" => RegistrationMode::Open,
            _ => RegistrationMode::Closed,
        };

        let max_body_size: usize = env_or("ASSETDESK_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_MAX_BODY_SIZE: {e}"))?;

        let max_import_rows: usize = env_or("ASSETDESK_MAX_IMPORT_ROWS", "5000")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_MAX_IMPORT_ROWS: {e}"))?;

        let cache_ttl_secs: u64 = env_or("ASSETDESK_CACHE_TTL_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_CACHE_TTL_SECS: {e}"))?;

        let db_max_connections: u32 = env_or("ASSETDESK_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_DB_MAX_CONNECTIONS: {e}"))?;

        let log_level = env_or("ASSETDESK_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            registration,
            max_body_size,
            max_import_rows,
            cache_ttl_secs,
            db_max_connections,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
