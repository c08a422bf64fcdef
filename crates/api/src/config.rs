use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// PostgreSQL connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum pooled database connections (default: `10`).
    pub db_max_connections: u32,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Defaults used by `POST /seed`.
    pub seed: SeedConfig,
}

/// Initial owner account created by the seed endpoint.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_name: String,
    pub admin_pin: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | required                   |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DB_MAX_CONNECTIONS`   | `10`                       |
    /// | `SEED_ADMIN_NAME`      | `Owner`                    |
    /// | `SEED_ADMIN_PIN`       | `1234`                     |
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is missing, on unparsable numbers, or on
    /// an invalid seed PIN.
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in the environment");

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let seed = SeedConfig {
            admin_name: std::env::var("SEED_ADMIN_NAME").unwrap_or_else(|_| "Owner".into()),
            admin_pin: std::env::var("SEED_ADMIN_PIN").unwrap_or_else(|_| "1234".into()),
        };
        salon_core::validation::validate_pin(&seed.admin_pin)
            .expect("SEED_ADMIN_PIN must be 4 to 8 digits");

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            db_max_connections,
            jwt: JwtConfig::from_env(),
            seed,
        }
    }

    /// Socket address to bind.
    ///
    /// # Panics
    ///
    /// Panics if `HOST` is not an IP address.
    pub fn bind_addr(&self) -> std::net::SocketAddr {
        let ip: std::net::IpAddr = self
            .host
            .parse()
            .unwrap_or_else(|e| panic!("HOST '{}' is not an IP address: {e}", self.host));
        std::net::SocketAddr::new(ip, self.port)
    }
}
