use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            database_url,
            jwt_secret,
            host,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process-global env is only touched once.
    #[test]
    fn from_env_loads_and_requires_jwt_secret() {
        unsafe {
            env::set_var("DATABASE_URL", "postgres://localhost/fret");
            env::remove_var("JWT_SECRET");
            env::remove_var("APP_HOST");
            env::remove_var("APP_PORT");
        }
        assert!(AppConfig::from_env().is_err(), "missing JWT_SECRET must fail");

        unsafe {
            env::set_var("JWT_SECRET", "secret-test");
        }
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.jwt_secret, "secret-test");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }
}
