use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:devotion.db".to_string());

        Ok(Config {
            bind_addr,
            database_url,
        })
    }
}
