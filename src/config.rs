use anyhow::Context;
use std::str::FromStr;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8080;

#[derive(Debug)]
pub struct Config {
    server_host: String,
    server_port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_host =
            load_env::<String>("SERVER_HOST")?.unwrap_or_else(|| DEFAULT_SERVER_HOST.into());
        let server_port = load_env("SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT);
        Ok(Self {
            server_host,
            server_port,
        })
    }

    #[must_use]
    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    #[must_use]
    pub const fn server_port(&self) -> u16 {
        self.server_port
    }
}

/// Unset variables yield `None`; set ones must parse.
fn load_env<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(val) = std::env::var(key) else {
        return Ok(None);
    };
    val.parse::<T>()
        .map(Some)
        .with_context(|| format!("Failed to parse environment variable {key}"))
}
