use std::sync::LazyLock;

use thiserror::Error;
use tokio::sync::OnceCell;

static CONFIG: LazyLock<OnceCell<Config>> = LazyLock::new(OnceCell::new);

/// Process-wide config, loaded once from the environment (`.env` honored).
pub async fn config() -> EnvResult<&'static Config> {
    CONFIG.get_or_try_init(|| async { Config::from_env() }).await
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> EnvResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: get_var(Var::DatabaseUrl)?,
            log_filter: std::env::var(Var::LogFilter.key()).unwrap_or_else(|_| "info".into()),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Var {
    DatabaseUrl,
    LogFilter,
}

impl Var {
    pub const fn key(&self) -> &'static str {
        match self {
            Var::DatabaseUrl => "DATABASE_URL",
            Var::LogFilter => "LOG_FILTER",
        }
    }
}

fn get_var(var: Var) -> EnvResult<String> {
    std::env::var(var.key()).map_err(|_| EnvErr::MissingValue(var.key()))
}

pub type EnvResult<T> = core::result::Result<T, EnvErr>;

#[derive(Debug, Error)]
pub enum EnvErr {
    #[error("missing required env var '{0}'")]
    MissingValue(&'static str),

    #[error(transparent)]
    Dotenvy(#[from] dotenvy::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn log_filter_defaults_when_unset() {
        // SAFETY: test process manipulates its own environment only
        unsafe {
            std::env::set_var(Var::DatabaseUrl.key(), "postgres://localhost/postwars");
            std::env::remove_var(Var::LogFilter.key());
        }

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.log_filter, "info");
    }
}
