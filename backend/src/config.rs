//! Database configuration loaded via OrthoConfig.
//!
//! Settings come from the environment (`CONTACTS_` prefix), a config file,
//! or CLI flags, in OrthoConfig's usual precedence. The core treats this as
//! injected process state; nothing else reads the environment.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Connection settings for the contact store's PostgreSQL pool.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONTACTS")]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL. Required.
    pub database_url: String,
    /// Maximum number of pooled connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Minimum idle connections to keep warm; pool default when unset.
    pub pool_min_idle: Option<u32>,
    /// Connection checkout timeout in seconds.
    #[ortho_config(default = 30)]
    pub pool_connection_timeout_secs: u64,
}

impl DatabaseSettings {
    /// Convert the settings into the pool's builder configuration.
    pub fn pool_config(&self) -> PoolConfig {
        let mut config = PoolConfig::new(&self.database_url)
            .with_max_size(self.pool_max_size)
            .with_connection_timeout(Duration::from_secs(self.pool_connection_timeout_secs));

        if let Some(min_idle) = self.pool_min_idle {
            config = config.with_min_idle(Some(min_idle));
        }

        config
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for database configuration parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> DatabaseSettings {
        DatabaseSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_only_url_is_set() {
        let _guard = lock_env([
            (
                "CONTACTS_DATABASE_URL",
                Some("postgres://localhost/contacts".to_owned()),
            ),
            ("CONTACTS_POOL_MAX_SIZE", None::<String>),
            ("CONTACTS_POOL_MIN_IDLE", None::<String>),
            ("CONTACTS_POOL_CONNECTION_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url, "postgres://localhost/contacts");
        assert_eq!(settings.pool_max_size, 10);
        assert!(settings.pool_min_idle.is_none());
        assert_eq!(settings.pool_connection_timeout_secs, 30);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "CONTACTS_DATABASE_URL",
                Some("postgres://db.internal/contacts".to_owned()),
            ),
            ("CONTACTS_POOL_MAX_SIZE", Some("25".to_owned())),
            ("CONTACTS_POOL_MIN_IDLE", Some("5".to_owned())),
            ("CONTACTS_POOL_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.pool_max_size, 25);
        assert_eq!(settings.pool_min_idle, Some(5));
        assert_eq!(settings.pool_connection_timeout_secs, 5);
    }

    #[rstest]
    fn missing_url_is_an_error() {
        let _guard = lock_env([("CONTACTS_DATABASE_URL", None::<String>)]);

        let result = DatabaseSettings::load_from_iter([OsString::from("backend")]);
        assert!(result.is_err());
    }
}
