//! Startup configuration, read once from the process environment.
//!
//! | variable       | default    |
//! |----------------|------------|
//! | `PORT`         | `3000`     |
//! | `TOKEN_SECRET` | (required) |
//! | `DB_PATH`      | `users.db` |
//! | `PUBLIC_DIR`   | `public`   |

use std::fmt;

use config::{ConfigError, Environment, Source};
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Config {
    pub port: u16,
    /// Key used to sign session tokens.
    pub token_secret: String,
    pub db_path: String,
    pub public_dir: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    pub fn from_source(source: impl Source + Send + Sync + 'static) -> Result<Self, ConfigError> {
        let config: Config = config::Config::builder()
            .set_default("port", 3000)?
            .set_default("db_path", "users.db")?
            .set_default("public_dir", "public")?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token_secret.is_empty() {
            return Err(ConfigError::Message(
                "TOKEN_SECRET cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("token_secret", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("public_dir", &self.public_dir)
            .finish()
    }
}
