use std::env;

/// AppConfig
///
/// Holds the shell's configuration. Immutable once loaded and pulled into handlers
/// through `FromRef`, like the rest of the shared state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the log format and the accounts source.
    pub env: Env,
    // Socket address the HTTP shell binds to.
    pub bind_addr: String,
    // JSON accounts file for the in-memory identity provider. `None` means demo accounts.
    pub accounts_file: Option<String>,
}

/// Env
///
/// Local runs use the demo accounts and human-readable logs; production requires an
/// explicit accounts file and emits JSON logs.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// A non-panicking configuration for tests: local mode with the demo accounts.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:0".to_string(),
            accounts_file: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production if `LMS_ACCOUNTS_FILE` is not set. Serving without a real
    /// accounts source would mean logging in with the demo passwords.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()).as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("LMS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let accounts_file = match env {
            Env::Production => Some(
                env::var("LMS_ACCOUNTS_FILE")
                    .expect("FATAL: LMS_ACCOUNTS_FILE must be set in production."),
            ),
            Env::Local => env::var("LMS_ACCOUNTS_FILE").ok(),
        };

        Self {
            env,
            bind_addr,
            accounts_file,
        }
    }
}
