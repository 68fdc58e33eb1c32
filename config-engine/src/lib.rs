//! Configuration for the CuraTB proxy server and intake client
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional file (`curatb.toml` by default; `.yaml`/`.yml` read as YAML)
//! 3. `CURATB_*` environment variables, `__` separating sections
//!    (`CURATB_SERVER__BACKEND_URL`)
//! 4. `SPRING_API_URL`, the backend base URL variable deployments already set
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::Settings;
//!
//! let settings = Settings::load(None)?;
//! println!("forwarding to {}", settings.server.backend_url);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod error;
pub mod policy;
pub mod providers;
pub mod settings;
pub mod validation;

pub use error::*;
pub use policy::*;
pub use settings::*;
