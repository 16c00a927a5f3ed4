//! # Storefront Conf
//!
//! Settings for the storefront router. A settings file provides the base
//! path the app is mounted under and an optional server-rendering override;
//! `STOREFRONT_`-prefixed environment variables take precedence.
//!
//! ```ignore
//! use storefront_conf::RouterSettings;
//!
//! let settings = RouterSettings::load(Some("storefront.toml".as_ref()))?;
//! assert_eq!(settings.base_path(), "/shop");
//! ```

pub mod env;
pub mod settings;

pub use env::{Env, EnvError, parse_bool};
pub use settings::{ENV_PREFIX, RouterSettings, SettingsError};
