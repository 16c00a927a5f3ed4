//! Router settings
//!
//! Settings are layered in priority order: environment variables > settings
//! file > defaults. The settings file is TOML with a `[router]` table:
//!
//! ```toml
//! [router]
//! base_url = "/shop/"
//! ssr = false
//! ```
//!
//! Environment overrides use the `STOREFRONT_` prefix (`STOREFRONT_BASE_URL`,
//! `STOREFRONT_SSR`).

use super::env::{Env, EnvError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Prefix applied to every environment override.
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Settings consumed by the router at its composition root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Path prefix the application is mounted under (e.g. `/shop`).
	pub base_url: String,
	/// Forces server mode when `Some(true)`; `None` leaves the decision to
	/// environment detection.
	pub ssr: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
	router: RouterSettings,
}

impl RouterSettings {
	/// Creates settings with an empty base path and no SSR override.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the base URL.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Sets the SSR override.
	pub fn with_ssr(mut self, ssr: bool) -> Self {
		self.ssr = Some(ssr);
		self
	}

	/// Returns the base path with trailing slashes removed.
	///
	/// `"/"` and `""` both yield `""`.
	pub fn base_path(&self) -> &str {
		self.base_url.trim_end_matches('/')
	}

	/// Parses the `[router]` table of a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let file: SettingsFile = toml::from_str(source)?;
		Ok(file.router)
	}

	/// Reads and parses a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&source)
	}

	/// Applies `STOREFRONT_`-prefixed environment overrides.
	pub fn with_env_overrides(self) -> Result<Self, SettingsError> {
		self.with_env(&Env::new().with_prefix(ENV_PREFIX))
	}

	/// Applies overrides from the given environment reader.
	pub fn with_env(mut self, env: &Env) -> Result<Self, SettingsError> {
		if let Some(base_url) = env.optional_str("BASE_URL")? {
			self.base_url = base_url;
		}
		if let Some(ssr) = env.optional_bool("SSR")? {
			self.ssr = Some(ssr);
		}
		Ok(self)
	}

	/// Loads settings: the file when given and present, then environment
	/// overrides.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let settings = match path {
			Some(path) if path.exists() => Self::from_file(path)?,
			_ => Self::default(),
		};
		settings.with_env_overrides()
	}
}

/// Errors raised while loading settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Environment error: {0}")]
	Env(#[from] EnvError),
}
