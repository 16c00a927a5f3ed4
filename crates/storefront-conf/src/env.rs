//! Environment variable handling
//!
//! Reads prefixed environment variables with typed parsing.

use std::env;

/// Environment variable reader with prefix support
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Optional prefix for environment variables (e.g., "STOREFRONT_")
	pub prefix: Option<String>,
}

impl Env {
	/// Create a new Env instance
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Set a prefix for all environment variable lookups
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Get the full key name with prefix
	fn get_key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	/// Read an optional string value.
	///
	/// Returns `Ok(None)` when the variable is unset.
	pub fn optional_str(&self, key: &str) -> Result<Option<String>, EnvError> {
		let full_key = self.get_key_name(key);
		validate_env_var_name(&full_key)?;

		match env::var(&full_key) {
			Ok(val) => Ok(Some(val)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(env::VarError::NotUnicode(_)) => Err(EnvError::ParseError {
				key: full_key,
				value_len: 0,
				error: "value is not valid unicode".to_string(),
			}),
		}
	}

	/// Read a string value from environment
	pub fn str(&self, key: &str) -> Result<String, EnvError> {
		let full_key = self.get_key_name(key);
		self.optional_str(key)?
			.ok_or(EnvError::MissingVariable(full_key))
	}

	/// Read an optional boolean value.
	pub fn optional_bool(&self, key: &str) -> Result<Option<bool>, EnvError> {
		let full_key = self.get_key_name(key);
		match self.optional_str(key)? {
			Some(val) => parse_bool(&val)
				.map(Some)
				.map_err(|e| EnvError::ParseError {
					key: full_key,
					value_len: val.len(),
					error: e,
				}),
			None => Ok(None),
		}
	}

	/// Read a boolean value from environment
	pub fn bool(&self, key: &str) -> Result<bool, EnvError> {
		let full_key = self.get_key_name(key);
		self.optional_bool(key)?
			.ok_or(EnvError::MissingVariable(full_key))
	}
}

/// Parses a boolean the way settings files and shells spell it.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" | "" => Ok(false),
		_ => Err("expected true/false/1/0/yes/no/on/off".to_string()),
	}
}

/// Validates an environment variable name before it is looked up.
pub fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	if name.is_empty() {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}

	if let Some(pos) = name.find(|c: char| c.is_control()) {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: format!(
				"environment variable name contains control character at position {}",
				pos
			),
		});
	}

	if name.contains('=') {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '='".to_string(),
		});
	}

	Ok(())
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the original value (the raw value is never echoed)
		value_len: usize,
		error: String,
	},

	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName { name: String, reason: String },
}
