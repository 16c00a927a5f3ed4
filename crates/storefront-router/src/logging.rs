//! Logging abstraction layer for storefront-router
//!
//! Navigation and data-hook failures are swallowed by the router, so they are
//! always logged. These macros route the message to the right sink for the
//! target the router runs on.
//!
//! ## Macro Overview
//!
//! | Macro | Feature Required | WASM | Non-WASM |
//! |-------|------------------|------|----------|
//! | `debug_log!` | `debug-hooks` | `console.debug` | `tracing::debug!` |
//! | `info_log!` | None | `console.info` | `tracing::info!` |
//! | `warn_log!` | None | `console.warn` | `tracing::warn!` |
//! | `error_log!` | None | `console.error` | `tracing::error!` |
//!
//! Native events use the `storefront_router` target so hosts can filter them
//! with an `EnvFilter` directive.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_router::{debug_log, warn_log};
//!
//! debug_log!("resolved {} -> {:?}", path, template);
//! warn_log!("navigation to '{}' failed: {}", url, err);
//! ```

/// Logs a debug message (requires the `debug-hooks` feature)
#[macro_export]
#[cfg(all(feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires the `debug-hooks` feature)
#[macro_export]
#[cfg(all(feature = "debug-hooks", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::debug!(target: "storefront_router", $($arg)*);
	}};
}

/// No-op debug_log when `debug-hooks` is disabled
#[macro_export]
#[cfg(not(feature = "debug-hooks"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::info!(target: "storefront_router", $($arg)*);
	}};
}

/// Logs a warning message
///
/// Used for recoverable navigation failures.
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::warn!(target: "storefront_router", $($arg)*);
	}};
}

/// Logs an error message
///
/// Used for failed server data hooks.
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::error!(target: "storefront_router", $($arg)*);
	}};
}
