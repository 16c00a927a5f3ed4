//! Server data hooks attached to a route.
//!
//! A route may carry two async hooks, both run only by the server engine:
//! `on_server_render` loads the data the page needs for its first render, and
//! `on_metadata` produces the document title and social preview tags.

use crate::error::BoxError;
use crate::pattern::Params;
use crate::query::Query;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// What a hook knows about the request it runs for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
	/// Decoded path parameters of the matched route.
	pub params: Params,
	/// Parsed query string.
	pub query: Query,
	/// The request path (base path removed) plus query string.
	pub url: String,
}

/// Document metadata produced by an `on_metadata` hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
	/// Document title.
	pub title: String,
	/// Meta description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Preview image URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl PageMetadata {
	/// Creates metadata with only a title.
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			description: None,
			image: None,
		}
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Sets the preview image.
	pub fn with_image(mut self, image: impl Into<String>) -> Self {
		self.image = Some(image.into());
		self
	}
}

type Hook<T> = Arc<dyn Fn(NavigationContext) -> BoxFuture<'static, Result<T, BoxError>> + Send + Sync>;

/// The optional hooks of one route.
#[derive(Clone, Default)]
pub struct RouteHooks {
	on_server_render: Option<Hook<serde_json::Value>>,
	on_metadata: Option<Hook<PageMetadata>>,
}

impl RouteHooks {
	/// Creates an empty hook set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the data loader run by `prefetch`.
	///
	/// The loaded value is serialized to JSON so it can be embedded in the
	/// rendered page; a serialization failure counts as a hook failure.
	///
	/// # Example
	///
	/// ```ignore
	/// RouteHooks::new().on_server_render(|ctx: NavigationContext| async move {
	///     let id = ctx.params["id"].parse::<u64>()?;
	///     catalog.product(id).await
	/// })
	/// ```
	pub fn on_server_render<F, Fut, T, E>(mut self, hook: F) -> Self
	where
		F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, E>> + Send + 'static,
		T: Serialize + 'static,
		E: Into<BoxError> + 'static,
	{
		let boxed: Hook<serde_json::Value> = Arc::new(move |ctx| {
			let fut = hook(ctx);
			Box::pin(async move {
				let data = fut.await.map_err(Into::<BoxError>::into)?;
				serde_json::to_value(data).map_err(BoxError::from)
			})
		});
		self.on_server_render = Some(boxed);
		self
	}

	/// Sets the metadata generator run by `generate_metadata`.
	pub fn on_metadata<F, Fut, E>(mut self, hook: F) -> Self
	where
		F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<PageMetadata, E>> + Send + 'static,
		E: Into<BoxError> + 'static,
	{
		let boxed: Hook<PageMetadata> = Arc::new(move |ctx| {
			let fut = hook(ctx);
			Box::pin(async move { fut.await.map_err(Into::<BoxError>::into) })
		});
		self.on_metadata = Some(boxed);
		self
	}

	/// Returns whether a data loader is set.
	pub fn has_server_render(&self) -> bool {
		self.on_server_render.is_some()
	}

	/// Returns whether a metadata generator is set.
	pub fn has_metadata(&self) -> bool {
		self.on_metadata.is_some()
	}

	pub(crate) fn server_render(
		&self,
		ctx: NavigationContext,
	) -> Option<BoxFuture<'static, Result<serde_json::Value, BoxError>>> {
		self.on_server_render.as_ref().map(|hook| hook(ctx))
	}

	pub(crate) fn metadata(
		&self,
		ctx: NavigationContext,
	) -> Option<BoxFuture<'static, Result<PageMetadata, BoxError>>> {
		self.on_metadata.as_ref().map(|hook| hook(ctx))
	}
}

impl fmt::Debug for RouteHooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteHooks")
			.field("has_server_render", &self.has_server_render())
			.field("has_metadata", &self.has_metadata())
			.finish()
	}
}
