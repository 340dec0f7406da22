//! Integrator contracts
//!
//! The panel never persists data or speaks HTTP itself. Persistence goes
//! through an [`OrmIntegrator`] and transport through a [`WebIntegrator`];
//! both are supplied by the embedding application.

use crate::core::{ModelSchema, NativeType, Record};
use crate::templates::TemplateRenderer;
use crate::types::{BoxError, HandlerResponse};
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Method;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-request context, opaque to the panel.
///
/// Only the web integrator, the permission function and the user fetcher
/// look inside it, usually by downcasting to their own request type.
pub type RequestContext = Arc<dyn Any + Send + Sync>;

/// Route handler registered with the web integrator
pub type Handler = Arc<dyn Fn(RequestContext) -> BoxFuture<'static, HandlerResponse> + Send + Sync>;

/// Persistence contract.
///
/// Field lists carry attribute names; translating them to storage columns
/// is the integrator's job. Search is a case-insensitive substring match
/// OR-ed across the search fields.
#[async_trait]
pub trait OrmIntegrator: Send + Sync {
	/// Primary-key value of a record.
	fn primary_key_value(&self, schema: &ModelSchema, record: &Record) -> Result<Value, BoxError>;

	/// Native type of the model's primary key. Failing here rejects registration.
	fn primary_key_type(&self, schema: &ModelSchema) -> Result<NativeType, BoxError>;

	async fn fetch_instances(&self, schema: &ModelSchema) -> Result<Vec<Record>, BoxError>;

	async fn fetch_instances_only_fields(
		&self,
		schema: &ModelSchema,
		fields: &[String],
	) -> Result<Vec<Record>, BoxError>;

	async fn fetch_instances_only_fields_with_search(
		&self,
		schema: &ModelSchema,
		fields: &[String],
		query: &str,
		search_fields: &[String],
	) -> Result<Vec<Record>, BoxError>;

	async fn fetch_instance(&self, schema: &ModelSchema, id: &Value) -> Result<Option<Record>, BoxError>;

	async fn fetch_instance_only_fields(
		&self,
		schema: &ModelSchema,
		id: &Value,
		fields: &[String],
	) -> Result<Option<Record>, BoxError>;

	async fn delete_instance(&self, schema: &ModelSchema, id: &Value) -> Result<(), BoxError>;

	/// Persists a new record and returns it as stored, primary key included.
	async fn create_instance(&self, schema: &ModelSchema, record: Record) -> Result<Record, BoxError>;

	async fn create_instance_only_fields(
		&self,
		schema: &ModelSchema,
		record: Record,
		fields: &[String],
	) -> Result<Record, BoxError>;

	async fn update_instance(
		&self,
		schema: &ModelSchema,
		record: Record,
		id: &Value,
	) -> Result<Record, BoxError>;

	async fn update_instance_only_fields(
		&self,
		schema: &ModelSchema,
		record: Record,
		fields: &[String],
		id: &Value,
	) -> Result<Record, BoxError>;
}

/// Transport contract
pub trait WebIntegrator: Send + Sync {
	/// Registers `handler` for `method` on `path`. Path parameters use `:name`.
	fn handle_route(&self, method: Method, path: &str, handler: Handler);

	/// Serves the renderer's assets under `prefix`.
	fn serve_assets(&self, prefix: &str, renderer: Arc<dyn TemplateRenderer>);

	fn query_param(&self, ctx: &RequestContext, name: &str) -> Option<String>;

	fn path_param(&self, ctx: &RequestContext, name: &str) -> Option<String>;

	fn request_method(&self, ctx: &RequestContext) -> Method;

	/// Submitted form body, or `None` when it cannot be read.
	fn form_data(&self, ctx: &RequestContext) -> Option<HashMap<String, Vec<String>>>;
}
