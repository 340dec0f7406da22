//! In-memory ORM integrator

use async_trait::async_trait;
use parking_lot::Mutex;
use rampart_admin::core::{FieldConfig, display_value};
use rampart_admin::{BoxError, ModelSchema, NativeType, OrmIntegrator, Record};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stores records per model type name, assigning auto-increment integer
/// primary keys on create.
///
/// Field-scoped fetches always keep the primary key so that rows remain
/// identifiable.
#[derive(Debug, Default)]
pub struct MemoryOrm {
	tables: Mutex<HashMap<String, Vec<Record>>>,
	next_ids: Mutex<HashMap<String, i64>>,
	failing: AtomicBool,
}

fn primary_key_name(schema: &ModelSchema) -> Result<String, BoxError> {
	schema
		.attributes()
		.iter()
		.find(|a| FieldConfig::is_primary_key_name(&a.name))
		.map(|a| a.name.clone())
		.ok_or_else(|| format!("model {} has no id attribute", schema.type_name()).into())
}

fn project(record: &Record, fields: &[String], primary_key: &str) -> Record {
	record
		.iter()
		.filter(|(name, _)| name.as_str() == primary_key || fields.contains(name))
		.map(|(name, value)| (name.clone(), value.clone()))
		.collect()
}

impl MemoryOrm {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every storage call fail until reset.
	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	fn check(&self) -> Result<(), BoxError> {
		if self.failing.load(Ordering::SeqCst) {
			Err("storage unavailable".into())
		} else {
			Ok(())
		}
	}

	/// Inserts a serializable value as-is, bypassing id assignment.
	pub fn seed<T: Serialize>(&self, type_name: &str, value: &T) {
		if let Ok(Value::Object(record)) = serde_json::to_value(value) {
			if let Some(Value::Number(id)) = record.get("id")
				&& let Some(id) = id.as_i64()
			{
				let mut next_ids = self.next_ids.lock();
				let next = next_ids.entry(type_name.to_string()).or_insert(1);
				*next = (*next).max(id + 1);
			}
			self.tables
				.lock()
				.entry(type_name.to_string())
				.or_default()
				.push(record);
		}
	}

	pub fn records(&self, type_name: &str) -> Vec<Record> {
		self.tables.lock().get(type_name).cloned().unwrap_or_default()
	}

	pub fn count(&self, type_name: &str) -> usize {
		self.tables.lock().get(type_name).map_or(0, Vec::len)
	}

	pub fn find(&self, type_name: &str, id: &Value) -> Option<Record> {
		self.tables
			.lock()
			.get(type_name)?
			.iter()
			.find(|r| r.get("id") == Some(id))
			.cloned()
	}

	fn select(
		&self,
		schema: &ModelSchema,
		fields: &[String],
		keep: impl Fn(&Record) -> bool,
	) -> Result<Vec<Record>, BoxError> {
		self.check()?;
		let primary_key = primary_key_name(schema)?;
		Ok(self
			.tables
			.lock()
			.get(schema.type_name())
			.map(|rows| {
				rows.iter()
					.filter(|r| keep(r))
					.map(|r| project(r, fields, &primary_key))
					.collect()
			})
			.unwrap_or_default())
	}

	fn find_by_id(&self, schema: &ModelSchema, id: &Value) -> Result<Option<Record>, BoxError> {
		self.check()?;
		let primary_key = primary_key_name(schema)?;
		Ok(self
			.tables
			.lock()
			.get(schema.type_name())
			.and_then(|rows| rows.iter().find(|r| r.get(&primary_key) == Some(id)).cloned()))
	}
}

#[async_trait]
impl OrmIntegrator for MemoryOrm {
	fn primary_key_value(&self, schema: &ModelSchema, record: &Record) -> Result<Value, BoxError> {
		let primary_key = primary_key_name(schema)?;
		record
			.get(&primary_key)
			.cloned()
			.ok_or_else(|| format!("record has no {} value", primary_key).into())
	}

	fn primary_key_type(&self, schema: &ModelSchema) -> Result<NativeType, BoxError> {
		let primary_key = primary_key_name(schema)?;
		schema
			.attribute(&primary_key)
			.map(|a| a.native_type.clone())
			.ok_or_else(|| format!("model {} has no id attribute", schema.type_name()).into())
	}

	async fn fetch_instances(&self, schema: &ModelSchema) -> Result<Vec<Record>, BoxError> {
		self.check()?;
		Ok(self.records(schema.type_name()))
	}

	async fn fetch_instances_only_fields(
		&self,
		schema: &ModelSchema,
		fields: &[String],
	) -> Result<Vec<Record>, BoxError> {
		self.select(schema, fields, |_| true)
	}

	async fn fetch_instances_only_fields_with_search(
		&self,
		schema: &ModelSchema,
		fields: &[String],
		query: &str,
		search_fields: &[String],
	) -> Result<Vec<Record>, BoxError> {
		let needle = query.to_lowercase();
		self.select(schema, fields, |record| {
			search_fields.iter().any(|name| {
				record
					.get(name)
					.map(|v| display_value(v).to_lowercase().contains(&needle))
					.unwrap_or(false)
			})
		})
	}

	async fn fetch_instance(&self, schema: &ModelSchema, id: &Value) -> Result<Option<Record>, BoxError> {
		self.find_by_id(schema, id)
	}

	async fn fetch_instance_only_fields(
		&self,
		schema: &ModelSchema,
		id: &Value,
		fields: &[String],
	) -> Result<Option<Record>, BoxError> {
		let primary_key = primary_key_name(schema)?;
		Ok(self
			.find_by_id(schema, id)?
			.map(|r| project(&r, fields, &primary_key)))
	}

	async fn delete_instance(&self, schema: &ModelSchema, id: &Value) -> Result<(), BoxError> {
		self.check()?;
		let primary_key = primary_key_name(schema)?;
		if let Some(rows) = self.tables.lock().get_mut(schema.type_name()) {
			rows.retain(|r| r.get(&primary_key) != Some(id));
		}
		Ok(())
	}

	async fn create_instance(&self, schema: &ModelSchema, record: Record) -> Result<Record, BoxError> {
		let fields: Vec<String> = record.keys().cloned().collect();
		self.create_instance_only_fields(schema, record, &fields).await
	}

	async fn create_instance_only_fields(
		&self,
		schema: &ModelSchema,
		record: Record,
		fields: &[String],
	) -> Result<Record, BoxError> {
		self.check()?;
		let primary_key = primary_key_name(schema)?;
		let mut stored = schema.template().clone();
		for name in fields {
			if let Some(value) = record.get(name) {
				stored.insert(name.clone(), value.clone());
			}
		}

		let id = {
			let mut next_ids = self.next_ids.lock();
			let next = next_ids.entry(schema.type_name().to_string()).or_insert(1);
			let id = *next;
			*next += 1;
			id
		};
		stored.insert(primary_key, Value::from(id));

		self.tables
			.lock()
			.entry(schema.type_name().to_string())
			.or_default()
			.push(stored.clone());
		Ok(stored)
	}

	async fn update_instance(
		&self,
		schema: &ModelSchema,
		record: Record,
		id: &Value,
	) -> Result<Record, BoxError> {
		let fields: Vec<String> = record.keys().cloned().collect();
		self.update_instance_only_fields(schema, record, &fields, id).await
	}

	async fn update_instance_only_fields(
		&self,
		schema: &ModelSchema,
		record: Record,
		fields: &[String],
		id: &Value,
	) -> Result<Record, BoxError> {
		self.check()?;
		let primary_key = primary_key_name(schema)?;
		let mut tables = self.tables.lock();
		let existing = tables
			.get_mut(schema.type_name())
			.and_then(|rows| rows.iter_mut().find(|r| r.get(&primary_key) == Some(id)))
			.ok_or_else(|| format!("no {} with id {}", schema.type_name(), id))?;
		for name in fields {
			if name != &primary_key
				&& let Some(value) = record.get(name)
			{
				existing.insert(name.clone(), value.clone());
			}
		}
		Ok(existing.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rampart_admin::Attribute;
	use rstest::rstest;
	use serde_json::json;

	fn schema() -> ModelSchema {
		ModelSchema::new(
			"Note",
			vec![
				Attribute::new("id", NativeType::I64),
				Attribute::new("text", NativeType::String),
			],
		)
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_assigns_ids() {
		let orm = MemoryOrm::new();
		let mut record = Record::new();
		record.insert("text".to_string(), json!("hello"));

		let first = orm
			.create_instance_only_fields(&schema(), record.clone(), &["text".to_string()])
			.await
			.unwrap();
		let second = orm
			.create_instance_only_fields(&schema(), record, &["text".to_string()])
			.await
			.unwrap();

		assert_eq!(first["id"], json!(1));
		assert_eq!(second["id"], json!(2));
		assert_eq!(orm.count("Note"), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_search_is_case_insensitive() {
		let orm = MemoryOrm::new();
		orm.seed("Note", &json!({"id": 1, "text": "Hello World"}));
		orm.seed("Note", &json!({"id": 2, "text": "other"}));

		let found = orm
			.fetch_instances_only_fields_with_search(
				&schema(),
				&["text".to_string()],
				"WORLD",
				&["text".to_string()],
			)
			.await
			.unwrap();

		assert_eq!(found.len(), 1);
		assert_eq!(found[0]["id"], json!(1));
	}
}
