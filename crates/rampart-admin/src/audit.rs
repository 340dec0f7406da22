//! Audit log of admin actions
//!
//! Every view, create, update and delete the panel performs is recorded as a
//! [`LogEntry`] in a [`LogStore`], provided the configured
//! [`LogStoreLevel`] permits the action.

use crate::types::BoxError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Kind of a logged action, doubling as the minimum level to persist.
///
/// Levels are ranked `delete < create < update < instance_view < list_view
/// < panel_view`. A store configured at a level keeps every action ranked at
/// or below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStoreLevel {
	Delete,
	Create,
	Update,
	InstanceView,
	ListView,
	PanelView,
}

impl LogStoreLevel {
	pub fn rank(&self) -> u8 {
		match self {
			LogStoreLevel::Delete => 1,
			LogStoreLevel::Create => 2,
			LogStoreLevel::Update => 3,
			LogStoreLevel::InstanceView => 4,
			LogStoreLevel::ListView => 5,
			LogStoreLevel::PanelView => 6,
		}
	}

	/// Whether a store configured at `self` keeps an `action` entry.
	pub fn permits(&self, action: LogStoreLevel) -> bool {
		self.rank() >= action.rank()
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			LogStoreLevel::Delete => "delete",
			LogStoreLevel::Create => "create",
			LogStoreLevel::Update => "update",
			LogStoreLevel::InstanceView => "instance_view",
			LogStoreLevel::ListView => "list_view",
			LogStoreLevel::PanelView => "panel_view",
		}
	}
}

impl fmt::Display for LogStoreLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One recorded admin action. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	pub id: Uuid,
	pub action_time: DateTime<Utc>,
	pub user_id: Option<Value>,
	pub user_repr: String,
	/// `"App | Model"` label of the touched resource
	pub content_type: String,
	pub object_id: Option<Value>,
	pub object_repr: String,
	pub action_flag: LogStoreLevel,
	pub message: String,
}

impl LogEntry {
	/// Object representation, falling back to the message.
	pub fn repr(&self) -> &str {
		if self.object_repr.is_empty() {
			&self.message
		} else {
			&self.object_repr
		}
	}
}

/// Persistence of audit log entries
#[async_trait]
pub trait LogStore: Send + Sync {
	async fn insert_log_entry(&self, entry: LogEntry) -> Result<(), BoxError>;

	async fn get_log_entry(&self, id: Uuid) -> Result<Option<LogEntry>, BoxError>;

	/// All entries, newest first.
	async fn get_log_entries(&self) -> Result<Vec<LogEntry>, BoxError>;
}

/// Bounded in-memory log store. Oldest entries are evicted first.
#[derive(Debug)]
pub struct InMemoryLogStore {
	capacity: usize,
	entries: Mutex<VecDeque<LogEntry>>,
}

impl InMemoryLogStore {
	pub const DEFAULT_CAPACITY: usize = 100;

	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			entries: Mutex::new(VecDeque::with_capacity(capacity)),
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}

impl Default for InMemoryLogStore {
	fn default() -> Self {
		Self::new(Self::DEFAULT_CAPACITY)
	}
}

#[async_trait]
impl LogStore for InMemoryLogStore {
	async fn insert_log_entry(&self, entry: LogEntry) -> Result<(), BoxError> {
		let mut entries = self.entries.lock();
		if entries.iter().any(|e| e.id == entry.id) {
			return Err(format!("log entry with ID {} already exists", entry.id).into());
		}
		entries.push_front(entry);
		while entries.len() > self.capacity {
			entries.pop_back();
		}
		Ok(())
	}

	async fn get_log_entry(&self, id: Uuid) -> Result<Option<LogEntry>, BoxError> {
		Ok(self.entries.lock().iter().find(|e| e.id == id).cloned())
	}

	async fn get_log_entries(&self) -> Result<Vec<LogEntry>, BoxError> {
		Ok(self.entries.lock().iter().cloned().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	fn entry(message: &str) -> LogEntry {
		LogEntry {
			id: Uuid::new_v4(),
			action_time: Utc::now(),
			user_id: None,
			user_repr: String::new(),
			content_type: "Blog | Post".to_string(),
			object_id: None,
			object_repr: String::new(),
			action_flag: LogStoreLevel::Create,
			message: message.to_string(),
		}
	}

	#[fixture]
	fn store() -> InMemoryLogStore {
		InMemoryLogStore::new(3)
	}

	#[rstest]
	#[case(LogStoreLevel::PanelView, LogStoreLevel::Delete, true)]
	#[case(LogStoreLevel::PanelView, LogStoreLevel::PanelView, true)]
	#[case(LogStoreLevel::Update, LogStoreLevel::Create, true)]
	#[case(LogStoreLevel::Update, LogStoreLevel::ListView, false)]
	#[case(LogStoreLevel::Delete, LogStoreLevel::Create, false)]
	fn test_level_permits(
		#[case] configured: LogStoreLevel,
		#[case] action: LogStoreLevel,
		#[case] expected: bool,
	) {
		assert_eq!(configured.permits(action), expected);
	}

	#[rstest]
	fn test_level_serde_names() {
		let level: LogStoreLevel = serde_json::from_str("\"instance_view\"").unwrap();

		assert_eq!(level, LogStoreLevel::InstanceView);
		assert_eq!(level.to_string(), "instance_view");
	}

	#[rstest]
	fn test_repr_falls_back_to_message() {
		let mut e = entry("created");
		assert_eq!(e.repr(), "created");

		e.object_repr = "Post 1".to_string();
		assert_eq!(e.repr(), "Post 1");
	}

	#[rstest]
	#[tokio::test]
	async fn test_evicts_oldest_first(store: InMemoryLogStore) {
		// Arrange
		let entries: Vec<LogEntry> = (0..5).map(|i| entry(&i.to_string())).collect();

		// Act
		for e in &entries {
			store.insert_log_entry(e.clone()).await.unwrap();
		}

		// Assert
		let kept: Vec<String> = store
			.get_log_entries()
			.await
			.unwrap()
			.into_iter()
			.map(|e| e.message)
			.collect();
		assert_eq!(kept, vec!["4", "3", "2"]);
		assert!(store.get_log_entry(entries[0].id).await.unwrap().is_none());
		assert!(store.get_log_entry(entries[4].id).await.unwrap().is_some());
	}

	#[rstest]
	#[tokio::test]
	async fn test_rejects_duplicate_id(store: InMemoryLogStore) {
		let e = entry("once");
		store.insert_log_entry(e.clone()).await.unwrap();

		let result = store.insert_log_entry(e).await;

		assert!(result.is_err());
		assert_eq!(store.len(), 1);
	}
}
