//! Sample admin models

use rampart_admin::{AdminModel, Attribute, FormMode, NativeType};
use rampart_forms::{EmailField, FormField};
use serde::{Deserialize, Serialize};

/// Blog article with one attribute of each widget kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
	pub id: i64,
	pub title: String,
	pub body: String,
	pub views: u32,
	pub published: bool,
}

impl Article {
	pub fn new(id: i64, title: &str) -> Self {
		Self {
			id,
			title: title.to_string(),
			body: format!("Body of {}", title),
			..Self::default()
		}
	}
}

impl AdminModel for Article {
	fn type_name() -> &'static str {
		"Article"
	}

	fn attributes() -> Vec<Attribute> {
		vec![
			Attribute::new("id", NativeType::I64).annotated("addForm:exclude;editForm:exclude;search:exclude"),
			Attribute::new("title", NativeType::String).annotated("required;maxLength:100"),
			Attribute::new("body", NativeType::String).annotated("listDisplay:exclude"),
			Attribute::new("views", NativeType::U32).annotated("min:0;search:exclude;addForm:exclude"),
			Attribute::new("published", NativeType::Bool).annotated("search:exclude"),
		]
	}
}

/// Author registered under a custom name, with a custom email widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
	pub id: i64,
	pub name: String,
	pub email: String,
}

impl AdminModel for Author {
	fn type_name() -> &'static str {
		"Author"
	}

	fn attributes() -> Vec<Attribute> {
		vec![
			Attribute::new("id", NativeType::I64).annotated("addForm:exclude;editForm:exclude"),
			Attribute::new("name", NativeType::String).annotated("required;displayName:Pen name"),
			Attribute::new("email", NativeType::String),
		]
	}

	fn admin_name() -> Option<String> {
		Some("writers".to_string())
	}

	fn admin_display_name() -> Option<String> {
		Some("Writer".to_string())
	}

	fn admin_form_field(attribute: &str, _mode: FormMode) -> Option<Box<dyn FormField>> {
		match attribute {
			"email" => {
				let mut field = EmailField::new("email".to_string());
				field.placeholder = Some("name@example.com".to_string());
				Some(Box::new(field))
			}
			_ => None,
		}
	}
}
