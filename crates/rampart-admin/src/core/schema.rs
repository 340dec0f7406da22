//! Explicit schema descriptions of admin models
//!
//! A model is described once, at registration, by a [`ModelSchema`]: its
//! type name, the ordered list of attributes with their native types and
//! annotation strings, and a zero-value template record. Typed models get
//! their schema from [`AdminModel`]; dynamic callers build one directly.

use crate::types::RegistrationError;
use chrono::NaiveDate;
use rampart_forms::FormField;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// One persisted row, keyed by attribute name
pub type Record = Map<String, Value>;

/// Native type of a model attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
	String,
	I8,
	I16,
	I32,
	I64,
	U8,
	U16,
	U32,
	U64,
	F32,
	F64,
	Bool,
	/// `chrono::NaiveDate`, stored as `YYYY-MM-DD`
	Date,
	/// `uuid::Uuid`, stored hyphenated
	Uuid,
	/// Anything else; carried through untouched and never given a widget
	Other(String),
}

impl NativeType {
	pub fn name(&self) -> &str {
		match self {
			NativeType::String => "String",
			NativeType::I8 => "i8",
			NativeType::I16 => "i16",
			NativeType::I32 => "i32",
			NativeType::I64 => "i64",
			NativeType::U8 => "u8",
			NativeType::U16 => "u16",
			NativeType::U32 => "u32",
			NativeType::U64 => "u64",
			NativeType::F32 => "f32",
			NativeType::F64 => "f64",
			NativeType::Bool => "bool",
			NativeType::Date => "NaiveDate",
			NativeType::Uuid => "Uuid",
			NativeType::Other(name) => name,
		}
	}

	pub fn is_integer(&self) -> bool {
		matches!(
			self,
			NativeType::I8
				| NativeType::I16
				| NativeType::I32
				| NativeType::I64
				| NativeType::U8
				| NativeType::U16
				| NativeType::U32
				| NativeType::U64
		)
	}

	pub fn is_float(&self) -> bool {
		matches!(self, NativeType::F32 | NativeType::F64)
	}

	/// Inclusive integer range, for integer types only.
	pub fn integer_bounds(&self) -> Option<(i128, i128)> {
		let bounds = match self {
			NativeType::I8 => (i8::MIN as i128, i8::MAX as i128),
			NativeType::I16 => (i16::MIN as i128, i16::MAX as i128),
			NativeType::I32 => (i32::MIN as i128, i32::MAX as i128),
			NativeType::I64 => (i64::MIN as i128, i64::MAX as i128),
			NativeType::U8 => (0, u8::MAX as i128),
			NativeType::U16 => (0, u16::MAX as i128),
			NativeType::U32 => (0, u32::MAX as i128),
			NativeType::U64 => (0, u64::MAX as i128),
			_ => return None,
		};
		Some(bounds)
	}

	/// The value a freshly constructed instance holds for this type.
	pub fn zero_value(&self) -> Value {
		match self {
			NativeType::String => Value::String(String::new()),
			t if t.is_integer() => Value::from(0),
			NativeType::F32 | NativeType::F64 => Value::from(0.0),
			NativeType::Bool => Value::Bool(false),
			_ => Value::Null,
		}
	}

	/// Parses a raw string (path parameter or annotation value) into a
	/// native value of this type.
	///
	/// # Examples
	///
	/// ```
	/// use rampart_admin::core::NativeType;
	/// use serde_json::json;
	///
	/// assert_eq!(NativeType::I64.parse("-5").unwrap(), json!(-5));
	/// assert!(NativeType::U8.parse("300").is_err());
	/// assert_eq!(NativeType::Bool.parse("true").unwrap(), json!(true));
	/// ```
	pub fn parse(&self, raw: &str) -> Result<Value, String> {
		match self {
			NativeType::String => Ok(Value::String(raw.to_string())),
			NativeType::Bool => match raw {
				"1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(Value::Bool(true)),
				"0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(Value::Bool(false)),
				other => Err(format!("invalid boolean '{}'", other)),
			},
			NativeType::F32 => raw
				.parse::<f32>()
				.map_err(|e| e.to_string())
				.and_then(|f| float_value(f64::from(f))),
			NativeType::F64 => raw
				.parse::<f64>()
				.map_err(|e| e.to_string())
				.and_then(float_value),
			NativeType::Date => NaiveDate::parse_from_str(raw, rampart_forms::fields::DATE_FORMAT)
				.map(|d| Value::String(d.format(rampart_forms::fields::DATE_FORMAT).to_string()))
				.map_err(|e| e.to_string()),
			NativeType::Uuid => Uuid::parse_str(raw)
				.map(|u| Value::String(u.hyphenated().to_string()))
				.map_err(|e| e.to_string()),
			NativeType::Other(name) => Err(format!("unsupported type: {}", name)),
			integer => {
				let (min, max) = integer.integer_bounds().unwrap_or((0, 0));
				let parsed = raw.parse::<i128>().map_err(|e| e.to_string())?;
				integer_value(parsed, min, max)
			}
		}
	}

	/// Checks that `value` can be stored in an attribute of this type,
	/// converting between numeric representations where lossless.
	pub fn coerce(&self, value: &Value) -> Result<Value, String> {
		let mismatch = || format!("expected {}, got {}", self.name(), value);
		match self {
			NativeType::String => value.as_str().map(|_| value.clone()).ok_or_else(mismatch),
			NativeType::Bool => value.as_bool().map(Value::Bool).ok_or_else(mismatch),
			NativeType::F32 | NativeType::F64 => {
				let f = value.as_f64().ok_or_else(mismatch)?;
				if *self == NativeType::F32 && f.is_finite() && f.abs() > f64::from(f32::MAX) {
					return Err(format!("{} overflows f32", f));
				}
				float_value(f)
			}
			NativeType::Date | NativeType::Uuid => {
				let raw = value.as_str().ok_or_else(mismatch)?;
				self.parse(raw)
			}
			NativeType::Other(_) => Ok(value.clone()),
			integer => {
				let (min, max) = integer.integer_bounds().unwrap_or((0, 0));
				let n = value
					.as_i64()
					.map(i128::from)
					.or_else(|| value.as_u64().map(i128::from))
					.ok_or_else(mismatch)?;
				integer_value(n, min, max)
			}
		}
	}
}

fn float_value(f: f64) -> Result<Value, String> {
	Number::from_f64(f)
		.map(Value::Number)
		.ok_or_else(|| format!("{} is not a finite number", f))
}

fn integer_value(n: i128, min: i128, max: i128) -> Result<Value, String> {
	if n < min || n > max {
		return Err(format!("{} is out of range [{}, {}]", n, min, max));
	}
	if let Ok(signed) = i64::try_from(n) {
		Ok(Value::from(signed))
	} else {
		u64::try_from(n)
			.map(Value::from)
			.map_err(|e| e.to_string())
	}
}

impl fmt::Display for NativeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// One attribute of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: String,
	pub native_type: NativeType,
	/// `key:value` pairs separated by `;`, e.g. `"listDisplay:exclude;required"`
	pub annotation: Option<String>,
}

impl Attribute {
	pub fn new(name: impl Into<String>, native_type: NativeType) -> Self {
		Self {
			name: name.into(),
			native_type,
			annotation: None,
		}
	}

	/// Attaches an annotation string.
	///
	/// # Examples
	///
	/// ```
	/// use rampart_admin::core::{Attribute, NativeType};
	///
	/// let title = Attribute::new("title", NativeType::String).annotated("required;maxLength:120");
	/// assert_eq!(title.annotation.as_deref(), Some("required;maxLength:120"));
	/// ```
	pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
		self.annotation = Some(annotation.into());
		self
	}
}

/// Shape of a registered model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
	type_name: String,
	attributes: Vec<Attribute>,
	template: Record,
}

impl ModelSchema {
	/// Builds a schema whose template holds each attribute's zero value.
	pub fn new(type_name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
		let template = attributes
			.iter()
			.map(|a| (a.name.clone(), a.native_type.zero_value()))
			.collect();
		Self {
			type_name: type_name.into(),
			attributes,
			template,
		}
	}

	/// Builds a schema around an explicit template, which must be an object.
	pub fn with_template(
		type_name: impl Into<String>,
		attributes: Vec<Attribute>,
		template: Value,
	) -> Result<Self, RegistrationError> {
		let type_name = type_name.into();
		match template {
			Value::Object(template) => Ok(Self {
				type_name,
				attributes,
				template,
			}),
			_ => Err(RegistrationError::NotAStruct(type_name)),
		}
	}

	/// Describes a typed model. The template is `T::default()` serialized.
	pub fn of<T: AdminModel>() -> Result<Self, RegistrationError> {
		let template = serde_json::to_value(T::default())
			.map_err(|_| RegistrationError::NotAStruct(T::type_name().to_string()))?;
		Self::with_template(T::type_name(), T::attributes(), template)
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn attributes(&self) -> &[Attribute] {
		&self.attributes
	}

	pub fn attribute(&self, name: &str) -> Option<&Attribute> {
		self.attributes.iter().find(|a| a.name == name)
	}

	/// Zero-value record new instances start from
	pub fn template(&self) -> &Record {
		&self.template
	}
}

/// Which form a custom field is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
	Add,
	Edit,
}

/// Produces a custom form field for an attribute, or `None` to keep the
/// derived one.
pub type FormFieldHook =
	Arc<dyn Fn(&str, FormMode) -> Option<Box<dyn FormField>> + Send + Sync>;

/// Optional registration hooks. Absent hooks fall back to derived values.
#[derive(Clone, Default)]
pub struct ModelHooks {
	/// Registered name; defaults to the schema's type name
	pub admin_name: Option<String>,
	/// Display name; defaults to the humanized registered name
	pub admin_display_name: Option<String>,
	pub form_field: Option<FormFieldHook>,
}

impl fmt::Debug for ModelHooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModelHooks")
			.field("admin_name", &self.admin_name)
			.field("admin_display_name", &self.admin_display_name)
			.field("form_field", &self.form_field.is_some())
			.finish()
	}
}

impl ModelHooks {
	pub fn with_admin_name(mut self, name: impl Into<String>) -> Self {
		self.admin_name = Some(name.into());
		self
	}

	pub fn with_admin_display_name(mut self, name: impl Into<String>) -> Self {
		self.admin_display_name = Some(name.into());
		self
	}

	pub fn with_form_field<F>(mut self, hook: F) -> Self
	where
		F: Fn(&str, FormMode) -> Option<Box<dyn FormField>> + Send + Sync + 'static,
	{
		self.form_field = Some(Arc::new(hook));
		self
	}

	/// Collects the hooks a typed model overrides.
	pub fn of<T: AdminModel>() -> Self {
		Self {
			admin_name: T::admin_name(),
			admin_display_name: T::admin_display_name(),
			form_field: Some(Arc::new(|attribute: &str, mode: FormMode| {
				T::admin_form_field(attribute, mode)
			})),
		}
	}
}

/// A Rust type that can be registered with the admin panel.
///
/// # Examples
///
/// ```
/// use rampart_admin::core::{AdminModel, Attribute, NativeType};
/// use serde::Serialize;
///
/// #[derive(Default, Serialize)]
/// struct Post {
/// 	id: i64,
/// 	title: String,
/// 	published: bool,
/// }
///
/// impl AdminModel for Post {
/// 	fn type_name() -> &'static str {
/// 		"Post"
/// 	}
///
/// 	fn attributes() -> Vec<Attribute> {
/// 		vec![
/// 			Attribute::new("id", NativeType::I64).annotated("addForm:exclude;editForm:exclude"),
/// 			Attribute::new("title", NativeType::String).annotated("required;maxLength:200"),
/// 			Attribute::new("published", NativeType::Bool),
/// 		]
/// 	}
/// }
/// ```
pub trait AdminModel: Serialize + Default + Send + Sync + 'static {
	fn type_name() -> &'static str;

	fn attributes() -> Vec<Attribute>;

	fn admin_name() -> Option<String> {
		None
	}

	fn admin_display_name() -> Option<String> {
		None
	}

	/// Supplies a custom form field for `attribute` in the given form.
	fn admin_form_field(_attribute: &str, _mode: FormMode) -> Option<Box<dyn FormField>> {
		None
	}
}
