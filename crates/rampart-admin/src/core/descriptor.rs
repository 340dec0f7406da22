//! Field descriptor builder
//!
//! Turns a [`ModelSchema`] plus its registration hooks into one
//! [`FieldConfig`] per attribute. Annotation strings are
//! semicolon-separated `key:value` (or bare `key`) pairs:
//!
//! | key | meaning |
//! |-----|---------|
//! | `listDisplay`, `listFetch`, `search`, `view`, `addForm`, `editForm` | `include` or `exclude` |
//! | `displayName` | display name override |
//! | `placeholder`, `regex`, `maxLength`, `minLength` | text widget constraints |
//! | `max`, `min` | numeric widget bounds |
//! | `required` | bare flag |
//! | `initial` | initial value, parsed as the attribute's native type |
//!
//! Unknown keys are ignored.

use super::schema::{Attribute, FormMode, ModelHooks, ModelSchema, NativeType};
use super::utils::humanize_name;
use crate::types::RegistrationError;
use rampart_forms::{BooleanField, FloatField, FormField, IntegerField, TextField};
use regex::Regex;
use std::str::FromStr;

/// Visibility flags and form bindings for one attribute
#[derive(Debug, Clone)]
pub struct FieldConfig {
	pub name: String,
	pub display_name: String,
	pub native_type: NativeType,
	pub include_in_list_fetch: bool,
	pub include_in_list_display: bool,
	pub include_in_search: bool,
	pub include_in_instance_view: bool,
	/// `None` means the attribute is not rendered in the add form
	pub add_form_field: Option<Box<dyn FormField>>,
	/// `None` means the attribute is not rendered in the edit form
	pub edit_form_field: Option<Box<dyn FormField>>,
}

impl FieldConfig {
	/// The primary-key attribute is the one named `ID`, in any case.
	pub fn is_primary_key_name(name: &str) -> bool {
		name.eq_ignore_ascii_case("id")
	}

	pub fn form_field(&self, mode: FormMode) -> Option<&dyn FormField> {
		match mode {
			FormMode::Add => self.add_form_field.as_deref(),
			FormMode::Edit => self.edit_form_field.as_deref(),
		}
	}
}

/// Splits an annotation into `(key, value)` pairs. Bare keys get an empty value.
fn parse_annotation(annotation: &str) -> Vec<(&str, &str)> {
	annotation
		.split(';')
		.map(|pair| pair.split_once(':').unwrap_or((pair, "")))
		.collect()
}

fn include_flag(key: &str, value: &str) -> Result<bool, RegistrationError> {
	match value {
		"include" => Ok(true),
		"exclude" => Ok(false),
		other => Err(RegistrationError::InvalidTagValue {
			key: key.to_string(),
			value: other.to_string(),
		}),
	}
}

fn convert<T>(value: &str, target: &str) -> Result<T, RegistrationError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	value
		.parse::<T>()
		.map_err(|e| RegistrationError::InvalidTagConversion {
			value: value.to_string(),
			native_type: target.to_string(),
			reason: e.to_string(),
		})
}

/// Derives the default widget for an attribute from its native type and
/// annotation. Types without a default widget yield `None`.
fn default_widget(
	attribute: &Attribute,
	display_name: &str,
	pairs: &[(&str, &str)],
) -> Result<Option<Box<dyn FormField>>, RegistrationError> {
	let name = attribute.name.clone();
	let native_type = &attribute.native_type;

	let mut widget: Box<dyn FormField> = match native_type {
		NativeType::String => {
			let mut field = TextField::new(name).with_label(display_name);
			for &(key, value) in pairs {
				match key {
					"placeholder" => field.placeholder = Some(value.to_string()),
					"required" => field.required = true,
					"regex" => {
						let regex = Regex::new(value).map_err(|e| {
							RegistrationError::InvalidTagConversion {
								value: value.to_string(),
								native_type: "Regex".to_string(),
								reason: e.to_string(),
							}
						})?;
						field.regex = Some(regex);
					}
					"maxLength" => field.max_length = Some(convert(value, "usize")?),
					"minLength" => field.min_length = Some(convert(value, "usize")?),
					_ => {}
				}
			}
			Box::new(field)
		}
		t if t.is_integer() => {
			let mut field = IntegerField::new(name).with_label(display_name);
			// Bounds wider than i64 are already enforced by wire parsing.
			if let Some((min, max)) = t.integer_bounds() {
				field.min_value = (min > i64::MIN as i128).then_some(min as i64);
				field.max_value = (max < i64::MAX as i128).then_some(max as i64);
			}
			for &(key, value) in pairs {
				match key {
					"required" => field.required = true,
					"max" => field.max_value = Some(convert(value, "i64")?),
					"min" => field.min_value = Some(convert(value, "i64")?),
					_ => {}
				}
			}
			Box::new(field)
		}
		t if t.is_float() => {
			let mut field = FloatField::new(name).with_label(display_name);
			for &(key, value) in pairs {
				match key {
					"required" => field.required = true,
					"max" => field.max_value = Some(convert(value, "f64")?),
					"min" => field.min_value = Some(convert(value, "f64")?),
					_ => {}
				}
			}
			Box::new(field)
		}
		NativeType::Bool => {
			let mut field = BooleanField::new(name).with_label(display_name);
			if pairs.iter().any(|&(key, _)| key == "required") {
				field.required = true;
			}
			Box::new(field)
		}
		_ => return Ok(None),
	};

	for &(key, value) in pairs {
		if key == "initial" {
			let initial = native_type.parse(value).map_err(|reason| {
				RegistrationError::InvalidTagConversion {
					value: value.to_string(),
					native_type: native_type.name().to_string(),
					reason,
				}
			})?;
			widget.set_initial(initial);
		}
	}

	Ok(Some(widget))
}

/// Builds the field config of one attribute.
pub fn build_field_config(
	attribute: &Attribute,
	hooks: &ModelHooks,
) -> Result<FieldConfig, RegistrationError> {
	let name = attribute.name.as_str();
	let mut display_name = humanize_name(name);
	let mut include_in_list_display = true;
	let mut include_in_list_fetch = true;
	let mut include_in_search = true;
	let mut include_in_instance_view = true;
	let mut include_in_add_form = true;
	let mut include_in_edit_form = true;

	let pairs = attribute
		.annotation
		.as_deref()
		.filter(|a| !a.is_empty())
		.map(parse_annotation)
		.unwrap_or_default();

	if !pairs.is_empty() {
		let mut fetch_explicit = false;
		for &(key, value) in &pairs {
			match key {
				"listDisplay" => include_in_list_display = include_flag(key, value)?,
				"listFetch" => {
					fetch_explicit = true;
					include_in_list_fetch = include_flag(key, value)?;
				}
				"search" => include_in_search = include_flag(key, value)?,
				"view" => include_in_instance_view = include_flag(key, value)?,
				"addForm" => include_in_add_form = include_flag(key, value)?,
				"editForm" => include_in_edit_form = include_flag(key, value)?,
				"displayName" => display_name = value.to_string(),
				_ => {}
			}
		}
		if !fetch_explicit {
			include_in_list_fetch =
				FieldConfig::is_primary_key_name(name) || include_in_list_display;
		}
	}

	let widget = if include_in_add_form || include_in_edit_form {
		default_widget(attribute, &display_name, &pairs)?
	} else {
		None
	};

	let mut add_form_field = widget.clone().filter(|_| include_in_add_form);
	let mut edit_form_field = widget.filter(|_| include_in_edit_form);

	if let Some(hook) = &hooks.form_field {
		if let Some(custom) = hook(name, FormMode::Add) {
			add_form_field = Some(custom);
		}
		if let Some(custom) = hook(name, FormMode::Edit) {
			edit_form_field = Some(custom);
		}
	}

	Ok(FieldConfig {
		name: name.to_string(),
		display_name,
		native_type: attribute.native_type.clone(),
		include_in_list_fetch,
		include_in_list_display,
		include_in_search,
		include_in_instance_view,
		add_form_field,
		edit_form_field,
	})
}

/// Builds field configs for every attribute of `schema`, in declaration order.
pub fn build_field_configs(
	schema: &ModelSchema,
	hooks: &ModelHooks,
) -> Result<Vec<FieldConfig>, RegistrationError> {
	schema
		.attributes()
		.iter()
		.map(|attribute| build_field_config(attribute, hooks))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn build(attribute: Attribute) -> FieldConfig {
		build_field_config(&attribute, &ModelHooks::default()).unwrap()
	}

	#[rstest]
	fn test_defaults_without_annotation() {
		// Arrange
		let attribute = Attribute::new("firstName", NativeType::String);

		// Act
		let config = build(attribute);

		// Assert
		assert_eq!(config.display_name, "First Name");
		assert!(config.include_in_list_fetch);
		assert!(config.include_in_list_display);
		assert!(config.include_in_search);
		assert!(config.include_in_instance_view);
		assert!(config.add_form_field.is_some());
		assert!(config.edit_form_field.is_some());
	}

	#[rstest]
	#[case("title", "listDisplay:exclude", false)]
	#[case("ID", "listDisplay:exclude", true)]
	#[case("id", "listDisplay:exclude", true)]
	#[case("id", "listDisplay:exclude;listFetch:exclude", false)]
	#[case("title", "listDisplay:exclude;listFetch:include", true)]
	#[case("title", "search:exclude", true)]
	fn test_list_fetch_follows_list_display(
		#[case] name: &str,
		#[case] annotation: &str,
		#[case] expected_fetch: bool,
	) {
		let config = build(Attribute::new(name, NativeType::I64).annotated(annotation));

		assert_eq!(config.include_in_list_fetch, expected_fetch);
	}

	#[rstest]
	#[case("listDisplay:hide")]
	#[case("search")]
	#[case("view:yes")]
	#[case("addForm:")]
	fn test_invalid_visibility_value(#[case] annotation: &str) {
		let attribute = Attribute::new("title", NativeType::String).annotated(annotation);

		let result = build_field_config(&attribute, &ModelHooks::default());

		assert!(matches!(result, Err(RegistrationError::InvalidTagValue { .. })));
	}

	#[rstest]
	fn test_unknown_keys_are_ignored() {
		let config = build(Attribute::new("title", NativeType::String).annotated("colour:blue;;"));

		assert!(config.include_in_list_display);
	}

	#[rstest]
	fn test_display_name_override() {
		let config = build(Attribute::new("dob", NativeType::Date).annotated("displayName:Date of birth"));

		assert_eq!(config.display_name, "Date of birth");
	}

	#[rstest]
	fn test_text_constraints_are_applied() {
		// Arrange
		let attribute = Attribute::new("code", NativeType::String)
			.annotated("required;maxLength:4;placeholder:ABCD;regex:^[A-Z]+$;initial:AB");

		// Act
		let config = build(attribute);
		let field = config.add_form_field.as_deref().unwrap();

		// Assert
		assert_eq!(field.label(), "Code");
		assert_eq!(field.initial(), Some(&json!("AB")));
		let errors = field.validate(&json!("abcde")).unwrap();
		assert!(errors.iter().any(|e| e.contains("maximum length of 4")));
		assert!(errors.iter().any(|e| e == "input does not match the required pattern"));
		assert!(field.html().unwrap().contains(r#"placeholder="ABCD""#));
	}

	#[rstest]
	fn test_integer_bounds_and_initial() {
		let attribute = Attribute::new("age", NativeType::U8).annotated("min:18;max:99;initial:21");

		let config = build(attribute);
		let field = config.edit_form_field.as_deref().unwrap();

		assert_eq!(field.initial(), Some(&json!(21)));
		assert!(!field.validate(&json!(10)).unwrap().is_empty());
		assert!(field.validate(&json!(30)).unwrap().is_empty());
	}

	#[rstest]
	#[case(NativeType::U32, -1, false)]
	#[case(NativeType::U32, 4_294_967_295, true)]
	#[case(NativeType::U32, 5_000_000_000, false)]
	#[case(NativeType::I8, -128, true)]
	#[case(NativeType::I8, 128, false)]
	#[case(NativeType::I64, i64::MIN, true)]
	#[case(NativeType::I64, i64::MAX, true)]
	fn test_integer_bounds_follow_native_type(
		#[case] native_type: NativeType,
		#[case] value: i64,
		#[case] valid: bool,
	) {
		let config = build(Attribute::new("count", native_type));
		let field = config.edit_form_field.as_deref().unwrap();

		let errors = field.validate(&json!(value)).unwrap();

		assert_eq!(errors.is_empty(), valid, "{:?}", errors);
	}

	#[rstest]
	fn test_annotation_narrows_native_bounds() {
		let attribute = Attribute::new("stock", NativeType::U16).annotated("max:500");

		let config = build(attribute);
		let field = config.add_form_field.as_deref().unwrap();

		assert!(!field.validate(&json!(501)).unwrap().is_empty());
		assert!(!field.validate(&json!(-1)).unwrap().is_empty());
		assert!(field.validate(&json!(0)).unwrap().is_empty());
	}

	#[rstest]
	#[case(NativeType::String, "maxLength:-1")]
	#[case(NativeType::I32, "max:ten")]
	#[case(NativeType::F64, "min:low")]
	#[case(NativeType::U8, "initial:300")]
	#[case(NativeType::String, "regex:[")]
	fn test_invalid_conversion(#[case] native_type: NativeType, #[case] annotation: &str) {
		let attribute = Attribute::new("value", native_type).annotated(annotation);

		let result = build_field_config(&attribute, &ModelHooks::default());

		assert!(matches!(result, Err(RegistrationError::InvalidTagConversion { .. })));
	}

	#[rstest]
	fn test_form_exclusion() {
		let config = build(Attribute::new("id", NativeType::I64).annotated("addForm:exclude"));

		assert!(config.add_form_field.is_none());
		assert!(config.edit_form_field.is_some());
	}

	#[rstest]
	fn test_unsupported_type_has_no_widget() {
		let config = build(Attribute::new("location", NativeType::Other("Point".into())));

		assert!(config.add_form_field.is_none());
		assert!(config.edit_form_field.is_none());
	}

	#[rstest]
	fn test_hook_overrides_each_mode_independently() {
		// Arrange
		let hooks = ModelHooks::default().with_form_field(|attribute, mode| {
			(attribute == "status" && mode == FormMode::Edit).then(|| {
				Box::new(TextField::new("status".to_string()).with_label("Custom")) as Box<dyn FormField>
			})
		});
		let attribute = Attribute::new("status", NativeType::Other("Status".into()))
			.annotated("editForm:exclude");

		// Act
		let config = build_field_config(&attribute, &hooks).unwrap();

		// Assert
		assert!(config.add_form_field.is_none());
		assert_eq!(config.edit_form_field.as_deref().unwrap().label(), "Custom");
	}
}
