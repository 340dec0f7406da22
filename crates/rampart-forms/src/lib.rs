//! Form fields and form validation for the Rampart admin panel
//!
//! This crate provides:
//! - Typed form fields (text, integer, float, boolean, choice, multiple
//!   choice, date, email, URL, UUID) that render themselves as HTML inputs,
//!   validate native values and convert between wire strings and native
//!   `serde_json::Value`s
//! - [`Form`], an ordered collection of named fields with cross-field
//!   validation and `<p>`/`<ul>`/`<table>` rendering
//! - [`convert_form_data`] for turning multi-valued submissions into wire
//!   values

pub mod field;
pub mod fields;
pub mod form;
pub mod form_data;

pub use field::{
	BaseField, FieldError, FieldResult, FieldValidator, FormField, HtmlAttributes,
	ValidationOutcome, escape_html, validator,
};
pub use fields::{
	BooleanField, Choice, ChoiceField, DateField, EmailField, FloatField, IntegerField,
	MultipleChoiceField, TextField, URLField, UUIDField,
};
pub use form::{ALL_FIELDS_KEY, Form, FormError, FormResult, ValidationReport};
pub use form_data::convert_form_data;
