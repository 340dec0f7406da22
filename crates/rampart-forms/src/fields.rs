// Basic fields
pub mod boolean_field;
pub mod float_field;
pub mod integer_field;
pub mod text_field;

// Selection fields
pub mod choice_field;

// Formatted fields
pub mod date_field;
pub mod email_field;
pub mod url_field;
pub mod uuid_field;

pub use boolean_field::BooleanField;
pub use choice_field::{Choice, ChoiceField, MultipleChoiceField};
pub use date_field::{DATE_FORMAT, DateField};
pub use email_field::EmailField;
pub use float_field::FloatField;
pub use integer_field::IntegerField;
pub use text_field::TextField;
pub use url_field::URLField;
pub use uuid_field::UUIDField;
