//! Field validation.
//!
//! Validity is tri-state: nobody has judged the field yet (`Unset`), or it
//! was judged `Valid`/`Invalid`. Validators return a tagged [`Validation`]
//! rather than a loosely typed flag-or-message value.
//!
//! # Example
//!
//! ```ignore
//! use formkit::validation::Validator;
//!
//! let name = Input::new(&cx)
//!     .with_validator(Validator::all(vec![
//!         Validator::required("Name is required"),
//!         Validator::min_length(3, "Name must be at least 3 characters"),
//!     ]));
//!
//! name.input("ab", &cx);
//! assert_eq!(name.error(), "Name must be at least 3 characters");
//! ```

mod error_display;
mod validator;
mod validity;

pub use error_display::ErrorDisplay;
pub use validator::{BoxFuture, Validation, Validator, ValidatorCall};
pub use validity::{Validity, ValidityState};
