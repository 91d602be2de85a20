//! Declarative form validation.
//!
//! A [`Schema`] lists fields with ordered rules plus cross-field checks and
//! optional async refinements; [`validate`] turns untrusted JSON input into a
//! uniform [`FormValidation`].

pub mod forms;
pub mod result;
pub mod runner;
pub mod schema;

pub use result::{FORM_ERROR_KEY, FieldErrors, FormValidation};
pub use runner::{validate, validate_as};
pub use schema::{AsyncRefinement, CrossField, Field, FieldKind, Issue, Rule, Schema};
