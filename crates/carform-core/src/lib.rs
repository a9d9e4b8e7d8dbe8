//! Core models, validation and backend access for carform.
//!
//! This crate provides the car record, the state behind the car dialog and
//! the REST client used by the terminal front-end.

pub mod api;
pub mod error;
pub mod form;
pub mod list;
pub mod modal;
pub mod models;
pub mod validation;

pub use api::{ApiErrorBody, ApiResponse, CarApi, HttpCarApi, CONFLICT_CODE};
pub use error::{ApiError, FormError};
pub use form::{CarForm, Field, FormMode};
pub use list::{CarList, ListChange};
pub use modal::{
    CarFormModal, Completion, LifetimeToken, ServerError, SubmitOutcome, SubmitRequest,
    SubmitState, Submission, DUPLICATE_PLATE,
};
pub use models::{Car, Color, Manufacturer, YEARS, YEAR_UNSET};
pub use validation::{validate, FieldError, FieldErrors, Validation};
