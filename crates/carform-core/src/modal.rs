//! The car dialog: form state, validation and submission lifecycle.
//!
//! The dialog never touches the network itself. [`CarFormModal::submit`]
//! hands out a [`SubmitRequest`] that the caller runs wherever it likes (the
//! terminal front-end uses a worker thread); the resulting [`Completion`] is
//! fed back through [`CarFormModal::complete`].

use crate::api::{ApiResponse, CarApi};
use crate::error::ApiError;
use crate::form::{CarForm, Field, FormMode};
use crate::list::ListChange;
use crate::models::Car;
use crate::validation::{validate, FieldErrors};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Banner text for a duplicate license plate number.
pub const DUPLICATE_PLATE: &str = "License plate number already exists in system";

/// Cancellation flag shared by a dialog and its in-flight request.
///
/// Closing the dialog cancels the token, which makes any later completion
/// stale.
#[derive(Debug, Clone, Default)]
pub struct LifetimeToken(Arc<AtomicBool>);

impl LifetimeToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Whether both handles belong to the same dialog.
    pub fn same_as(&self, other: &LifetimeToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Backend error banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerError {
    pub visible: bool,
    pub message: String,
}

/// Where the dialog is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Closed,
}

/// The write a submit attempt performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(Car),
    Update { original_id: String, car: Car },
}

impl Submission {
    pub fn car(&self) -> &Car {
        match self {
            Submission::Create(car) | Submission::Update { car, .. } => car,
        }
    }

    fn into_list_change(self) -> ListChange {
        match self {
            Submission::Create(car) => ListChange::Added(car),
            Submission::Update { original_id, car } => ListChange::Replaced { original_id, car },
        }
    }
}

/// A validated submit attempt, ready to be sent.
#[derive(Debug)]
pub struct SubmitRequest {
    submission: Submission,
    token: LifetimeToken,
}

impl SubmitRequest {
    /// Perform the request. Skips the network entirely if the dialog is
    /// already closed.
    pub fn send(self, api: &dyn CarApi) -> Completion {
        let result = if self.token.is_cancelled() {
            None
        } else {
            Some(match &self.submission {
                Submission::Create(car) => api.create(car),
                Submission::Update { original_id, car } => api.update(original_id, car),
            })
        };
        Completion {
            submission: self.submission,
            token: self.token,
            result,
        }
    }
}

/// The answer to a [`SubmitRequest`].
#[derive(Debug)]
pub struct Completion {
    submission: Submission,
    token: LifetimeToken,
    result: Option<Result<ApiResponse, ApiError>>,
}

impl Completion {
    /// True when the dialog that issued the request has been closed.
    pub fn is_stale(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// What a completion did to the dialog.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved; the caller applies the change to its list. The dialog is closed.
    Saved(ListChange),
    /// Duplicate license plate; the banner is shown.
    Conflict,
    /// Any other backend failure; logged only.
    Rejected { code: Option<i64> },
    /// The request never produced a usable answer; logged only.
    Transport,
    /// The dialog was closed before the answer arrived.
    Discarded,
}

/// The car dialog.
#[derive(Debug)]
pub struct CarFormModal {
    form: CarForm,
    errors: FieldErrors,
    server_error: ServerError,
    state: SubmitState,
    token: LifetimeToken,
}

impl CarFormModal {
    /// Open the dialog; `initial` selects update mode.
    pub fn open(initial: Option<&Car>) -> Self {
        let form = CarForm::new(initial);
        tracing::info!(
            "Opening car dialog ({})",
            match form.mode() {
                FormMode::Create => "create".to_string(),
                FormMode::Update { original_id } => format!("update {original_id}"),
            }
        );
        Self {
            form,
            errors: FieldErrors::default(),
            server_error: ServerError::default(),
            state: SubmitState::Idle,
            token: LifetimeToken::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        if self.form.is_update() {
            "Update Car"
        } else {
            "New Car"
        }
    }

    pub fn form(&self) -> &CarForm {
        &self.form
    }

    /// Mutable access for field edits.
    pub fn form_mut(&mut self) -> &mut CarForm {
        &mut self.form
    }

    pub fn car(&self) -> &Car {
        self.form.car()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.errors.visible_error(field)
    }

    pub fn server_error(&self) -> &ServerError {
        &self.server_error
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// The loading indicator.
    pub fn is_loading(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    pub fn is_closed(&self) -> bool {
        self.state == SubmitState::Closed
    }

    /// Recompute all field errors. Returns whether the form is valid.
    pub fn validate(&mut self) -> bool {
        let validation = validate(self.form.car());
        let valid = validation.is_valid();
        self.errors = validation.errors;
        valid
    }

    /// Start a submit attempt.
    ///
    /// Returns `None` when the form is invalid (errors are now shown), when a
    /// request is already in flight, or when the dialog is closed.
    pub fn submit(&mut self) -> Option<SubmitRequest> {
        match self.state {
            SubmitState::Submitting => {
                tracing::debug!("Submit ignored, request already in flight");
                return None;
            }
            SubmitState::Closed => return None,
            SubmitState::Idle => {}
        }

        self.server_error = ServerError::default();
        if !self.validate() {
            tracing::debug!("Car form has validation errors");
            return None;
        }

        let car = self.form.car().clone();
        let submission = match self.form.mode() {
            FormMode::Create => Submission::Create(car),
            FormMode::Update { original_id } => Submission::Update {
                original_id: original_id.clone(),
                car,
            },
        };

        self.state = SubmitState::Submitting;
        Some(SubmitRequest {
            submission,
            token: self.token.clone(),
        })
    }

    /// Apply the answer to a submit attempt.
    pub fn complete(&mut self, completion: Completion) -> SubmitOutcome {
        if completion.is_stale() || !completion.token.same_as(&self.token) {
            tracing::debug!("Dropping completion for a closed car dialog");
            return SubmitOutcome::Discarded;
        }

        let Some(result) = completion.result else {
            return SubmitOutcome::Discarded;
        };

        match result {
            Ok(response) if response.success => {
                tracing::info!("Car {} saved", completion.submission.car().license_plate_number);
                self.close();
                SubmitOutcome::Saved(completion.submission.into_list_change())
            }
            Ok(response) if response.is_conflict() => {
                tracing::warn!(
                    "Backend reports duplicate license plate {}",
                    completion.submission.car().license_plate_number
                );
                self.server_error = ServerError {
                    visible: true,
                    message: DUPLICATE_PLATE.to_string(),
                };
                self.state = SubmitState::Idle;
                SubmitOutcome::Conflict
            }
            Ok(response) => {
                tracing::error!("Backend rejected car: {:?}", response.error);
                self.state = SubmitState::Idle;
                SubmitOutcome::Rejected {
                    code: response.error_code(),
                }
            }
            Err(e) => {
                tracing::error!("Car request failed: {}", e);
                self.state = SubmitState::Idle;
                SubmitOutcome::Transport
            }
        }
    }

    /// Close the dialog (cancel or after a save). Any in-flight request becomes stale.
    pub fn close(&mut self) {
        self.token.cancel();
        self.state = SubmitState::Closed;
    }
}

impl Drop for CarFormModal {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
