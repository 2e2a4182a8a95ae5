//! The validation entry points.

use crate::check::{Checker, CustomCheck, CustomChecks};
use crate::error::{PayloadError, Rejection};
use crate::messages::{self, MessageTable};
use crate::payload::Payload;
use crate::settings::ValidatorSettings;
use crate::value::FieldValue;
use crate::violation::Violation;
use std::fmt;
use std::sync::{Arc, LazyLock};

static DEFAULT_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::new);

/// Validates payloads and renders their violations.
///
/// A validator without its own table renders with the process-wide table
/// (see [`crate::install_message_table`]), resolved on each call.
#[derive(Clone, Default)]
pub struct Validator {
    table: Option<Arc<MessageTable>>,
    settings: ValidatorSettings,
    checks: CustomChecks,
}

impl Validator {
    /// Validator with default settings and the process-wide table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render with `table` instead of the process-wide table.
    #[must_use]
    pub fn with_table(mut self, table: MessageTable) -> Self {
        self.table = Some(Arc::new(table));
        self
    }

    /// Replace the rendering settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ValidatorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a check for a custom tag.
    ///
    /// Registering a built-in tag has no effect; built-in kinds are always
    /// evaluated by their own checks.
    #[must_use]
    pub fn with_check<F>(mut self, tag: impl Into<String>, check: F) -> Self
    where
        F: Fn(&FieldValue<'_>, Option<&str>) -> bool + Send + Sync + 'static,
    {
        let check: CustomCheck = Arc::new(check);
        self.checks.insert(tag.into(), check);
        self
    }

    /// Rendering settings.
    #[must_use]
    pub const fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// Effective message table.
    #[must_use]
    pub fn table(&self) -> Arc<MessageTable> {
        self.table
            .as_ref()
            .map_or_else(messages::message_table, Arc::clone)
    }

    /// Raw violations of `payload`, in evaluation order.
    #[must_use]
    pub fn violations(&self, payload: &dyn Payload) -> Vec<Violation> {
        let mut violations = Vec::new();
        Checker::new(&self.checks).check_payload(payload, None, &mut violations);
        violations
    }

    /// Validate and normalize an owned payload.
    ///
    /// `None` is rejected with [`PayloadError::InvalidPayload`] before any
    /// constraint is looked at. A rejected payload is handed back untouched.
    pub fn validate<T: Payload>(&self, payload: Option<T>) -> Result<T, Rejection<T>> {
        let Some(payload) = payload else {
            tracing::debug!("rejected missing payload");
            return Err(Rejection::new(None, PayloadError::InvalidPayload));
        };
        match self.check(&payload) {
            Ok(()) => Ok(payload.normalized()),
            Err(error) => Err(Rejection::new(Some(payload), error)),
        }
    }

    /// Validate a borrowed payload without normalizing it.
    pub fn check(&self, payload: &dyn Payload) -> Result<(), PayloadError> {
        let violations = self.violations(payload);
        if violations.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            payload = payload.type_name(),
            violations = violations.len(),
            "payload rejected"
        );

        let rendered = match payload.violation_formatter() {
            Some(formatter) => formatter.format_violations(&violations).map_err(|error| {
                tracing::warn!(
                    payload = payload.type_name(),
                    error = %error,
                    "violation formatter failed"
                );
                PayloadError::Formatter(error)
            })?,
            None => self.render(&violations),
        };
        Err(PayloadError::Constraint {
            message: self.join(&rendered),
            violations,
        })
    }

    /// Render violations with the settings' overrides, then the table.
    #[must_use]
    pub fn render(&self, violations: &[Violation]) -> Vec<String> {
        let table = self.table();
        let case = self.settings.field_case;
        violations
            .iter()
            .map(|violation| match self.settings.messages.get(violation.tag()) {
                Some(template) => messages::render_with(template, violation, case),
                None => table.render(violation, case),
            })
            .collect()
    }

    /// Join rendered messages with the configured separator.
    #[must_use]
    pub fn join(&self, messages: &[String]) -> String {
        messages.join(&self.settings.separator)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Validator")
            .field("own_table", &self.table.is_some())
            .field("settings", &self.settings)
            .field("checks", &self.checks.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Validate and normalize a payload with the process-wide validator.
///
/// # Examples
///
/// ```
/// use dtoguard_validation::{Payload, validate_dto};
///
/// #[derive(Debug, Payload)]
/// struct Signup {
///     #[validate(required)]
///     name: String,
///     #[validate(gte = 18)]
///     age: u32,
/// }
///
/// let rejection = validate_dto(Some(Signup { name: String::new(), age: 17 })).unwrap_err();
/// assert_eq!(
///     rejection.to_string(),
///     "name is required, age must be greater than or equal to 18"
/// );
/// ```
pub fn validate_dto<T: Payload>(payload: Option<T>) -> Result<T, Rejection<T>> {
    DEFAULT_VALIDATOR.validate(payload)
}

/// Validate a borrowed payload with the process-wide validator.
pub fn validate_ref(payload: &dyn Payload) -> Result<(), PayloadError> {
    DEFAULT_VALIDATOR.check(payload)
}
