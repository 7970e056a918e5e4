//! Validation utilities.

use crate::MeridianError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `MeridianError` on failure.
    fn validate_request(&self) -> Result<(), MeridianError> {
        self.validate().map_err(validation_errors_to_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to a `MeridianError`.
#[must_use]
pub fn validation_errors_to_error(errors: ValidationErrors) -> MeridianError {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let detail = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string());
                format!("{}: {}", field, detail)
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    MeridianError::Validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email(message = "Invalid email address"))]
        email: String,
    }

    #[test]
    fn test_validate_request_maps_to_validation_error() {
        let probe = Probe {
            email: "not-an-email".to_string(),
        };
        let err = probe.validate_request().unwrap_err();
        match err {
            MeridianError::Validation(msg) => assert!(msg.contains("email")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_request_passes_valid_input() {
        let probe = Probe {
            email: "ada@example.com".to_string(),
        };
        assert!(probe.validate_request().is_ok());
    }
}
