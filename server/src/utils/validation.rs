//! Input validation helpers
//!
//! Bridges `validator` derive checks into [`AppError`]. Request bodies are
//! parsed into typed DTOs and validated here before any entity mutation.

use validator::Validate;

use crate::utils::AppError;

/// Run derive-based validation on a request DTO.
///
/// Rejects malformed payloads at the boundary, before any entity mutation.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(flatten_errors(&e)))
}

/// Flatten validator's nested error map into a single readable line.
fn flatten_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            if detail.is_empty() {
                format!("{field} is invalid")
            } else {
                format!("{field}: {detail}")
            }
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
        rating: u8,
    }

    #[test]
    fn test_valid_payload_passes() {
        let p = Probe {
            email: "ada@example.com".into(),
            rating: 4,
        };
        assert!(validate_payload(&p).is_ok());
    }

    #[test]
    fn test_invalid_payload_rejected_with_field_names() {
        let p = Probe {
            email: "not-an-email".into(),
            rating: 9,
        };
        let err = validate_payload(&p).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("email"));
                assert!(msg.contains("rating"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
