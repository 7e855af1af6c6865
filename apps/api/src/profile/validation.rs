use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_AGE: i64 = 1;
const MAX_AGE: i64 = 120;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// Contact profile as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: String,
    pub age: i64,
    /// Class or degree.
    pub current_status: String,
    pub mobile: String,
    pub email: String,
}

/// A profile that passed boundary validation. Fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub age: i32,
    pub status: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.issues))]
pub struct ProfileValidationError {
    pub issues: Vec<FieldIssue>,
}

fn describe(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Checks every field and reports all problems at once.
pub fn validate_profile(req: &ProfileRequest) -> Result<NewProfile, ProfileValidationError> {
    let mut issues = Vec::new();

    let mut required = |field: &'static str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            issues.push(FieldIssue {
                field,
                reason: "must not be blank".to_string(),
            });
        }
        value.to_string()
    };

    let name = required("name", &req.name);
    let status = required("currentStatus", &req.current_status);
    let phone = required("mobile", &req.mobile);

    if !(MIN_AGE..=MAX_AGE).contains(&req.age) {
        issues.push(FieldIssue {
            field: "age",
            reason: format!("must be between {MIN_AGE} and {MAX_AGE}"),
        });
    }

    let email = req.email.trim().to_string();
    if !is_valid_email(&email) {
        issues.push(FieldIssue {
            field: "email",
            reason: "is not a valid email address".to_string(),
        });
    }

    if !issues.is_empty() {
        return Err(ProfileValidationError { issues });
    }

    Ok(NewProfile {
        name,
        // In range after the check above.
        age: req.age as i32,
        status,
        phone,
        email,
    })
}
