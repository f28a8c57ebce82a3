use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::services::is_valid_email;

/// Request body for register and login.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    /// Presence and format checks shared by register and login. Collects
    /// every failure so the client sees the full list at once.
    pub fn validate(self) -> Result<(String, String), Vec<String>> {
        let mut errors = Vec::new();

        let email = self
            .email
            .map(|e| e.trim().to_lowercase())
            .unwrap_or_default();
        if email.is_empty() {
            errors.push("Email is required".to_string());
        } else if email.len() > 255 || !is_valid_email(&email) {
            errors.push("Invalid email address".to_string());
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.push("Password is required".to_string());
        } else if password.len() <= 4 {
            errors.push("Password too short".to_string());
        }

        if errors.is_empty() {
            Ok((email, password))
        } else {
            Err(errors)
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

/// Response for POST /users.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
    pub token: String,
}

/// Response for POST /users/token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: Option<&str>, password: Option<&str>) -> CredentialsForm {
        CredentialsForm {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn valid_credentials_pass_and_normalize() {
        let (email, password) = form(Some("  A@X.com "), Some("secret1"))
            .validate()
            .expect("valid form");
        assert_eq!(email, "a@x.com");
        assert_eq!(password, "secret1");
    }

    #[test]
    fn missing_fields_collect_both_errors() {
        let errors = form(None, None).validate().unwrap_err();
        assert_eq!(errors, vec!["Email is required", "Password is required"]);
    }

    #[test]
    fn malformed_email_is_rejected() {
        let errors = form(Some("nope"), Some("secret1")).validate().unwrap_err();
        assert_eq!(errors, vec!["Invalid email address"]);
    }

    #[test]
    fn overlong_email_is_rejected() {
        let email = format!("{}@x.com", "a".repeat(255));
        let errors = form(Some(email.as_str()), Some("secret1"))
            .validate()
            .unwrap_err();
        assert_eq!(errors, vec!["Invalid email address"]);
    }

    #[test]
    fn short_password_is_rejected() {
        // the minimum is five characters
        let errors = form(Some("a@x.com"), Some("1234")).validate().unwrap_err();
        assert_eq!(errors, vec!["Password too short"]);

        assert!(form(Some("a@x.com"), Some("12345")).validate().is_ok());
    }

    #[test]
    fn public_user_serializes_id_and_email() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
        };
        let json = serde_json::to_value(&user).expect("serialize");
        assert_eq!(json["email"], "test@example.com");
        assert!(json["id"].is_string());
    }
}
