use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

const MIN_PASSWORD_CHARS: usize = 8;

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        hash(password, DEFAULT_COST).map_err(|e| AppError::Internal(format!("password hash: {e}")))
    }

    pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
        verify(password, hashed)
            .map_err(|e| AppError::Internal(format!("password verify: {e}")))
    }

    /// Shared by owner signup and staff provisioning: a minimum length
    /// plus at least one letter and one digit.
    pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::BadRequest(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }
        if !password.chars().any(|c| c.is_alphabetic())
            || !password.chars().any(|c| c.is_ascii_digit())
        {
            return Err(AppError::BadRequest(
                "password needs at least one letter and one digit".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_check() {
        assert!(PasswordService::validate_password_strength("short1").is_err());
        assert!(PasswordService::validate_password_strength("lettersonly").is_err());
        assert!(PasswordService::validate_password_strength("12345678").is_err());
        assert!(PasswordService::validate_password_strength("goalpost9").is_ok());
    }

    #[test]
    fn hash_and_verify() {
        let hashed = PasswordService::hash_password("goalpost9").unwrap();
        assert!(PasswordService::verify_password("goalpost9", &hashed).unwrap());
        assert!(!PasswordService::verify_password("offside", &hashed).unwrap());
    }
}
