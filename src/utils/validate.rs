use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::questions::requests::{MAX_GRADE, MIN_GRADE};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const WEAK_PASSWORDS: &[&str] = &[
    "password", "12345678", "123456789", "qwerty123", "password1", "abcd1234", "iloveyou1",
    "staar2024", "teacher1", "student1",
];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 3 <= 长度 <= 32
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 年级：0 (K) 到 5
pub fn validate_grade_level(grade_level: i32) -> Result<(), &'static str> {
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade_level) {
        return Err("Grade level must be between 0 (K) and 5");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 密码策略：至少 8 位，同时包含字母和数字，不在常见弱密码表中
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ana.g").is_ok());
        assert!(validate_username("mr_lopez-4").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("teacher@school.org").is_ok());
        assert!(validate_email("no-at-sign.org").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_grade_level_bounds() {
        assert!(validate_grade_level(0).is_ok());
        assert!(validate_grade_level(5).is_ok());
        assert!(validate_grade_level(6).is_err());
        assert!(validate_grade_level(-1).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Bluebonnet42").is_valid);

        let short = validate_password("ab1");
        assert!(!short.is_valid);
        assert!(
            short
                .errors
                .contains(&"Password must be at least 8 characters long")
        );

        let letters_only = validate_password("armadillo");
        assert!(
            letters_only
                .errors
                .contains(&"Password must contain at least one digit")
        );

        let common = validate_password("Password1");
        assert!(
            common
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
