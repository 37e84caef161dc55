//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length accepted at registration.
const MAX_PASSWORD_LENGTH: usize = 30;
/// Special characters satisfying the character-class rule.
const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&";

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate a password against the registration policy.
///
/// Collects one message per violated rule so a weak password reports
/// everything wrong with it in a single response. Login does not re-apply
/// this policy; hashes created under older rules must keep working.
pub fn validate_password_strength(password: &str) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if password.is_empty() {
        errors.push("Password cannot be empty".to_string());
    } else if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    } else if password.len() > MAX_PASSWORD_LENGTH {
        errors.push(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        ));
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    if !password.is_empty() && !(has_upper && has_lower && has_digit && has_special) {
        errors.push(
            "Password must include uppercase, lowercase, a digit, and a special character"
                .to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");

        // The hash must be a valid PHC string starting with the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = verify_password(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(validate_password_strength("Str0ng&Secure").is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let errors = validate_password_strength("Ab1&").unwrap_err();
        assert!(errors.contains(&"Password must be at least 8 characters long".to_string()));
    }

    #[test]
    fn test_long_password_rejected() {
        let long = format!("Aa1&{}", "x".repeat(40));
        let errors = validate_password_strength(&long).unwrap_err();
        assert!(errors.contains(&"Password cannot exceed 30 characters".to_string()));
    }

    #[test]
    fn test_missing_character_classes_rejected() {
        let errors = validate_password_strength("alllowercase").unwrap_err();
        assert!(errors.contains(
            &"Password must include uppercase, lowercase, a digit, and a special character"
                .to_string()
        ));
    }

    #[test]
    fn test_empty_password_rejected() {
        let errors = validate_password_strength("").unwrap_err();
        assert_eq!(errors, vec!["Password cannot be empty".to_string()]);
    }

    #[test]
    fn test_weak_password_collects_all_violations() {
        // Too short AND missing uppercase/digit/special.
        let errors = validate_password_strength("abc").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
