use reqwest::Url;

use crate::auth::AuthError;
use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=20;

pub fn validate_username(username: &str) -> Result<(), AppError> {
    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err(AppError::Validation(
            "Username must be between 3 and 20 characters.".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username can only contain letters, numbers, and underscores.".to_string(),
        ));
    }
    Ok(())
}

/// Lowercased, trimmed email, or a validation error when it cannot be one.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation(
            "Please enter a recovery email.".to_string(),
        ));
    }
    match email.split_once('@') {
        Some((name, domain)) if !name.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::Validation(
            "Please enter a valid email address.".to_string(),
        )),
    }
}

/// Length check plus optional confirmation match.
pub fn validate_new_password(password: &str, confirm: Option<&str>) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword.into());
    }
    if let Some(confirm) = confirm {
        if confirm != password {
            return Err(AppError::Validation(
                "Your passwords don't match. Please try again.".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn validate_first_name(first_name: &str) -> Result<(), AppError> {
    if first_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter your first name.".to_string(),
        ));
    }
    Ok(())
}

/// Where a reset link may send the user. A caller-supplied URL must share the
/// configured URL's origin (scheme, host and port); anything else is refused.
pub fn resolve_reset_redirect(requested: Option<&str>, configured: &str) -> Result<String, AppError> {
    let requested = match requested.map(str::trim).filter(|r| !r.is_empty()) {
        Some(r) => r,
        None => return Ok(configured.to_string()),
    };
    let same_origin = match (Url::parse(requested), Url::parse(configured)) {
        (Ok(req), Ok(cfg)) => req.origin() == cfg.origin(),
        _ => false,
    };
    if !same_origin {
        return Err(AppError::Validation(
            "That reset link destination is not allowed.".to_string(),
        ));
    }
    Ok(requested.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(20)).is_ok());
        assert!(validate_username(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_username_charset() {
        assert!(validate_username("maria_r2").is_ok());
        assert!(validate_username("maria r").is_err());
        assert!(validate_username("maría").is_err());
        assert!(validate_username("m@ria").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Maria@Example.org ").unwrap(),
            "maria@example.org"
        );
        assert!(normalize_email("").is_err());
        assert!(normalize_email("maria").is_err());
        assert!(normalize_email("@example.org").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(matches!(
            validate_new_password("12345", None),
            Err(AppError::Auth(AuthError::WeakPassword))
        ));
        assert!(validate_new_password("123456", None).is_ok());
        assert!(validate_new_password("123456", Some("123456")).is_ok());
        assert!(matches!(
            validate_new_password("123456", Some("654321")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_first_name_required() {
        assert!(validate_first_name("   ").is_err());
        assert!(validate_first_name("Ana").is_ok());
    }

    #[test]
    fn test_reset_redirect_must_match_configured_origin() {
        let configured = "https://anchor.example.org/reset-password";
        assert_eq!(resolve_reset_redirect(None, configured).unwrap(), configured);
        assert_eq!(resolve_reset_redirect(Some("  "), configured).unwrap(), configured);
        assert_eq!(
            resolve_reset_redirect(Some("https://anchor.example.org/reset-password?lang=es"), configured)
                .unwrap(),
            "https://anchor.example.org/reset-password?lang=es"
        );
        for hostile in [
            "https://evil.example.com/reset-password",
            "http://anchor.example.org/reset-password",
            "https://anchor.example.org:8443/reset-password",
            "https://anchor.example.org.evil.com/",
            "javascript:alert(1)",
            "/reset-password",
        ] {
            assert!(
                matches!(
                    resolve_reset_redirect(Some(hostile), configured),
                    Err(AppError::Validation(_))
                ),
                "{hostile} accepted"
            );
        }
    }
}
