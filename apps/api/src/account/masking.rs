//! Partial redaction for contact details shown on screen and in logs.

/// `jane@x.org` becomes `j***@x.org`. Local parts of two characters or fewer are shown as-is.
pub fn mask_email(email: &str) -> String {
    let Some((name, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    let len = name.chars().count();
    if len <= 2 {
        return email.to_string();
    }
    let first: String = name.chars().take(1).collect();
    format!("{first}{}@{domain}", "*".repeat((len - 1).min(3)))
}

/// Keeps the last four digits: `(***) ***-4567`.
pub fn mask_phone(phone: Option<&str>) -> String {
    let Some(phone) = phone.filter(|p| !p.is_empty()) else {
        return "Not set".to_string();
    };
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return phone.to_string();
    }
    let last_four: String = digits[digits.len() - 4..].iter().collect();
    format!("(***) ***-{last_four}")
}
