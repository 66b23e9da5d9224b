use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Syntactic check only; says nothing about deliverability.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        assert!(is_valid_email("jperez@example.com"));
        assert!(is_valid_email("j.perez+cmp@roster.org"));
    }

    #[test]
    fn test_rejects_login_names_and_malformed_addresses() {
        assert!(!is_valid_email("jperez"));
        assert!(!is_valid_email("jperez@"));
        assert!(!is_valid_email("jperez@example"));
        assert!(!is_valid_email("j perez@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_rejects_overlong_addresses() {
        let local = "a".repeat(250);
        assert!(!is_valid_email(&format!("{}@example.com", local)));
    }
}
