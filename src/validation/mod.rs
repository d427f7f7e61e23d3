//! Form field rules shared by customer registration and land forms.
//!
//! Validators return every failing field at once; callers decide how to
//! present them. Character classes are ASCII only: `regex` treats `\d` and
//! `\w` as Unicode.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$").expect("Invalid embedded pattern"));
static CONTACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("Invalid embedded pattern"));
static AADHAAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{12}$").expect("Invalid embedded pattern"));
static PAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("Invalid embedded pattern"));
static ETH_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("Invalid embedded pattern"));

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join field errors into one line for log output and error bodies.
pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_valid_contact(value: &str) -> bool {
    CONTACT.is_match(value)
}

pub fn is_valid_aadhaar(value: &str) -> bool {
    AADHAAR.is_match(value)
}

pub fn is_valid_pan(value: &str) -> bool {
    PAN.is_match(value)
}

pub fn is_eth_address(value: &str) -> bool {
    ETH_ADDRESS.is_match(value)
}

/// Identity documents must be PDF or JPEG.
pub fn is_identity_document(mime: &str) -> bool {
    matches!(mime, "application/pdf" | "image/jpeg" | "image/jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("riya.mehta@example.co.in"));
        assert!(is_valid_email("a-b@mail.example.com"));
        assert!(!is_valid_email("riya@"));
        assert!(!is_valid_email("riya@example.technology"));
    }

    #[test]
    fn test_digit_rules() {
        assert!(is_valid_contact("9876543210"));
        assert!(!is_valid_contact("987654321"));
        assert!(!is_valid_contact("98765x3210"));
        assert!(is_valid_aadhaar("123412341234"));
        assert!(!is_valid_aadhaar("12341234123"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(!is_valid_contact("९८७६५४३२१०"));
        assert!(!is_valid_aadhaar("١٢٣٤١٢٣٤١٢٣٤"));
        assert!(!is_valid_aadhaar("１２３４１２３４１２３４"));
    }

    #[test]
    fn test_pan() {
        assert!(is_valid_pan("ABCDE1234F"));
        assert!(!is_valid_pan("abcde1234f"));
        assert!(!is_valid_pan("ABCD1234F"));
    }

    #[test]
    fn test_eth_address() {
        assert!(is_eth_address("0xcd3B766CCDd6AE721141F452C550Ca635964ce71"));
        assert!(!is_eth_address("0xcd3B766CCDd6AE721141F452C550Ca635964ce7"));
        assert!(!is_eth_address("cd3B766CCDd6AE721141F452C550Ca635964ce71"));
    }

    #[test]
    fn test_summarize() {
        let errors = vec![
            FieldError::new("contact", "Contact must be 10 digits"),
            FieldError::new("pan", "Invalid PAN format"),
        ];
        assert_eq!(summarize(&errors), "Contact must be 10 digits; Invalid PAN format");
    }
}
