//! Signup and contact form validation.
//!
//! Every failing field is reported at once, keyed by the camelCase field
//! name the client sent.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ContactRequest, SignupRequest};

pub type FieldErrors = BTreeMap<&'static str, &'static str>;

pub const MIN_PASSWORD_LEN: usize = 8;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid literal"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address");
    }
}

pub fn validate_signup(form: &SignupRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if form.first_name.trim().is_empty() {
        errors.insert("firstName", "First name is required");
    }
    if form.last_name.trim().is_empty() {
        errors.insert("lastName", "Last name is required");
    }
    check_email(&mut errors, &form.email);

    if form.password.is_empty() {
        errors.insert("password", "Password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert("password", "Password must be at least 8 characters");
    }

    if form.confirm_password.is_empty() {
        errors.insert("confirmPassword", "Please confirm your password");
    } else if form.password != form.confirm_password {
        errors.insert("confirmPassword", "Passwords do not match");
    }

    if !form.agree_to_terms {
        errors.insert("agreeToTerms", "You must agree to the terms and conditions");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_contact(form: &ContactRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if form.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }
    check_email(&mut errors, &form.email);
    if form.subject.trim().is_empty() {
        errors.insert("subject", "Subject is required");
    }
    if form.message.trim().is_empty() {
        errors.insert("message", "Message is required");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
