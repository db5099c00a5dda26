//! Validation rules for the user creation form
//!
//! Rules are declared per field in a static table and evaluated
//! synchronously, independent of any widget.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Role, UserRegistrationRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Fields of the user creation form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
    Phone,
    Password,
    Role,
}

impl UserField {
    pub const ALL: [UserField; 5] = [
        UserField::Name,
        UserField::Email,
        UserField::Phone,
        UserField::Password,
        UserField::Role,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UserField::Name => "Full name",
            UserField::Email => "Email",
            UserField::Phone => "Phone number",
            UserField::Password => "Password",
            UserField::Role => "Role",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            UserField::Name => "Enter full name",
            UserField::Email => "Enter email",
            UserField::Phone => "Enter phone number",
            UserField::Password => "Enter password",
            UserField::Role => "Select role",
        }
    }
}

/// A single validation rule with its user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required(&'static str),
    Email(&'static str),
    MinLength(usize, &'static str),
}

impl Rule {
    /// Returns the rule's message when `value` breaks it
    pub fn check(&self, value: &str) -> Option<&'static str> {
        match *self {
            // Whitespace counts as a value
            Rule::Required(message) => value.is_empty().then_some(message),
            // Syntax rules only apply once a value is present
            Rule::Email(message) => {
                (!value.is_empty() && !is_valid_email(value)).then_some(message)
            }
            Rule::MinLength(min, message) => {
                (!value.is_empty() && value.chars().count() < min).then_some(message)
            }
        }
    }
}

const NAME_RULES: &[Rule] = &[Rule::Required("Please enter a full name!")];
const EMAIL_RULES: &[Rule] = &[
    Rule::Required("Please enter an email!"),
    Rule::Email("Invalid email address!"),
];
const PHONE_RULES: &[Rule] = &[Rule::Required("Please enter a phone number!")];
const PASSWORD_RULES: &[Rule] = &[
    Rule::Required("Please enter a password!"),
    Rule::MinLength(MIN_PASSWORD_LEN, "Password must be at least 6 characters!"),
];
const ROLE_RULES: &[Rule] = &[Rule::Required("Please select a role!")];

/// Rule table keyed by field
pub fn rules_for(field: UserField) -> &'static [Rule] {
    match field {
        UserField::Name => NAME_RULES,
        UserField::Email => EMAIL_RULES,
        UserField::Phone => PHONE_RULES,
        UserField::Password => PASSWORD_RULES,
        UserField::Role => ROLE_RULES,
    }
}

/// Validate one field, returning the first failing rule's message
pub fn validate(field: UserField, value: &str) -> Result<(), String> {
    match rules_for(field).iter().find_map(|rule| rule.check(value)) {
        Some(message) => Err(message.to_string()),
        None => Ok(()),
    }
}

/// Any local part without separators or spaces (or a quoted one), then a
/// dotted domain that may be Unicode, or a bracketed IPv4 literal.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@"#,
            r"((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])",
            r"|(([a-zA-Z\-0-9\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]+\.)+",
            r"[a-zA-Z\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,}))$",
        ))
        .expect("Failed to compile email regex")
    });
    regex.is_match(email)
}

/// Raw form values, as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFormValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Option<Role>,
}

impl UserFormValues {
    pub fn value(&self, field: UserField) -> &str {
        match field {
            UserField::Name => &self.name,
            UserField::Email => &self.email,
            UserField::Phone => &self.phone,
            UserField::Password => &self.password,
            UserField::Role => self.role.map(|role| role.as_str()).unwrap_or(""),
        }
    }

    /// Per-field errors; empty when the form may be submitted
    pub fn errors(&self) -> Vec<(UserField, String)> {
        UserField::ALL
            .iter()
            .filter_map(|&field| validate(field, self.value(field)).err().map(|e| (field, e)))
            .collect()
    }

    /// Build the request payload if every rule passes
    pub fn to_request(&self) -> Result<UserRegistrationRequest, Vec<(UserField, String)>> {
        let errors = self.errors();
        match self.role {
            Some(role) if errors.is_empty() => Ok(UserRegistrationRequest {
                name: self.name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
                password: self.password.clone(),
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_values() -> UserFormValues {
        UserFormValues {
            name: "Tran Thi B".to_string(),
            email: "a@b.com".to_string(),
            phone: "0901234567".to_string(),
            password: "secret".to_string(),
            role: Some(Role::Teacher),
        }
    }

    #[test]
    fn test_every_field_is_required() {
        for field in UserField::ALL {
            assert!(validate(field, "").is_err(), "{:?} should be required", field);
        }
    }

    #[test]
    fn test_whitespace_password_is_present() {
        assert!(validate(UserField::Password, "      ").is_ok());
        assert!(validate(UserField::Phone, " ").is_ok());
    }

    #[test]
    fn test_email_syntax() {
        assert_eq!(validate(UserField::Email, "abc"), Err("Invalid email address!".to_string()));
        assert!(validate(UserField::Email, "a@b").is_err());
        assert!(validate(UserField::Email, "a@b.com").is_ok());
        assert!(validate(UserField::Email, "first.last+tag@school.edu.vn").is_ok());
        assert!(validate(UserField::Email, "a b@c.com").is_err());
        assert!(validate(UserField::Email, "a@b.c").is_err());
    }

    #[test]
    fn test_email_accepts_apostrophes_and_unicode() {
        assert!(validate(UserField::Email, "o'brien@example.com").is_ok());
        assert!(validate(UserField::Email, "nguyễn@example.vn").is_ok());
        assert!(validate(UserField::Email, "hoa@trường.việt.nam").is_ok());
        assert!(validate(UserField::Email, "admin@[10.0.0.1]").is_ok());
    }

    #[test]
    fn test_password_min_length() {
        assert!(validate(UserField::Password, "12345").is_err());
        assert!(validate(UserField::Password, "123456").is_ok());
    }

    #[test]
    fn test_empty_email_reports_required_not_syntax() {
        assert_eq!(validate(UserField::Email, ""), Err("Please enter an email!".to_string()));
    }

    #[test]
    fn test_to_request() {
        let request = valid_values().to_request().unwrap();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.role, Role::Teacher);

        let mut missing_role = valid_values();
        missing_role.role = None;
        let errors = missing_role.to_request().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, UserField::Role);
    }

    #[test]
    fn test_errors_lists_each_failing_field() {
        let values = UserFormValues {
            email: "abc".to_string(),
            password: "12345".to_string(),
            ..valid_values()
        };
        let fields: Vec<UserField> = values.errors().into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![UserField::Email, UserField::Password]);
    }
}
