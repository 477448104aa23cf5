//! Field-rule records for each form

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

/// Exactly ten ASCII digits
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10}$").expect("phone pattern is a valid regex")
});

pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Which rule set a submission is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    SignUp,
    SignIn,
    Employee,
}

impl FormKind {
    /// The ordered field rules for this form
    pub fn rules(&self) -> &'static [FieldRule] {
        match self {
            Self::SignUp => SIGN_UP_RULES.as_slice(),
            Self::SignIn => SIGN_IN_RULES.as_slice(),
            Self::Employee => EMPLOYEE_RULES.as_slice(),
        }
    }

    /// Field names in rule order
    pub fn fields(&self) -> impl Iterator<Item = &'static str> {
        self.rules().iter().map(|rule| rule.field)
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignUp => write!(f, "sign_up"),
            Self::SignIn => write!(f, "sign_in"),
            Self::Employee => write!(f, "employee"),
        }
    }
}

/// A single check applied to a field value
#[derive(Debug)]
pub enum Check {
    /// Value must be present and non-empty
    Required,
    /// Value must be a well-formed email address
    Email,
    /// Value must have at least this many characters
    MinLength(usize),
    /// Value must match the pattern in full
    Pattern(&'static Lazy<Regex>),
    /// Value must equal another field's value
    EqualsField(&'static str),
}

/// A check paired with the message reported when it fails
#[derive(Debug)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

/// All checks for one field, evaluated in order
#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    /// Secret fields are compared verbatim, never trimmed
    pub secret: bool,
    pub rules: Vec<Rule>,
}

impl FieldRule {
    fn new(field: &'static str) -> Self {
        Self {
            field,
            secret: false,
            rules: Vec::new(),
        }
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    fn check(mut self, check: Check, message: &'static str) -> Self {
        self.rules.push(Rule { check, message });
        self
    }

    /// Normalize the raw value the way this field stores it
    pub fn normalize<'a>(&self, raw: Option<&'a str>) -> Option<&'a str> {
        let value = if self.secret { raw? } else { raw?.trim() };

        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

impl Check {
    /// Whether `value` passes. `lookup` resolves the normalized value of other fields.
    pub(super) fn passes<'a>(
        &self,
        value: Option<&'a str>,
        lookup: impl Fn(&str) -> Option<&'a str>,
    ) -> bool {
        match (self, value) {
            (Self::Required, value) => value.is_some(),
            // Shape checks only apply to present values; Required reports absence.
            (_, None) => true,
            (Self::Email, Some(v)) => v.to_string().validate_email(),
            (Self::MinLength(min), Some(v)) => v.chars().count() >= *min,
            (Self::Pattern(pattern), Some(v)) => pattern.is_match(v),
            (Self::EqualsField(other), Some(v)) => match lookup(other) {
                Some(expected) => v == expected,
                // The referenced field reports its own absence.
                None => true,
            },
        }
    }
}

static SIGN_UP_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        FieldRule::new("email")
            .check(Check::Required, "Email is required")
            .check(Check::Email, "Invalid email"),
        FieldRule::new("password")
            .secret()
            .check(Check::Required, "Password is required")
            .check(
                Check::MinLength(PASSWORD_MIN_LENGTH),
                "Password must be at least 6 characters",
            ),
        FieldRule::new("confirmPassword")
            .secret()
            .check(Check::Required, "Confirm Password is required")
            .check(Check::EqualsField("password"), "Passwords must match"),
    ]
});

static SIGN_IN_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        FieldRule::new("email")
            .check(Check::Required, "Email is required")
            .check(Check::Email, "Invalid email"),
        FieldRule::new("password")
            .secret()
            .check(Check::Required, "Password is required"),
    ]
});

static EMPLOYEE_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        FieldRule::new("name").check(Check::Required, "Name is required"),
        FieldRule::new("email")
            .check(Check::Required, "Email is required")
            .check(Check::Email, "Invalid email"),
        FieldRule::new("position").check(Check::Required, "Position is required"),
        FieldRule::new("phone")
            .check(Check::Required, "Phone is required")
            .check(Check::Pattern(&PHONE_PATTERN), "Invalid phone number"),
        FieldRule::new("hireDate").check(Check::Required, "Hire date is required"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_in_rule_order() {
        let fields: Vec<_> = FormKind::Employee.fields().collect();
        assert_eq!(fields, vec!["name", "email", "position", "phone", "hireDate"]);

        let fields: Vec<_> = FormKind::SignUp.fields().collect();
        assert_eq!(fields, vec!["email", "password", "confirmPassword"]);
    }

    #[test]
    fn test_normalize_trims_non_secret_fields() {
        let rule = FieldRule::new("name");
        assert_eq!(rule.normalize(Some("  Jo  ")), Some("Jo"));
        assert_eq!(rule.normalize(Some("   ")), None);
        assert_eq!(rule.normalize(None), None);
    }

    #[test]
    fn test_normalize_keeps_secret_fields_verbatim() {
        let rule = FieldRule::new("password").secret();
        assert_eq!(rule.normalize(Some(" pass word ")), Some(" pass word "));
        assert_eq!(rule.normalize(Some("  ")), None);
    }

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE_PATTERN.is_match("1234567890"));
        assert!(!PHONE_PATTERN.is_match("123456789"));
        assert!(!PHONE_PATTERN.is_match("12345678901"));
        assert!(!PHONE_PATTERN.is_match("12345abcde"));
        assert!(!PHONE_PATTERN.is_match("١٢٣٤٥٦٧٨٩٠"));
    }

    #[test]
    fn test_email_check() {
        let none = |_: &str| None;
        assert!(Check::Email.passes(Some("jo@x.com"), none));
        assert!(!Check::Email.passes(Some("jo@"), none));
        assert!(!Check::Email.passes(Some("not-an-email"), none));
    }

    #[test]
    fn test_min_length_counts_characters() {
        let none = |_: &str| None;
        assert!(Check::MinLength(6).passes(Some("éééééé"), none));
        assert!(!Check::MinLength(6).passes(Some("abcde"), none));
    }
}
