//! Form validation
//!
//! Each form kind owns an ordered list of field rules. Validation checks every
//! field independently in a single pass and reports the first failing rule's
//! message per field.

mod fields;
mod rules;

pub use fields::{FieldErrors, NormalizedFields, RawFields};
pub use rules::{Check, FieldRule, FormKind, Rule, PASSWORD_MIN_LENGTH};

use std::collections::BTreeMap;

/// Validate raw input against the rule set for `kind`
pub fn validate(kind: FormKind, raw: &RawFields) -> Result<NormalizedFields, FieldErrors> {
    let rules = kind.rules();

    let lookup = |field: &str| {
        rules
            .iter()
            .find(|rule| rule.field == field)
            .and_then(|rule| rule.normalize(raw.get(field)))
    };

    let mut normalized = BTreeMap::new();
    let mut errors = FieldErrors::new();

    for field_rule in rules {
        let value = field_rule.normalize(raw.get(field_rule.field));

        match field_rule
            .rules
            .iter()
            .find(|rule| !rule.check.passes(value, lookup))
        {
            Some(failed) => errors.insert(field_rule.field, failed.message),
            None => {
                normalized.insert(
                    field_rule.field.to_string(),
                    value.unwrap_or_default().to_string(),
                );
            }
        }
    }

    if errors.is_empty() {
        Ok(NormalizedFields::new(normalized))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_employee() -> RawFields {
        RawFields::new()
            .with("name", "Jo")
            .with("email", "jo@x.com")
            .with("position", "Eng")
            .with("phone", "1234567890")
            .with("hireDate", "2024-01-01")
    }

    fn valid_sign_up() -> RawFields {
        RawFields::new()
            .with("email", "a@x.com")
            .with("password", "secret1")
            .with("confirmPassword", "secret1")
    }

    fn without(raw: &RawFields, field: &str, kind: FormKind) -> RawFields {
        kind.fields()
            .filter(|f| *f != field)
            .filter_map(|f| raw.get(f).map(|v| (f, v.to_string())))
            .collect()
    }

    #[test]
    fn test_valid_employee() {
        let fields = validate(FormKind::Employee, &valid_employee()).unwrap();

        assert_eq!(fields.len(), 5);
        assert_eq!(fields.get("name"), "Jo");
        assert_eq!(fields.get("hireDate"), "2024-01-01");
    }

    #[test]
    fn test_missing_required_field_reports_only_that_field() {
        let cases = [
            (FormKind::Employee, valid_employee()),
            (FormKind::SignUp, valid_sign_up()),
        ];

        for (kind, raw) in cases {
            for field in kind.fields() {
                let errors = validate(kind, &without(&raw, field, kind)).unwrap_err();

                assert_eq!(errors.len(), 1, "{kind} without {field}: {errors}");
                assert!(errors.contains(field), "{kind} without {field}: {errors}");
                assert!(errors.get(field).unwrap().ends_with("is required"));
            }
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let raw = valid_employee().with("name", "   ");
        let errors = validate(FormKind::Employee, &raw).unwrap_err();

        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_invalid_phone_always_fails_on_phone() {
        let bad_phones = ["123", "123456789", "12345678901", "123-456-7890", "abcdefghij", "+123456789"];

        for phone in bad_phones {
            // With every other field valid
            let errors = validate(FormKind::Employee, &valid_employee().with("phone", phone))
                .unwrap_err();
            assert_eq!(errors.get("phone"), Some("Invalid phone number"));
            assert_eq!(errors.len(), 1);

            // And with other fields broken too
            let raw = RawFields::new().with("phone", phone).with("email", "nope");
            let errors = validate(FormKind::Employee, &raw).unwrap_err();
            assert_eq!(errors.get("phone"), Some("Invalid phone number"));
        }
    }

    #[test]
    fn test_all_failures_reported_in_one_pass() {
        let raw = RawFields::new()
            .with("email", "not-an-email")
            .with("phone", "12");

        let errors = validate(FormKind::Employee, &raw).unwrap_err();

        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["email", "hireDate", "name", "phone", "position"]);
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(errors.get("position"), Some("Position is required"));
    }

    #[test]
    fn test_confirm_password_mismatch() {
        let pairs = [("secret1", "secret2"), ("secret1", "secret12"), ("abcdef", "ABCDEF")];

        for (password, confirm) in pairs {
            let raw = valid_sign_up()
                .with("password", password)
                .with("confirmPassword", confirm);

            let errors = validate(FormKind::SignUp, &raw).unwrap_err();
            assert_eq!(errors.get("confirmPassword"), Some("Passwords must match"));
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_confirm_password_match() {
        for password in ["secret1", "longer password", "      x"] {
            let raw = valid_sign_up()
                .with("password", password)
                .with("confirmPassword", password);

            assert!(validate(FormKind::SignUp, &raw).is_ok(), "{password:?}");
        }
    }

    #[test]
    fn test_confirm_password_compared_verbatim() {
        let raw = valid_sign_up()
            .with("password", "secret1")
            .with("confirmPassword", "secret1 ");

        let errors = validate(FormKind::SignUp, &raw).unwrap_err();
        assert!(errors.contains("confirmPassword"));
    }

    #[test]
    fn test_short_password() {
        let raw = valid_sign_up()
            .with("password", "abc")
            .with("confirmPassword", "abc");

        let errors = validate(FormKind::SignUp, &raw).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_sign_in_rules() {
        let raw = RawFields::new().with("email", "a@x.com").with("password", "p");
        let fields = validate(FormKind::SignIn, &raw).unwrap();
        assert_eq!(fields.get("password"), "p");

        let errors = validate(FormKind::SignIn, &RawFields::new()).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn test_normalized_fields_drop_unknown_input() {
        let raw = valid_employee().with("salary", "1000000");
        let fields = validate(FormKind::Employee, &raw).unwrap();

        assert_eq!(fields.len(), 5);
        assert_eq!(fields.get("salary"), "");
    }

    #[test]
    fn test_normalized_fields_are_trimmed() {
        let raw = valid_employee().with("email", "  jo@x.com ");
        let fields = validate(FormKind::Employee, &raw).unwrap();

        assert_eq!(fields.get("email"), "jo@x.com");
    }
}
