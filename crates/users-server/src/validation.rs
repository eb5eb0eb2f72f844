use once_cell::sync::Lazy;
use regex::Regex;
use users_shared::api::CreateUserRequest;

use crate::error::{AppError, FieldErrors};

/// Dot-separated atoms before the `@` (any non-ASCII letter allowed), then
/// dot-separated domain labels that neither start nor end with `-`.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^[^\s@."(),:;<>\[\]\\]+(\.[^\s@."(),:;<>\[\]\\]+)*"#,
        r"@[\p{L}\p{N}]([\p{L}\p{N}-]*[\p{L}\p{N}])?",
        r"(\.[\p{L}\p{N}]([\p{L}\p{N}-]*[\p{L}\p{N}])?)*$",
    ))
    .expect("email pattern is valid")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]+$").expect("phone pattern is valid"));

/// Format checks run on a request body before it reaches the service.
///
/// Every failing field is reported; a blank field only gets its
/// "mandatory" message.
pub fn validate(req: &CreateUserRequest) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    require(&mut errors, "username", &req.username, "Username is mandatory");
    require(&mut errors, "firstName", &req.first_name, "First name is mandatory");
    require(&mut errors, "lastName", &req.last_name, "Last name is mandatory");

    if require(&mut errors, "email", &req.email, "Email is mandatory")
        && !EMAIL_RE.is_match(&req.email)
    {
        errors.insert("email".to_string(), "Email should be valid".to_string());
    }

    if require(&mut errors, "phoneNumber", &req.phone_number, "Phone number is mandatory")
        && !PHONE_RE.is_match(&req.phone_number)
    {
        errors.insert(
            "phoneNumber".to_string(),
            "Phone number should be valid".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Returns whether the value is present; records `message` when it is blank.
fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
        false
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn valid() -> CreateUserRequest {
        CreateUserRequest {
            username: "john_doe".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone_number: "+123456789".to_string(),
        }
    }

    fn field_errors(req: &CreateUserRequest) -> FieldErrors {
        match validate(req) {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_request() {
        assert!(validate(&valid()).is_ok());
    }

    #[rstest]
    #[case("123456789")]
    #[case("+123456789")]
    fn accepts_phone_numbers(#[case] phone: &str) {
        let req = CreateUserRequest {
            phone_number: phone.to_string(),
            ..valid()
        };
        assert!(validate(&req).is_ok());
    }

    #[rstest]
    #[case("12-34")]
    #[case("++123")]
    #[case("phone")]
    #[case("123+")]
    fn rejects_bad_phone_numbers(#[case] phone: &str) {
        let req = CreateUserRequest {
            phone_number: phone.to_string(),
            ..valid()
        };
        let errors = field_errors(&req);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["phoneNumber"], "Phone number should be valid");
    }

    #[rstest]
    #[case("john.doe@example.com")]
    #[case("john+tag@sub.example.co")]
    #[case("jöhn@example.com")]
    #[case("john@localhost")]
    fn accepts_emails(#[case] email: &str) {
        let req = CreateUserRequest {
            email: email.to_string(),
            ..valid()
        };
        assert!(validate(&req).is_ok());
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("@example.com")]
    #[case("john@")]
    #[case("john doe@example.com")]
    #[case(".john@example.com")]
    #[case("john.@example.com")]
    #[case("john..doe@example.com")]
    #[case("john@-example.com")]
    #[case("john@example-.com")]
    #[case("john@example..com")]
    fn rejects_bad_emails(#[case] email: &str) {
        let req = CreateUserRequest {
            email: email.to_string(),
            ..valid()
        };

        assert_eq!(field_errors(&req)["email"], "Email should be valid");
    }

    #[test]
    fn reports_every_blank_field() {
        let errors = field_errors(&CreateUserRequest::default());

        assert_eq!(errors.len(), 5);
        assert_eq!(errors["username"], "Username is mandatory");
        assert_eq!(errors["firstName"], "First name is mandatory");
        assert_eq!(errors["lastName"], "Last name is mandatory");
        assert_eq!(errors["email"], "Email is mandatory");
        assert_eq!(errors["phoneNumber"], "Phone number is mandatory");
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let req = CreateUserRequest {
            first_name: "   ".to_string(),
            ..valid()
        };

        assert_eq!(field_errors(&req)["firstName"], "First name is mandatory");
    }
}
