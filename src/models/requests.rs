//! Request DTOs for the API
//!
//! Every field is optional at the serde level so a missing field surfaces as
//! a validation violation (400) rather than a deserialization rejection.
//! `validate` returns all violations at once; an empty list means valid.

use serde::Deserialize;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_ITEM_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

// == Register ==
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        check_name("firstName", self.first_name.as_deref(), &mut violations);
        check_name("lastName", self.last_name.as_deref(), &mut violations);

        match non_blank(self.email.as_deref()) {
            None => violations.push("email is required".to_string()),
            Some(email) if email.chars().count() > MAX_EMAIL_LENGTH => {
                violations.push(format!("email must be at most {} characters", MAX_EMAIL_LENGTH))
            }
            Some(email) if !is_email_shaped(email) => {
                violations.push("email must be a valid email address".to_string())
            }
            Some(_) => {}
        }

        match self.password.as_deref() {
            None | Some("") => violations.push("password is required".to_string()),
            Some(p) if p.chars().count() < MIN_PASSWORD_LENGTH => violations.push(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )),
            Some(p) if p.chars().count() > MAX_PASSWORD_LENGTH => violations.push(format!(
                "password must be at most {} characters",
                MAX_PASSWORD_LENGTH
            )),
            Some(_) => {}
        }

        violations
    }
}

// == Login ==
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if non_blank(self.email.as_deref()).is_none() {
            violations.push("email is required".to_string());
        }
        if self.password.as_deref().map_or(true, str::is_empty) {
            violations.push("password is required".to_string());
        }
        violations
    }
}

// == Create Item ==
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateItemRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        violations.extend(item_violations(self.name.as_deref(), self.price));
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                violations.push(format!(
                    "description must be at most {} characters",
                    MAX_DESCRIPTION_LENGTH
                ));
            }
        }
        violations
    }
}

/// Name and price rules shared by the request and the item service.
pub fn item_violations(name: Option<&str>, price: Option<f64>) -> Vec<String> {
    let mut violations = Vec::new();

    match non_blank(name) {
        None => violations.push("name is required".to_string()),
        Some(n) if n.chars().count() > MAX_ITEM_NAME_LENGTH => violations.push(format!(
            "name must be at most {} characters",
            MAX_ITEM_NAME_LENGTH
        )),
        Some(_) => {}
    }

    match price {
        None => violations.push("price is required".to_string()),
        Some(p) if !p.is_finite() => violations.push("price must be a number".to_string()),
        Some(p) if p < 0.0 => violations.push("price must not be negative".to_string()),
        Some(_) => {}
    }

    violations
}

// == Helpers ==
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_name(field: &str, value: Option<&str>, violations: &mut Vec<String>) {
    match non_blank(value) {
        None => violations.push(format!("{} is required", field)),
        Some(v) if v.chars().count() > MAX_NAME_LENGTH => violations.push(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LENGTH
        )),
        Some(_) => {}
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(first: &str, last: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn test_register_deserialize_camel_case() {
        let json = r#"{"firstName":"Ada","lastName":"Lovelace","email":"a@b.io","password":"secret"}"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Ada"));
        assert!(req.validate().is_empty());
    }

    #[test]
    fn test_register_missing_fields_all_reported() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        let violations = req.validate();
        assert_eq!(violations.len(), 4);
        assert!(violations.contains(&"email is required".to_string()));
    }

    #[test]
    fn test_register_rules() {
        assert!(register("Ada", "L", "a@b.io", "secret").validate().is_empty());
        assert_eq!(register("  ", "L", "a@b.io", "secret").validate().len(), 1);
        assert_eq!(register("Ada", "L", "not-an-email", "secret").validate().len(), 1);
        assert_eq!(register("Ada", "L", "a@b", "secret").validate().len(), 1);
        assert_eq!(register("Ada", "L", "a@b.io", "short").validate().len(), 1);
        assert_eq!(
            register(&"x".repeat(MAX_NAME_LENGTH + 1), "L", "a@b.io", "secret")
                .validate()
                .len(),
            1
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("ann@example.com"));
        assert!(is_email_shaped("a.b+c@sub.example.org"));
        assert!(!is_email_shaped("@example.com"));
        assert!(!is_email_shaped("a@@example.com"));
        assert!(!is_email_shaped("a@.com"));
        assert!(!is_email_shaped("a b@example.com"));
        assert!(!is_email_shaped("a@example."));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@b.io"}"#).unwrap();
        assert_eq!(req.validate(), vec!["password is required".to_string()]);

        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.io","password":"x"}"#).unwrap();
        assert!(req.validate().is_empty());
    }

    #[test]
    fn test_item_price_rules() {
        assert!(item_violations(Some("Lamp"), Some(0.0)).is_empty());
        assert_eq!(
            item_violations(Some("Lamp"), Some(-1.0)),
            vec!["price must not be negative".to_string()]
        );
        assert_eq!(
            item_violations(Some("Lamp"), Some(f64::NAN)),
            vec!["price must be a number".to_string()]
        );
        assert_eq!(item_violations(None, None).len(), 2);
    }

    #[test]
    fn test_create_item_description_limit() {
        let req = CreateItemRequest {
            name: Some("Lamp".into()),
            price: Some(1.0),
            description: Some("x".repeat(MAX_DESCRIPTION_LENGTH + 1)),
        };
        assert_eq!(req.validate().len(), 1);
    }
}
