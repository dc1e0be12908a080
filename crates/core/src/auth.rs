//! Login and registration payloads.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::{delivery::PartnerId, forms::FieldErrors, routes::Route};

/// Message the backend answers a successful registration with.
pub const REGISTRATION_SUCCESS: &str = "Registration Success";

/// Account role issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Customer,
    Admin,
    RestaurantOwner,
    DeliveryPartner,
    Unknown(String),
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Customer => "ROLE_CUSTOMER",
            Self::Admin => "ROLE_ADMIN",
            Self::RestaurantOwner => "ROLE_RESOWNER",
            Self::DeliveryPartner => "ROLE_DELIVERYP",
            Self::Unknown(raw) => raw,
        }
    }

    /// Where a freshly logged-in user lands.
    #[must_use]
    pub const fn landing_route(&self) -> Route {
        match self {
            Self::Customer => Route::CustomerHome,
            Self::Admin => Route::AdminDashboard,
            Self::RestaurantOwner => Route::OwnerDashboard,
            Self::DeliveryPartner => Route::DeliveryDashboard,
            Self::Unknown(_) => Route::Error,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ROLE_CUSTOMER" => Self::Customer,
            "ROLE_ADMIN" => Self::Admin,
            "ROLE_RESOWNER" => Self::RestaurantOwner,
            "ROLE_DELIVERYP" => Self::DeliveryPartner,
            _ => Self::Unknown(value),
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Answer to `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub login: Option<String>,
    pub role: Option<Role>,
    pub token: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
}

impl LoginResponse {
    /// The backend reports success with `login: "success"` and a token.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.login.as_deref() == Some("success") && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Landing route, or the error route for failed logins.
    #[must_use]
    pub fn landing_route(&self) -> Route {
        match (&self.role, self.is_success()) {
            (Some(role), true) => role.landing_route(),
            _ => Route::Error,
        }
    }
}

/// Body of `POST /register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub name: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /admin/register`, sent by an administrator on behalf of
/// another user.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegistration {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for AdminRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AdminRegistration")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

/// Delivery partner sign-up form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PartnerRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub vehicle_number: String,
}

impl PartnerRegistration {
    /// Check the form and build the sign-up body.
    ///
    /// # Errors
    ///
    /// Returns one entry per invalid field.
    pub fn validate(&self) -> Result<PartnerSignup, FieldErrors> {
        let mut errors = FieldErrors::new();

        let full_name = self.full_name.trim();
        let email = self.email.trim();
        let phone: String = self.phone.chars().filter(|ch| !ch.is_whitespace()).collect();

        if full_name.is_empty() {
            errors.push("fullName", "Full name is required");
        }

        if email.is_empty() {
            errors.push("email", "Email is required");
        } else if !email.contains('@') {
            errors.push("email", "Please enter a valid email");
        }

        if phone.is_empty() {
            errors.push("phone", "Phone number is required");
        }

        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }

        let vehicle_number = self.vehicle_number.trim();

        errors.into_result(PartnerSignup {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone,
            password: self.password.clone(),
            vehicle_number: (!vehicle_number.is_empty()).then(|| vehicle_number.to_string()),
        })
    }
}

impl std::fmt::Debug for PartnerRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PartnerRegistration")
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /api/delivery/auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerSignup {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub vehicle_number: Option<String>,
}

impl std::fmt::Debug for PartnerSignup {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PartnerSignup")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("vehicle_number", &self.vehicle_number)
            .finish_non_exhaustive()
    }
}

/// Body of the delivery partner login.
#[derive(Clone, Serialize)]
pub struct PartnerLogin {
    pub phone: String,
    pub password: String,
}

impl std::fmt::Debug for PartnerLogin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PartnerLogin")
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

/// Answer to the delivery partner login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerLoginResponse {
    pub token: String,
    pub partner_id: PartnerId,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn roles_land_on_their_dashboards() {
        assert_eq!(Role::from("ROLE_CUSTOMER".to_string()).landing_route(), Route::CustomerHome);
        assert_eq!(Role::from("ROLE_ADMIN".to_string()).landing_route(), Route::AdminDashboard);
        assert_eq!(Role::from("ROLE_RESOWNER".to_string()).landing_route(), Route::OwnerDashboard);
        assert_eq!(
            Role::from("ROLE_DELIVERYP".to_string()).landing_route(),
            Route::DeliveryDashboard
        );
        assert_eq!(Role::from("ROLE_GUEST".to_string()).landing_route(), Route::Error);
    }

    #[test]
    fn failed_login_lands_on_error() -> TestResult {
        let response: LoginResponse =
            serde_json::from_str(r#"{"login": "fail", "role": "ROLE_CUSTOMER"}"#)?;

        assert!(!response.is_success());
        assert_eq!(response.landing_route(), Route::Error);

        Ok(())
    }

    #[test]
    fn successful_login() -> TestResult {
        let response: LoginResponse = serde_json::from_str(
            r#"{"login": "success", "role": "ROLE_CUSTOMER", "token": "abc"}"#,
        )?;

        assert!(response.is_success());
        assert_eq!(response.landing_route(), Route::CustomerHome);

        Ok(())
    }

    #[test]
    fn passwords_never_reach_debug_output() {
        let request = LoginRequest {
            username: "asha@example.com".to_string(),
            password: "hunter2".to_string(),
        };

        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn admin_registration_body_uses_camel_case() -> TestResult {
        let request = AdminRegistration {
            username: "owner@example.com".to_string(),
            password: "hunter2".to_string(),
            role: Role::RestaurantOwner,
            first_name: "Meera".to_string(),
            last_name: "Iyer".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request)?,
            serde_json::json!({
                "username": "owner@example.com",
                "password": "hunter2",
                "role": "ROLE_RESOWNER",
                "firstName": "Meera",
                "lastName": "Iyer"
            })
        );
        assert!(!format!("{request:?}").contains("hunter2"));

        Ok(())
    }

    #[test]
    fn partner_signup_validates_and_trims() -> TestResult {
        let form = PartnerRegistration {
            full_name: " Ravi Kumar ".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "98765 43210".to_string(),
            password: "secret".to_string(),
            vehicle_number: " ".to_string(),
        };

        let signup = form.validate()?;

        assert_eq!(signup.full_name, "Ravi Kumar");
        assert_eq!(signup.phone, "9876543210");
        assert_eq!(signup.vehicle_number, None);

        let errors = PartnerRegistration {
            email: "ravi".to_string(),
            ..PartnerRegistration::default()
        }
        .validate()
        .err()
        .unwrap_or_default();

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("email"), Some("Please enter a valid email"));

        Ok(())
    }
}
