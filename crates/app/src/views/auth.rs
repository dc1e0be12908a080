//! Login, registration and logout.

use std::sync::Arc;

use platter::{
    auth::{
        AdminRegistration, LoginRequest, PartnerLogin, PartnerRegistration, RegisterRequest, Role,
    },
    cart_count::CartCountStore,
    forms::FieldErrors,
    routes::Route,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    errors::{ApiError, Notice},
    services::AuthService,
    session::{BearerToken, Session, SessionError, SessionStore},
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("the form has invalid fields")]
    Invalid(FieldErrors),

    #[error("the server refused the credentials")]
    Refused,

    #[error("authentication request failed")]
    Api(#[source] ApiError),

    #[error("registration failed")]
    Registration(#[source] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Invalid(errors) => Notice::Inline(errors.clone()),
            Self::Refused | Self::Api(ApiError::Unauthorized) => Notice::Redirect(Route::Error),
            Self::Api(source) => Notice::Alert(source.user_message("Authentication failed")),
            Self::Registration(source) => Notice::for_mutation(source, "Registration failed"),
            Self::Session(source) => Notice::Alert(source.to_string()),
        }
    }
}

fn credentials(
    login_field: &'static str,
    login: &str,
    password: &str,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if login.trim().is_empty() {
        errors.push(login_field, "This field is required");
    }

    if password.is_empty() {
        errors.push("password", "Password is required");
    }

    errors.into_result(())
}

pub struct AuthFlow {
    service: Arc<dyn AuthService>,
    session: Arc<dyn SessionStore>,
    count: CartCountStore,
}

impl AuthFlow {
    #[must_use]
    pub fn new(
        service: Arc<dyn AuthService>,
        session: Arc<dyn SessionStore>,
        count: CartCountStore,
    ) -> Self {
        Self {
            service,
            session,
            count,
        }
    }

    /// Log in and store the session. Returns the role's landing route.
    ///
    /// # Errors
    ///
    /// Returns why no session was stored.
    pub async fn login(&self, username: &str, password: &str) -> Result<Route, AuthError> {
        credentials("username", username, password).map_err(AuthError::Invalid)?;

        let response = self
            .service
            .login(LoginRequest {
                username: username.trim().to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(AuthError::Api)?;

        let route = response.landing_route();

        let Some(token) = response.token.filter(|_| route != Route::Error) else {
            warn!(username = username.trim(), "login refused");
            return Err(AuthError::Refused);
        };

        self.session.save(&Session {
            name: response.name,
            username: response.username.or_else(|| Some(username.trim().to_string())),
            ..Session::new(BearerToken::new(token))
        })?;

        info!(%route, "logged in");

        Ok(route)
    }

    /// Delivery partner login by phone.
    ///
    /// # Errors
    ///
    /// Returns why no session was stored.
    pub async fn partner_login(&self, phone: &str, password: &str) -> Result<Route, AuthError> {
        credentials("phone", phone, password).map_err(AuthError::Invalid)?;

        let response = self
            .service
            .partner_login(PartnerLogin {
                phone: phone.trim().to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|error| match error {
                ApiError::Unauthorized => AuthError::Refused,
                other => AuthError::Api(other),
            })?;

        let token = BearerToken::new(response.token);

        if token.is_empty() {
            return Err(AuthError::Refused);
        }

        self.session.save(&Session {
            name: response.name,
            partner_id: Some(response.partner_id),
            ..Session::new(token)
        })?;

        info!(partner = %response.partner_id, "partner logged in");

        Ok(Route::DeliveryDashboard)
    }

    /// Create an account. The user logs in afterwards.
    ///
    /// # Errors
    ///
    /// Returns why the account was not created.
    pub async fn register(
        &self,
        name: &str,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Route, AuthError> {
        credentials("username", username, password).map_err(AuthError::Invalid)?;

        self.service
            .register(RegisterRequest {
                username: username.trim().to_string(),
                password: password.to_string(),
                role,
                name: name.trim().to_string(),
            })
            .await
            .map_err(AuthError::Api)?;

        Ok(Route::Login)
    }

    /// Create an account for another user with the administrator's session.
    /// Returns the admin dashboard route.
    ///
    /// # Errors
    ///
    /// Returns why the account was not created.
    pub async fn admin_register(&self, request: AdminRegistration) -> Result<Route, AuthError> {
        let mut errors = credentials("username", &request.username, &request.password)
            .err()
            .unwrap_or_default();

        if request.first_name.trim().is_empty() {
            errors.push("firstName", "First name is required");
        }

        errors.into_result(()).map_err(AuthError::Invalid)?;

        let role = request.role.clone();

        self.service
            .admin_register(AdminRegistration {
                username: request.username.trim().to_string(),
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                ..request
            })
            .await
            .map_err(AuthError::Registration)?;

        info!(%role, "account registered by admin");

        Ok(Route::AdminDashboard)
    }

    /// Sign up as a delivery partner. The partner logs in afterwards.
    ///
    /// # Errors
    ///
    /// Returns why the partner was not registered.
    pub async fn partner_register(&self, form: &PartnerRegistration) -> Result<Route, AuthError> {
        let signup = form.validate().map_err(AuthError::Invalid)?;

        self.service
            .partner_register(signup)
            .await
            .map_err(AuthError::Registration)?;

        Ok(Route::DeliveryLogin)
    }

    /// Forget the session and the badge count.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored session cannot be removed.
    pub fn logout(&self) -> Result<Route, AuthError> {
        self.session.clear()?;
        self.count.reset();

        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use platter::{auth::LoginResponse, delivery::PartnerId};
    use testresult::TestResult;

    use super::*;
    use crate::{
        services::MockAuthService,
        session::{MemorySessionStore, require_session},
    };

    fn success(role: &str) -> LoginResponse {
        LoginResponse {
            login: Some("success".to_string()),
            role: Some(Role::from(role.to_string())),
            token: Some("jwt-token".to_string()),
            username: Some("asha".to_string()),
            name: Some("Asha".to_string()),
        }
    }

    #[tokio::test]
    async fn customer_login_stores_session_and_lands_home() -> TestResult {
        let mut service = MockAuthService::new();
        service
            .expect_login()
            .once()
            .withf(|request| request.username == "asha" && request.password == "secret")
            .return_once(|_| Ok(success("ROLE_CUSTOMER")));

        let session = Arc::new(MemorySessionStore::new());
        let flow = AuthFlow::new(Arc::new(service), session.clone(), CartCountStore::new());

        let route = flow.login(" asha ", "secret").await?;
        let stored = require_session(session.as_ref())?;

        assert_eq!(route, Route::CustomerHome);
        assert_eq!(stored.token.expose(), "jwt-token");
        assert_eq!(stored.display_name(), "Asha");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_role_stores_nothing() -> TestResult {
        let mut service = MockAuthService::new();
        service
            .expect_login()
            .once()
            .return_once(|_| Ok(success("ROLE_GUEST")));

        let session = Arc::new(MemorySessionStore::new());
        let flow = AuthFlow::new(Arc::new(service), session.clone(), CartCountStore::new());

        let error = flow
            .login("asha", "secret")
            .await
            .err()
            .ok_or("unknown role should not log in")?;

        assert_eq!(error.notice(), Notice::Redirect(Route::Error));
        assert_eq!(session.load()?, None);

        Ok(())
    }

    #[tokio::test]
    async fn blank_credentials_send_nothing() -> TestResult {
        let mut service = MockAuthService::new();
        service.expect_login().never();

        let flow = AuthFlow::new(
            Arc::new(service),
            Arc::new(MemorySessionStore::new()),
            CartCountStore::new(),
        );

        let result = flow.login("  ", "").await;

        assert!(matches!(result, Err(AuthError::Invalid(errors)) if errors.len() == 2));

        Ok(())
    }

    #[tokio::test]
    async fn partner_login_keeps_the_partner_id() -> TestResult {
        let mut service = MockAuthService::new();
        service.expect_partner_login().once().return_once(|_| {
            Ok(platter::auth::PartnerLoginResponse {
                token: "partner-jwt".to_string(),
                partner_id: PartnerId::new(12),
                name: Some("Ravi".to_string()),
            })
        });

        let session = Arc::new(MemorySessionStore::new());
        let flow = AuthFlow::new(Arc::new(service), session.clone(), CartCountStore::new());

        assert_eq!(
            flow.partner_login("9876543210", "secret").await?,
            Route::DeliveryDashboard
        );
        assert_eq!(
            require_session(session.as_ref())?.partner_id,
            Some(PartnerId::new(12))
        );

        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_session_and_count() -> TestResult {
        let session = Arc::new(MemorySessionStore::with_session(Session::new(
            BearerToken::new("jwt-token"),
        )));
        let count = CartCountStore::new();
        count.publish(2);

        let flow = AuthFlow::new(Arc::new(MockAuthService::new()), session.clone(), count.clone());

        assert_eq!(flow.logout()?, Route::Login);
        assert_eq!(require_session(session.as_ref()), Err(Route::Login));
        assert_eq!(count.get(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn admin_registers_an_owner() -> TestResult {
        let mut service = MockAuthService::new();
        service
            .expect_admin_register()
            .once()
            .withf(|request| {
                request.username == "meera@example.com"
                    && request.role == Role::RestaurantOwner
                    && request.first_name == "Meera"
            })
            .return_once(|_| Ok(()));

        let flow = AuthFlow::new(
            Arc::new(service),
            Arc::new(MemorySessionStore::new()),
            CartCountStore::new(),
        );

        let route = flow
            .admin_register(AdminRegistration {
                username: " meera@example.com ".to_string(),
                password: "secret".to_string(),
                role: Role::RestaurantOwner,
                first_name: " Meera ".to_string(),
                last_name: "Iyer".to_string(),
            })
            .await?;

        assert_eq!(route, Route::AdminDashboard);

        Ok(())
    }

    #[tokio::test]
    async fn admin_registration_without_a_name_sends_nothing() -> TestResult {
        let mut service = MockAuthService::new();
        service.expect_admin_register().never();

        let flow = AuthFlow::new(
            Arc::new(service),
            Arc::new(MemorySessionStore::new()),
            CartCountStore::new(),
        );

        let error = flow
            .admin_register(AdminRegistration {
                username: "meera@example.com".to_string(),
                password: "secret".to_string(),
                role: Role::Customer,
                first_name: " ".to_string(),
                last_name: String::new(),
            })
            .await
            .err()
            .ok_or("blank name should be refused")?;

        assert!(matches!(error, AuthError::Invalid(errors) if errors.get("firstName").is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn partner_signup_lands_on_delivery_login() -> TestResult {
        let mut service = MockAuthService::new();
        service
            .expect_partner_register()
            .once()
            .withf(|signup| signup.phone == "9876543210" && signup.full_name == "Ravi")
            .return_once(|_| Ok(()));

        let flow = AuthFlow::new(
            Arc::new(service),
            Arc::new(MemorySessionStore::new()),
            CartCountStore::new(),
        );

        let form = PartnerRegistration {
            full_name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "9876543210".to_string(),
            password: "secret".to_string(),
            vehicle_number: "KA01AB1234".to_string(),
        };

        assert_eq!(flow.partner_register(&form).await?, Route::DeliveryLogin);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_partner_phone_shows_the_server_message() -> TestResult {
        let mut service = MockAuthService::new();
        service.expect_partner_register().once().return_once(|_| {
            Err(ApiError::Rejected {
                status: Some(409),
                message: Some("Phone number already registered.".to_string()),
            })
        });

        let flow = AuthFlow::new(
            Arc::new(service),
            Arc::new(MemorySessionStore::new()),
            CartCountStore::new(),
        );

        let form = PartnerRegistration {
            full_name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "9876543210".to_string(),
            password: "secret".to_string(),
            vehicle_number: String::new(),
        };

        let error = flow
            .partner_register(&form)
            .await
            .err()
            .ok_or("duplicate phone should fail")?;

        assert_eq!(
            error.notice(),
            Notice::Alert("Phone number already registered.".to_string())
        );

        Ok(())
    }
}
