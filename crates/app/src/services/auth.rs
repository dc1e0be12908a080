//! Authentication service.

use async_trait::async_trait;
use mockall::automock;
use platter::auth::{
    AdminRegistration, LoginRequest, LoginResponse, PartnerLogin, PartnerLoginResponse,
    PartnerSignup, REGISTRATION_SUCCESS, RegisterRequest,
};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::{errors::ApiError, http::ApiClient};

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpAuthService {
    customer: ApiClient,
    delivery: ApiClient,
}

impl HttpAuthService {
    /// `customer` talks to the main backend, `delivery` to the delivery service.
    #[must_use]
    pub const fn new(customer: ApiClient, delivery: ApiClient) -> Self {
        Self { customer, delivery }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        self.customer.post("/login", &request).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<(), ApiError> {
        let response: RegisterResponse = self.customer.post("/register", &request).await?;

        match response.message {
            Some(message) if message == REGISTRATION_SUCCESS => Ok(()),
            Some(message) => Err(ApiError::rejected(message)),
            None => Err(ApiError::rejected("Registration failed")),
        }
    }

    async fn admin_register(&self, request: AdminRegistration) -> Result<(), ApiError> {
        let response: Option<Value> = self.customer.post("/admin/register", &request).await?;

        match response {
            Some(Value::String(text)) if text.trim().is_empty() => {
                Err(ApiError::rejected("Registration failed"))
            }
            Some(_) => Ok(()),
            None => Err(ApiError::rejected("Registration failed")),
        }
    }

    async fn partner_login(
        &self,
        request: PartnerLogin,
    ) -> Result<PartnerLoginResponse, ApiError> {
        self.delivery
            .post("/api/delivery/auth/login", &request)
            .await
    }

    async fn partner_register(&self, request: PartnerSignup) -> Result<(), ApiError> {
        let request = self
            .delivery
            .request(Method::POST, "/api/delivery/auth/register")
            .json(&request);

        self.delivery.send_text(request).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a token and role.
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Create an account.
    async fn register(&self, request: RegisterRequest) -> Result<(), ApiError>;

    /// Create an account for someone else, as an administrator.
    async fn admin_register(&self, request: AdminRegistration) -> Result<(), ApiError>;

    /// Delivery partner login by phone number.
    async fn partner_login(&self, request: PartnerLogin)
    -> Result<PartnerLoginResponse, ApiError>;

    /// Delivery partner sign-up.
    async fn partner_register(&self, request: PartnerSignup) -> Result<(), ApiError>;
}
