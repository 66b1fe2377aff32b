// src/services/auth_service.rs

use crate::{
    client::{ApiClient, ClientError, Session},
    common::error::AppError,
    models::auth::{LoginPayload, LoginResponse, User},
};

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn session(&self) -> &Session {
        self.client.session()
    }

    /// Login no backend. Em sucesso o token fica guardado na sessão; em
    /// qualquer falha a sessão antiga é descartada.
    pub async fn login(&self, payload: &LoginPayload) -> Result<User, AppError> {
        let response: LoginResponse = match self.client.post("/auth/login", payload).await {
            Ok(response) => response,
            Err(e) => {
                self.session().clear().await;
                return Err(e.into());
            }
        };

        self.session().store(response.access_token).await?;
        tracing::info!("🔑 Login de {} ({:?})", response.user.email, response.user.role);

        Ok(response.user)
    }

    /// Confere o token guardado. Token inválido é apagado.
    pub async fn profile(&self) -> Result<User, AppError> {
        if !self.session().is_authenticated().await {
            return Err(AppError::NotAuthenticated);
        }

        match self.client.get::<User>("/auth/profile").await {
            Ok(user) => Ok(user),
            Err(e) => {
                // 401 já limpou a sessão dentro do cliente
                if !matches!(e, ClientError::Unauthorized(_)) {
                    self.session().clear().await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn logout(&self) {
        self.session().clear().await;
        tracing::info!("Logout efetuado");
    }
}
