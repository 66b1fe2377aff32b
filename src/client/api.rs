// src/client/api.rs

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use super::session::Session;

/// Erros de uma chamada ao backend externo.
#[derive(Debug, Error)]
pub enum ClientError {
    // Rede, timeout ou corpo que não é o JSON esperado
    #[error("Falha de comunicação com o backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Não autorizado: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("Erro no backend ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Status { status: u16, message: String },
}

// Corpo de erro do backend: `message` pode ser texto ou lista de textos
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

pub(crate) fn error_message(status: StatusCode, body: &[u8]) -> String {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    match parsed.message {
        Some(ErrorMessage::One(message)) if !message.is_empty() => message,
        Some(ErrorMessage::Many(messages)) if !messages.is_empty() => messages.join(", "),
        _ => format!("HTTP error! status: {}", status.as_u16()),
    }
}

/// Cliente do backend REST. Anexa o token da sessão e converte respostas
/// fora de 2xx em `ClientError`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: Session) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("painel-gd/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let request = self.request(Method::GET, endpoint).await;
        self.send(request).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, endpoint).await.json(body);
        self.send(request).await
    }

    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, endpoint).await.json(body);
        self.send(request).await
    }

    // DELETE nem sempre devolve corpo, então descartamos
    pub async fn delete(&self, endpoint: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, endpoint).await;
        self.execute(request).await.map(|_| ())
    }

    async fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let builder = self.http.request(method, url);

        match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(status, &body);

        tracing::warn!(status = status.as_u16(), "Backend respondeu com erro: {}", message);

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                // token inválido ou expirado: não adianta guardar
                self.session.clear().await;
                ClientError::Unauthorized(message)
            }
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            s if s.is_server_error() => ClientError::Server {
                status: s.as_u16(),
                message,
            },
            s => ClientError::Status {
                status: s.as_u16(),
                message,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_upstream;
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn client_for(router: Router) -> ApiClient {
        let base = spawn_upstream(router).await;
        ApiClient::new(&base, Duration::from_secs(5), Session::in_memory()).unwrap()
    }

    #[test]
    fn joins_message_arrays() {
        let body = br#"{"message":["name should not be empty","state must be 2 chars"]}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "name should not be empty, state must be 2 chars"
        );
    }

    #[test]
    fn falls_back_to_status_text() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>"),
            "HTTP error! status: 502"
        );
        assert_eq!(
            error_message(StatusCode::CONFLICT, br#"{"message":""}"#),
            "HTTP error! status: 409"
        );
    }

    #[tokio::test]
    async fn attaches_bearer_token() {
        let router = Router::new().route(
            "/auth/profile",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({ "auth": auth }))
            }),
        );
        let client = client_for(router).await;
        client.session().store("tok123".into()).await.unwrap();

        let body: Value = client.get("/auth/profile").await.unwrap();
        assert_eq!(body["auth"], "Bearer tok123");
    }

    #[tokio::test]
    async fn unauthorized_clears_the_session() {
        let router = Router::new().route(
            "/consumers",
            get(|| async {
                (
                    AxumStatus::UNAUTHORIZED,
                    Json(json!({ "message": "Unauthorized" })),
                )
            }),
        );
        let client = client_for(router).await;
        client.session().store("expired".into()).await.unwrap();

        let err = client.get::<Value>("/consumers").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Unauthorized"));
        assert!(!client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn maps_validation_and_server_errors() {
        let router = Router::new()
            .route(
                "/consumers",
                post(|| async {
                    (
                        AxumStatus::BAD_REQUEST,
                        Json(json!({ "message": ["cpfCnpj must be unique"] })),
                    )
                }),
            )
            .route(
                "/dashboard",
                get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let client = client_for(router).await;

        let err = client.post::<_, Value>("/consumers", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m == "cpfCnpj must be unique"));

        let err = client.get::<Value>("/dashboard").await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // porta reservada e fechada logo em seguida
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(
            &format!("http://{addr}"),
            Duration::from_secs(2),
            Session::in_memory(),
        )
        .unwrap();

        let err = client.get::<Value>("/generators").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
