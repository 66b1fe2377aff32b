use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    client::ClientError,
    common::i18n,
    middleware::i18n::Locale,
};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Qualquer falha vinda do backend externo
    #[error(transparent)]
    Upstream(#[from] ClientError),

    #[error("Usuário não autenticado")]
    NotAuthenticated,

    #[error("Operação em andamento em {0}")]
    MutationInProgress(&'static str),

    // Transição com várias chamadas que parou no meio
    #[error("Transição '{transition}' parou no passo '{failed_step}': {source}")]
    PartiallyApplied {
        transition: &'static str,
        completed_steps: Vec<&'static str>,
        failed_step: &'static str,
        compensated: bool,
        #[source]
        source: ClientError,
    },

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já pronto para virar resposta HTTP.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Converte para a resposta no idioma do usuário.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let simple = |status: StatusCode, key: &str| ApiError {
            status,
            error: i18n::message(locale, key).to_string(),
            details: None,
        };

        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let codes: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), codes);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: i18n::message(locale, "validation").to_string(),
                    details: Some(serde_json::json!(details)),
                }
            }

            // Mensagem de validação do backend vai como veio
            AppError::Upstream(ClientError::Validation(message)) => ApiError {
                status: StatusCode::BAD_REQUEST,
                error: message.clone(),
                details: None,
            },
            AppError::Upstream(ClientError::Unauthorized(_)) | AppError::NotAuthenticated => {
                simple(StatusCode::UNAUTHORIZED, "not_authenticated")
            }
            AppError::Upstream(ClientError::NotFound(_)) => {
                simple(StatusCode::NOT_FOUND, "not_found")
            }
            AppError::Upstream(ClientError::Status { status, message }) => ApiError {
                status: StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                error: message.clone(),
                details: None,
            },
            AppError::Upstream(ClientError::Transport(e)) => {
                tracing::error!("Falha de transporte com o backend: {}", e);
                simple(StatusCode::BAD_GATEWAY, "transport")
            }
            AppError::Upstream(ClientError::Server { status, message }) => {
                tracing::error!("Backend falhou ({}): {}", status, message);
                simple(StatusCode::BAD_GATEWAY, "server")
            }

            AppError::MutationInProgress(_) => simple(StatusCode::CONFLICT, "mutation_in_progress"),

            AppError::PartiallyApplied {
                transition,
                completed_steps,
                failed_step,
                compensated,
                source,
            } => {
                tracing::error!("{}", self);
                ApiError {
                    status: StatusCode::BAD_GATEWAY,
                    error: i18n::message(locale, "partially_applied").to_string(),
                    details: Some(serde_json::json!({
                        "transition": transition,
                        "completedSteps": completed_steps,
                        "failedStep": failed_step,
                        "compensated": compensated,
                        "cause": source.to_string(),
                    })),
                }
            }

            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                simple(StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

// Para quem não tem o Locale em mãos (middleware): usa o idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
