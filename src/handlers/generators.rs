// src/handlers/generators.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        consumer::ConsumerRecord,
        generator::{
            Generator, GeneratorPayload, GeneratorStats, GeneratorStatus, GeneratorView, SourceType,
        },
    },
    services::{filters::GeneratorFilter, generator_service},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorForm {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Fazenda Sol Nascente")]
    pub owner_name: String,

    #[validate(length(min = 1, message = "required"))]
    pub cpf_cnpj: String,

    pub source_type: SourceType,

    #[validate(custom(function = "validation::non_negative"))]
    #[schema(example = 1000.0)]
    pub installed_power: Decimal,

    #[validate(length(min = 1, message = "required"))]
    pub concessionaire: String,

    #[validate(length(min = 1, message = "required"))]
    pub uc_number: String,

    #[validate(length(min = 1, message = "required"))]
    pub city: String,

    #[validate(length(equal = 2, message = "invalid_state"))]
    #[schema(example = "MG")]
    pub state: String,

    pub status: Option<GeneratorStatus>,
    pub observations: Option<String>,
}

impl From<GeneratorForm> for GeneratorPayload {
    fn from(form: GeneratorForm) -> Self {
        Self {
            owner_name: form.owner_name.trim().to_string(),
            cpf_cnpj: form.cpf_cnpj.trim().to_string(),
            source_type: form.source_type,
            installed_power: form.installed_power,
            concessionaire: form.concessionaire,
            uc_number: form.uc_number,
            city: form.city,
            state: form.state.to_uppercase(),
            status: form.status,
            observations: form.observations.filter(|o| !o.trim().is_empty()),
        }
    }
}

// GET /api/generators
#[utoipa::path(
    get,
    path = "/api/generators",
    tag = "Generators",
    params(GeneratorFilter),
    responses(
        (status = 200, description = "Geradores com alocação e status exibido", body = Vec<GeneratorView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_generators(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<GeneratorFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let (generators, consumers) = tokio::try_join!(
        app_state.generator_service.list(),
        app_state.consumer_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    let views = filter.apply(generator_service::views(&generators, &consumers));

    Ok((StatusCode::OK, Json(views)))
}

// GET /api/generators/stats
#[utoipa::path(
    get,
    path = "/api/generators/stats",
    tag = "Generators",
    responses((status = 200, description = "Totais da tela de geradores", body = GeneratorStats)),
    security(("api_jwt" = []))
)]
pub async fn generator_stats(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let (generators, consumers) = tokio::try_join!(
        app_state.generator_service.list(),
        app_state.consumer_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    let stats = generator_service::stats(&generator_service::views(&generators, &consumers));

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/generators/{id}
#[utoipa::path(
    get,
    path = "/api/generators/{id}",
    tag = "Generators",
    params(("id" = String, Path, description = "ID do gerador")),
    responses(
        (status = 200, description = "Gerador", body = GeneratorView),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_generator(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (generator, consumers) = tokio::try_join!(
        app_state.generator_service.get(&id),
        app_state.consumer_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(generator_service::view(&generator, &consumers))))
}

// GET /api/generators/{id}/consumers
#[utoipa::path(
    get,
    path = "/api/generators/{id}/consumers",
    tag = "Generators",
    params(("id" = String, Path, description = "ID do gerador")),
    responses((status = 200, description = "Consumidores alocados no gerador", body = Vec<ConsumerRecord>)),
    security(("api_jwt" = []))
)]
pub async fn list_generator_consumers(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let consumers = app_state
        .consumer_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let linked: Vec<ConsumerRecord> = generator_service::consumers_of(&id, &consumers)
        .into_iter()
        .map(ConsumerRecord::from)
        .collect();

    Ok((StatusCode::OK, Json(linked)))
}

// POST /api/generators
#[utoipa::path(
    post,
    path = "/api/generators",
    tag = "Generators",
    request_body = GeneratorForm,
    responses(
        (status = 201, description = "Gerador cadastrado", body = Generator),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Outra operação em andamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_generator(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(form): Json<GeneratorForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let generator = app_state
        .generator_service
        .create(&GeneratorPayload::from(form))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(generator)))
}

// PATCH /api/generators/{id}
#[utoipa::path(
    patch,
    path = "/api/generators/{id}",
    tag = "Generators",
    params(("id" = String, Path, description = "ID do gerador")),
    request_body = GeneratorForm,
    responses(
        (status = 200, description = "Gerador atualizado", body = Generator),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_generator(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(form): Json<GeneratorForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let generator = app_state
        .generator_service
        .update(&id, &GeneratorPayload::from(form))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(generator)))
}

// DELETE /api/generators/{id}
#[utoipa::path(
    delete,
    path = "/api/generators/{id}",
    tag = "Generators",
    params(("id" = String, Path, description = "ID do gerador")),
    responses(
        (status = 204, description = "Gerador excluído"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_generator(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .generator_service
        .delete(&id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(state: &str, power: f64) -> GeneratorForm {
        serde_json::from_value(json!({
            "ownerName": "  Usina A ",
            "cpfCnpj": "123",
            "sourceType": "SOLAR",
            "installedPower": power,
            "concessionaire": "CEMIG",
            "ucNumber": "42",
            "city": "Uberaba",
            "state": state,
            "observations": "   "
        }))
        .unwrap()
    }

    #[test]
    fn form_rules() {
        assert!(form("MG", 1000.0).validate().is_ok());

        let errors = form("MGX", -1.0).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("state"));
        assert!(fields.contains_key("installed_power"));
    }

    #[test]
    fn payload_is_normalized() {
        let payload = GeneratorPayload::from(form("mg", 1000.0));
        assert_eq!(payload.owner_name, "Usina A");
        assert_eq!(payload.state, "MG");
        assert_eq!(payload.observations, None);
    }
}
