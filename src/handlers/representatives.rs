// src/handlers/representatives.rs

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
    models::representative::{
        Representative, RepresentativePayload, RepresentativeStatistics, RepresentativeStatus,
        Specialization,
    },
    services::filters::RepresentativeFilter,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativeForm {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ana Souza")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    pub cpf_cnpj: String,

    #[validate(length(min = 1, message = "required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "required"))]
    pub city: String,

    #[validate(length(equal = 2, message = "invalid_state"))]
    pub state: String,

    #[validate(custom(function = "validation::percentage"))]
    #[schema(example = 5.0)]
    pub commission_rate: Decimal,

    #[serde(default)]
    pub specializations: Vec<Specialization>,

    pub status: Option<RepresentativeStatus>,
    pub notes: Option<String>,
}

impl From<RepresentativeForm> for RepresentativePayload {
    fn from(form: RepresentativeForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            cpf_cnpj: form.cpf_cnpj.trim().to_string(),
            phone: form.phone,
            city: form.city,
            state: form.state.to_uppercase(),
            commission_rate: form.commission_rate,
            specializations: form.specializations,
            status: form.status,
            notes: form.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusPayload {
    #[schema(example = "ACTIVE")]
    pub status: RepresentativeStatus,
}

// GET /api/representatives
#[utoipa::path(
    get,
    path = "/api/representatives",
    tag = "Representatives",
    params(RepresentativeFilter),
    responses((status = 200, description = "Representantes filtrados", body = Vec<Representative>)),
    security(("api_jwt" = []))
)]
pub async fn list_representatives(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<RepresentativeFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let representatives = app_state
        .representative_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(filter.apply(representatives))))
}

// GET /api/representatives/statistics
#[utoipa::path(
    get,
    path = "/api/representatives/statistics",
    tag = "Representatives",
    responses((status = 200, description = "Estatísticas calculadas pelo backend", body = RepresentativeStatistics)),
    security(("api_jwt" = []))
)]
pub async fn representative_statistics(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let statistics = app_state
        .representative_service
        .statistics()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(statistics)))
}

// GET /api/representatives/active
#[utoipa::path(
    get,
    path = "/api/representatives/active",
    tag = "Representatives",
    responses((status = 200, description = "Representantes ativos (select do consumidor)", body = Vec<Representative>)),
    security(("api_jwt" = []))
)]
pub async fn active_representatives(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let active = app_state
        .representative_service
        .active()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(active)))
}

// GET /api/representatives/{id}
#[utoipa::path(
    get,
    path = "/api/representatives/{id}",
    tag = "Representatives",
    params(("id" = String, Path, description = "ID do representante")),
    responses(
        (status = 200, description = "Representante", body = Representative),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_representative(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let representative = app_state
        .representative_service
        .get(&id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(representative)))
}

// POST /api/representatives
#[utoipa::path(
    post,
    path = "/api/representatives",
    tag = "Representatives",
    request_body = RepresentativeForm,
    responses(
        (status = 201, description = "Representante cadastrado", body = Representative),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_representative(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(form): Json<RepresentativeForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let representative = app_state
        .representative_service
        .create(&RepresentativePayload::from(form))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(representative)))
}

// PATCH /api/representatives/{id}
#[utoipa::path(
    patch,
    path = "/api/representatives/{id}",
    tag = "Representatives",
    params(("id" = String, Path, description = "ID do representante")),
    request_body = RepresentativeForm,
    responses(
        (status = 200, description = "Representante atualizado", body = Representative),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_representative(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(form): Json<RepresentativeForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let representative = app_state
        .representative_service
        .update(&id, &RepresentativePayload::from(form))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(representative)))
}

// PATCH /api/representatives/{id}/status
#[utoipa::path(
    patch,
    path = "/api/representatives/{id}/status",
    tag = "Representatives",
    params(("id" = String, Path, description = "ID do representante")),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Representative),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_representative_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let representative = app_state
        .representative_service
        .update_status(&id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(representative)))
}

// DELETE /api/representatives/{id}
#[utoipa::path(
    delete,
    path = "/api/representatives/{id}",
    tag = "Representatives",
    params(("id" = String, Path, description = "ID do representante")),
    responses(
        (status = 204, description = "Representante excluído"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_representative(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .representative_service
        .delete(&id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
