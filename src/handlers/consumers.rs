// src/handlers/consumers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        consumer::{
            Consumer, ConsumerPayload, ConsumerRecord, ConsumerStats, ConsumerStatus, ConsumerType,
            ConsumerView, GeneratorAllocationRow, GeneratorOption, PhaseType,
        },
        generator::Generator,
    },
    services::{
        consumer_service::{self, SubmitOutcome, Suggestion},
        filters::ConsumerFilter,
    },
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerForm {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Padaria Pão Quente")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    pub cpf_cnpj: String,

    #[validate(length(min = 1, message = "required"))]
    pub uc_number: String,

    #[validate(length(min = 1, message = "required"))]
    pub concessionaire: String,

    #[validate(length(min = 1, message = "required"))]
    pub city: String,

    #[validate(length(equal = 2, message = "invalid_state"))]
    pub state: String,

    pub consumer_type: ConsumerType,
    pub phase: PhaseType,

    #[validate(custom(function = "validation::non_negative"))]
    #[schema(example = 300.0)]
    pub average_monthly_consumption: Decimal,

    #[validate(custom(function = "validation::percentage"))]
    #[schema(example = 15.0)]
    pub discount_offered: Decimal,

    #[schema(example = "ALLOCATED")]
    pub status: ConsumerStatus,

    pub generator_id: Option<String>,

    // Recalculado a partir do consumo quando há gerador com potência.
    // Acima de 100 vira aviso, não erro.
    #[validate(custom(function = "validation::non_negative"))]
    pub allocated_percentage: Option<Decimal>,

    pub representative_id: Option<String>,
}

impl From<ConsumerForm> for ConsumerPayload {
    fn from(form: ConsumerForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            cpf_cnpj: form.cpf_cnpj.trim().to_string(),
            uc_number: form.uc_number,
            concessionaire: form.concessionaire,
            city: form.city,
            state: form.state.to_uppercase(),
            consumer_type: form.consumer_type,
            phase: form.phase,
            average_monthly_consumption: form.average_monthly_consumption,
            discount_offered: form.discount_offered,
            status: form.status,
            generator_id: form.generator_id,
            allocated_percentage: form.allocated_percentage,
            representative_id: form.representative_id.filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocateForm {
    #[validate(length(min = 1, message = "required"))]
    pub generator_id: String,

    #[validate(custom(function = "validation::non_negative"))]
    #[schema(example = 30.0)]
    pub allocated_percentage: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub generator_id: Option<String>,

    #[validate(custom(function = "validation::non_negative"))]
    #[schema(example = 300.0)]
    pub average_monthly_consumption: Decimal,

    // Consumidor em edição (a capacidade dele não conta como ocupada)
    pub consumer_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct GeneratorOptionsQuery {
    /// Consumidor em edição
    pub exclude_consumer_id: Option<String>,
}

fn with_generator_name(consumer: Consumer, generators: &[Generator]) -> ConsumerView {
    let generator_name = consumer
        .link
        .generator_id()
        .and_then(|id| generators.iter().find(|g| g.id == id))
        .map(|g| g.owner_name.clone());

    ConsumerView {
        consumer: consumer.into(),
        generator_name,
    }
}

// =============================================================================
//  LEITURA
// =============================================================================

// GET /api/consumers
#[utoipa::path(
    get,
    path = "/api/consumers",
    tag = "Consumers",
    params(ConsumerFilter),
    responses((status = 200, description = "Consumidores filtrados", body = Vec<ConsumerView>)),
    security(("api_jwt" = []))
)]
pub async fn list_consumers(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<ConsumerFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let (consumers, generators) = tokio::try_join!(
        app_state.consumer_service.list(),
        app_state.generator_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    let views: Vec<ConsumerView> = filter
        .apply(consumers, &generators)
        .into_iter()
        .map(|c| with_generator_name(c, &generators))
        .collect();

    Ok((StatusCode::OK, Json(views)))
}

// GET /api/consumers/stats
#[utoipa::path(
    get,
    path = "/api/consumers/stats",
    tag = "Consumers",
    responses((status = 200, description = "Totais da tela de consumidores", body = ConsumerStats)),
    security(("api_jwt" = []))
)]
pub async fn consumer_stats(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let consumers = app_state
        .consumer_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(consumer_service::stats(&consumers))))
}

// GET /api/consumers/generator-allocation
#[utoipa::path(
    get,
    path = "/api/consumers/generator-allocation",
    tag = "Consumers",
    responses((status = 200, description = "Alocação por gerador", body = Vec<GeneratorAllocationRow>)),
    security(("api_jwt" = []))
)]
pub async fn generator_allocation(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let (consumers, generators) = tokio::try_join!(
        app_state.consumer_service.list(),
        app_state.generator_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    Ok((
        StatusCode::OK,
        Json(consumer_service::allocation_table(&generators, &consumers)),
    ))
}

// GET /api/consumers/form/generator-options
#[utoipa::path(
    get,
    path = "/api/consumers/form/generator-options",
    tag = "Consumers",
    params(GeneratorOptionsQuery),
    responses((status = 200, description = "Geradores para o select do formulário", body = Vec<GeneratorOption>)),
    security(("api_jwt" = []))
)]
pub async fn generator_options(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<GeneratorOptionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (consumers, generators) = tokio::try_join!(
        app_state.consumer_service.list(),
        app_state.generator_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    let options = consumer_service::generator_options(
        &generators,
        &consumers,
        query.exclude_consumer_id.as_deref(),
    );

    Ok((StatusCode::OK, Json(options)))
}

// POST /api/consumers/form/suggestion
#[utoipa::path(
    post,
    path = "/api/consumers/form/suggestion",
    tag = "Consumers",
    request_body = SuggestionRequest,
    responses((status = 200, description = "Percentual sugerido e avisos de capacidade", body = Suggestion)),
    security(("api_jwt" = []))
)]
pub async fn suggest_allocation(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(request): Json<SuggestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (consumers, generators) = tokio::try_join!(
        app_state.consumer_service.list(),
        app_state.generator_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    let generator = request
        .generator_id
        .as_deref()
        .and_then(|id| generators.iter().find(|g| g.id == id));

    let suggestion = consumer_service::suggestion(
        generator,
        request.average_monthly_consumption,
        request.consumer_id.as_deref(),
        &consumers,
    );

    Ok((StatusCode::OK, Json(suggestion)))
}

// GET /api/consumers/{id}
#[utoipa::path(
    get,
    path = "/api/consumers/{id}",
    tag = "Consumers",
    params(("id" = String, Path, description = "ID do consumidor")),
    responses(
        (status = 200, description = "Consumidor", body = ConsumerRecord),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_consumer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let consumer = app_state
        .consumer_service
        .get(&id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(consumer)))
}

// =============================================================================
//  ESCRITA
// =============================================================================

async fn submit(
    app_state: &AppState,
    original_id: Option<&str>,
    form: ConsumerForm,
) -> Result<SubmitOutcome, AppError> {
    form.validate()?;
    let generators = app_state.generator_service.list().await?;

    app_state
        .consumer_service
        .submit(original_id, ConsumerPayload::from(form), &generators)
        .await
}

// POST /api/consumers
#[utoipa::path(
    post,
    path = "/api/consumers",
    tag = "Consumers",
    request_body = ConsumerForm,
    responses(
        (status = 201, description = "Consumidor cadastrado (e alocado, se houver gerador)", body = SubmitOutcome),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Outra operação em andamento"),
        (status = 502, description = "Cadastro criado mas a alocação falhou")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_consumer(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(form): Json<ConsumerForm>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = submit(&app_state, None, form)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

// PATCH /api/consumers/{id}
#[utoipa::path(
    patch,
    path = "/api/consumers/{id}",
    tag = "Consumers",
    params(("id" = String, Path, description = "ID do consumidor")),
    request_body = ConsumerForm,
    responses(
        (status = 200, description = "Edição aplicada; informa a transição executada", body = SubmitOutcome),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Outra operação em andamento"),
        (status = 502, description = "Transição aplicada só em parte")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_consumer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(form): Json<ConsumerForm>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = submit(&app_state, Some(&id), form)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(outcome)))
}

// POST /api/consumers/{id}/allocate
#[utoipa::path(
    post,
    path = "/api/consumers/{id}/allocate",
    tag = "Consumers",
    params(("id" = String, Path, description = "ID do consumidor")),
    request_body = AllocateForm,
    responses(
        (status = 200, description = "Consumidor alocado", body = ConsumerRecord),
        (status = 400, description = "Dados inválidos ou capacidade recusada pelo backend")
    ),
    security(("api_jwt" = []))
)]
pub async fn allocate_consumer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(form): Json<AllocateForm>,
) -> Result<impl IntoResponse, ApiError> {
    form.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let consumer = app_state
        .consumer_service
        .allocate(&id, &form.generator_id, form.allocated_percentage)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(consumer)))
}

// POST /api/consumers/{id}/deallocate
#[utoipa::path(
    post,
    path = "/api/consumers/{id}/deallocate",
    tag = "Consumers",
    params(("id" = String, Path, description = "ID do consumidor")),
    responses((status = 200, description = "Consumidor desalocado", body = ConsumerRecord)),
    security(("api_jwt" = []))
)]
pub async fn deallocate_consumer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let consumer = app_state
        .consumer_service
        .deallocate(&id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(consumer)))
}

// DELETE /api/consumers/{id}
#[utoipa::path(
    delete,
    path = "/api/consumers/{id}",
    tag = "Consumers",
    params(("id" = String, Path, description = "ID do consumidor")),
    responses(
        (status = 204, description = "Consumidor excluído"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_consumer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .consumer_service
        .delete(&id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
