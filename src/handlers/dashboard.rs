// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::DashboardView,
    services::dashboard_service,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Painel do backend + conferência local", body = DashboardView),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let (remote, generators, consumers, representatives) = tokio::try_join!(
        app_state.dashboard_service.remote(),
        app_state.generator_service.list(),
        app_state.consumer_service.list(),
        app_state.representative_service.list(),
    )
    .map_err(|e| e.to_api_error(&locale))?;

    let local = dashboard_service::local_insights(&generators, &consumers, &representatives);

    Ok((StatusCode::OK, Json(DashboardView { remote, local })))
}
