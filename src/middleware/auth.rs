use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState};

// Bloqueia as rotas do painel enquanto não houver token guardado.
// A validade do token é conferida pelo próprio backend a cada chamada (401 limpa a sessão).
pub async fn session_guard(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !app_state.session.is_authenticated().await {
        return Err(AppError::NotAuthenticated);
    }

    Ok(next.run(request).await)
}
