//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod allocation;
mod client;
mod common;
mod config;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::session_guard;

fn app(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Sessão (exigem token guardado)
    let session_routes = Router::new()
        .route("/profile", get(handlers::auth::profile))
        .route("/logout", post(handlers::auth::logout))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_guard,
        ));

    let generator_routes = Router::new()
        .route(
            "/",
            get(handlers::generators::list_generators).post(handlers::generators::create_generator),
        )
        .route("/stats", get(handlers::generators::generator_stats))
        .route(
            "/{id}",
            get(handlers::generators::get_generator)
                .patch(handlers::generators::update_generator)
                .delete(handlers::generators::delete_generator),
        )
        .route(
            "/{id}/consumers",
            get(handlers::generators::list_generator_consumers),
        );

    let consumer_routes = Router::new()
        .route(
            "/",
            get(handlers::consumers::list_consumers).post(handlers::consumers::create_consumer),
        )
        .route("/stats", get(handlers::consumers::consumer_stats))
        .route(
            "/generator-allocation",
            get(handlers::consumers::generator_allocation),
        )
        .route(
            "/form/generator-options",
            get(handlers::consumers::generator_options),
        )
        .route(
            "/form/suggestion",
            post(handlers::consumers::suggest_allocation),
        )
        .route(
            "/{id}",
            get(handlers::consumers::get_consumer)
                .patch(handlers::consumers::update_consumer)
                .delete(handlers::consumers::delete_consumer),
        )
        .route("/{id}/allocate", post(handlers::consumers::allocate_consumer))
        .route(
            "/{id}/deallocate",
            post(handlers::consumers::deallocate_consumer),
        );

    let representative_routes = Router::new()
        .route(
            "/",
            get(handlers::representatives::list_representatives)
                .post(handlers::representatives::create_representative),
        )
        .route(
            "/statistics",
            get(handlers::representatives::representative_statistics),
        )
        .route(
            "/active",
            get(handlers::representatives::active_representatives),
        )
        .route(
            "/{id}",
            get(handlers::representatives::get_representative)
                .patch(handlers::representatives::update_representative)
                .delete(handlers::representatives::delete_representative),
        )
        .route(
            "/{id}/status",
            patch(handlers::representatives::update_representative_status),
        );

    // Tudo do painel fica atrás do guard de sessão
    let panel_routes = Router::new()
        .nest("/generators", generator_routes)
        .nest("/consumers", consumer_routes)
        .nest("/representatives", representative_routes)
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes.merge(session_routes))
        .nest("/api", panel_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let app_state = match AppState::new().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("🔥 Falha ao inicializar o estado da aplicação: {:?}", e);
            std::process::exit(1);
        }
    };

    let addr = config::bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("🔥 Falha ao escutar em {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Servidor escutando em {}", addr);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", addr);

    if let Err(e) = axum::serve(listener, app(app_state)).await {
        tracing::error!("🔥 Erro no servidor Axum: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{ApiClient, Session},
        test_support::spawn_upstream,
    };
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, post},
        Json,
    };
    use serde_json::{json, Value};
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    fn generator(id: &str, power: u32) -> Value {
        json!({
            "id": id,
            "ownerName": format!("Usina {id}"),
            "cpfCnpj": "1",
            "sourceType": "SOLAR",
            "installedPower": power,
            "concessionaire": "CEMIG",
            "ucNumber": "1",
            "city": "Uberaba",
            "state": "MG",
            "status": "AWAITING_ALLOCATION",
            "observations": null,
            "createdAt": null,
            "updatedAt": null
        })
    }

    fn consumer(id: &str, status: &str, generator: Option<&str>, pct: Option<f64>) -> Value {
        json!({
            "id": id,
            "name": format!("Consumidor {id}"),
            "cpfCnpj": "2",
            "ucNumber": "2",
            "concessionaire": "CEMIG",
            "city": "Uberaba",
            "state": "MG",
            "consumerType": "RESIDENTIAL",
            "phase": "MONOPHASIC",
            "averageMonthlyConsumption": 450,
            "discountOffered": 10,
            "status": status,
            "allocatedPercentage": pct,
            "generatorId": generator,
            "representativeId": null,
            "createdAt": null,
            "updatedAt": null
        })
    }

    // Backend falso que guarda a ordem das mutações
    async fn backend(calls: Arc<Mutex<Vec<String>>>) -> String {
        let c1 = calls.clone();
        let c2 = calls.clone();
        let router = Router::new()
            .route(
                "/auth/login",
                post(|| async { Json(json!({ "access_token": "tok", "user": {
                    "id": "u1", "email": "a@b.com", "name": "Admin", "role": "ADMIN"
                }})) }),
            )
            .route(
                "/generators",
                get(|| async { Json(json!([generator("G1", 1000), generator("G2", 1000)])) }),
            )
            .route(
                "/consumers",
                get(|| async { Json(json!([consumer("C1", "ALLOCATED", Some("G1"), Some(30.0))])) }),
            )
            .route(
                "/consumers/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(consumer(&id, "ALLOCATED", Some("G1"), Some(30.0)))
                }),
            )
            .route(
                "/consumers/{id}/deallocate",
                post(move |Path(id): Path<String>| {
                    let calls = c1.clone();
                    async move {
                        calls.lock().unwrap().push(format!("deallocate({id})"));
                        Json(consumer(&id, "AVAILABLE", None, None))
                    }
                }),
            )
            .route(
                "/consumers/{id}/allocate",
                post(move |Path(id): Path<String>, Json(body): Json<Value>| {
                    let calls = c2.clone();
                    async move {
                        calls.lock().unwrap().push(format!(
                            "allocate({id},{},{})",
                            body["generatorId"].as_str().unwrap_or_default(),
                            body["allocatedPercentage"]
                        ));
                        Json(consumer(
                            &id,
                            "ALLOCATED",
                            body["generatorId"].as_str(),
                            body["allocatedPercentage"].as_f64(),
                        ))
                    }
                }),
            );
        spawn_upstream(router).await
    }

    async fn panel(calls: Arc<Mutex<Vec<String>>>) -> String {
        let upstream = backend(calls).await;
        let client = ApiClient::new(&upstream, Duration::from_secs(5), Session::in_memory()).unwrap();
        spawn_upstream(app(AppState::with_client(client))).await
    }

    #[tokio::test]
    async fn panel_routes_require_a_session() {
        let base = panel(Arc::default()).await;
        let http = reqwest::Client::new();

        let health = http.get(format!("{base}/api/health")).send().await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let response = http.get(format!("{base}/api/generators")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = http
            .get(format!("{base}/api/generators"))
            .header("accept-language", "en-US")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reallocation_through_the_panel() {
        let calls: Arc<Mutex<Vec<String>>> = Arc::default();
        let base = panel(calls.clone()).await;
        let http = reqwest::Client::new();
        login(&http, &base).await;

        let generators: Value = http
            .get(format!("{base}/api/generators"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(generators[0]["allocatedPercentage"], 30.0);
        assert_eq!(generators[0]["effectiveStatus"], "AWAITING_ALLOCATION");

        let form = json!({
            "name": "Consumidor C1",
            "cpfCnpj": "2",
            "ucNumber": "2",
            "concessionaire": "CEMIG",
            "city": "Uberaba",
            "state": "MG",
            "consumerType": "RESIDENTIAL",
            "phase": "MONOPHASIC",
            "averageMonthlyConsumption": 450,
            "discountOffered": 10,
            "status": "ALLOCATED",
            "generatorId": "G2"
        });
        let response = http
            .patch(format!("{base}/api/consumers/C1"))
            .json(&form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let outcome: Value = response.json().await.unwrap();
        assert_eq!(outcome["transition"], "reallocate");
        assert_eq!(outcome["consumer"]["generatorId"], "G2");

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["deallocate(C1)".to_string(), "allocate(C1,G2,45.0)".to_string()]);
    }

    async fn login(http: &reqwest::Client, base: &str) {
        let login = http
            .post(format!("{base}/api/auth/login"))
            .json(&json!({ "email": "a@b.com", "password": "x" }))
            .send()
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn suggested_percentage_above_100_goes_through_with_warnings() {
        let calls: Arc<Mutex<Vec<String>>> = Arc::default();
        let base = panel(calls.clone()).await;
        let http = reqwest::Client::new();
        login(&http, &base).await;

        let suggestion: Value = http
            .post(format!("{base}/api/consumers/form/suggestion"))
            .json(&json!({
                "generatorId": "G2",
                "averageMonthlyConsumption": 1500,
                "consumerId": "C1"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(suggestion["allocatedPercentage"], 150.0);

        // O cliente devolve o valor sugerido no formulário
        let form = json!({
            "name": "Consumidor C1",
            "cpfCnpj": "2",
            "ucNumber": "2",
            "concessionaire": "CEMIG",
            "city": "Uberaba",
            "state": "MG",
            "consumerType": "RESIDENTIAL",
            "phase": "MONOPHASIC",
            "averageMonthlyConsumption": 1500,
            "discountOffered": 10,
            "status": "ALLOCATED",
            "generatorId": "G2",
            "allocatedPercentage": suggestion["allocatedPercentage"]
        });
        let response = http
            .patch(format!("{base}/api/consumers/C1"))
            .json(&form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let outcome: Value = response.json().await.unwrap();
        assert_eq!(outcome["transition"], "reallocate");
        assert_eq!(outcome["warnings"][0]["kind"], "exceedsGeneratorCapacity");

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["deallocate(C1)".to_string(), "allocate(C1,G2,150.0)".to_string()]);
    }

    #[tokio::test]
    async fn lists_reflect_changes_made_outside_the_panel() {
        let generators: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(vec![generator("G1", 1000)]));
        let shared = generators.clone();
        let router = Router::new()
            .route(
                "/auth/login",
                post(|| async { Json(json!({ "access_token": "tok", "user": {
                    "id": "u1", "email": "a@b.com", "name": "Admin", "role": "ADMIN"
                }})) }),
            )
            .route(
                "/generators",
                get(move || {
                    let generators = shared.clone();
                    async move { Json(Value::Array(generators.lock().unwrap().clone())) }
                }),
            )
            .route("/consumers", get(|| async { Json(json!([])) }));
        let upstream = spawn_upstream(router).await;
        let client = ApiClient::new(&upstream, Duration::from_secs(5), Session::in_memory()).unwrap();
        let base = spawn_upstream(app(AppState::with_client(client))).await;

        let http = reqwest::Client::new();
        login(&http, &base).await;

        let list = |http: reqwest::Client, base: String| async move {
            let body: Value = http
                .get(format!("{base}/api/generators"))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            body.as_array().map(Vec::len).unwrap_or_default()
        };

        assert_eq!(list(http.clone(), base.clone()).await, 1);
        generators.lock().unwrap().push(generator("G2", 500));
        assert_eq!(list(http.clone(), base.clone()).await, 2);
        generators.lock().unwrap().clear();
        assert_eq!(list(http, base).await, 0);
    }
}
