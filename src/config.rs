// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;

use crate::{
    client::{ApiClient, Session},
    services::{
        auth_service::AuthService, consumer_service::ConsumerService,
        dashboard_service::DashboardService, generator_service::GeneratorService,
        representative_service::RepresentativeService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub session: Session,
    pub auth_service: AuthService,
    pub generator_service: GeneratorService,
    pub consumer_service: ConsumerService,
    pub representative_service: RepresentativeService,
    pub dashboard_service: DashboardService,
}

/// Endereço de escuta, lido junto com o resto do `.env`.
pub fn bind_addr() -> String {
    env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("API_BASE_URL").context("API_BASE_URL deve ser definida")?;
        let token_file = env::var("TOKEN_FILE").unwrap_or_else(|_| ".painel-token".to_string());
        let timeout_secs: u64 = match env::var("API_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("API_TIMEOUT_SECS inválido: {value}"))?,
            Err(_) => 30,
        };

        let session = Session::load(PathBuf::from(token_file)).await?;
        let client = ApiClient::new(&base_url, Duration::from_secs(timeout_secs), session.clone())?;

        tracing::info!("✅ Backend configurado em {}", base_url);

        Ok(Self::with_client(client))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            session: client.session().clone(),
            auth_service: AuthService::new(client.clone()),
            generator_service: GeneratorService::new(client.clone()),
            consumer_service: ConsumerService::new(client.clone()),
            representative_service: RepresentativeService::new(client.clone()),
            dashboard_service: DashboardService::new(client),
        }
    }
}
