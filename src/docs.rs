// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;
use crate::allocation;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::profile,
        handlers::auth::logout,

        // --- Generators ---
        handlers::generators::list_generators,
        handlers::generators::generator_stats,
        handlers::generators::get_generator,
        handlers::generators::list_generator_consumers,
        handlers::generators::create_generator,
        handlers::generators::update_generator,
        handlers::generators::delete_generator,

        // --- Consumers ---
        handlers::consumers::list_consumers,
        handlers::consumers::consumer_stats,
        handlers::consumers::generator_allocation,
        handlers::consumers::generator_options,
        handlers::consumers::suggest_allocation,
        handlers::consumers::get_consumer,
        handlers::consumers::create_consumer,
        handlers::consumers::update_consumer,
        handlers::consumers::allocate_consumer,
        handlers::consumers::deallocate_consumer,
        handlers::consumers::delete_consumer,

        // --- Representatives ---
        handlers::representatives::list_representatives,
        handlers::representatives::representative_statistics,
        handlers::representatives::active_representatives,
        handlers::representatives::get_representative,
        handlers::representatives::create_representative,
        handlers::representatives::update_representative,
        handlers::representatives::update_representative_status,
        handlers::representatives::delete_representative,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Generators ---
            models::generator::SourceType,
            models::generator::GeneratorStatus,
            models::generator::EffectiveGeneratorStatus,
            models::generator::Generator,
            models::generator::GeneratorView,
            models::generator::GeneratorStats,
            handlers::generators::GeneratorForm,

            // --- Consumers ---
            models::consumer::ConsumerStatus,
            models::consumer::ConsumerType,
            models::consumer::PhaseType,
            models::consumer::ConsumerRecord,
            models::consumer::ConsumerView,
            models::consumer::ConsumerStats,
            models::consumer::GeneratorAllocationRow,
            models::consumer::GeneratorOption,
            handlers::consumers::ConsumerForm,
            handlers::consumers::AllocateForm,
            handlers::consumers::SuggestionRequest,
            services::consumer_service::SubmitOutcome,
            services::consumer_service::Suggestion,
            allocation::Transition,
            allocation::AllocationWarning,

            // --- Representatives ---
            models::representative::RepresentativeStatus,
            models::representative::Specialization,
            models::representative::RepresentativeCount,
            models::representative::Representative,
            models::representative::RepresentativeStatistics,
            handlers::representatives::RepresentativeForm,
            handlers::representatives::StatusPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::StateDistribution,
            models::dashboard::RecentActivity,
            models::dashboard::GeneratorStatusInsight,
            models::dashboard::DashboardInsights,
            models::dashboard::DashboardData,
            models::dashboard::LocalInsights,
            models::dashboard::DashboardView,
        )
    ),
    tags(
        (name = "Auth", description = "Login e sessão do painel"),
        (name = "Generators", description = "Geradores e capacidade alocada"),
        (name = "Consumers", description = "Consumidores, alocação e formulário"),
        (name = "Representatives", description = "Representantes comerciais"),
        (name = "Dashboard", description = "Indicadores gerais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_the_panel_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/generators",
            "/api/consumers/{id}",
            "/api/consumers/form/suggestion",
            "/api/representatives/{id}/status",
            "/api/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltou {path}");
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("api_jwt")));
    }
}
