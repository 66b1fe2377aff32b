// src/services/filters.rs
//
// Busca livre + filtros de select das listas. Sem paginação.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::{
    consumer::{Consumer, ConsumerStatus, ConsumerType},
    generator::{EffectiveGeneratorStatus, Generator, GeneratorView, SourceType},
    representative::{Representative, RepresentativeStatus, Specialization},
};

/// Busca sem diferenciar maiúsculas. Termo vazio casa com tudo.
fn matches_search(term: Option<&str>, fields: &[&str]) -> bool {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return true;
    };
    let term = term.to_lowercase();
    fields.iter().any(|field| field.to_lowercase().contains(&term))
}

// Filtro ausente = "todos"
fn matches_option<T: PartialEq>(wanted: Option<&T>, actual: &T) -> bool {
    wanted.is_none_or(|w| w == actual)
}

// --- GERADORES ---

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct GeneratorFilter {
    /// Nome do titular, CPF/CNPJ ou cidade
    pub search: Option<String>,
    /// Status exibido (inclui FULLY_ALLOCATED)
    pub status: Option<EffectiveGeneratorStatus>,
    pub source_type: Option<SourceType>,
}

impl GeneratorFilter {
    pub fn matches(&self, view: &GeneratorView) -> bool {
        let g = &view.generator;
        matches_search(
            self.search.as_deref(),
            &[g.owner_name.as_str(), g.cpf_cnpj.as_str(), g.city.as_str()],
        ) && matches_option(self.status.as_ref(), &view.effective_status)
            && matches_option(self.source_type.as_ref(), &g.source_type)
    }

    pub fn apply(&self, views: Vec<GeneratorView>) -> Vec<GeneratorView> {
        views.into_iter().filter(|v| self.matches(v)).collect()
    }
}

// --- CONSUMIDORES ---

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ConsumerFilter {
    /// Nome, CPF/CNPJ, cidade ou titular do gerador vinculado
    pub search: Option<String>,
    pub status: Option<ConsumerStatus>,
    pub consumer_type: Option<ConsumerType>,
    pub generator_id: Option<String>,
}

impl ConsumerFilter {
    pub fn matches(&self, consumer: &Consumer, generators: &[Generator]) -> bool {
        let owner = consumer
            .link
            .generator_id()
            .and_then(|id| generators.iter().find(|g| g.id == id))
            .map(|g| g.owner_name.as_str())
            .unwrap_or_default();

        let generator_ok = match self.generator_id.as_deref() {
            None | Some("") => true,
            Some(id) => consumer.link.generator_id() == Some(id),
        };

        matches_search(
            self.search.as_deref(),
            &[
                consumer.name.as_str(),
                consumer.cpf_cnpj.as_str(),
                consumer.city.as_str(),
                owner,
            ],
        ) && matches_option(self.status.as_ref(), &consumer.status)
            && matches_option(self.consumer_type.as_ref(), &consumer.consumer_type)
            && generator_ok
    }

    pub fn apply(&self, consumers: Vec<Consumer>, generators: &[Generator]) -> Vec<Consumer> {
        consumers
            .into_iter()
            .filter(|c| self.matches(c, generators))
            .collect()
    }
}

// --- REPRESENTANTES ---

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct RepresentativeFilter {
    /// Nome, e-mail, CPF/CNPJ ou cidade
    pub search: Option<String>,
    pub status: Option<RepresentativeStatus>,
    /// UF com duas letras
    pub state: Option<String>,
    pub specialization: Option<Specialization>,
}

impl RepresentativeFilter {
    pub fn matches(&self, r: &Representative) -> bool {
        let state_ok = match self.state.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(state) => r.state.eq_ignore_ascii_case(state),
        };
        let specialization_ok = self
            .specialization
            .is_none_or(|s| r.specializations.contains(&s));

        matches_search(
            self.search.as_deref(),
            &[r.name.as_str(), r.email.as_str(), r.cpf_cnpj.as_str(), r.city.as_str()],
        ) && matches_option(self.status.as_ref(), &r.status)
            && state_ok
            && specialization_ok
    }

    pub fn apply(&self, representatives: Vec<Representative>) -> Vec<Representative> {
        representatives
            .into_iter()
            .filter(|r| self.matches(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::percentage::tests::{allocated, available};
    use crate::models::generator::GeneratorStatus;
    use crate::services::generator_service::{self, tests::generator};
    use rust_decimal::Decimal;

    #[test]
    fn empty_search_matches_everything() {
        assert!(matches_search(None, &["x"]));
        assert!(matches_search(Some("  "), &["x"]));
        assert!(matches_search(Some("URA"), &["Uberaba"]));
        assert!(!matches_search(Some("sp"), &["Uberaba", "MG"]));
    }

    #[test]
    fn generator_filter_combines_search_and_dropdowns() {
        let generators = vec![
            generator("G1", 1000, GeneratorStatus::AwaitingAllocation),
            generator("G2", 500, GeneratorStatus::AwaitingAllocation),
        ];
        let consumers = vec![allocated("c1", "G1", 100)];
        let views = generator_service::views(&generators, &consumers);

        let filter = GeneratorFilter {
            status: Some(EffectiveGeneratorStatus::FullyAllocated),
            ..Default::default()
        };
        let result = filter.apply(views.clone());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].generator.id, "G1");

        let filter = GeneratorFilter {
            search: Some("usina g2".into()),
            source_type: Some(SourceType::Solar),
            ..Default::default()
        };
        let result = filter.apply(views.clone());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].generator.id, "G2");

        let filter = GeneratorFilter {
            source_type: Some(SourceType::Wind),
            ..Default::default()
        };
        assert!(filter.apply(views).is_empty());
    }

    #[test]
    fn consumer_search_reaches_the_linked_generator_owner() {
        let mut g = generator("G1", 1000, GeneratorStatus::AwaitingAllocation);
        g.owner_name = "Fazenda Boa Vista".into();
        let consumers = vec![allocated("c1", "G1", 30), available("c2")];

        let filter = ConsumerFilter {
            search: Some("boa vista".into()),
            ..Default::default()
        };
        let result = filter.apply(consumers.clone(), &[g.clone()]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "c1");

        let filter = ConsumerFilter {
            status: Some(ConsumerStatus::Available),
            ..Default::default()
        };
        assert_eq!(filter.apply(consumers.clone(), &[g.clone()])[0].id, "c2");

        let filter = ConsumerFilter {
            generator_id: Some("G1".into()),
            consumer_type: Some(ConsumerType::Residential),
            ..Default::default()
        };
        assert_eq!(filter.apply(consumers, &[g]).len(), 1);
    }

    #[test]
    fn representative_filter_by_state_and_specialization() {
        let base = Representative {
            id: "r1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            cpf_cnpj: "1".into(),
            phone: "0".into(),
            city: "Uberaba".into(),
            state: "MG".into(),
            commission_rate: Decimal::from(5),
            specializations: vec![Specialization::Solar],
            status: RepresentativeStatus::Active,
            notes: None,
            created_at: None,
            updated_at: None,
            count: None,
        };
        let other = Representative {
            id: "r2".into(),
            state: "SP".into(),
            specializations: vec![Specialization::Rural],
            ..base.clone()
        };

        let filter = RepresentativeFilter {
            state: Some("mg".into()),
            specialization: Some(Specialization::Solar),
            ..Default::default()
        };
        let result = filter.apply(vec![base, other]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "r1");
    }

    #[test]
    fn query_string_deserializes_camel_case() {
        let filter: ConsumerFilter =
            serde_json::from_value(serde_json::json!({ "consumerType": "RURAL", "generatorId": "G1" }))
                .unwrap();
        assert_eq!(filter.consumer_type, Some(ConsumerType::Rural));
        assert_eq!(filter.generator_id.as_deref(), Some("G1"));
    }
}
