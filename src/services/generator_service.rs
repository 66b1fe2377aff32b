// src/services/generator_service.rs

use rust_decimal::Decimal;

use crate::{
    allocation,
    client::ApiClient,
    common::error::AppError,
    models::{
        consumer::Consumer,
        generator::{
            EffectiveGeneratorStatus, Generator, GeneratorPayload, GeneratorStats, GeneratorView,
        },
    },
    services::resource::ResourceList,
};

#[derive(Clone)]
pub struct GeneratorService {
    client: ApiClient,
    resource: ResourceList<Generator>,
}

impl GeneratorService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            resource: ResourceList::new("geradores", "/generators"),
        }
    }

    pub async fn list(&self) -> Result<Vec<Generator>, AppError> {
        self.resource.fetch(&self.client).await
    }

    pub async fn get(&self, id: &str) -> Result<Generator, AppError> {
        Ok(self.client.get(&format!("/generators/{id}")).await?)
    }

    pub async fn create(&self, payload: &GeneratorPayload) -> Result<Generator, AppError> {
        let _guard = self.resource.begin_mutation()?;
        let generator: Generator = self.client.post("/generators", payload).await?;
        tracing::info!("✅ Gerador '{}' cadastrado ({})", generator.owner_name, generator.id);
        Ok(generator)
    }

    pub async fn update(&self, id: &str, payload: &GeneratorPayload) -> Result<Generator, AppError> {
        let _guard = self.resource.begin_mutation()?;
        let generator: Generator = self
            .client
            .patch(&format!("/generators/{id}"), payload)
            .await?;
        tracing::info!("Gerador {} atualizado", id);
        Ok(generator)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.resource.begin_mutation()?;
        self.client.delete(&format!("/generators/{id}")).await?;
        tracing::info!("Gerador {} excluído", id);
        Ok(())
    }
}

// =========================================================================
//  VISÕES DA TELA DE GERADORES
// =========================================================================

pub fn view(generator: &Generator, consumers: &[Consumer]) -> GeneratorView {
    let allocated = allocation::allocated_percentage(&generator.id, consumers);

    GeneratorView {
        generator: generator.clone(),
        allocated_percentage: allocated,
        available_capacity: Decimal::ONE_HUNDRED - allocated,
        effective_status: allocation::derive_generator_status(generator.status, allocated),
        consumers_count: consumers
            .iter()
            .filter(|c| c.allocation_on(&generator.id).is_some())
            .count(),
    }
}

pub fn views(generators: &[Generator], consumers: &[Consumer]) -> Vec<GeneratorView> {
    generators.iter().map(|g| view(g, consumers)).collect()
}

/// Contadores do topo da tela. Todos usam o status exibido, então um gerador
/// cheio conta só em `fully_allocated`.
pub fn stats(views: &[GeneratorView]) -> GeneratorStats {
    let count = |status: EffectiveGeneratorStatus| {
        views.iter().filter(|v| v.effective_status == status).count()
    };

    GeneratorStats {
        total: views.len(),
        under_analysis: count(EffectiveGeneratorStatus::UnderAnalysis),
        awaiting_allocation: count(EffectiveGeneratorStatus::AwaitingAllocation),
        fully_allocated: count(EffectiveGeneratorStatus::FullyAllocated),
        total_installed_power: views.iter().map(|v| v.generator.installed_power).sum(),
    }
}

pub fn consumers_of(generator_id: &str, consumers: &[Consumer]) -> Vec<Consumer> {
    consumers
        .iter()
        .filter(|c| c.allocation_on(generator_id).is_some())
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::allocation::percentage::tests::{allocated, available};
    use crate::models::generator::{GeneratorStatus, SourceType};

    pub(crate) fn generator(id: &str, power: i64, status: GeneratorStatus) -> Generator {
        Generator {
            id: id.into(),
            owner_name: format!("Usina {id}"),
            cpf_cnpj: format!("{id}-cnpj"),
            source_type: SourceType::Solar,
            installed_power: Decimal::from(power),
            concessionaire: "CEMIG".into(),
            uc_number: "1".into(),
            city: "Uberaba".into(),
            state: "MG".into(),
            status,
            observations: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn view_derives_status_and_capacity() {
        let g = generator("G", 1000, GeneratorStatus::AwaitingAllocation);
        let consumers = vec![allocated("c1", "G", 60), allocated("c2", "G", 40), available("c3")];

        let v = view(&g, &consumers);
        assert_eq!(v.allocated_percentage, Decimal::from(100));
        assert_eq!(v.available_capacity, Decimal::ZERO);
        assert_eq!(v.effective_status, EffectiveGeneratorStatus::FullyAllocated);
        assert_eq!(v.consumers_count, 2);
    }

    #[test]
    fn view_keeps_stored_status_below_full() {
        let g = generator("G", 1000, GeneratorStatus::UnderAnalysis);
        let v = view(&g, &[allocated("c1", "G", 30)]);
        assert_eq!(v.effective_status, EffectiveGeneratorStatus::UnderAnalysis);
        assert_eq!(v.available_capacity, Decimal::from(70));
    }

    #[test]
    fn stats_use_effective_status() {
        let generators = vec![
            generator("G1", 1000, GeneratorStatus::AwaitingAllocation),
            generator("G2", 500, GeneratorStatus::AwaitingAllocation),
            generator("G3", 250, GeneratorStatus::UnderAnalysis),
        ];
        let consumers = vec![allocated("c1", "G1", 100)];

        let stats = stats(&views(&generators, &consumers));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.fully_allocated, 1);
        assert_eq!(stats.awaiting_allocation, 1);
        assert_eq!(stats.under_analysis, 1);
        assert_eq!(stats.total_installed_power, Decimal::from(1750));
    }

    #[test]
    fn consumers_of_lists_only_linked_ones() {
        let consumers = vec![allocated("c1", "G1", 10), allocated("c2", "G2", 10), available("c3")];
        let linked = consumers_of("G1", &consumers);
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].id, "c1");
    }
}
