// src/services/dashboard_service.rs

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::{
    allocation,
    client::ApiClient,
    common::error::AppError,
    models::{
        consumer::{Consumer, ConsumerStatus},
        dashboard::{DashboardData, LocalInsights},
        generator::{EffectiveGeneratorStatus, Generator},
        representative::{Representative, RepresentativeStatus},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn remote(&self) -> Result<DashboardData, AppError> {
        Ok(self.client.get("/dashboard").await?)
    }
}

/// Números do painel recalculados a partir das listas, para conferir com os
/// que o backend manda.
pub fn local_insights(
    generators: &[Generator],
    consumers: &[Consumer],
    representatives: &[Representative],
) -> LocalInsights {
    let power_by_generator: HashMap<&str, Decimal> = generators
        .iter()
        .map(|g| (g.id.as_str(), g.installed_power))
        .collect();

    let total_capacity: Decimal = generators.iter().map(|g| g.installed_power).sum();

    // kW já comprometidos: % do consumidor aplicado à potência do gerador dele
    let allocated_kw: Decimal = consumers
        .iter()
        .filter_map(|c| {
            let generator_id = c.link.generator_id()?;
            let power = power_by_generator.get(generator_id)?;
            Some(c.link.percentage()? / Decimal::ONE_HUNDRED * *power)
        })
        .sum();

    let unallocated: Vec<&Consumer> = consumers
        .iter()
        .filter(|c| c.status != ConsumerStatus::Allocated)
        .collect();

    let average_discount = if consumers.is_empty() {
        Decimal::ZERO
    } else {
        let total: Decimal = consumers.iter().map(|c| c.discount_offered).sum();
        allocation::round2(total / Decimal::from(consumers.len()))
    };

    let effective: Vec<EffectiveGeneratorStatus> = generators
        .iter()
        .map(|g| {
            allocation::derive_generator_status(
                g.status,
                allocation::allocated_percentage(&g.id, consumers),
            )
        })
        .collect();
    let generators_with =
        |status: EffectiveGeneratorStatus| effective.iter().filter(|s| **s == status).count();

    let mut representatives_by_state = BTreeMap::new();
    for r in representatives {
        *representatives_by_state.entry(r.state.clone()).or_insert(0) += 1;
    }
    let representatives_with = |status: RepresentativeStatus| {
        representatives.iter().filter(|r| r.status == status).count()
    };

    LocalInsights {
        total_capacity,
        unallocated_capacity: total_capacity - allocated_kw,
        total_consumption: consumers.iter().map(|c| c.average_monthly_consumption).sum(),
        unallocated_consumers: unallocated.len(),
        unallocated_consumption: unallocated.iter().map(|c| c.average_monthly_consumption).sum(),
        average_discount,
        generators_under_analysis: generators_with(EffectiveGeneratorStatus::UnderAnalysis),
        generators_awaiting_allocation: generators_with(EffectiveGeneratorStatus::AwaitingAllocation),
        generators_fully_allocated: generators_with(EffectiveGeneratorStatus::FullyAllocated),
        active_representatives: representatives_with(RepresentativeStatus::Active),
        pending_representatives: representatives_with(RepresentativeStatus::PendingApproval),
        representatives_by_state,
    }
}
