// src/services/consumer_service.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    allocation::{
        self, allocation_warnings,
        transition::{self, compensation_for},
        AllocationWarning, Step, Transition, TransitionPlan,
    },
    client::{ApiClient, ClientError},
    common::error::AppError,
    models::{
        consumer::{
            AllocatePayload, Consumer, ConsumerPayload, ConsumerRecord, ConsumerStats,
            ConsumerStatus, GeneratorAllocationRow, GeneratorOption,
        },
        generator::Generator,
    },
    services::resource::ResourceList,
};

// =========================================================================
//  CHAMADAS AO BACKEND (isoladas para a transição poder ser testada)
// =========================================================================

#[async_trait]
pub trait ConsumerCalls: Send + Sync {
    async fn create(&self, payload: &ConsumerPayload) -> Result<Consumer, ClientError>;
    async fn update(&self, id: &str, payload: &ConsumerPayload) -> Result<Consumer, ClientError>;
    async fn allocate(&self, id: &str, body: &AllocatePayload) -> Result<Consumer, ClientError>;
    async fn deallocate(&self, id: &str) -> Result<Consumer, ClientError>;
}

#[async_trait]
impl ConsumerCalls for ApiClient {
    async fn create(&self, payload: &ConsumerPayload) -> Result<Consumer, ClientError> {
        self.post("/consumers", payload).await
    }

    async fn update(&self, id: &str, payload: &ConsumerPayload) -> Result<Consumer, ClientError> {
        self.patch(&format!("/consumers/{id}"), payload).await
    }

    async fn allocate(&self, id: &str, body: &AllocatePayload) -> Result<Consumer, ClientError> {
        self.post(&format!("/consumers/{id}/allocate"), body).await
    }

    // POST sem corpo útil, como o backend espera
    async fn deallocate(&self, id: &str) -> Result<Consumer, ClientError> {
        self.post(&format!("/consumers/{id}/deallocate"), &serde_json::json!({}))
            .await
    }
}

async fn run_step<C>(calls: &C, consumer_id: Option<&str>, step: &Step) -> Result<Consumer, ClientError>
where
    C: ConsumerCalls + ?Sized,
{
    let id = || {
        consumer_id.ok_or_else(|| {
            ClientError::NotFound(format!("consumidor ainda sem id para '{}'", step.name()))
        })
    };

    match step {
        Step::Create(payload) => calls.create(payload).await,
        Step::Allocate {
            generator_id,
            percentage,
        } => {
            let body = AllocatePayload {
                generator_id: generator_id.clone(),
                allocated_percentage: *percentage,
            };
            calls.allocate(id()?, &body).await
        }
        Step::Deallocate => calls.deallocate(id()?).await,
        Step::Update(payload) => calls.update(id()?, payload).await,
    }
}

/// Executa o plano passo a passo, um de cada vez.
///
/// Falha no primeiro passo: nada mudou no backend, devolve o erro da chamada.
/// Falha depois de algum passo concluído: tenta a compensação (quando existe)
/// e devolve `AppError::PartiallyApplied`.
pub async fn apply_transition<C>(
    calls: &C,
    original: Option<&Consumer>,
    plan: &TransitionPlan,
) -> Result<Option<Consumer>, AppError>
where
    C: ConsumerCalls + ?Sized,
{
    let mut consumer_id = original.map(|c| c.id.clone());
    let mut last = None;
    let mut completed: Vec<&Step> = Vec::new();

    for step in &plan.steps {
        match run_step(calls, consumer_id.as_deref(), step).await {
            Ok(consumer) => {
                consumer_id = Some(consumer.id.clone());
                last = Some(consumer);
                completed.push(step);
            }
            Err(source) if completed.is_empty() => return Err(AppError::Upstream(source)),
            Err(source) => {
                let undo = completed
                    .last()
                    .and_then(|done| compensation_for(plan.transition, done, original));

                let compensated = match undo {
                    Some(undo) => match run_step(calls, consumer_id.as_deref(), &undo).await {
                        Ok(_) => {
                            tracing::info!("↩️ Compensação '{}' aplicada", undo.name());
                            true
                        }
                        Err(e) => {
                            tracing::error!("Compensação '{}' falhou: {}", undo.name(), e);
                            false
                        }
                    },
                    None => false,
                };

                return Err(AppError::PartiallyApplied {
                    transition: transition_name(plan.transition),
                    completed_steps: completed.iter().map(|s| s.name()).collect(),
                    failed_step: step.name(),
                    compensated,
                    source,
                });
            }
        }
    }

    Ok(last)
}

fn transition_name(transition: Transition) -> &'static str {
    match transition {
        Transition::Create => "create",
        Transition::Allocate => "allocate",
        Transition::Deallocate => "deallocate",
        Transition::Reallocate => "reallocate",
        Transition::Update => "update",
    }
}

// =========================================================================
//  FORMULÁRIO
// =========================================================================

/// Normaliza o formulário antes de decidir a transição.
///
/// AVAILABLE limpa gerador e percentual. ALLOCATED recalcula o percentual a
/// partir do consumo e da potência do gerador escolhido; sem sugestão possível,
/// fica o valor que veio.
pub fn prepare_submission(mut form: ConsumerPayload, generators: &[Generator]) -> ConsumerPayload {
    if form.status != ConsumerStatus::Allocated {
        form.generator_id = None;
        form.allocated_percentage = None;
        return form;
    }

    form.generator_id = form.generator_id.filter(|id| !id.is_empty());

    let suggestion = form
        .generator_id
        .as_deref()
        .and_then(|id| generators.iter().find(|g| g.id == id))
        .and_then(|g| {
            allocation::suggested_percentage(form.average_monthly_consumption, g.installed_power)
        });

    if suggestion.is_some() {
        form.allocated_percentage = suggestion;
    }

    form
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub allocated_percentage: Option<Decimal>,
    pub available_capacity: Option<Decimal>,
    pub warnings: Vec<AllocationWarning>,
}

pub fn suggestion(
    generator: Option<&Generator>,
    consumption: Decimal,
    consumer_id: Option<&str>,
    consumers: &[Consumer],
) -> Suggestion {
    let Some(generator) = generator else {
        return Suggestion {
            allocated_percentage: None,
            available_capacity: None,
            warnings: Vec::new(),
        };
    };

    let percentage = allocation::suggested_percentage(consumption, generator.installed_power);
    let warnings = percentage
        .map(|p| allocation_warnings(&generator.id, consumer_id, p, consumers))
        .unwrap_or_default();

    Suggestion {
        allocated_percentage: percentage,
        available_capacity: Some(allocation::available_capacity(
            &generator.id,
            consumer_id,
            consumers,
        )),
        warnings,
    }
}

pub fn generator_options(
    generators: &[Generator],
    consumers: &[Consumer],
    exclude_consumer_id: Option<&str>,
) -> Vec<GeneratorOption> {
    generators
        .iter()
        .map(|g| GeneratorOption {
            id: g.id.clone(),
            owner_name: g.owner_name.clone(),
            location: if g.city.is_empty() {
                g.state.clone()
            } else {
                g.city.clone()
            },
            installed_power: g.installed_power,
            available_capacity: allocation::available_capacity(
                &g.id,
                exclude_consumer_id,
                consumers,
            ),
        })
        .collect()
}

// =========================================================================
//  ESTATÍSTICAS DA TELA
// =========================================================================

pub fn stats(consumers: &[Consumer]) -> ConsumerStats {
    ConsumerStats {
        total: consumers.len(),
        allocated: consumers
            .iter()
            .filter(|c| c.status == ConsumerStatus::Allocated)
            .count(),
        available: consumers
            .iter()
            .filter(|c| c.status == ConsumerStatus::Available)
            .count(),
        total_consumption: consumers.iter().map(|c| c.average_monthly_consumption).sum(),
    }
}

/// Alocação por gerador, os mais ocupados (em número de consumidores) primeiro.
pub fn allocation_table(generators: &[Generator], consumers: &[Consumer]) -> Vec<GeneratorAllocationRow> {
    let mut rows: Vec<GeneratorAllocationRow> = generators
        .iter()
        .map(|g| {
            let linked: Vec<&Consumer> = consumers
                .iter()
                .filter(|c| c.allocation_on(&g.id).is_some())
                .collect();
            let allocated = allocation::allocated_percentage(&g.id, consumers);

            GeneratorAllocationRow {
                generator_id: g.id.clone(),
                owner_name: g.owner_name.clone(),
                installed_power: g.installed_power,
                consumers_count: linked.len(),
                allocated_percentage: allocated,
                total_consumption: linked.iter().map(|c| c.average_monthly_consumption).sum(),
                available_capacity: Decimal::ONE_HUNDRED - allocated,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.consumers_count.cmp(&a.consumers_count));
    rows
}

// =========================================================================
//  SERVIÇO
// =========================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub transition: Transition,
    pub consumer: Option<ConsumerRecord>,
    pub warnings: Vec<AllocationWarning>,
}

#[derive(Clone)]
pub struct ConsumerService {
    client: ApiClient,
    resource: ResourceList<Consumer>,
}

impl ConsumerService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            resource: ResourceList::new("consumidores", "/consumers"),
        }
    }

    pub async fn list(&self) -> Result<Vec<Consumer>, AppError> {
        self.resource.fetch(&self.client).await
    }

    pub async fn get(&self, id: &str) -> Result<Consumer, AppError> {
        Ok(self.client.get(&format!("/consumers/{id}")).await?)
    }

    /// Submissão do formulário (cadastro novo quando `original_id` é `None`).
    pub async fn submit(
        &self,
        original_id: Option<&str>,
        form: ConsumerPayload,
        generators: &[Generator],
    ) -> Result<SubmitOutcome, AppError> {
        let _guard = self.resource.begin_mutation()?;

        let original = match original_id {
            Some(id) => Some(self.get(id).await?),
            None => None,
        };

        let payload = prepare_submission(form, generators);

        let warnings = match (&payload.generator_id, payload.allocated_percentage) {
            (Some(generator_id), Some(percentage)) => {
                let consumers = self.resource.fetch(&self.client).await?;
                allocation_warnings(generator_id, original_id, percentage, &consumers)
            }
            _ => Vec::new(),
        };
        for warning in &warnings {
            tracing::warn!("Alocação acima da capacidade: {:?}", warning);
        }

        let plan = transition::plan(original.as_ref(), &payload);
        tracing::info!(
            consumer = original_id.unwrap_or("novo"),
            "Transição {:?} com {} passo(s)",
            plan.transition,
            plan.steps.len()
        );

        let consumer = apply_transition(&self.client, original.as_ref(), &plan).await?;
        Ok(SubmitOutcome {
            transition: plan.transition,
            consumer: consumer.map(ConsumerRecord::from),
            warnings,
        })
    }

    pub async fn allocate(
        &self,
        id: &str,
        generator_id: &str,
        percentage: Decimal,
    ) -> Result<Consumer, AppError> {
        let _guard = self.resource.begin_mutation()?;
        let body = AllocatePayload {
            generator_id: generator_id.to_string(),
            allocated_percentage: percentage,
        };
        let consumer = ConsumerCalls::allocate(&self.client, id, &body).await?;
        tracing::info!("Consumidor {} alocado em {} ({}%)", id, generator_id, percentage);
        Ok(consumer)
    }

    pub async fn deallocate(&self, id: &str) -> Result<Consumer, AppError> {
        let _guard = self.resource.begin_mutation()?;
        let consumer = ConsumerCalls::deallocate(&self.client, id).await?;
        tracing::info!("Consumidor {} desalocado", id);
        Ok(consumer)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.resource.begin_mutation()?;
        self.client.delete(&format!("/consumers/{id}")).await?;
        tracing::info!("Consumidor {} excluído", id);
        Ok(())
    }
}
