// src/allocation/transition.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::consumer::{Consumer, ConsumerPayload, ConsumerStatus};

/// O que uma submissão do formulário de consumidor significa para o backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Create,
    Allocate,
    Deallocate,
    Reallocate,
    Update,
}

/// Uma chamada ao backend dentro de uma transição.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Create(ConsumerPayload),
    Allocate {
        generator_id: String,
        percentage: Decimal,
    },
    Deallocate,
    Update(ConsumerPayload),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Create(_) => "create",
            Step::Allocate { .. } => "allocate",
            Step::Deallocate => "deallocate",
            Step::Update(_) => "update",
        }
    }
}

/// Passos em ordem. Cada um só começa depois que o anterior terminou.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub transition: Transition,
    pub steps: Vec<Step>,
}

/// Classifica a edição comparando (status, gerador) antes e depois.
///
/// `original` é `None` para um cadastro novo.
pub fn classify(
    original: Option<(ConsumerStatus, Option<&str>)>,
    new_status: ConsumerStatus,
    new_generator: Option<&str>,
) -> Transition {
    let Some((original_status, original_generator)) = original else {
        return Transition::Create;
    };

    use ConsumerStatus::{Allocated, Available};

    match (original_status, new_status, new_generator) {
        (Allocated, Allocated, Some(new_id)) if Some(new_id) != original_generator => {
            Transition::Reallocate
        }
        (Available, Allocated, Some(_)) => Transition::Allocate,
        (Allocated, Available, _) => Transition::Deallocate,
        // mesmo gerador, ou ALLOCATED sem gerador escolhido: só grava os campos
        _ => Transition::Update,
    }
}

/// Monta a sequência de chamadas para uma submissão já normalizada.
pub fn plan(original: Option<&Consumer>, payload: &ConsumerPayload) -> TransitionPlan {
    let transition = classify(
        original.map(|c| (c.status, c.link.generator_id())),
        payload.status,
        payload.generator_id.as_deref(),
    );

    let allocate = || Step::Allocate {
        generator_id: payload.generator_id.clone().unwrap_or_default(),
        percentage: payload.allocated_percentage.unwrap_or(Decimal::ZERO),
    };

    let steps = match transition {
        Transition::Create => match payload.generator_id {
            // cria disponível e aloca em seguida, para o backend validar a capacidade
            Some(_) if payload.status == ConsumerStatus::Allocated => {
                let mut created = payload.clone();
                created.status = ConsumerStatus::Available;
                created.generator_id = None;
                created.allocated_percentage = None;
                vec![Step::Create(created), allocate()]
            }
            _ => vec![Step::Create(payload.clone())],
        },
        Transition::Allocate => vec![allocate()],
        Transition::Reallocate => vec![Step::Deallocate, allocate()],
        Transition::Deallocate => vec![Step::Deallocate, Step::Update(payload.clone())],
        Transition::Update => vec![Step::Update(payload.clone())],
    };

    TransitionPlan { transition, steps }
}

/// Passo que desfaz `done` caso o passo seguinte falhe.
///
/// Só a realocação tem volta (aloca de novo no gerador original). Na
/// desalocação o usuário queria mesmo liberar o consumidor, e um cadastro
/// recém-criado não é apagado automaticamente.
pub fn compensation_for(
    transition: Transition,
    done: &Step,
    original: Option<&Consumer>,
) -> Option<Step> {
    match (transition, done) {
        (Transition::Reallocate, Step::Deallocate) => {
            let original = original?;
            let generator_id = original.link.generator_id()?.to_string();
            let percentage = original.link.percentage()?;
            Some(Step::Allocate {
                generator_id,
                percentage,
            })
        }
        _ => None,
    }
}
