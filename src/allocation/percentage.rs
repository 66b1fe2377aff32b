// src/allocation/percentage.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    consumer::Consumer,
    generator::{EffectiveGeneratorStatus, GeneratorStatus},
};

const FULL: Decimal = Decimal::ONE_HUNDRED;

/// Soma dos percentuais dos consumidores ALLOCATED no gerador.
///
/// Consumidores com status diferente de ALLOCATED nunca entram, mesmo que o
/// backend ainda guarde um percentual antigo neles.
pub fn allocated_percentage(generator_id: &str, consumers: &[Consumer]) -> Decimal {
    consumers
        .iter()
        .filter_map(|c| c.allocation_on(generator_id))
        .sum()
}

/// Status exibido: FULLY_ALLOCATED quando a soma chega a 100%, senão o gravado.
pub fn derive_generator_status(
    stored: GeneratorStatus,
    allocated: Decimal,
) -> EffectiveGeneratorStatus {
    if allocated >= FULL {
        EffectiveGeneratorStatus::FullyAllocated
    } else {
        stored.into()
    }
}

/// Percentual sugerido no formulário: consumo / potência * 100, com 2 casas.
///
/// `None` quando não há o que sugerir: potência zero (ou negativa) ou consumo
/// zero (ou negativo). Nesses casos o formulário mantém o valor que já tinha.
/// Não limita a 100.
pub fn suggested_percentage(consumption: Decimal, installed_power: Decimal) -> Option<Decimal> {
    if installed_power <= Decimal::ZERO || consumption <= Decimal::ZERO {
        return None;
    }

    let raw = consumption.checked_div(installed_power)?.checked_mul(FULL)?;
    Some(round2(raw))
}

/// Capacidade livre do gerador (em %), ignorando o consumidor em edição.
pub fn available_capacity(
    generator_id: &str,
    exclude_consumer_id: Option<&str>,
    consumers: &[Consumer],
) -> Decimal {
    let taken: Decimal = consumers
        .iter()
        .filter(|c| Some(c.id.as_str()) != exclude_consumer_id)
        .filter_map(|c| c.allocation_on(generator_id))
        .sum();

    FULL - taken
}

// Arredondamento "meio para cima", igual ao da tela antiga
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
