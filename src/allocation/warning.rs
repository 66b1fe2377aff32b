// src/allocation/warning.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::percentage::available_capacity;
use crate::models::consumer::Consumer;

/// Avisos do formulário. Nenhum deles bloqueia a submissão.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AllocationWarning {
    /// O consumo sozinho passa da potência do gerador (> 100%).
    #[serde(rename_all = "camelCase")]
    ExceedsGeneratorCapacity { percentage: Decimal },
    /// Somado aos outros consumidores, o gerador passaria de 100%.
    #[serde(rename_all = "camelCase")]
    ExceedsAvailableCapacity {
        generator_id: String,
        requested: Decimal,
        available: Decimal,
    },
}

pub fn allocation_warnings(
    generator_id: &str,
    consumer_id: Option<&str>,
    percentage: Decimal,
    consumers: &[Consumer],
) -> Vec<AllocationWarning> {
    let mut warnings = Vec::new();

    if percentage > Decimal::ONE_HUNDRED {
        warnings.push(AllocationWarning::ExceedsGeneratorCapacity { percentage });
    }

    let available = available_capacity(generator_id, consumer_id, consumers);
    if percentage > available {
        warnings.push(AllocationWarning::ExceedsAvailableCapacity {
            generator_id: generator_id.to_string(),
            requested: percentage,
            available,
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::percentage::tests::allocated;

    #[test]
    fn fits_without_warnings() {
        let consumers = vec![allocated("c1", "g1", 50)];
        assert!(allocation_warnings("g1", None, Decimal::from(50), &consumers).is_empty());
    }

    #[test]
    fn warns_when_generator_would_overflow() {
        let consumers = vec![allocated("c1", "g1", 80)];
        let warnings = allocation_warnings("g1", Some("c2"), Decimal::from(30), &consumers);
        assert_eq!(
            warnings,
            vec![AllocationWarning::ExceedsAvailableCapacity {
                generator_id: "g1".into(),
                requested: Decimal::from(30),
                available: Decimal::from(20),
            }]
        );
    }

    #[test]
    fn editing_own_allocation_is_not_counted_twice() {
        let consumers = vec![allocated("c1", "g1", 80)];
        assert!(allocation_warnings("g1", Some("c1"), Decimal::from(90), &consumers).is_empty());
    }

    #[test]
    fn consumption_above_power_is_flagged() {
        let warnings = allocation_warnings("g1", None, Decimal::from(150), &[]);
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            AllocationWarning::ExceedsGeneratorCapacity {
                percentage: Decimal::from(150)
            }
        );
    }
}
