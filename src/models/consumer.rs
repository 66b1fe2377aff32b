// src/models/consumer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- ENUMS ---

// IN_PROCESS e CONVERTED existem no backend mas a tela só trabalha com os dois primeiros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumerStatus {
    Available,
    Allocated,
    InProcess,
    Converted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumerType {
    Residential,
    Commercial,
    Rural,
    Industrial,
    PublicPower,
}

// O formulário antigo mandava SINGLE/TWO/THREE; o backend só conhece os nomes longos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseType {
    #[serde(alias = "SINGLE")]
    Monophasic,
    #[serde(alias = "TWO")]
    Biphasic,
    #[serde(alias = "THREE")]
    Triphasic,
}

// --- VÍNCULO COM O GERADOR ---

/// Vínculo de um consumidor com um gerador.
///
/// Só existe percentual quando existe gerador; o par (status, generatorId,
/// allocatedPercentage) do backend é normalizado para esta forma na leitura.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumerLink {
    Unallocated,
    Allocated {
        generator_id: String,
        percentage: Decimal,
    },
}

impl ConsumerLink {
    pub fn generator_id(&self) -> Option<&str> {
        match self {
            ConsumerLink::Allocated { generator_id, .. } => Some(generator_id),
            ConsumerLink::Unallocated => None,
        }
    }

    pub fn percentage(&self) -> Option<Decimal> {
        match self {
            ConsumerLink::Allocated { percentage, .. } => Some(*percentage),
            ConsumerLink::Unallocated => None,
        }
    }
}

// --- CONSUMIDOR (formato do backend) ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerRecord {
    #[schema(example = "cons_01")]
    pub id: String,
    #[schema(example = "Padaria Pão Quente")]
    pub name: String,
    pub cpf_cnpj: String,
    pub uc_number: String,
    pub concessionaire: String,
    pub city: String,
    pub state: String,
    pub consumer_type: ConsumerType,
    pub phase: PhaseType,

    // kWh/mês
    #[schema(example = 300.0)]
    pub average_monthly_consumption: Decimal,
    #[schema(example = 15.0)]
    pub discount_offered: Decimal,

    pub status: ConsumerStatus,
    #[serde(default)]
    pub allocated_percentage: Option<Decimal>,
    #[serde(default)]
    pub generator_id: Option<String>,
    #[serde(default)]
    pub representative_id: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Consumidor já normalizado. Serializa e desserializa no formato do backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConsumerRecord", into = "ConsumerRecord")]
pub struct Consumer {
    pub id: String,
    pub name: String,
    pub cpf_cnpj: String,
    pub uc_number: String,
    pub concessionaire: String,
    pub city: String,
    pub state: String,
    pub consumer_type: ConsumerType,
    pub phase: PhaseType,
    pub average_monthly_consumption: Decimal,
    pub discount_offered: Decimal,
    pub status: ConsumerStatus,
    pub link: ConsumerLink,
    pub representative_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Consumer {
    /// Percentual que este consumidor ocupa no gerador informado, se alocado nele.
    ///
    /// O status tem a palavra final: um vínculo que sobrou em um consumidor
    /// que não está ALLOCATED não ocupa capacidade.
    pub fn allocation_on(&self, generator_id: &str) -> Option<Decimal> {
        if self.status != ConsumerStatus::Allocated {
            return None;
        }
        match &self.link {
            ConsumerLink::Allocated {
                generator_id: linked,
                percentage,
            } if linked == generator_id => Some(*percentage),
            _ => None,
        }
    }
}

impl From<ConsumerRecord> for Consumer {
    fn from(record: ConsumerRecord) -> Self {
        // O percentual pode ficar "sujo" no backend depois de uma desalocação,
        // por isso o status é quem manda.
        let link = match (record.status, record.generator_id) {
            (ConsumerStatus::Allocated, Some(generator_id)) => ConsumerLink::Allocated {
                generator_id,
                percentage: record.allocated_percentage.unwrap_or(Decimal::ZERO),
            },
            _ => ConsumerLink::Unallocated,
        };

        Self {
            id: record.id,
            name: record.name,
            cpf_cnpj: record.cpf_cnpj,
            uc_number: record.uc_number,
            concessionaire: record.concessionaire,
            city: record.city,
            state: record.state,
            consumer_type: record.consumer_type,
            phase: record.phase,
            average_monthly_consumption: record.average_monthly_consumption,
            discount_offered: record.discount_offered,
            status: record.status,
            link,
            representative_id: record.representative_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<Consumer> for ConsumerRecord {
    fn from(consumer: Consumer) -> Self {
        let (generator_id, allocated_percentage) = match consumer.link {
            ConsumerLink::Allocated {
                generator_id,
                percentage,
            } => (Some(generator_id), Some(percentage)),
            ConsumerLink::Unallocated => (None, None),
        };

        Self {
            id: consumer.id,
            name: consumer.name,
            cpf_cnpj: consumer.cpf_cnpj,
            uc_number: consumer.uc_number,
            concessionaire: consumer.concessionaire,
            city: consumer.city,
            state: consumer.state,
            consumer_type: consumer.consumer_type,
            phase: consumer.phase,
            average_monthly_consumption: consumer.average_monthly_consumption,
            discount_offered: consumer.discount_offered,
            status: consumer.status,
            allocated_percentage,
            generator_id,
            representative_id: consumer.representative_id,
            created_at: consumer.created_at,
            updated_at: consumer.updated_at,
        }
    }
}

// --- PAYLOADS PARA O BACKEND ---

/// Corpo de criação/edição. `generator_id` e `allocated_percentage` vão
/// sempre juntos (os dois nulos quando o status é AVAILABLE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerPayload {
    pub name: String,
    pub cpf_cnpj: String,
    pub uc_number: String,
    pub concessionaire: String,
    pub city: String,
    pub state: String,
    pub consumer_type: ConsumerType,
    pub phase: PhaseType,
    pub average_monthly_consumption: Decimal,
    pub discount_offered: Decimal,
    pub status: ConsumerStatus,
    pub generator_id: Option<String>,
    pub allocated_percentage: Option<Decimal>,
    pub representative_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocatePayload {
    pub generator_id: String,
    #[schema(example = 30.0)]
    pub allocated_percentage: Decimal,
}

// --- VISÕES ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerView {
    #[serde(flatten)]
    #[schema(inline)]
    pub consumer: ConsumerRecord,
    pub generator_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerStats {
    pub total: usize,
    pub allocated: usize,
    pub available: usize,
    pub total_consumption: Decimal,
}

/// Linha da tabela "alocação por gerador" da tela de consumidores.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorAllocationRow {
    pub generator_id: String,
    pub owner_name: String,
    pub installed_power: Decimal,
    pub consumers_count: usize,
    pub allocated_percentage: Decimal,
    pub total_consumption: Decimal,
    pub available_capacity: Decimal,
}

/// Opção do select de geradores no formulário, já com a capacidade livre.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOption {
    pub id: String,
    pub owner_name: String,
    pub location: String,
    pub installed_power: Decimal,
    pub available_capacity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(status: &str, generator: Option<&str>, percentage: Option<f64>) -> serde_json::Value {
        json!({
            "id": "c1",
            "name": "Mercado Central",
            "cpfCnpj": "98765432100",
            "ucNumber": "77",
            "concessionaire": "CEMIG",
            "city": "Uberlândia",
            "state": "MG",
            "consumerType": "COMMERCIAL",
            "phase": "TRIPHASIC",
            "averageMonthlyConsumption": 300,
            "discountOffered": 10,
            "status": status,
            "allocatedPercentage": percentage,
            "generatorId": generator,
            "representativeId": null,
            "createdAt": null,
            "updatedAt": null
        })
    }

    #[test]
    fn allocated_record_becomes_allocated_link() {
        let consumer: Consumer = serde_json::from_value(record("ALLOCATED", Some("g1"), Some(30.0))).unwrap();
        assert_eq!(
            consumer.link,
            ConsumerLink::Allocated {
                generator_id: "g1".into(),
                percentage: Decimal::from(30)
            }
        );
        assert_eq!(consumer.allocation_on("g1"), Some(Decimal::from(30)));
        assert_eq!(consumer.allocation_on("g2"), None);
    }

    #[test]
    fn stale_percentage_on_available_record_is_dropped() {
        let consumer: Consumer = serde_json::from_value(record("AVAILABLE", Some("g1"), Some(30.0))).unwrap();
        assert_eq!(consumer.link, ConsumerLink::Unallocated);

        let back = serde_json::to_value(&consumer).unwrap();
        assert!(back["generatorId"].is_null());
        assert!(back["allocatedPercentage"].is_null());
        assert_eq!(back["status"], "AVAILABLE");
    }

    #[test]
    fn missing_percentage_counts_as_zero() {
        let consumer: Consumer = serde_json::from_value(record("ALLOCATED", Some("g1"), None)).unwrap();
        assert_eq!(consumer.link.percentage(), Some(Decimal::ZERO));
    }

    #[test]
    fn form_phase_aliases_are_accepted() {
        let mut value = record("AVAILABLE", None, None);
        value["phase"] = json!("SINGLE");
        let consumer: Consumer = serde_json::from_value(value).unwrap();
        assert_eq!(consumer.phase, PhaseType::Monophasic);
    }
}
