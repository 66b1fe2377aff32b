// src/models/generator.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Solar,
    Wind,
    Hydro,
    Biomass,
}

// Status gravado no backend. ACTIVE/INACTIVE só chegam de cadastros antigos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneratorStatus {
    UnderAnalysis,
    AwaitingAllocation,
    Active,
    Inactive,
}

/// Status exibido ao usuário. `FullyAllocated` nunca é gravado: é sempre
/// derivado da soma das alocações (ver `allocation::derive_generator_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveGeneratorStatus {
    UnderAnalysis,
    AwaitingAllocation,
    Active,
    Inactive,
    FullyAllocated,
}

impl From<GeneratorStatus> for EffectiveGeneratorStatus {
    fn from(status: GeneratorStatus) -> Self {
        match status {
            GeneratorStatus::UnderAnalysis => Self::UnderAnalysis,
            GeneratorStatus::AwaitingAllocation => Self::AwaitingAllocation,
            GeneratorStatus::Active => Self::Active,
            GeneratorStatus::Inactive => Self::Inactive,
        }
    }
}

// --- GERADOR (como vem do backend) ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    #[schema(example = "gen_01")]
    pub id: String,

    #[schema(example = "Fazenda Sol Nascente")]
    pub owner_name: String,
    #[schema(example = "12.345.678/0001-99")]
    pub cpf_cnpj: String,

    pub source_type: SourceType,

    // Potência instalada em kW
    #[schema(example = 1000.0)]
    pub installed_power: Decimal,

    #[schema(example = "CEMIG")]
    pub concessionaire: String,
    #[schema(example = "3001234567")]
    pub uc_number: String,

    pub city: String,
    #[schema(example = "MG")]
    pub state: String,

    pub status: GeneratorStatus,
    pub observations: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// --- PAYLOADS (corpo enviado ao backend) ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorPayload {
    pub owner_name: String,
    pub cpf_cnpj: String,
    pub source_type: SourceType,
    pub installed_power: Decimal,
    pub concessionaire: String,
    pub uc_number: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GeneratorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

// --- VISÕES (o que a tela de geradores recebe) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorView {
    #[serde(flatten)]
    pub generator: Generator,
    pub allocated_percentage: Decimal,
    pub available_capacity: Decimal,
    pub effective_status: EffectiveGeneratorStatus,
    pub consumers_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorStats {
    pub total: usize,
    pub under_analysis: usize,
    pub awaiting_allocation: usize,
    pub fully_allocated: usize,
    pub total_installed_power: Decimal,
}
