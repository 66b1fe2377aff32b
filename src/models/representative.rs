// src/models/representative.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepresentativeStatus {
    Active,
    Inactive,
    PendingApproval,
    Suspended,
}

// Categorias de especialização (fontes de geração + tipos de consumidor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialization {
    Solar,
    Hydro,
    Wind,
    Biomass,
    Residential,
    Commercial,
    Rural,
    Industrial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepresentativeCount {
    #[serde(rename = "Consumer", default)]
    pub consumer: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub id: String,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "ana@pagluz.com.br")]
    pub email: String,
    pub cpf_cnpj: String,
    pub phone: String,
    pub city: String,
    pub state: String,

    #[schema(example = 5.0)]
    pub commission_rate: Decimal,
    #[serde(default)]
    pub specializations: Vec<Specialization>,
    pub status: RepresentativeStatus,
    pub notes: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<RepresentativeCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativePayload {
    pub name: String,
    pub email: String,
    pub cpf_cnpj: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub commission_rate: Decimal,
    pub specializations: Vec<Specialization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RepresentativeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusChange {
    pub status: RepresentativeStatus,
}

// GET /representatives/statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RepresentativeStatistics {
    pub total: u64,
    pub by_status: HashMap<String, u64>,
    pub by_state: HashMap<String, u64>,
    pub total_commission_rate: Decimal,
    pub average_commission_rate: Decimal,
}
