// src/models/dashboard.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- O que o backend devolve em GET /dashboard ---

// 1. Cards do topo
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_generators: u64,
    pub total_consumers: u64,
    pub total_installed_power: Option<Decimal>,
    pub new_clients_this_week: u64,
    pub new_generators_this_week: u64,
    pub new_consumers_this_week: u64,
}

// 2. Distribuição por estado
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StateDistribution {
    pub state: String,
    pub generators: u64,
    pub consumers: u64,
}

// 3. Atividade recente
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorStatusInsight {
    pub under_analysis: u64,
    pub awaiting_allocation: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardInsights {
    pub generator_status: Option<GeneratorStatusInsight>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardData {
    pub summary: DashboardSummary,
    pub state_distribution: Vec<StateDistribution>,
    pub recent_activity: Vec<RecentActivity>,
    pub insights: Option<DashboardInsights>,
}

// --- Recalculado localmente a partir das listas ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalInsights {
    // kW
    pub total_capacity: Decimal,
    pub unallocated_capacity: Decimal,
    // kWh/mês
    pub total_consumption: Decimal,
    pub unallocated_consumers: usize,
    pub unallocated_consumption: Decimal,
    pub average_discount: Decimal,

    pub generators_under_analysis: usize,
    pub generators_awaiting_allocation: usize,
    pub generators_fully_allocated: usize,

    pub active_representatives: usize,
    pub pending_representatives: usize,
    pub representatives_by_state: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub remote: DashboardData,
    pub local: LocalInsights,
}
