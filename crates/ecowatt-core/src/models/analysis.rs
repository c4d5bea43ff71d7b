use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::energy::BillType;
use super::suggestion::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPeriod {
    Monthly,
    Quarter,
    Annual,
    Custom,
}

/// One point on a usage trend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTrendItem {
    pub bill_type: BillType,
    pub bill_date: NaiveDate,
    pub usage: f64,
    pub amount: f64,
    pub year: Option<String>,
    pub month: Option<String>,
}

/// Latest month against the previous month and the same month last year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyComparison {
    pub current_usage: f64,
    pub previous_usage: Option<f64>,
    /// Year-over-year change, percent
    pub yoy_rate: Option<f64>,
    /// Month-over-month change, percent
    pub mom_rate: Option<f64>,
    /// Set by the server when growth exceeds 30%
    pub is_abnormal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEnergyConsumption {
    pub device_id: i64,
    pub device_name: String,
    /// Share of total consumption, percent
    pub consumption: f64,
    pub monthly_usage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub trend_data: Vec<EnergyTrendItem>,
    pub comparison: EnergyComparison,
    pub device_consumption: Vec<DeviceEnergyConsumption>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendQuery {
    pub bill_type: Option<BillType>,
    pub period: Option<AnalysisPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonQuery {
    pub bill_type: Option<BillType>,
}
