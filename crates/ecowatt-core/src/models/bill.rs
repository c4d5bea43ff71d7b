use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::energy::BillType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyBill {
    pub id: i64,
    pub user_id: i64,
    pub bill_type: BillType,
    pub bill_date: NaiveDate,
    pub amount: f64,
    pub usage: f64,
    pub unit_price: f64,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl EnergyBill {
    /// `YYYY-MM` label used when grouping bills by month
    pub fn month_label(&self) -> String {
        self.bill_date.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillInput {
    pub bill_type: BillType,
    pub bill_date: NaiveDate,
    pub amount: f64,
    pub usage: f64,
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_type: Option<BillType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillFilter {
    pub bill_type: Option<BillType>,
}
