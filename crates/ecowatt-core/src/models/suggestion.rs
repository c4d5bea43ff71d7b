use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::energy::BillType;

/// An energy-saving suggestion generated for the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub user_id: i64,
    pub bill_type: BillType,
    pub suggestion_title: String,
    pub suggestion_text: String,
    pub suggestion_date: NaiveDate,
    pub impact_rating: Option<i32>,
    #[serde(default)]
    pub is_implemented: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Suggestion {
    pub fn implemented(&self) -> bool {
        self.is_implemented.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_type: Option<BillType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_implemented: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionFilter {
    pub bill_type: Option<BillType>,
}
