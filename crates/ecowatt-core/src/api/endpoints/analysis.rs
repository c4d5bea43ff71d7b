use crate::api::{ApiClient, ApiError, RequestContext};
use crate::models::{AnalysisResult, BillType, ComparisonQuery, EnergyComparison, EnergyTrendItem, TrendQuery};

impl ApiClient {
    pub async fn get_energy_trend(&self, query: &TrendQuery) -> Result<Vec<EnergyTrendItem>, ApiError> {
        self.fetch(RequestContext::get("/analysis/energy-trend").query(query)?)
            .await
    }

    pub async fn get_energy_comparison(&self, query: &ComparisonQuery) -> Result<EnergyComparison, ApiError> {
        self.fetch(RequestContext::get("/analysis/energy-comparison").query(query)?)
            .await
    }

    /// Full analysis for one utility. Slow on the backend; relies on the long client timeout.
    pub async fn get_energy_analysis(&self, bill_type: BillType) -> Result<AnalysisResult, ApiError> {
        self.fetch(RequestContext::get(format!("/analysis/{}", bill_type)))
            .await
    }
}
