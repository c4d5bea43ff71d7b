use serde_json::Value;

use crate::api::{ApiClient, ApiError, RequestContext};
use crate::models::{BillFilter, BillInput, BillUpdate, EnergyBill};

impl ApiClient {
    pub async fn create_bill(&self, bill: &BillInput) -> Result<EnergyBill, ApiError> {
        self.fetch(RequestContext::post("/bills/").json(bill)?).await
    }

    pub async fn get_bills(&self, filter: &BillFilter) -> Result<Vec<EnergyBill>, ApiError> {
        self.fetch(RequestContext::get("/bills/").query(filter)?).await
    }

    pub async fn get_bill_by_id(&self, bill_id: i64) -> Result<EnergyBill, ApiError> {
        self.fetch(RequestContext::get(format!("/bills/{}", bill_id))).await
    }

    pub async fn update_bill(&self, bill_id: i64, update: &BillUpdate) -> Result<EnergyBill, ApiError> {
        self.fetch(RequestContext::put(format!("/bills/{}", bill_id)).json(update)?)
            .await
    }

    pub async fn delete_bill(&self, bill_id: i64) -> Result<Value, ApiError> {
        self.request(RequestContext::delete(format!("/bills/{}", bill_id))).await
    }
}
