use serde_json::Value;

use crate::api::{ApiClient, ApiError, RequestContext};
use crate::models::{Suggestion, SuggestionFilter, SuggestionUpdate};

impl ApiClient {
    pub async fn get_suggestions(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, ApiError> {
        self.fetch(RequestContext::get("/suggestion/").query(filter)?).await
    }

    pub async fn update_suggestion(
        &self,
        suggestion_id: i64,
        update: &SuggestionUpdate,
    ) -> Result<Suggestion, ApiError> {
        self.fetch(RequestContext::put(format!("/suggestion/{}", suggestion_id)).json(update)?)
            .await
    }

    pub async fn delete_suggestion(&self, suggestion_id: i64) -> Result<Value, ApiError> {
        self.request(RequestContext::delete(format!("/suggestion/{}", suggestion_id)))
            .await
    }
}
