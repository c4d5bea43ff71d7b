use crate::api::{ApiClient, ApiError, RequestContext};
use crate::models::{FamilyInfo, FamilyInfoInput};

impl ApiClient {
    pub async fn is_family_info_exist(&self) -> Result<bool, ApiError> {
        self.fetch(RequestContext::get("/family/is-exist")).await
    }

    pub async fn get_family_info(&self) -> Result<FamilyInfo, ApiError> {
        self.fetch(RequestContext::get("/family/")).await
    }

    /// Probe for the household profile without surfacing "not found".
    ///
    /// A new account has no profile yet, so a 404 here is `Ok(None)`.
    pub async fn find_family_info(&self) -> Result<Option<FamilyInfo>, ApiError> {
        match self.fetch(RequestContext::get("/family/").silent()).await {
            Ok(info) => Ok(Some(info)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_family_info(&self, info: &FamilyInfoInput) -> Result<FamilyInfo, ApiError> {
        self.fetch(RequestContext::post("/family/").json(info)?).await
    }

    pub async fn update_family_info(&self, update: &FamilyInfoInput) -> Result<FamilyInfo, ApiError> {
        self.fetch(RequestContext::put("/family/").json(update)?).await
    }
}
