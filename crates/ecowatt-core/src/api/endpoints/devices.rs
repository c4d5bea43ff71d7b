use serde_json::Value;

use crate::api::{ApiClient, ApiError, RequestContext};
use crate::models::{Device, DeviceFilter, DeviceInput, DeviceUpdate, DeviceUsage, DeviceUsageInput};

impl ApiClient {
    pub async fn get_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>, ApiError> {
        self.fetch(RequestContext::get("/devices/").query(filter)?).await
    }

    pub async fn get_device_by_id(&self, device_id: i64) -> Result<Device, ApiError> {
        self.fetch(RequestContext::get(format!("/devices/{}", device_id))).await
    }

    pub async fn create_device(&self, device: &DeviceInput) -> Result<Device, ApiError> {
        self.fetch(RequestContext::post("/devices/").json(device)?).await
    }

    pub async fn update_device(&self, device_id: i64, update: &DeviceUpdate) -> Result<Device, ApiError> {
        self.fetch(RequestContext::put(format!("/devices/{}", device_id)).json(update)?)
            .await
    }

    pub async fn delete_device(&self, device_id: i64) -> Result<Value, ApiError> {
        self.request(RequestContext::delete(format!("/devices/{}", device_id)))
            .await
    }

    pub async fn create_device_usage(&self, usage: &DeviceUsageInput) -> Result<DeviceUsage, ApiError> {
        self.fetch(RequestContext::post("/devices/usage").json(usage)?).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::client::tests::harness;
    use crate::models::{DeviceFilter, DeviceInput, DeviceUpdate, DeviceUsageInput, EnergyType};
    use chrono::NaiveDate;
    use reqwest::Method;

    #[tokio::test]
    async fn test_get_devices_filters_by_type() {
        let h = harness();
        h.transport.respond(
            200,
            r#"[{"id":1,"user_id":2,"device_type":"water","name":"Washer","power_rating":null,"usage_hours_per_day":null,"efficiency_rating":null,"purchase_year":null,"notes":null}]"#,
        );

        let devices = h
            .client
            .get_devices(&DeviceFilter {
                device_type: Some(EnergyType::Water),
            })
            .await
            .unwrap();

        assert_eq!(devices.len(), 1);
        assert!(h.transport.last().url.ends_with("/devices/?device_type=water"));
    }

    #[tokio::test]
    async fn test_create_device_posts_json() {
        let h = harness();
        h.transport.respond(
            200,
            r#"{"id":9,"user_id":2,"device_type":"electricity","name":"Heater","power_rating":2000.0,"usage_hours_per_day":3.0,"efficiency_rating":null,"purchase_year":null,"notes":null}"#,
        );

        let input = DeviceInput {
            device_type: EnergyType::Electricity,
            name: "Heater".to_string(),
            power_rating: Some(2000.0),
            usage_hours_per_day: Some(3.0),
            efficiency_rating: None,
            purchase_year: None,
            notes: None,
        };
        let device = h.client.create_device(&input).await.unwrap();

        assert_eq!(device.id, 9);
        let body: serde_json::Value = serde_json::from_str(&h.transport.last().body).unwrap();
        assert_eq!(body["name"], "Heater");
        assert!(body.get("notes").is_none());
    }

    #[tokio::test]
    async fn test_create_device_usage_path() {
        let h = harness();
        h.transport.respond(
            200,
            r#"{"id":4,"device_id":9,"usage_date":"2025-03-10","usage_hours":2.5,"notes":null}"#,
        );

        let usage = DeviceUsageInput {
            device_id: 9,
            usage_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            usage_hours: 2.5,
            notes: None,
        };
        let record = h.client.create_device_usage(&usage).await.unwrap();

        assert_eq!(record.device_id, 9);
        assert!(h.transport.last().url.ends_with("/devices/usage"));
    }

    #[tokio::test]
    async fn test_get_device_by_id() {
        let h = harness();
        h.transport.respond(200, r#"{"id":9,"user_id":2,"device_type":"electricity","name":"Heater","power_rating":1500.0,"usage_hours_per_day":3.0,"efficiency_rating":null,"purchase_year":null,"notes":null}"#);

        let device = h.client.get_device_by_id(9).await.unwrap();

        let sent = h.transport.last();
        assert_eq!(device.estimated_daily_kwh(), Some(4.5));
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url, "http://localhost:8000/api/devices/9");
    }

    #[tokio::test]
    async fn test_update_and_delete_use_device_path() {
        let h = harness();
        h.transport.respond(200, r#"{"id":9,"user_id":2,"device_type":"electricity","name":"Heater","power_rating":1500.0,"usage_hours_per_day":3.0,"efficiency_rating":null,"purchase_year":null,"notes":null}"#);
        h.transport.respond(200, r#"{"message":"deleted"}"#);

        let update = DeviceUpdate {
            usage_hours_per_day: Some(3.0),
            ..Default::default()
        };
        h.client.update_device(9, &update).await.unwrap();
        let deleted = h.client.delete_device(9).await.unwrap();

        let sent = h.transport.sent.lock().clone();
        assert_eq!(sent[0].method, Method::PUT);
        assert_eq!(sent[0].url, "http://localhost:8000/api/devices/9");
        assert_eq!(sent[0].body, r#"{"usage_hours_per_day":3.0}"#);
        assert_eq!(sent[1].method, Method::DELETE);
        assert_eq!(sent[1].url, "http://localhost:8000/api/devices/9");
        assert_eq!(deleted["message"], "deleted");
    }
}
