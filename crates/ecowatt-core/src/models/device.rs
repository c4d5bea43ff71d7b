use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::energy::DeviceType;

/// An appliance registered by the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub user_id: i64,
    pub device_type: DeviceType,
    pub name: String,
    pub power_rating: Option<f64>,
    pub usage_hours_per_day: Option<f64>,
    pub efficiency_rating: Option<String>,
    pub purchase_year: Option<i32>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Device {
    /// Estimated daily consumption in kWh, from the power rating (W) and daily hours.
    pub fn estimated_daily_kwh(&self) -> Option<f64> {
        match (self.power_rating, self.usage_hours_per_day) {
            (Some(watts), Some(hours)) => Some(watts * hours / 1000.0),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInput {
    pub device_type: DeviceType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_hours_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_hours_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceFilter {
    pub device_type: Option<DeviceType>,
}

/// One day's usage record for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUsage {
    pub id: i64,
    pub device_id: i64,
    pub usage_date: NaiveDate,
    pub usage_hours: f64,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceUsageInput {
    pub device_id: i64,
    pub usage_date: NaiveDate,
    pub usage_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_and_estimate() {
        let json = r#"{"id":1,"user_id":2,"device_type":"electricity","name":"Fridge","power_rating":150.0,"usage_hours_per_day":24.0,"efficiency_rating":"A++","purchase_year":2019,"notes":null,"created_at":"2024-06-01T00:00:00","updated_at":"2024-06-01T00:00:00"}"#;

        let device: Device = serde_json::from_str(json).expect("Failed to parse device");
        assert_eq!(device.name, "Fridge");
        assert_eq!(device.estimated_daily_kwh(), Some(3.6));
    }

    #[test]
    fn test_estimate_needs_rating_and_hours() {
        let json = r#"{"id":1,"user_id":2,"device_type":"gas","name":"Boiler","power_rating":null,"usage_hours_per_day":2.0,"efficiency_rating":null,"purchase_year":null,"notes":null}"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.estimated_daily_kwh(), None);
        assert!(device.created_at.is_none());
    }
}
