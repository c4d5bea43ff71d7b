use serde::{Deserialize, Serialize};

/// Household profile for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyInfo {
    pub id: i64,
    pub user_id: i64,
    pub family_size: Option<i32>,
    pub house_area: Option<f64>,
    pub location: Option<String>,
    pub building_age: Option<i32>,
}

impl FamilyInfo {
    /// Floor area per resident, if both are known.
    pub fn area_per_person(&self) -> Option<f64> {
        match (self.house_area, self.family_size) {
            (Some(area), Some(size)) if size > 0 => Some(area / size as f64),
            _ => None,
        }
    }
}

/// Create and update body. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FamilyInfoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_age: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_per_person() {
        let mut info = FamilyInfo {
            id: 1,
            user_id: 2,
            family_size: Some(4),
            house_area: Some(120.0),
            location: None,
            building_age: None,
        };
        assert_eq!(info.area_per_person(), Some(30.0));

        info.family_size = Some(0);
        assert_eq!(info.area_per_person(), None);
    }

    #[test]
    fn test_input_skips_unset_fields() {
        let input = FamilyInfoInput {
            family_size: Some(3),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&input).unwrap(), r#"{"family_size":3}"#);
    }
}
