use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three utilities the service tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Electricity,
    Gas,
    Water,
}

pub type BillType = EnergyType;
pub type DeviceType = EnergyType;

impl EnergyType {
    pub const ALL: [EnergyType; 3] = [EnergyType::Electricity, EnergyType::Gas, EnergyType::Water];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "electricity",
            EnergyType::Gas => "gas",
            EnergyType::Water => "water",
        }
    }

    /// Unit the backend reports usage in
    pub fn usage_unit(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "kWh",
            EnergyType::Gas | EnergyType::Water => "m³",
        }
    }

    /// Analysis view for this utility
    pub fn route(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "/index/electricity",
            EnergyType::Gas => "/index/gas",
            EnergyType::Water => "/index/water",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "electricity" | "power" => Ok(EnergyType::Electricity),
            "gas" => Ok(EnergyType::Gas),
            "water" => Ok(EnergyType::Water),
            other => Err(format!("Unknown energy type: {}", other)),
        }
    }
}
