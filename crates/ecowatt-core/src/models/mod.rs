//! Data models for the household energy service.
//!
//! These mirror the backend's request and response bodies:
//!
//! - `User`, `UserRegistration`, `TokenResponse`: accounts and login
//! - `FamilyInfo`: household profile used to tailor suggestions
//! - `EnergyBill`, `Device`, `DeviceUsage`: what the household consumes
//! - `Suggestion`: energy-saving advice
//! - Analysis types: trend points, period comparisons, full analysis results
//!
//! Timestamps are kept as the strings the server sends; calendar dates are
//! parsed into `NaiveDate`.

pub mod analysis;
pub mod bill;
pub mod device;
pub mod energy;
pub mod family;
pub mod suggestion;
pub mod user;

pub use analysis::{
    AnalysisPeriod, AnalysisResult, ComparisonQuery, DeviceEnergyConsumption, EnergyComparison,
    EnergyTrendItem, TrendQuery,
};
pub use bill::{BillFilter, BillInput, BillUpdate, EnergyBill};
pub use device::{Device, DeviceFilter, DeviceInput, DeviceUpdate, DeviceUsage, DeviceUsageInput};
pub use energy::{BillType, DeviceType, EnergyType};
pub use family::{FamilyInfo, FamilyInfoInput};
pub use suggestion::{Suggestion, SuggestionFilter, SuggestionUpdate};
pub use user::{TokenResponse, User, UserRegistration, UserUpdate};
