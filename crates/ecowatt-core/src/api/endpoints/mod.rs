//! Endpoint wrappers.
//!
//! Each wrapper maps one backend route onto `ApiClient::fetch`. None of them
//! look at status codes: classification happens once, in the client core.

pub mod analysis;
pub mod bills;
pub mod devices;
pub mod family;
pub mod suggestions;
pub mod users;
