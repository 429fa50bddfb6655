//! Leave advisor: recommends how an employee should classify a requested
//! absence and records the chosen classification as a leave request.
//!
//! The flow is `recommend` (profile + ranked candidates, no writes) followed
//! by `submit` (validated, transactional insert of a pending request). See
//! [`advisor::LeaveAdvisor`].

pub mod advisor;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod model;
pub mod policy;
pub mod telemetry;
pub mod utils;

pub use advisor::LeaveAdvisor;
pub use config::Config;
pub use error::{AdvisorError, AdvisorResult, ErrorKind};
