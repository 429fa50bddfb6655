use serde::{Deserialize, Serialize};

/// Side record of a recommendation shown to an employee.
///
/// Written best-effort; losing one never fails the recommendation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceLogEntry {
    pub employee_id: u64,
    pub message: String,
    pub response: String,
}
