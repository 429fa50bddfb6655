use serde::{Deserialize, Serialize};

pub const ANNUAL_LEAVE: &str = "Annual leave";
pub const SICK_LEAVE: &str = "Sick leave";
pub const PERSONAL_LEAVE: &str = "Personal leave";
pub const MARRIAGE_LEAVE: &str = "Marriage leave";
pub const MATERNITY_LEAVE: &str = "Maternity leave";
pub const BEREAVEMENT_LEAVE: &str = "Bereavement leave";
pub const COMPENSATORY_REST: &str = "Compensatory rest";

/// Reference data: a category of absence with its pay and approval rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveType {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    /// Upper bound per grant, `None` when unlimited.
    pub max_days: Option<u32>,
    pub is_paid: bool,
    pub need_approval: bool,
}

/// Seed row for the leave-type catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveType {
    pub name: &'static str,
    pub description: &'static str,
    pub max_days: Option<u32>,
    pub is_paid: bool,
}

/// Catalogue installed into an empty ledger.
pub fn default_catalogue() -> Vec<NewLeaveType> {
    vec![
        NewLeaveType {
            name: ANNUAL_LEAVE,
            description: "Paid annual leave",
            max_days: None,
            is_paid: true,
        },
        NewLeaveType {
            name: SICK_LEAVE,
            description: "Absence due to illness",
            max_days: Some(15),
            is_paid: false,
        },
        NewLeaveType {
            name: PERSONAL_LEAVE,
            description: "Unpaid leave for personal matters",
            max_days: None,
            is_paid: false,
        },
        NewLeaveType {
            name: MARRIAGE_LEAVE,
            description: "Leave for the employee's own wedding",
            max_days: Some(10),
            is_paid: true,
        },
        NewLeaveType {
            name: MATERNITY_LEAVE,
            description: "Leave around childbirth",
            max_days: Some(98),
            is_paid: true,
        },
        NewLeaveType {
            name: BEREAVEMENT_LEAVE,
            description: "Leave after a death in the family",
            max_days: Some(3),
            is_paid: true,
        },
        NewLeaveType {
            name: COMPENSATORY_REST,
            description: "Time off in lieu of approved overtime",
            max_days: None,
            is_paid: true,
        },
    ]
}
