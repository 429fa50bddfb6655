use serde::Serialize;

/// Annual-leave allotment for one employee in one calendar year.
///
/// `remaining_days` is always `total_days - used_days`; build it through
/// [`LeaveBalance::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveBalance {
    employee_id: u64,
    year: i32,
    total_days: f64,
    used_days: f64,
    remaining_days: f64,
}

impl LeaveBalance {
    pub fn new(employee_id: u64, year: i32, total_days: f64, used_days: f64) -> Self {
        Self {
            employee_id,
            year,
            total_days,
            used_days,
            remaining_days: total_days - used_days,
        }
    }

    pub fn employee_id(&self) -> u64 {
        self.employee_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn total_days(&self) -> f64 {
        self.total_days
    }

    pub fn used_days(&self) -> f64 {
        self.used_days
    }

    pub fn remaining_days(&self) -> f64 {
        self.remaining_days
    }

    /// Whether `days` chargeable days still fit in the allotment.
    pub fn covers(&self, days: u32) -> bool {
        self.remaining_days >= f64::from(days)
    }

    /// Replace the granted total, keeping what was already consumed.
    pub fn with_total(&self, total_days: f64) -> Self {
        Self::new(self.employee_id, self.year, total_days, self.used_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_total_minus_used() {
        let balance = LeaveBalance::new(7, 2024, 15.0, 4.5);
        assert_eq!(balance.remaining_days(), 10.5);
    }

    #[test]
    fn covers_is_inclusive() {
        let balance = LeaveBalance::new(7, 2024, 10.0, 5.0);
        assert!(balance.covers(5));
        assert!(!balance.covers(6));
    }

    #[test]
    fn with_total_keeps_consumption() {
        let balance = LeaveBalance::new(7, 2024, 10.0, 3.0).with_total(12.0);
        assert_eq!(balance.used_days(), 3.0);
        assert_eq!(balance.remaining_days(), 9.0);
    }
}
