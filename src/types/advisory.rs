//! Non-blocking advisories raised on suspicious profile values

use crate::types::profile::CustomerProfile;
use serde::{Deserialize, Serialize};

/// How prominently a shell should display an advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// Informational check on a profile. Never changes the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Expenses are larger than income
    ExpensesExceedIncome,
    /// Savings rate above 1.0, i.e. saving more than total income
    SavingsRateAboveOne,
}

impl Advisory {
    /// Evaluate all advisories for a profile, in display order.
    pub fn check(profile: &CustomerProfile) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        if profile.expenses > profile.income {
            advisories.push(Advisory::ExpensesExceedIncome);
        }
        if profile.savings_rate > 1.0 {
            advisories.push(Advisory::SavingsRateAboveOne);
        }

        advisories
    }

    pub fn severity(&self) -> Severity {
        match self {
            Advisory::ExpensesExceedIncome => Severity::Warning,
            Advisory::SavingsRateAboveOne => Severity::Info,
        }
    }

    /// Message shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::ExpensesExceedIncome => {
                "Expenses exceed income - prediction may be inaccurate."
            }
            Advisory::SavingsRateAboveOne => {
                "Savings rate above 1.0 means saving more than total income. Ensure this is intended."
            }
        }
    }

    /// Stable key used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Advisory::ExpensesExceedIncome => "expenses_exceed_income",
            Advisory::SavingsRateAboveOne => "savings_rate_above_one",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(income: f64, expenses: f64, savings_rate: f64) -> CustomerProfile {
        CustomerProfile {
            income,
            expenses,
            savings_rate,
            ..CustomerProfile::default()
        }
    }

    #[test]
    fn test_expenses_exceed_income() {
        let advisories = Advisory::check(&profile(50000.0, 60000.0, 0.3));
        assert_eq!(advisories, vec![Advisory::ExpensesExceedIncome]);
        assert_eq!(advisories[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_savings_rate_above_one() {
        let advisories = Advisory::check(&profile(50000.0, 10000.0, 1.5));
        assert_eq!(advisories, vec![Advisory::SavingsRateAboveOne]);
        assert_eq!(advisories[0].severity(), Severity::Info);
    }

    #[test]
    fn test_no_advisory() {
        assert!(Advisory::check(&profile(50000.0, 10000.0, 0.3)).is_empty());
    }

    #[test]
    fn test_limits_are_exclusive() {
        // equal expenses and a savings rate of exactly 1.0 are fine
        assert!(Advisory::check(&profile(50000.0, 50000.0, 1.0)).is_empty());
    }

    #[test]
    fn test_both_advisories_in_order() {
        let advisories = Advisory::check(&profile(100.0, 200.0, 2.0));
        assert_eq!(
            advisories,
            vec![Advisory::ExpensesExceedIncome, Advisory::SavingsRateAboveOne]
        );
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Advisory::SavingsRateAboveOne).unwrap();
        assert_eq!(json, "\"savings_rate_above_one\"");
    }
}
