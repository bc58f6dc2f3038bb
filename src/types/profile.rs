//! Customer profile: the eight numeric attributes fed to the segmentation model

use serde::{Deserialize, Serialize};

/// Number of features every artifact is fit on.
pub const FEATURE_COUNT: usize = 8;

/// Declared range of a single form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Field name, matching the serialized profile key
    pub name: &'static str,
    /// Human readable label shown by the form
    pub label: &'static str,
    pub min: f64,
    /// Upper bound, `None` when the field is unbounded
    pub max: Option<f64>,
    /// Whether the field only accepts whole numbers
    pub integer: bool,
}

impl FieldSpec {
    /// Clamp a value into the declared range.
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_nan() { self.min } else { value };
        let value = value.max(self.min);
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }

    /// Range hint for prompts, e.g. `0 - 10` or `>= 0`.
    pub fn range_hint(&self) -> String {
        match (self.max, self.integer) {
            (Some(max), true) => format!("{} - {}", self.min, max),
            (Some(max), false) => format!("{:.1} - {:.1}", self.min, max),
            (None, _) => format!(">= {}", self.min),
        }
    }
}

/// Form fields in the exact order the scaler and model were fit on.
pub const FIELDS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "income",
        label: "Income",
        min: 0.0,
        max: None,
        integer: false,
    },
    FieldSpec {
        name: "expenses",
        label: "Expenses",
        min: 0.0,
        max: None,
        integer: false,
    },
    FieldSpec {
        name: "savings_rate",
        label: "Savings Rate",
        min: 0.0,
        max: Some(2.5),
        integer: false,
    },
    FieldSpec {
        name: "credit_cards",
        label: "Credit Cards Count",
        min: 0.0,
        max: Some(10.0),
        integer: true,
    },
    FieldSpec {
        name: "credit_utilization",
        label: "Credit Utilization (%)",
        min: 0.0,
        max: Some(100.0),
        integer: false,
    },
    FieldSpec {
        name: "emi_count",
        label: "Ongoing EMIs",
        min: 0.0,
        max: Some(10.0),
        integer: true,
    },
    FieldSpec {
        name: "online_shopping_spend",
        label: "Online Shopping Spend",
        min: 0.0,
        max: None,
        integer: false,
    },
    FieldSpec {
        name: "age",
        label: "Age",
        min: 18.0,
        max: Some(100.0),
        integer: true,
    },
];

/// A bank customer described by eight numeric attributes.
///
/// Missing fields deserialize to the field minimum, so a partial JSON
/// payload is still a complete profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerProfile {
    pub income: f64,
    pub expenses: f64,
    /// Share of income saved (0.0 - 2.5)
    pub savings_rate: f64,
    pub credit_cards: u32,
    /// Credit utilization in percent (0 - 100)
    pub credit_utilization: f64,
    pub emi_count: u32,
    pub online_shopping_spend: f64,
    pub age: u32,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            income: 0.0,
            expenses: 0.0,
            savings_rate: 0.0,
            credit_cards: 0,
            credit_utilization: 0.0,
            emi_count: 0,
            online_shopping_spend: 0.0,
            age: 18,
        }
    }
}

impl CustomerProfile {
    /// Build a profile from values in [`FIELDS`] order.
    ///
    /// Integer fields are rounded; no clamping happens here.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            income: values[0],
            expenses: values[1],
            savings_rate: values[2],
            credit_cards: to_count(values[3]),
            credit_utilization: values[4],
            emi_count: to_count(values[5]),
            online_shopping_spend: values[6],
            age: to_count(values[7]),
        }
    }

    /// Field values in [`FIELDS`] order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.income,
            self.expenses,
            self.savings_rate,
            self.credit_cards as f64,
            self.credit_utilization,
            self.emi_count as f64,
            self.online_shopping_spend,
            self.age as f64,
        ]
    }

    /// Copy of the profile with every field clamped to its declared range.
    pub fn clamped(&self) -> Self {
        let mut values = self.values();
        for (value, spec) in values.iter_mut().zip(FIELDS.iter()) {
            *value = spec.clamp(*value);
        }
        Self::from_values(values)
    }
}

/// Profile as sent by clients, every field a plain number.
///
/// Counts and age may arrive negative, fractional or huge; they are only
/// brought into range by [`ProfileInput::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub income: f64,
    pub expenses: f64,
    pub savings_rate: f64,
    pub credit_cards: f64,
    pub credit_utilization: f64,
    pub emi_count: f64,
    pub online_shopping_spend: f64,
    pub age: f64,
}

impl Default for ProfileInput {
    fn default() -> Self {
        Self::from_values(CustomerProfile::default().values())
    }
}

impl ProfileInput {
    fn from_values(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            income: v[0],
            expenses: v[1],
            savings_rate: v[2],
            credit_cards: v[3],
            credit_utilization: v[4],
            emi_count: v[5],
            online_shopping_spend: v[6],
            age: v[7],
        }
    }

    /// Field values in [`FIELDS`] order, as received.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.income,
            self.expenses,
            self.savings_rate,
            self.credit_cards,
            self.credit_utilization,
            self.emi_count,
            self.online_shopping_spend,
            self.age,
        ]
    }

    /// Clamp every field to its declared range; integer fields are rounded.
    pub fn clamped(&self) -> CustomerProfile {
        let mut values = self.values();
        for (value, spec) in values.iter_mut().zip(FIELDS.iter()) {
            *value = spec.clamp(*value);
        }
        CustomerProfile::from_values(values)
    }
}

fn to_count(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round().min(u32::MAX as f64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_uses_field_minimums() {
        let profile = CustomerProfile::default();
        let defaults = profile.values();

        for (value, spec) in defaults.iter().zip(FIELDS.iter()) {
            assert_eq!(*value, spec.min, "default for {}", spec.name);
        }
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let profile: CustomerProfile =
            serde_json::from_str(r#"{"income": 50000, "credit_cards": 2}"#).unwrap();

        assert_eq!(profile.income, 50000.0);
        assert_eq!(profile.credit_cards, 2);
        assert_eq!(profile.age, 18);
        assert_eq!(profile.expenses, 0.0);
    }

    #[test]
    fn test_clamping() {
        let profile = CustomerProfile {
            income: -10.0,
            savings_rate: 3.7,
            credit_cards: 14,
            credit_utilization: 140.0,
            emi_count: 11,
            age: 7,
            ..CustomerProfile::default()
        }
        .clamped();

        assert_eq!(profile.income, 0.0);
        assert_eq!(profile.savings_rate, 2.5);
        assert_eq!(profile.credit_cards, 10);
        assert_eq!(profile.credit_utilization, 100.0);
        assert_eq!(profile.emi_count, 10);
        assert_eq!(profile.age, 18);
    }

    #[test]
    fn test_boundary_values_survive_clamping() {
        let low = CustomerProfile {
            age: 18,
            credit_cards: 0,
            credit_utilization: 0.0,
            ..CustomerProfile::default()
        };
        let high = CustomerProfile {
            age: 100,
            credit_cards: 10,
            credit_utilization: 100.0,
            ..CustomerProfile::default()
        };

        assert_eq!(low.clamped(), low);
        assert_eq!(high.clamped(), high);
    }

    #[test]
    fn test_values_round_trip_order() {
        let values = [50000.0, 20000.0, 0.6, 2.0, 30.0, 1.0, 3000.0, 35.0];
        let profile = CustomerProfile::from_values(values);

        assert_eq!(profile.values(), values);
        assert_eq!(profile.age, 35);
        assert_eq!(profile.emi_count, 1);
    }

    #[test]
    fn test_input_clamps_counts_and_age() {
        let input: ProfileInput = serde_json::from_str(
            r#"{"income": -5, "credit_cards": -1, "emi_count": 3.6, "age": 5e9}"#,
        )
        .unwrap();
        let profile = input.clamped();

        assert_eq!(profile.income, 0.0);
        assert_eq!(profile.credit_cards, 0);
        assert_eq!(profile.emi_count, 4);
        assert_eq!(profile.age, 100);
    }

    #[test]
    fn test_input_defaults_match_profile() {
        let input: ProfileInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.clamped(), CustomerProfile::default());
    }

    #[test]
    fn test_range_hint() {
        assert_eq!(FIELDS[0].range_hint(), ">= 0");
        assert_eq!(FIELDS[2].range_hint(), "0.0 - 2.5");
        assert_eq!(FIELDS[7].range_hint(), "18 - 100");
    }
}
