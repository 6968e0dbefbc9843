//! Action filters: ordered, role-scoped transforms on a magnitude
//!
//! A combatant carries a list of filters. When an action resolves, the
//! actor's filters of the actor type run first, then the recipient's
//! filters of the recipient type. Within one chain filters run in list
//! order, and the result is truncated to an integer at the end of the chain.

use serde::{Deserialize, Serialize};

/// Which side of which action a filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    /// Outgoing attacks
    AttackActor,
    /// Incoming attacks
    AttackRecipient,
    /// Outgoing heals
    HealActor,
    /// Incoming heals
    HealRecipient,
}

/// The transform itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FilterOp {
    Add(i32),
    Multiply(f64),
    /// Cap the magnitude from above
    Min(i32),
    /// Raise the magnitude to at least this value
    Max(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionFilter {
    pub filter_type: FilterType,
    pub op: FilterOp,
}

impl ActionFilter {
    pub fn new(filter_type: FilterType, op: FilterOp) -> Self {
        ActionFilter { filter_type, op }
    }

    pub fn apply(&self, magnitude: f64) -> f64 {
        match self.op {
            FilterOp::Add(n) => magnitude + n as f64,
            FilterOp::Multiply(factor) => magnitude * factor,
            FilterOp::Min(cap) => magnitude.min(cap as f64),
            FilterOp::Max(floor) => magnitude.max(floor as f64),
        }
    }
}

/// Run every filter of `filter_type` over `magnitude`, in list order
///
/// Filters of other types are skipped. The result is truncated toward zero.
pub fn apply_filters_of_type(magnitude: i32, filters: &[ActionFilter], filter_type: FilterType) -> i32 {
    filters
        .iter()
        .filter(|f| f.filter_type == filter_type)
        .fold(magnitude as f64, |acc, f| f.apply(acc)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filters_is_identity() {
        assert_eq!(apply_filters_of_type(15, &[], FilterType::AttackActor), 15);
    }

    #[test]
    fn test_only_matching_type_applies() {
        let filters = [
            ActionFilter::new(FilterType::AttackActor, FilterOp::Add(3)),
            ActionFilter::new(FilterType::AttackRecipient, FilterOp::Add(100)),
            ActionFilter::new(FilterType::HealActor, FilterOp::Multiply(0.0)),
        ];
        assert_eq!(apply_filters_of_type(5, &filters, FilterType::AttackActor), 8);
        assert_eq!(apply_filters_of_type(5, &filters, FilterType::AttackRecipient), 105);
        assert_eq!(apply_filters_of_type(5, &filters, FilterType::HealActor), 0);
        assert_eq!(apply_filters_of_type(5, &filters, FilterType::HealRecipient), 5);
    }

    #[test]
    fn test_order_matters() {
        let add_then_double = [
            ActionFilter::new(FilterType::AttackActor, FilterOp::Add(1)),
            ActionFilter::new(FilterType::AttackActor, FilterOp::Multiply(2.0)),
        ];
        let double_then_add = [
            ActionFilter::new(FilterType::AttackActor, FilterOp::Multiply(2.0)),
            ActionFilter::new(FilterType::AttackActor, FilterOp::Add(1)),
        ];
        assert_eq!(apply_filters_of_type(4, &add_then_double, FilterType::AttackActor), 10);
        assert_eq!(apply_filters_of_type(4, &double_then_add, FilterType::AttackActor), 9);
    }

    #[test]
    fn test_truncation_at_end_of_chain() {
        // 5 * 0.5 = 2.5, * 2 = 5.0; truncating per filter would give 4
        let filters = [
            ActionFilter::new(FilterType::AttackRecipient, FilterOp::Multiply(0.5)),
            ActionFilter::new(FilterType::AttackRecipient, FilterOp::Multiply(2.0)),
        ];
        assert_eq!(apply_filters_of_type(5, &filters, FilterType::AttackRecipient), 5);

        let halve = [ActionFilter::new(FilterType::AttackRecipient, FilterOp::Multiply(0.5))];
        assert_eq!(apply_filters_of_type(7, &halve, FilterType::AttackRecipient), 3);
        assert_eq!(apply_filters_of_type(-7, &halve, FilterType::AttackRecipient), -3);
    }

    #[test]
    fn test_min_max() {
        let filters = [
            ActionFilter::new(FilterType::AttackRecipient, FilterOp::Min(6)),
            ActionFilter::new(FilterType::AttackRecipient, FilterOp::Max(0)),
        ];
        assert_eq!(apply_filters_of_type(10, &filters, FilterType::AttackRecipient), 6);
        assert_eq!(apply_filters_of_type(-4, &filters, FilterType::AttackRecipient), 0);
    }
}
