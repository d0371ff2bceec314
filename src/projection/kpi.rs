//! Summary KPIs derived from the per-period sequences

use serde::{Deserialize, Serialize};

/// Return on investment: total net profit over initial investment.
/// `None` when the investment is zero (or not a number).
pub fn compute_roi(total_net_profit: f64, initial_investment: f64) -> Option<f64> {
    if initial_investment == 0.0 || initial_investment.is_nan() {
        return None;
    }
    Some(total_net_profit / initial_investment)
}

/// First period (1-indexed) whose cumulative profit covers the initial
/// investment. `None` for a non-positive investment or when the horizon ends
/// first.
pub fn compute_break_even(cumulative_profits: &[f64], initial_investment: f64) -> Option<u32> {
    if initial_investment <= 0.0 || initial_investment.is_nan() {
        return None;
    }
    cumulative_profits
        .iter()
        .position(|&cumulative| cumulative >= initial_investment)
        .map(|idx| idx as u32 + 1)
}

/// Volatility of the profit series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    /// Population standard deviation
    pub std: f64,
    pub mean: f64,
    /// Same value as `std`; profits are not normalized by revenue
    pub risk_index: f64,
}

pub fn compute_risk_index(profits: &[f64]) -> RiskSummary {
    if profits.is_empty() {
        return RiskSummary { std: 0.0, mean: 0.0, risk_index: 0.0 };
    }

    let n = profits.len() as f64;
    let mean = profits.iter().sum::<f64>() / n;
    let variance = profits.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    RiskSummary { std, mean, risk_index: std }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roi() {
        assert_eq!(compute_roi(1000.0, 0.0), None);
        assert_eq!(compute_roi(1000.0, 500.0), Some(2.0));
        assert_eq!(compute_roi(-250.0, 1000.0), Some(-0.25));
    }

    #[test]
    fn test_break_even() {
        assert_eq!(compute_break_even(&[100.0, 250.0, 600.0], 500.0), Some(3));
        assert_eq!(compute_break_even(&[100.0, 200.0], 500.0), None);
        // Exactly covering the investment counts
        assert_eq!(compute_break_even(&[500.0], 500.0), Some(1));
    }

    #[test]
    fn test_break_even_non_positive_investment() {
        assert_eq!(compute_break_even(&[100.0, 250.0], 0.0), None);
        assert_eq!(compute_break_even(&[100.0, 250.0], -10.0), None);
    }

    #[test]
    fn test_break_even_first_crossing_wins() {
        // Dips back below after crossing; first crossing is reported
        assert_eq!(compute_break_even(&[600.0, 400.0, 700.0], 500.0), Some(1));
    }

    #[test]
    fn test_risk_index_empty() {
        assert_eq!(
            compute_risk_index(&[]),
            RiskSummary { std: 0.0, mean: 0.0, risk_index: 0.0 }
        );
    }

    #[test]
    fn test_risk_index_constant() {
        assert_eq!(
            compute_risk_index(&[10.0, 10.0, 10.0]),
            RiskSummary { std: 0.0, mean: 10.0, risk_index: 0.0 }
        );
    }

    #[test]
    fn test_risk_index_population_variance() {
        let risk = compute_risk_index(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(risk.mean, 5.0);
        assert_relative_eq!(risk.std, 2.0);
        assert_eq!(risk.risk_index, risk.std);
    }
}
