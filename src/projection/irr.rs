//! Internal Rate of Return (IRR) calculation
//!
//! Bisection over the per-period NPV of the simulation cash flows.

/// Lower bound of the search bracket. Stops short of -1 where the discount
/// factor hits zero.
pub const IRR_LOW: f64 = -0.9999;

/// Upper bound of the search bracket (1000% per period)
pub const IRR_HIGH: f64 = 10.0;

pub const IRR_ITERATIONS: u32 = 80;

pub const IRR_TOLERANCE: f64 = 1e-6;

/// Calculate the per-period IRR of a cash flow series with the default
/// bracket and tolerance.
///
/// `cashflows[0]` is the flow at t=0 (normally `-initial_investment`).
///
/// # Returns
/// * `None` if NPV does not change sign across the bracket (IRR undetermined)
/// * `Some(rate)` otherwise. If the iteration budget runs out before NPV is
///   within tolerance, the midpoint of the final bracket is returned.
pub fn compute_irr(cashflows: &[f64]) -> Option<f64> {
    compute_irr_with(cashflows, IRR_LOW, IRR_HIGH, IRR_ITERATIONS, IRR_TOLERANCE)
}

/// Bisection IRR with an explicit bracket, iteration budget and tolerance
pub fn compute_irr_with(
    cashflows: &[f64],
    low: f64,
    high: f64,
    iterations: u32,
    tolerance: f64,
) -> Option<f64> {
    let mut low = low;
    let mut high = high;
    let mut npv_low = bracket_value(cashflows, low);
    let npv_high = bracket_value(cashflows, high);

    // No sign change means no root is guaranteed in range
    let bracket = npv_low * npv_high;
    if bracket.is_nan() || bracket > 0.0 {
        return None;
    }

    for step in 0..iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = bracket_value(cashflows, mid);
        log::trace!("irr step {}: rate={:.8} npv={:.8}", step, mid, npv_mid);

        if npv_mid.is_nan() {
            return None;
        }
        if npv_mid.abs() < tolerance {
            return Some(mid);
        }

        // Keep fLow * fHigh <= 0
        if npv_mid * npv_low > 0.0 {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    Some((low + high) / 2.0)
}

/// NPV where it is finite. Near rate -1 on long series the discount factor
/// underflows and NPV turns into inf or inf - inf; the compounded value
/// carries the same sign there and stays finite.
fn bracket_value(cashflows: &[f64], rate: f64) -> f64 {
    let npv = npv_at_rate(cashflows, rate);
    if npv.is_finite() {
        npv
    } else {
        compounded_value(cashflows, rate)
    }
}

/// `sum(cf_t * (1+rate)^(n-t))` by Horner's scheme, i.e. NPV scaled by
/// `(1+rate)^n`. Same sign as NPV for rate > -1.
fn compounded_value(cashflows: &[f64], rate: f64) -> f64 {
    cashflows.iter().fold(0.0, |acc, &cf| acc * (1.0 + rate) + cf)
}

/// Calculate NPV at a given periodic rate
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
