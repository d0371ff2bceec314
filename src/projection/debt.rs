//! Level-payment debt servicing applied once per period per debt

use crate::business::DebtTerms;
use serde::{Deserialize, Serialize};

/// Working state of one debt during a projection
#[derive(Debug, Clone, PartialEq)]
pub struct DebtState {
    pub terms: DebtTerms,
    /// Outstanding balance, starts at principal and never increases
    pub remaining: f64,
}

/// Point-in-time balance copied into each period record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtBalance {
    pub remaining: f64,
    pub principal: f64,
}

impl DebtState {
    pub fn new(terms: DebtTerms) -> Self {
        let remaining = terms.principal;
        Self { terms, remaining }
    }

    pub fn balance(&self) -> DebtBalance {
        DebtBalance {
            remaining: self.remaining,
            principal: self.terms.principal,
        }
    }

    /// Service the debt for `period` and return the amount paid.
    ///
    /// Nothing is paid before `start_period`, once the balance is cleared, or
    /// when `periods_to_repay` is not positive.
    pub fn service(&mut self, period: u32) -> f64 {
        if period < self.terms.start_period || self.remaining <= 0.0 || self.terms.periods_to_repay <= 0 {
            return 0.0;
        }

        let rate = self.terms.annual_rate;
        let payment = level_payment(&self.terms);
        if !payment.is_finite() {
            log::warn!(
                "Non-finite payment for debt (principal={}, rate={}, periods={}); skipping period {}",
                self.terms.principal,
                rate,
                self.terms.periods_to_repay,
                period
            );
            return 0.0;
        }

        let interest = self.remaining * rate;
        let payment_amount = payment.min(self.remaining + interest);

        // Only the part of the payment beyond this period's interest retires principal
        let principal_paid = (payment_amount - interest).max(0.0);
        self.remaining = (self.remaining - principal_paid).max(0.0);

        payment_amount
    }
}

/// Fixed per-period payment: `P*r / (1 - (1+r)^-n)`.
///
/// A zero rate would divide zero by zero, so zero-rate debts repay in equal
/// principal installments `P / n` instead.
pub fn level_payment(terms: &DebtTerms) -> f64 {
    let n = terms.periods_to_repay;
    if n <= 0 {
        return 0.0;
    }
    let rate = terms.annual_rate;
    if rate == 0.0 {
        log::debug!("Zero-rate debt, using equal principal installments over {} periods", n);
        return terms.principal / n as f64;
    }
    (terms.principal * rate) / (1.0 - (1.0 + rate).powi(-n))
}

/// Service every debt for the period and return the total paid
pub fn service_debts(debts: &mut [DebtState], period: u32) -> f64 {
    debts.iter_mut().map(|debt| debt.service(period)).sum()
}
