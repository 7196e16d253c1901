pub mod amortization;
pub mod lump_sum;

pub use amortization::{periodic_payment, AmortizationCalculator, AmortizationSchedule};
pub use lump_sum::{normalize_period, CurrencyConversion, LumpSumLedger, LumpSumPayment};
