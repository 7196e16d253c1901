pub mod config;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod input;
pub mod payments;
pub mod render;
pub mod report;
pub mod types;

// re-export key types
pub use config::{LoanConfig, LoanTerms};
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use input::{read_lump_sum_records, LumpSumRecord};
pub use payments::{
    periodic_payment, AmortizationCalculator, AmortizationSchedule, CurrencyConversion,
    LumpSumLedger, LumpSumPayment,
};
pub use render::{render, render_to_string, OutputFormat, RenderFormat};
pub use report::{FormattedRow, ScheduleReport, ScheduleSummary};
pub use types::{PaymentPeriod, RowKind, ScheduleRow};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
