use crate::models::{FieldCheck, FieldSpec, PanelSchema};

pub const DEFAULT_RESET_TIME: &str = "00:01";
pub const DEFAULT_CONCURRENCY: i64 = 3;

/// Scheduling of the daily quota reset job.
pub fn schema() -> PanelSchema {
    PanelSchema::builtin(
        "quota-reset",
        vec![
            FieldSpec::toggle("QuotaResetEnabled"),
            FieldSpec::toggle("WeeklyQuotaLimitEnabled"),
            FieldSpec::text("QuotaResetTime")
                .with_default(DEFAULT_RESET_TIME)
                .with_check(FieldCheck::ClockTime),
            FieldSpec::integer("QuotaResetConcurrency", DEFAULT_CONCURRENCY).with_bounds(1, 10),
        ],
    )
}
