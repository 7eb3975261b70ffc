//! Data models for Optsync

mod response;
mod schema;
mod value;

pub use response::{ApiResponse, OptionEntry, OptionUpdate, QuotaResetLog, QuotaResetStatus};
pub use schema::{
    FieldCheck, FieldSpec, ListOrder, OptionKind, PanelSchema, SchemaError, ValueRejection,
};
pub use value::{OptionMap, OptionValue};
