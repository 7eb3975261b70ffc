pub mod common;
pub mod completions;
pub mod config;
pub mod keys;
pub mod model_ratio;
pub mod quota_reset;
pub mod set;
pub mod show;
