//! Outbound alerting: SMS for live runs, log lines for dry runs.

pub mod log;
pub mod sms;

pub use log::LogNotifier;
pub use sms::{SmsConfig, SmsNotifier};
