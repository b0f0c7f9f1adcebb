//! Fundwatch - mutual fund portfolio tracker
//!
//! This library values a portfolio of Indian mutual-fund and other
//! holdings against the AMFI daily NAV feed and decides, by calendar
//! rule, which periodic reports to render and send.

pub mod cadence;
pub mod config;
pub mod error;
pub mod holdings;
pub mod nav;
pub mod report;
pub mod task;
pub mod utils;
pub mod valuation;
