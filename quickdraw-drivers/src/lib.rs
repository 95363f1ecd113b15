//! Driver layer for browser automation against the lottery page.
//!
//! This crate exposes the browser driver and page helpers the harvester uses
//! to collect quick tips in a stealthy, reliable way.
//!
//! - [`lotto_browser::driver::QuickdrawDriver`]: WebDriver client wrapper
//! - [`lotto_browser::page::LottoPage`]: the lottery field and its quick-tip
//!   button, implementing the pick-surface capability
//! - [`lotto_browser::behavioral::BehavioralEngine`]: human-like timings
//! - [`lotto_browser::stealth`]: stealth arguments and JS evasions
pub mod lotto_browser;
