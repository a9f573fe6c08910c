//! `simbank-currency` — currency catalog and denomination conversion.
//!
//! Pure domain logic only: no IO, no persistence concerns. Each currency
//! defines a fixed six-rung ladder of denomination units; every conversion is
//! integer-only and routed through the canonical minor unit.

pub mod catalog;
pub mod currency;
pub mod registry;
pub mod unit;

pub use currency::{Currency, CurrencyCode, CurrencyError};
pub use registry::CurrencyRegistry;
pub use unit::{CurrencyUnit, UnitKind};
