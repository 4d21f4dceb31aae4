//! Unit catalog and measure-value arithmetic for emission formulas.
//!
//! The catalog knows every atomic unit from the embedded table plus all
//! binary compound units (`Gg/10^3m3`, `kg/m3`, ...) synthesized from
//! them. [`MeasureValue`] carries an exact decimal together with a unit
//! name and performs dimension-checked arithmetic, routing conversions
//! through each dimension's SI reference unit.

#![forbid(unsafe_code)]

pub mod decimal;

mod db;
mod error;
mod measure;
mod unit;

pub use db::UnitCatalog;
pub use error::{Error, Result};
pub use measure::MeasureValue;
pub use unit::{ambiguous_name, CompoundUnit, Dimension, MetaUnit, Unit};

use once_cell::sync::Lazy;

static CATALOG: Lazy<UnitCatalog> = Lazy::new(|| {
    UnitCatalog::from_csv(include_str!("../units.csv"))
        .expect("failed to load embedded units.csv")
});

/// Process-wide immutable unit catalog built from the embedded table.
///
/// Constructed on first use; safe to share across threads.
pub fn catalog() -> &'static UnitCatalog {
    &CATALOG
}
