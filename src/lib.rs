//! Carbon footprint comparison of two construction offers.
//!
//! A [`ComparisonModel`] holds a classic and an optimized bill of quantities
//! split into five emission categories. [`calculate`] turns a scenario into
//! CO2e totals, [`compare`] sets the two offers side by side, and the
//! [`codec`] / [`xlsx`] modules carry both offers to and from a two-sheet
//! workbook.

pub mod calculator;
pub mod codec;
pub mod comparison;
pub mod error;
pub mod factors;
pub mod model;
pub mod report;
pub mod schema;
pub mod session;
pub mod xlsx;

#[cfg(feature = "python")]
mod python;

pub use calculator::{calculate, item_emission, EmissionReport, ItemDetail, QuantityUnit};
pub use codec::{decode, encode, Decoded, Workbook};
pub use comparison::{compare, Comparison, Synthesis, Trend};
pub use error::{CarbonError, Result};
pub use factors::{EmissionFactorEntry, FactorKind, FactorTable};
pub use model::{
    Category, ComparisonModel, EnergyItem, LineItem, Material, ProcessItem, RawMaterialItem,
    Scenario, ScenarioKind, TransportItem, TransportMode,
};
pub use session::{Notice, NoticeLevel, Session, SessionConfig};
