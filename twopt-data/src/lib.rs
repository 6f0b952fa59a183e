//! Campaign table ingestion for the Total War build optimizer.
//!
//! The game ships its campaign data as tab-separated database dumps. This
//! crate turns those files into typed rows and nothing more: classification,
//! entity assembly and constraint generation live in `twopt-core`.
//!
//! All loaders share the same contract: tab-delimited, UTF-8 with optional
//! BOM, blank lines and `#` comments tolerated, and a fixed field count per
//! table. A file with the wrong arity is rejected at load time rather than
//! silently reinterpreted.

pub mod cultures;
pub mod effects;
pub mod error;
pub mod regions;
pub mod tsv;

pub use cultures::{CultureVariantRow, FactionRow};
pub use effects::{EffectRow, Scope};
pub use error::DataError;
pub use regions::{ProvinceRegionRow, SlotKind, SlotRow};
