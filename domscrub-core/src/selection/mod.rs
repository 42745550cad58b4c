//! Root replacement: either compose named regions or select a fragment.
//!
//! The two are mutually exclusive; the engine tries regions first and falls
//! back to the `selector` rule when region composition does not apply.

pub mod fragment;
pub mod regions;

pub use fragment::select_fragment;
pub use regions::{compose_regions, parse_regions, plan_regions, InvalidRegionConfiguration, Region};
