//! Statistics over classified points
//!
//! - **summary**: batch-wide LST/NDVI/UHI reductions and zone counts
//! - **zonal**: the same reductions per zone rank

mod summary;
mod zonal;

pub use summary::{round_to, summarize, Statistics};
pub use zonal::{zone_summaries, ZoneSummary};
