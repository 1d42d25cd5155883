//! Per-zone statistics
//!
//! Groups classified points by zone rank and reduces each group.

use serde::Serialize;
use uhi_core::{ClassifiedPoint, Severity};

use super::summary::{round_to, Moments};
use crate::classification::zone_tier;

/// Reductions for one zone rank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zone: usize,
    pub severity: Severity,
    pub priority: u8,
    pub color: &'static str,
    pub point_count: usize,
    /// `None` when the zone has no points
    pub avg_lst: Option<f64>,
    pub min_lst: Option<f64>,
    pub max_lst: Option<f64>,
    pub avg_ndvi: Option<f64>,
    pub avg_uhi_intensity: Option<f64>,
}

/// One summary per zone rank in `0..zone_count`, hottest first.
pub fn zone_summaries(points: &[ClassifiedPoint], zone_count: usize) -> Vec<ZoneSummary> {
    let mut groups: Vec<Vec<&ClassifiedPoint>> = vec![Vec::new(); zone_count];
    for p in points {
        if let Some(group) = groups.get_mut(p.zone) {
            group.push(p);
        }
    }

    groups
        .iter()
        .enumerate()
        .map(|(zone, members)| {
            let tier = zone_tier(zone);
            let n = members.len() as f64;
            let (avg_lst, min_lst, max_lst, avg_ndvi, avg_uhi) = if members.is_empty() {
                (None, None, None, None, None)
            } else {
                let lst = Moments::of(members.iter().map(|p| p.lst));
                let ndvi = Moments::of(members.iter().map(|p| p.ndvi));
                let uhi = Moments::of(members.iter().map(|p| p.uhi_intensity));
                (
                    Some(round_to(lst.mean(n), 2)),
                    Some(round_to(lst.min, 2)),
                    Some(round_to(lst.max, 2)),
                    Some(round_to(ndvi.mean(n), 3)),
                    Some(round_to(uhi.mean(n), 2)),
                )
            };

            ZoneSummary {
                zone,
                severity: tier.severity,
                priority: tier.priority,
                color: tier.color,
                point_count: members.len(),
                avg_lst,
                min_lst,
                max_lst,
                avg_ndvi,
                avg_uhi_intensity: avg_uhi,
            }
        })
        .collect()
}
