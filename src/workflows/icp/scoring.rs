use serde::Serialize;

use super::profile::{IcpProfile, OrdinalScale, ANNUAL_REVENUE_SCALE, EMPLOYEE_HEADCOUNT_SCALE};
use crate::workflows::triage::domain::Candidate;

/// Per-factor sub-scores, each in {0, 50, 100}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorBreakdown {
    pub industry: u8,
    pub location: u8,
    pub employee_size: u8,
    pub revenue: u8,
}

impl FactorBreakdown {
    /// Weighted composite, rounded to the nearest integer. Weights summing to
    /// 100 keep the result within 0..=100; the scorer does not reject other
    /// weight sets and simply computes with what it is given.
    pub fn weighted_total(&self, profile: &IcpProfile) -> u8 {
        let weights = &profile.weights;
        let total = f64::from(self.industry) * f64::from(weights.industry) / 100.0
            + f64::from(self.location) * f64::from(weights.location) / 100.0
            + f64::from(self.employee_size) * f64::from(weights.employee_size) / 100.0
            + f64::from(self.revenue) * f64::from(weights.revenue) / 100.0;
        total.round().clamp(0.0, 255.0) as u8
    }
}

/// Compute the 0-100 fit score for a candidate against a profile.
pub fn fit_score(candidate: &Candidate, profile: &IcpProfile) -> u8 {
    breakdown(candidate, profile).weighted_total(profile)
}

/// Compute the per-factor sub-scores without weighting them.
pub fn breakdown(candidate: &Candidate, profile: &IcpProfile) -> FactorBreakdown {
    FactorBreakdown {
        industry: industry_subscore(candidate.industry.as_deref(), profile),
        location: location_subscore(candidate.location.as_deref(), profile),
        employee_size: ordinal_subscore(
            candidate.employee_size_range.as_deref(),
            &profile.company_size_ranges,
            &EMPLOYEE_HEADCOUNT_SCALE,
        ),
        revenue: ordinal_subscore(
            candidate.revenue_range.as_deref(),
            &profile.revenue_ranges,
            &ANNUAL_REVENUE_SCALE,
        ),
    }
}

fn industry_subscore(industry: Option<&str>, profile: &IcpProfile) -> u8 {
    match industry {
        Some(industry) if profile.industries.contains(industry) => 100,
        _ => 0,
    }
}

fn location_subscore(location: Option<&str>, profile: &IcpProfile) -> u8 {
    if profile.is_nationwide {
        return 100;
    }

    match location {
        Some(location) if profile.locations.contains(location) => 100,
        _ => 0,
    }
}

/// Exact bucket membership scores 100; an immediate ordinal neighbor of any
/// selected bucket scores 50; everything else, including buckets the catalog
/// does not recognize, scores 0.
fn ordinal_subscore(bucket: Option<&str>, selected: &[String], scale: &OrdinalScale) -> u8 {
    if selected.is_empty() {
        return 0;
    }

    let bucket = match bucket {
        Some(bucket) => bucket,
        None => return 0,
    };

    if selected.iter().any(|choice| choice == bucket) {
        return 100;
    }

    let position = match scale.position(bucket) {
        Some(position) => position,
        None => return 0,
    };

    let adjacent = selected
        .iter()
        .filter_map(|choice| scale.position(choice))
        .any(|choice| position.abs_diff(choice) == 1);

    if adjacent {
        50
    } else {
        0
    }
}
