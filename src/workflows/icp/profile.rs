use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Ordered bucket catalog backing the exact/adjacent tolerance for a single
/// firmographic dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalScale {
    buckets: &'static [&'static str],
}

impl OrdinalScale {
    pub const fn new(buckets: &'static [&'static str]) -> Self {
        Self { buckets }
    }

    /// Index of a bucket label within the catalog, `None` for labels the
    /// catalog does not recognize.
    pub fn position(&self, bucket: &str) -> Option<usize> {
        self.buckets.iter().position(|known| *known == bucket)
    }

    pub fn buckets(&self) -> &'static [&'static str] {
        self.buckets
    }
}

/// Company headcount buckets offered by the candidate provider.
pub const EMPLOYEE_HEADCOUNT_SCALE: OrdinalScale = OrdinalScale::new(&[
    "1-10",
    "11-50",
    "51-200",
    "201-500",
    "501-1000",
    "1001-5000",
    "5001-10000",
    "10001+",
]);

/// Annual revenue buckets offered by the candidate provider.
pub const ANNUAL_REVENUE_SCALE: OrdinalScale = OrdinalScale::new(&[
    "<$1M",
    "$1M-$5M",
    "$5M-$25M",
    "$25M-$100M",
    "$100M-$500M",
    "$500M+",
]);

/// Per-factor weights for the fit score. The four weights must sum to 100
/// before a profile is persisted or a rescoring pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitWeights {
    pub industry: u8,
    pub location: u8,
    pub employee_size: u8,
    pub revenue: u8,
}

impl FitWeights {
    pub fn sum(&self) -> u16 {
        u16::from(self.industry)
            + u16::from(self.location)
            + u16::from(self.employee_size)
            + u16::from(self.revenue)
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        let sum = self.sum();
        if sum == 100 {
            Ok(())
        } else {
            Err(WeightError::InvalidSum { sum })
        }
    }
}

impl Default for FitWeights {
    fn default() -> Self {
        Self {
            industry: 40,
            location: 20,
            employee_size: 20,
            revenue: 20,
        }
    }
}

/// Weight sets that cannot drive a rescoring pass.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WeightError {
    #[error("fit weights must sum to 100, found {sum}")]
    InvalidSum { sum: u16 },
}

/// User-defined target-company criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcpProfile {
    pub industries: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub is_nationwide: bool,
    pub company_size_ranges: Vec<String>,
    pub revenue_ranges: Vec<String>,
    pub weights: FitWeights,
}

impl IcpProfile {
    /// Validate the profile ahead of persistence or batch rescoring.
    pub fn validate(&self) -> Result<(), WeightError> {
        self.weights.validate()
    }
}
