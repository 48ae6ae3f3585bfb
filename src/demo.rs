//! Sample dataset and a canned enrichment provider so the full triage loop
//! can be driven end-to-end without external services (`serve --demo`).

use std::collections::BTreeSet;

use serde_json::json;

use crate::infra::InMemoryCandidateStore;
use crate::workflows::enrichment::{
    EnrichmentProvider, EnrichmentRequest, ProviderError, ProviderPayload,
};
use crate::workflows::icp::{fit_score, FitWeights, IcpProfile};
use crate::workflows::triage::domain::{Candidate, CandidateId};
use crate::workflows::triage::repository::{CandidateStore, StoreError};

pub fn demo_profile() -> IcpProfile {
    IcpProfile {
        industries: BTreeSet::from(["Software".to_string(), "Logistics".to_string()]),
        locations: BTreeSet::from(["CA".to_string(), "WA".to_string()]),
        is_nationwide: false,
        company_size_ranges: vec!["11-50".to_string(), "51-200".to_string()],
        revenue_ranges: vec!["$1M-$5M".to_string(), "$5M-$25M".to_string()],
        weights: FitWeights {
            industry: 40,
            location: 20,
            employee_size: 20,
            revenue: 20,
        },
    }
}

fn candidate(
    id: &str,
    name: &str,
    domain: &str,
    industry: Option<&str>,
    location: Option<&str>,
    employees: Option<&str>,
    revenue: Option<&str>,
) -> Candidate {
    let mut candidate = Candidate::pending(CandidateId(id.to_string()), name.to_string());
    candidate.domain = Some(domain.to_string());
    candidate.industry = industry.map(str::to_string);
    candidate.location = location.map(str::to_string);
    candidate.employee_size_range = employees.map(str::to_string);
    candidate.revenue_range = revenue.map(str::to_string);
    candidate
}

pub fn demo_candidates() -> Vec<Candidate> {
    let profile = demo_profile();
    let mut candidates = vec![
        candidate(
            "demo-001",
            "Harborline Systems",
            "harborline.example",
            Some("Software"),
            Some("CA"),
            Some("51-200"),
            Some("$5M-$25M"),
        ),
        candidate(
            "demo-002",
            "Cascade Freight Co",
            "cascadefreight.example",
            Some("Logistics"),
            Some("WA"),
            Some("201-500"),
            Some("$25M-$100M"),
        ),
        candidate(
            "demo-003",
            "Bluepine Robotics",
            "bluepine.example",
            Some("Manufacturing"),
            Some("OR"),
            Some("11-50"),
            Some("$1M-$5M"),
        ),
        candidate(
            "demo-004",
            "Quartz Ledger",
            "quartzledger.example",
            Some("Software"),
            Some("NY"),
            None,
            None,
        ),
        candidate(
            "demo-005",
            "Northgate Clinics",
            "northgate.example",
            Some("Healthcare"),
            Some("CA"),
            Some("501-1000"),
            None,
        ),
    ];

    for candidate in &mut candidates {
        candidate.fit_score = fit_score(candidate, &profile);
    }
    candidates
}

/// Seed the store with the demo backlog; returns how many were inserted.
pub fn seed(store: &InMemoryCandidateStore) -> Result<usize, StoreError> {
    let inserted = store.insert_new(&demo_candidates())?;
    Ok(inserted.len())
}

/// Enrichment provider serving canned firmographics for the demo companies
/// and failing for everything else, which exercises the degraded paths.
#[derive(Default, Clone)]
pub struct CannedEnrichmentProvider;

impl EnrichmentProvider for CannedEnrichmentProvider {
    fn enrich(&self, request: &EnrichmentRequest) -> Result<ProviderPayload, ProviderError> {
        let known = matches!(
            request.entity_id.0.as_str(),
            "demo-001" | "demo-002" | "demo-003" | "demo-004" | "demo-005"
        );
        if !known {
            return Err(ProviderError::NoMatch);
        }

        Ok(ProviderPayload {
            source_id: Some(format!("src-{}", request.entity_id.0)),
            data: json!({
                "name": request.name,
                "domain": request.domain,
                "funding_stage": "Series B",
                "technologies": ["postgres", "kubernetes"],
                "headquarters": { "country": "US" },
            }),
        })
    }
}
