use std::collections::HashMap;
use std::sync::OnceLock;

use super::normalizer::normalize_label;
use crate::workflows::icp::OrdinalScale;

static INDUSTRY_ALIAS_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();

/// Map a provider industry label onto the canonical name used in ICP
/// industry sets. Unknown labels pass through trimmed so no signal is lost;
/// empty labels collapse to `None`.
pub(crate) fn canonical_industry(raw: &str) -> Option<String> {
    let normalized = normalize_label(raw);
    if normalized.is_empty() {
        return None;
    }

    if let Some(canonical) = industry_alias_map().get(normalized.as_str()) {
        return Some((*canonical).to_string());
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn industry_alias_map() -> &'static HashMap<String, &'static str> {
    INDUSTRY_ALIAS_MAP.get_or_init(|| {
        const ALIAS_TO_CANONICAL: &[(&str, &str)] = &[
            ("computer software", "Software"),
            ("software development", "Software"),
            ("saas", "Software"),
            ("information technology & services", "Software"),
            ("information technology and services", "Software"),
            ("it services", "Software"),
            ("hospital & health care", "Healthcare"),
            ("hospital and health care", "Healthcare"),
            ("medical practice", "Healthcare"),
            ("health, wellness & fitness", "Healthcare"),
            ("banking", "Financial Services"),
            ("investment management", "Financial Services"),
            ("insurance", "Financial Services"),
            ("logistics & supply chain", "Logistics"),
            ("logistics and supply chain", "Logistics"),
            ("transportation/trucking/railroad", "Logistics"),
            ("machinery", "Manufacturing"),
            ("industrial automation", "Manufacturing"),
            ("consumer goods", "Manufacturing"),
            ("retail", "Retail"),
            ("e-commerce", "Retail"),
            ("internet retail", "Retail"),
            ("construction", "Construction"),
            ("civil engineering", "Construction"),
            ("education management", "Education"),
            ("higher education", "Education"),
            ("hospitality", "Hospitality"),
            ("restaurants", "Hospitality"),
        ];

        ALIAS_TO_CANONICAL
            .iter()
            .map(|(alias, canonical)| (normalize_label(alias), *canonical))
            .collect()
    })
}

/// Normalize a provider range label ("11 - 50", "$1m - $5m") onto its
/// catalog bucket. Labels the catalog does not recognize map to `None` and
/// the candidate is left unscored on that dimension.
pub(crate) fn canonical_bucket(raw: &str, scale: &OrdinalScale) -> Option<String> {
    let normalized = normalize_label(raw).replace(" - ", "-").replace(" -", "-").replace("- ", "-");
    if normalized.is_empty() {
        return None;
    }

    scale
        .buckets()
        .iter()
        .find(|bucket| normalize_label(bucket) == normalized)
        .map(|bucket| (*bucket).to_string())
}

#[cfg(test)]
pub(crate) fn industry_lookup_for_tests(raw: &str) -> Option<String> {
    canonical_industry(raw)
}
