use serde::{Deserialize, Serialize};

/// Identifier for an enrichable entity (a candidate company or one of its
/// contacts), keyed in our own store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Company,
    Contact,
}

/// Locally-known identity for an entity. This is what a cold fallback can
/// serve when the provider is down and nothing was ever cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub entity_id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub domain: Option<String>,
}

/// Request handed to the external provider. `source_id` carries the
/// provider's own identity for the entity once learned, so refreshes do not
/// re-resolve from name/domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    pub entity_id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub domain: Option<String>,
    pub source_id: Option<String>,
}

impl EnrichmentRequest {
    pub fn for_entity(entity: &EntityDescriptor, source_id: Option<String>) -> Self {
        Self {
            entity_id: entity.entity_id.clone(),
            kind: entity.kind,
            name: entity.name.clone(),
            domain: entity.domain.clone(),
            source_id,
        }
    }
}

/// Structured data returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPayload {
    pub source_id: Option<String>,
    pub data: serde_json::Value,
}

/// Failures from the external provider adapter. Timeouts surface here as
/// ordinary failures; the cache downgrades them instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("provider rate limited")]
    RateLimited,
    #[error("provider has no data for this entity")]
    NoMatch,
}

/// Adapter seam for the third-party enrichment API.
pub trait EnrichmentProvider: Send + Sync {
    fn enrich(&self, request: &EnrichmentRequest) -> Result<ProviderPayload, ProviderError>;
}
