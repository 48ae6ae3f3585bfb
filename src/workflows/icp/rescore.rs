use super::profile::{IcpProfile, WeightError};
use super::scoring::fit_score;
use crate::workflows::triage::repository::{CandidateStore, ScoreUpdate, StoreError};

/// Outcome of a full rescoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescoreSummary {
    pub scored: usize,
    pub changed: usize,
}

/// Error raised by a rescoring pass.
#[derive(Debug, thiserror::Error)]
pub enum RescoreError {
    #[error(transparent)]
    Weights(#[from] WeightError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Recompute the fit score of every stored candidate against a changed
/// profile and persist the batch atomically. Weights are validated before any
/// store traffic; a store failure leaves all candidates at their prior score.
pub fn rescore_candidates<S: CandidateStore>(
    store: &S,
    profile: &IcpProfile,
) -> Result<RescoreSummary, RescoreError> {
    profile.validate()?;

    let candidates = store.all_candidates()?;
    let scored = candidates.len();

    let updates: Vec<ScoreUpdate> = candidates
        .iter()
        .filter_map(|candidate| {
            let fit_score = fit_score(candidate, profile);
            (fit_score != candidate.fit_score).then(|| ScoreUpdate {
                id: candidate.id.clone(),
                fit_score,
            })
        })
        .collect();

    let changed = updates.len();
    if changed > 0 {
        store.update_fit_scores(&updates)?;
    }

    Ok(RescoreSummary { scored, changed })
}
