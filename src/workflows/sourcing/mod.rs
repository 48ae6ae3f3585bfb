//! Import of a prospecting provider's CSV company export into pending
//! candidates ready for scoring and triage.

mod mapping;
mod normalizer;
mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::workflows::icp::{ANNUAL_REVENUE_SCALE, EMPLOYEE_HEADCOUNT_SCALE};
use crate::workflows::triage::domain::{Candidate, CandidateId};

#[derive(Debug)]
pub enum ProspectImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ProspectImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProspectImportError::Io(err) => write!(f, "failed to read company export: {}", err),
            ProspectImportError::Csv(err) => write!(f, "invalid company export data: {}", err),
        }
    }
}

impl std::error::Error for ProspectImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProspectImportError::Io(err) => Some(err),
            ProspectImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ProspectImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ProspectImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ProspectCsvImporter;

impl ProspectCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>, ProspectImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse an export into pending candidates. Duplicate company ids
    /// collapse to their first occurrence; range labels the catalogs do not
    /// recognize are dropped so the candidate stays unscored on that
    /// dimension.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Candidate>, ProspectImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();

        for record in parser::parse_records(reader)? {
            if !seen.insert(record.id.clone()) {
                continue;
            }

            let mut candidate =
                Candidate::pending(CandidateId(record.id), record.name);
            candidate.domain = record.domain;
            candidate.industry = record
                .industry
                .as_deref()
                .and_then(mapping::canonical_industry);
            candidate.location = record.location;
            candidate.employee_size_range = record
                .employee_range
                .as_deref()
                .and_then(|raw| mapping::canonical_bucket(raw, &EMPLOYEE_HEADCOUNT_SCALE));
            candidate.revenue_range = record
                .revenue_range
                .as_deref()
                .and_then(|raw| mapping::canonical_bucket(raw, &ANNUAL_REVENUE_SCALE));

            candidates.push(candidate);
        }

        Ok(candidates)
    }
}
