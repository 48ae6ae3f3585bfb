//! Core library for the prospecting service: ICP fit scoring, triage, and
//! enrichment workflows plus the configuration and telemetry plumbing shared
//! by the binary and the integration tests.

pub mod config;
pub mod demo;
pub mod error;
pub mod infra;
pub mod telemetry;
pub mod workflows;
