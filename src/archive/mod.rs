//! Bulk branch archival core.
//!
//! A batch flows through these pieces in order:
//!
//! - [`confirm`]: destructive modes need a typed confirmation (CLI path)
//! - [`orchestrator`]: preflight tag veto, then bounded parallel pipelines
//! - [`pipeline`]: the per-branch tag/delete state machine
//! - [`aggregate`]: outcome summary and working-set update

pub mod aggregate;
pub mod confirm;
pub mod mode;
pub mod naming;
pub mod orchestrator;
pub mod outcome;
pub mod pipeline;
pub mod request;

pub use aggregate::{Summary, apply_to_selection};
pub use confirm::{Confirmation, ConfirmationGate, Prompt, StdinPrompt};
pub use mode::OperationMode;
pub use naming::{TagCollision, find_tag_collisions, tag_name_for};
pub use orchestrator::{CANCELLED_BEFORE_START, Orchestrator, OrchestratorOptions};
pub use outcome::{BatchResult, BranchOperationOutcome};
pub use pipeline::run_pipeline;
pub use request::{BatchRequest, BatchResponse};
