//! Engine services: reactive handlers, batch jobs, and their wiring.

mod admission;
mod archiver;
mod batching;
mod completion;
mod reactor;
mod schedule;
mod triage;

pub use admission::{AdmissionController, AdmissionDecision};
pub(crate) use batching::commit_in_chunks;
pub use archiver::{ArchiveReport, StaleArchiver};
pub use completion::{CompletionRecorder, StampOutcome};
pub use reactor::EventPump;
pub use schedule::JobTrigger;
pub use triage::{DailyTriage, TriageError, TriageReport};
