//! Event pump wiring the change feed to the reactive handlers.

use super::{AdmissionController, CompletionRecorder};
use crate::task::ports::{CreateEvent, TaskStore, UpdateEvent};
use mockable::Clock;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// Drains create/update streams into the admission controller and completion
/// recorder.
///
/// Each event is handled to completion before the next is taken from its
/// stream, which keeps per-document ordering best effort; nothing orders
/// events across documents or against a concurrently running batch job. The
/// handlers swallow their own failures, so the pump itself never errors.
pub struct EventPump<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    admission: AdmissionController<S>,
    completion: CompletionRecorder<S, C>,
}

impl<S, C> EventPump<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a pump over the two reactive handlers.
    #[must_use]
    pub const fn new(
        admission: AdmissionController<S>,
        completion: CompletionRecorder<S, C>,
    ) -> Self {
        Self {
            admission,
            completion,
        }
    }

    /// Runs until both streams close.
    pub async fn run(
        &self,
        mut creates: UnboundedReceiver<CreateEvent>,
        mut updates: UnboundedReceiver<UpdateEvent>,
    ) {
        let mut creates_open = true;
        let mut updates_open = true;

        while creates_open || updates_open {
            tokio::select! {
                event = creates.recv(), if creates_open => match event {
                    Some(event) => self.admission.handle_create(&event).await,
                    None => creates_open = false,
                },
                event = updates.recv(), if updates_open => match event {
                    Some(event) => {
                        self.admission.handle_update(&event).await;
                        self.completion.handle_update(&event).await;
                    }
                    None => updates_open = false,
                },
            }
        }
        debug!("event pump streams closed");
    }
}
