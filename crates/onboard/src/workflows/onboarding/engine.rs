use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use super::documents::FetchError;
use super::events::{OnboardingEvent, Topic};
use super::fulfillment::FulfillmentError;
use super::notify::NotifyError;
use super::state::TransitionRejected;
use super::store::StoreError;
use super::verifier::VerifyError;

/// A named unit of pipeline work: declares the topics it listens on and the
/// topics it may emit, and turns one event into zero or more follow-ons.
pub trait EventStep: Send + Sync {
    fn name(&self) -> &'static str;
    fn subscriptions(&self) -> &'static [Topic];
    fn emits(&self) -> &'static [Topic];
    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError>;
}

/// Failure inside a step handler. The engine logs these and keeps going;
/// nothing here ever aborts the surrounding dispatch.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error(transparent)]
    Fulfillment(#[from] FulfillmentError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Transition(#[from] TransitionRejected),
    #[error("step halted: {0}")]
    Halted(String),
}

/// Synchronous fan-out dispatcher. Events are delivered at most once, in
/// FIFO order, within the calling thread; there is no durable queue and no
/// retry. A subscriber failure is logged and does not block its siblings.
#[derive(Default)]
pub struct StepEngine {
    steps: Vec<Arc<dyn EventStep>>,
}

impl StepEngine {
    pub fn new(steps: Vec<Arc<dyn EventStep>>) -> Self {
        Self { steps }
    }

    pub fn register(&mut self, step: Arc<dyn EventStep>) {
        self.steps.push(step);
    }

    /// Drains the event and everything it transitively triggers.
    pub fn dispatch(&self, event: OnboardingEvent) {
        let mut queue = VecDeque::new();
        queue.push_back(event);

        while let Some(event) = queue.pop_front() {
            let topic = event.topic();
            debug!(topic = %topic, token = %event.token(), "dispatching event");

            for step in &self.steps {
                if !step.subscriptions().contains(&topic) {
                    continue;
                }

                match step.handle(&event) {
                    Ok(followups) => {
                        for followup in followups {
                            if !step.emits().contains(&followup.topic()) {
                                warn!(
                                    step = step.name(),
                                    topic = %followup.topic(),
                                    "step emitted an undeclared topic"
                                );
                            }
                            queue.push_back(followup);
                        }
                    }
                    Err(err) => {
                        warn!(
                            step = step.name(),
                            topic = %topic,
                            token = %event.token(),
                            error = %err,
                            "step failed; continuing with remaining subscribers"
                        );
                    }
                }
            }
        }
    }
}
