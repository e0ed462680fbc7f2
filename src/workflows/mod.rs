// Exchange workflow: stage machine, session state and the async driver.
// Stages only move forward; every failure is a self-loop with a message.

pub mod coordinator;
pub mod session;
pub mod state_machine;

pub use coordinator::ExchangeCoordinator;
pub use session::{DispatchStep, ExchangeSession, RefusalReason, SessionSnapshot, TransitionResult};
pub use state_machine::{ExchangeStages, Stage, StageEvent};
