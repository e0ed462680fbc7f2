// gift-swap library - gift exchange draws
// This exposes the core components for testing and integration

pub mod assignment;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod exchange;
pub mod observability;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use assignment::AssignmentGenerator;
pub use crate::config::{config, init_config, DispatchConfig, ExchangeConfig, GiftSwapConfig, SinkKind};
pub use dispatch::{AssignmentDispatcher, ConsoleDispatcher, JsonFileDispatcher};
pub use exchange::{
    Assignment, DispatchPayload, DispatchResponse, EventDetails, EventDetailsInput, ExchangeError,
    Participant, ParticipantField, SessionError,
};
pub use observability::{exchange_metrics, ExchangeMetrics, OperationTimer};
pub use telemetry::{create_session_span, generate_correlation_id, init_telemetry};
pub use workflows::{
    ExchangeCoordinator, ExchangeSession, RefusalReason, SessionSnapshot, Stage, TransitionResult,
};
