// Notification sinks for finished draws

pub mod console;
pub mod json_file;
pub mod traits;

use std::sync::Arc;

pub use console::ConsoleDispatcher;
pub use json_file::JsonFileDispatcher;
pub use traits::AssignmentDispatcher;

use crate::config::{DispatchConfig, SinkKind};

/// Builds the sink selected in configuration.
pub fn dispatcher_from_config(config: &DispatchConfig) -> Arc<dyn AssignmentDispatcher> {
    match config.sink {
        SinkKind::Console => Arc::new(ConsoleDispatcher::new()),
        SinkKind::File => Arc::new(JsonFileDispatcher::new(&config.output_path)),
    }
}
