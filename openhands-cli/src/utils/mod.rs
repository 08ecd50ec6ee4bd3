pub mod logging;

pub use logging::{debug_enabled, init_logging, is_debug_value, level_filter, shutdown_logging};
