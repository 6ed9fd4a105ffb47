//! Process-wide lifecycle state.

mod state;

pub use state::{
    exit_status, is_serving, is_shutdown, register_server, set_initializing, set_serving,
    setup_shutdown_handler,
};
