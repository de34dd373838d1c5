mod server;
mod state;

pub use server::{build_router, run_server};
pub use state::ServerState;
