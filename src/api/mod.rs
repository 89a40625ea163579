mod handlers;
mod routes;
mod state;

pub use handlers::SessionView;
pub use routes::create_router;
pub use state::{AppState, AppStateInner};
