//! The route table.

use crate::handlers;
use crate::state::AppState;
use marquee_server::App;
use std::sync::Arc;

/// Builds the full application route table against the given state.
#[must_use]
pub fn build_app(state: Arc<AppState>) -> App {
    let mut app = App::new();

    handlers::search::register(&mut app, &state);
    handlers::detail::register(&mut app, &state);
    handlers::comments::register(&mut app, &state);
    handlers::favorites::register(&mut app, &state);

    app
}
