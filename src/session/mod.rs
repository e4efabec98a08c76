/// Range rendering into sinks.
pub mod render_session;
