pub mod app;
pub mod header;
pub mod alerts_panel;
pub mod customers_panel;
pub mod database_panel;
pub mod event_log;

pub use app::render_app;
pub use header::render_header;
pub use alerts_panel::render_alerts_panel;
pub use customers_panel::render_customers_panel;
pub use database_panel::render_database_panel;
pub use event_log::render_event_log;
