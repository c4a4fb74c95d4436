// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod app_state;

pub use reactivity::ReactiveState;
pub use app_state::{AppState, StatusLine};
