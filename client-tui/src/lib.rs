mod review_state;
mod state;
pub mod prelude;
pub mod ui;

pub use review_state::ReviewState;
pub use state::{GameMode, PlayerColor, UciDirection, UciLogEntry};

pub use ui::fsm;
pub use ui::menu_app;
pub use ui::widgets;
