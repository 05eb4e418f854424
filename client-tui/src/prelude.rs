// Re-export state types
pub use crate::state::{GameMode, PlayerColor, UciDirection, UciLogEntry};

// Re-export FSM types
pub use crate::ui::fsm::{
    render_spec::{
        Component, Constraint, Control, InputPhase, Layout, Overlay, RenderSpec, Row,
        TabInputState, View,
    },
    states::{GameBoardState, MatchSummaryState, ReviewBoardState, StartScreenState},
    UiEvent, UiState,
};

// Re-export pane types
pub use crate::ui::pane::{PaneId, PaneManager};

// Re-export context types
pub use crate::ui::context::{FocusContext, FocusStack};
