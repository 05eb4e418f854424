mod game_board;
mod game_board_pane_focused;
mod match_summary;
mod review_board;
mod review_board_pane_focused;
mod start_screen;

pub use game_board::GameBoardState;
pub use game_board_pane_focused::GameBoardPaneFocusedState;
pub use match_summary::MatchSummaryState;
pub use review_board::ReviewBoardState;
pub use review_board_pane_focused::ReviewBoardPaneFocusedState;
pub use start_screen::StartScreenState;
