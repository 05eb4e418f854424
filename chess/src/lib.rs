pub mod analysis;
pub mod board_display;
pub mod fen;
pub mod game;
pub mod pgn;
pub mod types;
pub mod uci;

pub use analysis::{EngineAnalysis, Score, EVAL_CLAMP_CP, MATE_SCORE_CP};
pub use board_display::{DisplayBoard, DisplayBoardError};
pub use fen::{parse_fen, format_fen, FenError};
pub use game::{Game, GameError, HistoryEntry, StartPosition};
pub use pgn::{parse_pgn, GameResult, PgnError, PgnGame, PgnMove};
pub use types::{PieceColor, PieceKind};
pub use uci::{convert_cozy_castling_to_uci, convert_uci_castling_to_cozy, format_uci_move, parse_uci_move};
