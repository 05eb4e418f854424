use crate::pgn::san::format_san;
use cozy_chess::{Board, Color, GameStatus, Move, Piece, Square};
use std::collections::HashMap;

/// Move-by-move replay wrapper around a `cozy_chess::Board`. This is the
/// position/move library surface the rest of the pipeline consumes; it does
/// not carry any persistence-layer fields (those live on the server's
/// `Game` row, see `server::persistence`).
#[derive(Debug, Clone)]
pub struct Game {
    position: Board,
    history: Vec<HistoryEntry>,
    pgn_tags: HashMap<String, String>,
    start_position: StartPosition,
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub mv: Move,
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub piece_color: Color,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
    pub san: String,
    pub fen: String,
}

#[derive(Debug, Clone)]
pub enum StartPosition {
    Standard,
    Fen(String),
}

impl Game {
    pub fn new() -> Self {
        Self {
            position: Board::default(),
            history: Vec::new(),
            pgn_tags: HashMap::new(),
            start_position: StartPosition::Standard,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let position = crate::fen::parse_fen(fen)?;
        Ok(Self {
            position,
            history: Vec::new(),
            pgn_tags: HashMap::new(),
            start_position: StartPosition::Fen(fen.to_string()),
        })
    }

    /// Replay a parsed PGN game from its start position, recording history
    /// entries for every move. Fails if the PGN's move list contains an
    /// illegal move against its own FEN/start-position header.
    pub fn from_pgn(pgn: &crate::pgn::PgnGame) -> Result<Self, GameError> {
        let mut game = match pgn.tags.get("FEN") {
            Some(fen) => Self::from_fen(fen)?,
            None => Self::new(),
        };
        game.pgn_tags = pgn.tags.clone();
        for pgn_move in &pgn.moves {
            game.make_move(pgn_move.mv)?;
        }
        Ok(game)
    }

    pub fn position(&self) -> &Board {
        &self.position
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        &self.pgn_tags
    }

    pub fn make_move(&mut self, mv: Move) -> Result<HistoryEntry, GameError> {
        if !self.legal_moves().contains(&mv) {
            return Err(GameError::IllegalMove);
        }

        let captured = self.position.piece_on(mv.to);
        let piece = self.position.piece_on(mv.from).ok_or(GameError::IllegalMove)?;
        let piece_color = self.position.color_on(mv.from).ok_or(GameError::IllegalMove)?;
        let san = format_san(&self.position, mv);

        let mut new_position = self.position.clone();
        new_position.play_unchecked(mv);
        self.position = new_position;
        let fen = self.to_fen();

        let entry = HistoryEntry {
            mv,
            from: mv.from,
            to: mv.to,
            piece,
            piece_color,
            captured,
            promotion: mv.promotion,
            san,
            fen,
        };
        self.history.push(entry.clone());
        Ok(entry)
    }

    pub fn undo(&mut self) -> Result<(), GameError> {
        if self.history.is_empty() {
            return Err(GameError::NothingToUndo);
        }
        self.history.pop();
        self.rebuild_position()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.position.generate_moves(|mvs| {
            moves.extend(mvs);
            false
        });
        moves
    }

    pub fn status(&self) -> GameStatus {
        self.position.status()
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn to_fen(&self) -> String {
        crate::fen::format_fen(&self.position)
    }

    fn rebuild_position(&mut self) -> Result<(), GameError> {
        let mut board = match &self.start_position {
            StartPosition::Standard => Board::default(),
            StartPosition::Fen(fen) => crate::fen::parse_fen(fen)?,
        };
        for entry in &self.history {
            board = board.try_play(entry.mv).map_err(|_| GameError::IllegalMove)?;
        }
        self.position = board;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("illegal move")]
    IllegalMove,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("FEN parse error: {0}")]
    FenError(#[from] crate::fen::FenError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::{File, Rank};

    #[test]
    fn plays_opening_moves_and_tracks_san() {
        let mut game = Game::new();
        game.make_move(Move {
            from: Square::new(File::E, Rank::Second),
            to: Square::new(File::E, Rank::Fourth),
            promotion: None,
        })
        .unwrap();
        assert_eq!(game.history()[0].san, "e4");
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn rejects_illegal_move() {
        let mut game = Game::new();
        let err = game
            .make_move(Move {
                from: Square::new(File::E, Rank::Second),
                to: Square::new(File::E, Rank::Fifth),
                promotion: None,
            })
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalMove));
    }

    #[test]
    fn undo_restores_prior_position() {
        let mut game = Game::new();
        let before = game.to_fen();
        game.make_move(Move {
            from: Square::new(File::E, Rank::Second),
            to: Square::new(File::E, Rank::Fourth),
            promotion: None,
        })
        .unwrap();
        game.undo().unwrap();
        assert_eq!(game.to_fen(), before);
    }

    #[test]
    fn imports_from_pgn() {
        let pgn = crate::pgn::parse_pgn("[Event \"Test\"]\n\n1. e4 e5 2. Nf3 *\n").unwrap();
        let game = Game::from_pgn(&pgn).unwrap();
        assert_eq!(game.history().len(), 3);
        assert_eq!(game.history()[2].san, "Nf3");
    }
}
