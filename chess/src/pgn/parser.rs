//! Minimal PGN import: tag pairs + movetext, enough to reconstruct the move
//! list and the game result for a single game. No variation (`(...)`)
//! support — imported games are always the mainline.

use super::san::{parse_san, SanError};
use cozy_chess::{Board, Move};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub tags: HashMap<String, String>,
    pub moves: Vec<PgnMove>,
    pub result: GameResult,
}

/// A single parsed move with its board-legal representation and original SAN.
#[derive(Debug, Clone)]
pub struct PgnMove {
    pub mv: Move,
    pub san: String,
    pub comment: Option<String>,
    pub nags: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Ongoing,
}

impl GameResult {
    fn parse(s: &str) -> Self {
        match s {
            "1-0" => Self::WhiteWins,
            "0-1" => Self::BlackWins,
            "1/2-1/2" => Self::Draw,
            _ => Self::Ongoing,
        }
    }
}

/// Parse one PGN game (tag pairs followed by movetext) into a `PgnGame`.
pub fn parse_pgn(input: &str) -> Result<PgnGame, PgnError> {
    let mut tags = HashMap::new();
    let mut body_start = 0;
    for (offset, line) in input.match_indices('\n') {
        let trimmed = input[body_start..offset].trim();
        if let Some(stripped) = trimmed.strip_prefix('[') {
            let stripped = stripped.trim_end_matches(']');
            if let Some((key, value)) = stripped.split_once(' ') {
                let value = value.trim().trim_matches('"');
                tags.insert(key.to_string(), value.to_string());
            }
        } else if !trimmed.is_empty() {
            break;
        }
        body_start = offset + 1;
    }
    let movetext = &input[body_start..];

    let start_fen = tags.get("FEN").cloned();
    let mut board = match &start_fen {
        Some(fen) => crate::fen::parse_fen(fen).map_err(|_| PgnError::InvalidFormat)?,
        None => Board::default(),
    };

    let tokens = tokenize_movetext(movetext);
    let mut moves = Vec::new();
    let mut result = GameResult::Ongoing;
    let mut pending_comment: Option<String> = None;
    let mut pending_nags: Vec<u8> = Vec::new();

    for token in tokens {
        match token {
            Token::Comment(c) => pending_comment = Some(c),
            Token::Nag(n) => pending_nags.push(n),
            Token::Result(r) => result = r,
            Token::MoveNumber => {}
            Token::San(san) => {
                let mv = parse_san(&board, &san).map_err(PgnError::SanError)?;
                moves.push(PgnMove {
                    mv,
                    san,
                    comment: pending_comment.take(),
                    nags: std::mem::take(&mut pending_nags),
                });
                board.play_unchecked(mv);
            }
        }
    }

    Ok(PgnGame { tags, moves, result })
}

enum Token {
    MoveNumber,
    San(String),
    Comment(String),
    Nag(u8),
    Result(GameResult),
}

fn tokenize_movetext(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut buf = String::new();

    macro_rules! flush {
        () => {
            if !buf.is_empty() {
                classify(&buf, &mut tokens);
                buf.clear();
            }
        };
    }

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                flush!();
                let mut comment = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    comment.push(c);
                }
                tokens.push(Token::Comment(comment.trim().to_string()));
            }
            ';' => {
                flush!();
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => flush!(),
            _ => buf.push(c),
        }
    }
    flush!();
    tokens
}

fn classify(tok: &str, tokens: &mut Vec<Token>) {
    if matches!(tok, "1-0" | "0-1" | "1/2-1/2" | "*") {
        tokens.push(Token::Result(GameResult::parse(tok)));
        return;
    }
    if let Some(nag) = tok.strip_prefix('$') {
        if let Ok(n) = nag.parse() {
            tokens.push(Token::Nag(n));
            return;
        }
    }
    // Move-number markers like "1." or "12..." carry no board information.
    if tok.chars().next().is_some_and(|c| c.is_ascii_digit()) && tok.contains('.') {
        let san_part = tok.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
        tokens.push(Token::MoveNumber);
        if !san_part.is_empty() {
            tokens.push(Token::San(san_part.to_string()));
        }
        return;
    }
    tokens.push(Token::San(tok.to_string()));
}

#[derive(Debug, thiserror::Error)]
pub enum PgnError {
    #[error("invalid PGN format")]
    InvalidFormat,
    #[error("invalid tag: {0}")]
    InvalidTag(String),
    #[error("SAN parse error: {0}")]
    SanError(#[from] SanError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_and_mainline() {
        let pgn = r#"[Event "Test"]
[Result "1-0"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 1-0
"#;
        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.tags.get("Event").unwrap(), "Test");
        assert_eq!(game.result, GameResult::WhiteWins);
        assert_eq!(game.moves.len(), 6);
        assert_eq!(game.moves[0].san, "e4");
        assert_eq!(game.moves.last().unwrap().san, "a6");
    }

    #[test]
    fn parses_comments_and_nags() {
        let pgn = "[Event \"Test\"]\n\n1. e4 {good move} $1 e5 *\n";
        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.moves[0].comment.as_deref(), Some("good move"));
        assert_eq!(game.moves[0].nags, vec![1]);
        assert_eq!(game.result, GameResult::Ongoing);
    }

    #[test]
    fn rejects_illegal_move() {
        let pgn = "[Event \"Test\"]\n\n1. e5 *\n";
        assert!(parse_pgn(pgn).is_err());
    }
}
