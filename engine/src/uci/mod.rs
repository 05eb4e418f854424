pub mod parser;

pub use parser::{format_uci_move, parse_uci_message, parse_uci_move, UciMessage};

#[derive(Debug, Clone, thiserror::Error)]
pub enum UciError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("engine has no stdin")]
    NoStdin,
    #[error("engine has no stdout")]
    NoStdout,
    #[error("malformed UCI message: {0}")]
    MalformedMessage(String),
    #[error("unknown UCI message: {0}")]
    UnknownMessage(String),
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    #[error("invalid promotion: {0}")]
    InvalidPromotion(String),
}

impl From<std::io::Error> for UciError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
