pub mod driver;
pub mod pool;
pub mod uci;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use driver::{EngineDriver, EngineDriverConfig};
pub use pool::EnginePool;
pub use uci::{UciError, UciMessage};

use chess::Score;
use cozy_chess::Move;
use std::time::Duration;

/// Default per-engine-call timeout before the driver is declared broken.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Commands sent to the engine subprocess.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    SetPosition { fen: String, moves: Vec<Move> },
    SetOption { name: String, value: Option<String> },
    Go(GoParams),
    Stop,
    Quit,
}

/// Parameters for the "go" command.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub depth: Option<u8>,
    pub multipv: Option<u8>,
    pub infinite: bool,
}

/// Events received from the engine subprocess.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Ready,
    BestMove(Move),
    Info(EngineInfo),
    Error(String),
    RawUciMessage {
        direction: UciMessageDirection,
        message: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum UciMessageDirection {
    ToEngine,
    FromEngine,
}

/// One `info` line's content.
#[derive(Debug, Clone, Default)]
pub struct EngineInfo {
    pub depth: Option<u8>,
    pub seldepth: Option<u8>,
    pub time_ms: Option<u64>,
    pub nodes: Option<u64>,
    pub score: Option<Score>,
    pub pv: Vec<Move>,
    pub multipv: Option<u8>,
    pub currmove: Option<Move>,
    pub hashfull: Option<u16>,
    pub nps: Option<u64>,
}

/// One candidate line returned by `EngineDriver::analyze`, ordered by
/// multipv rank (rank 1 is the engine's best line). Scores are already
/// normalized to white-perspective centipawns at this boundary, per the
/// driver's contract invariant; `is_mate` is preserved separately from the
/// clamped arithmetic value.
#[derive(Debug, Clone)]
pub struct Variation {
    pub rank: u8,
    pub white_cp: i32,
    pub is_mate: bool,
    /// Principal variation in UCI notation, best move first.
    pub pv: Vec<String>,
}

impl Variation {
    pub fn best_move_uci(&self) -> Option<&str> {
        self.pv.first().map(String::as_str)
    }
}

/// Error kinds surfaced by the Engine Driver and Engine Pool. `retryable`
/// distinguishes transport failures the pool can recover from by replacing
/// the subprocess from failures that are meaningless to retry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("engine subprocess failed to spawn: {0}")]
    Spawn(String),
    #[error("engine subprocess exited unexpectedly")]
    ProcessExited,
    #[error("engine response timed out")]
    Timeout,
    #[error("engine channel closed")]
    ChannelClosed,
    #[error("UCI protocol error: {0}")]
    Protocol(#[from] UciError),
    #[error("engine driver is broken and awaiting replacement")]
    Broken,
}

impl EngineError {
    /// Transport failures (process death, timeout, channel closure) are
    /// retryable by the caller after the pool replaces the driver; protocol
    /// errors are not, since retrying would reproduce the same malformed
    /// exchange.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ProcessExited | Self::Timeout | Self::ChannelClosed | Self::Broken
        )
    }
}
