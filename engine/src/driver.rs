//! C2 Engine Driver: owns one engine subprocess speaking UCI over its
//! stdin/stdout line streams, and exposes the single blocking `analyze`
//! operation the rest of the pipeline needs.

use crate::uci::{format_uci_move, parse_uci_message, UciMessage};
use crate::{EngineCommand, EngineError, EngineEvent, GoParams, UciMessageDirection, Variation};
use cozy_chess::{Color, Move};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;

/// Tuning applied at spawn time via `setoption`.
#[derive(Debug, Clone, Default)]
pub struct EngineDriverConfig {
    pub binary_path: Option<PathBuf>,
    pub skill_level: Option<u8>,
    pub threads: Option<u32>,
    pub hash_mb: Option<u32>,
    pub label: Option<String>,
}

pub struct EngineDriver {
    process: Child,
    command_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    broken: bool,
    label: String,
}

impl EngineDriver {
    #[tracing::instrument(level = "info", skip(config), fields(label = config.label.as_deref().unwrap_or("engine")))]
    pub async fn spawn(config: EngineDriverConfig) -> Result<Self, EngineError> {
        let label = config.label.clone().unwrap_or_else(|| "engine".to_string());
        let path = resolve_engine_path(config.binary_path.as_deref())
            .ok_or_else(|| EngineError::Spawn("no engine binary found on PATH or configured path".into()))?;
        tracing::info!(label = %label, path = %path.display(), "spawning engine subprocess");

        let mut process = tokio::process::Command::new(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        let mut stdin = process.stdin.take().ok_or_else(|| EngineError::Spawn("no stdin".into()))?;
        let stdout = process.stdout.take().ok_or_else(|| EngineError::Spawn("no stdout".into()))?;

        stdin
            .write_all(b"uci\n")
            .await
            .map_err(|e| EngineError::Spawn(e.to_string()))?;
        stdin.flush().await.map_err(|e| EngineError::Spawn(e.to_string()))?;

        let (command_tx, mut command_rx) = mpsc::channel::<EngineCommand>(32);
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>(64);

        let reader_label = label.clone();
        let event_tx_reader = event_tx.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        tracing::warn!(label = %reader_label, "engine stdout closed");
                        let _ = event_tx_reader
                            .send(EngineEvent::Error("engine process closed stdout".into()))
                            .await;
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        tracing::trace!(label = %reader_label, "<< {}", trimmed);
                        let _ = event_tx_reader
                            .send(EngineEvent::RawUciMessage {
                                direction: UciMessageDirection::FromEngine,
                                message: trimmed.to_string(),
                            })
                            .await;
                        match parse_uci_message(trimmed) {
                            Ok(UciMessage::UciOk | UciMessage::ReadyOk) => {
                                let _ = event_tx_reader.send(EngineEvent::Ready).await;
                            }
                            Ok(UciMessage::BestMove { mv, .. }) => {
                                let _ = event_tx_reader.send(EngineEvent::BestMove(mv)).await;
                            }
                            Ok(UciMessage::Info(info)) => {
                                let _ = event_tx_reader.send(EngineEvent::Info(info)).await;
                            }
                            Ok(UciMessage::Id { .. }) => {}
                            Err(_) => {}
                        }
                    }
                    Err(e) => {
                        tracing::error!(label = %reader_label, "error reading engine stdout: {}", e);
                        let _ = event_tx_reader.send(EngineEvent::Error(e.to_string())).await;
                        break;
                    }
                }
            }
        });

        let mut event_rx = event_rx;
        tokio::time::timeout(Duration::from_secs(10), async {
            while let Some(event) = event_rx.recv().await {
                if matches!(event, EngineEvent::Ready) {
                    return Ok(());
                }
            }
            Err(EngineError::ProcessExited)
        })
        .await
        .map_err(|_| EngineError::Timeout)??;

        let (stdin_tx, mut stdin_rx) = mpsc::channel::<String>(32);
        tokio::spawn(async move {
            while let Some(cmd) = stdin_rx.recv().await {
                if stdin.write_all(cmd.as_bytes()).await.is_err() {
                    break;
                }
                if stdin.flush().await.is_err() {
                    break;
                }
            }
        });

        if let Some(level) = config.skill_level {
            let _ = stdin_tx
                .send(format!("setoption name Skill Level value {}\n", level))
                .await;
        }
        if let Some(threads) = config.threads {
            let threads = threads.clamp(1, 16);
            let _ = stdin_tx.send(format!("setoption name Threads value {}\n", threads)).await;
        }
        if let Some(hash_mb) = config.hash_mb {
            let hash_mb = hash_mb.clamp(1, 2048);
            let _ = stdin_tx.send(format!("setoption name Hash value {}\n", hash_mb)).await;
        }
        let _ = stdin_tx.send("isready\n".to_string()).await;

        let command_label = label.clone();
        tokio::spawn(async move {
            while let Some(cmd) = command_rx.recv().await {
                let cmd_str = render_command(cmd);
                tracing::trace!(label = %command_label, ">> {}", cmd_str.trim());
                let quitting = cmd_str.starts_with("quit");
                if stdin_tx.send(cmd_str).await.is_err() {
                    break;
                }
                if quitting {
                    break;
                }
            }
        });

        Ok(Self {
            process,
            command_tx,
            event_rx,
            broken: false,
            label,
        })
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Blocking analyze: set position, request `depth`/`multipv`, and collect
    /// the resulting variations until `bestmove` or `timeout` fires. Scores
    /// are normalized to white-perspective at this boundary.
    #[tracing::instrument(level = "debug", skip(self, moves), fields(label = %self.label, depth, multi_pv))]
    pub async fn analyze(
        &mut self,
        fen: &str,
        moves: &[Move],
        depth: u8,
        multi_pv: u8,
        timeout: Duration,
    ) -> Result<Vec<Variation>, EngineError> {
        if self.broken {
            return Err(EngineError::Broken);
        }
        let side_to_move = side_to_move_of(fen);

        self.send(EngineCommand::SetOption {
            name: "MultiPV".to_string(),
            value: Some(multi_pv.max(1).to_string()),
        })
        .await?;
        self.send(EngineCommand::SetPosition {
            fen: fen.to_string(),
            moves: moves.to_vec(),
        })
        .await?;
        self.send(EngineCommand::Go(GoParams {
            depth: Some(depth),
            multipv: Some(multi_pv),
            ..Default::default()
        }))
        .await?;

        let result = tokio::time::timeout(timeout, self.collect_until_bestmove(multi_pv, side_to_move)).await;
        match result {
            Ok(Ok(variations)) => Ok(variations),
            Ok(Err(e)) => {
                self.broken = true;
                Err(e)
            }
            Err(_) => {
                self.broken = true;
                Err(EngineError::Timeout)
            }
        }
    }

    async fn collect_until_bestmove(
        &mut self,
        multi_pv: u8,
        side_to_move: Color,
    ) -> Result<Vec<Variation>, EngineError> {
        use std::collections::BTreeMap;
        let mut by_rank: BTreeMap<u8, Variation> = BTreeMap::new();

        loop {
            match self.event_rx.recv().await {
                Some(EngineEvent::Info(info)) => {
                    let rank = info.multipv.unwrap_or(1);
                    if let Some(score) = info.score {
                        let pv = info.pv.iter().map(format_uci_move).collect();
                        by_rank.insert(
                            rank,
                            Variation {
                                rank,
                                white_cp: score.to_white_cp(side_to_move),
                                is_mate: score.is_mate(),
                                pv,
                            },
                        );
                    }
                }
                Some(EngineEvent::BestMove(mv)) => {
                    // Ensure rank 1 reflects the engine's final answer even if
                    // the last `info` line for it raced with `bestmove`.
                    by_rank.entry(1).or_insert_with(|| Variation {
                        rank: 1,
                        white_cp: 0,
                        is_mate: false,
                        pv: vec![format_uci_move(&mv)],
                    });
                    let mut variations: Vec<Variation> = by_rank.into_values().collect();
                    variations.sort_by_key(|v| v.rank);
                    variations.truncate(multi_pv.max(1) as usize);
                    return Ok(variations);
                }
                Some(EngineEvent::Error(msg)) => return Err(EngineError::Spawn(msg)),
                Some(EngineEvent::RawUciMessage { .. } | EngineEvent::Ready) => continue,
                None => return Err(EngineError::ChannelClosed),
            }
        }
    }

    /// Best-effort "stop" request; used when a caller cancels while holding
    /// the driver so the engine doesn't keep searching after it's released.
    pub async fn stop(&self) {
        let _ = self.send(EngineCommand::Stop).await;
    }

    async fn send(&self, cmd: EngineCommand) -> Result<(), EngineError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    pub async fn shutdown(mut self) {
        let _ = self.send(EngineCommand::Quit).await;
        let _ = tokio::time::timeout(Duration::from_secs(1), self.process.wait()).await;
        let _ = self.process.kill().await;
    }
}

fn render_command(cmd: EngineCommand) -> String {
    match cmd {
        EngineCommand::SetPosition { fen, moves } => {
            let mut s = format!("position fen {}", fen);
            if !moves.is_empty() {
                s.push_str(" moves");
                for mv in &moves {
                    s.push(' ');
                    s.push_str(&format_uci_move(mv));
                }
            }
            s.push('\n');
            s
        }
        EngineCommand::SetOption { name, value } => match value {
            Some(v) => format!("setoption name {} value {}\n", name, v),
            None => format!("setoption name {}\n", name),
        },
        EngineCommand::Go(params) => {
            let mut s = "go".to_string();
            if let Some(depth) = params.depth {
                s.push_str(&format!(" depth {}", depth));
            } else if let Some(movetime) = params.movetime {
                s.push_str(&format!(" movetime {}", movetime));
            } else if params.infinite {
                s.push_str(" infinite");
            } else {
                s.push_str(" movetime 1000");
            }
            s.push('\n');
            s
        }
        EngineCommand::Stop => "stop\n".to_string(),
        EngineCommand::Quit => "quit\n".to_string(),
    }
}

fn side_to_move_of(fen: &str) -> Color {
    match fen.split_whitespace().nth(1) {
        Some("b") => Color::Black,
        _ => Color::White,
    }
}

fn resolve_engine_path(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = configured {
        if p.exists() {
            return Some(p.to_path_buf());
        }
    }
    if let Ok(env_path) = std::env::var("CHESS_ANALYSIS_ENGINE_PATH") {
        let p = PathBuf::from(env_path);
        if p.exists() {
            return Some(p);
        }
    }
    let candidates = [
        "/usr/local/bin/stockfish",
        "/usr/bin/stockfish",
        "/opt/homebrew/bin/stockfish",
        "/usr/games/stockfish",
    ];
    for candidate in candidates {
        let path = Path::new(candidate);
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    if std::process::Command::new("stockfish").arg("--help").output().is_ok() {
        return Some(PathBuf::from("stockfish"));
    }
    None
}
