//! Test-only UCI engine double. Generates a tiny shell script that speaks
//! just enough UCI to drive `EngineDriver` through its full spawn/analyze/
//! shutdown path without a real engine binary on the test machine.

use crate::driver::EngineDriverConfig;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use tempfile::NamedTempFile;

/// One scripted reply: the `bestmove` uci returns and the matching `info`
/// line's score, in centipawns from the side-to-move's perspective (the
/// script doesn't know whose turn it is, so callers pick values already
/// appropriate to the position under test).
pub struct FakeResponse {
    pub best_move: String,
    pub score_cp: i32,
    pub depth: u8,
}

impl FakeResponse {
    pub fn new(best_move: impl Into<String>, score_cp: i32) -> Self {
        Self {
            best_move: best_move.into(),
            score_cp,
            depth: 12,
        }
    }
}

/// Builds an `EngineDriverConfig` whose `binary_path` points at a generated
/// script that always answers with `response`, regardless of the position
/// or search parameters it's asked about. Good enough for exercising the
/// pool/driver plumbing; not a stand-in for real evaluation quality.
pub struct FakeEngine {
    _script: NamedTempFile,
}

impl FakeEngine {
    pub fn config(response: FakeResponse) -> (Self, EngineDriverConfig) {
        let script_body = format!(
            "#!/bin/sh\nwhile read -r line; do\n  case \"$line\" in\n    uci) echo 'id name fake'; echo uciok ;;\n    isready) echo readyok ;;\n    go*) echo 'info depth {depth} score cp {score} pv {mv}'; echo 'bestmove {mv}' ;;\n    quit) exit 0 ;;\n    *) ;;\n  esac\ndone\n",
            depth = response.depth,
            score = response.score_cp,
            mv = response.best_move,
        );

        let mut file = NamedTempFile::new().expect("create fake engine script");
        file.write_all(script_body.as_bytes()).expect("write fake engine script");
        file.flush().expect("flush fake engine script");
        let mut perms = file.as_file().metadata().expect("script metadata").permissions();
        perms.set_mode(0o755);
        file.as_file().set_permissions(perms).expect("chmod fake engine script");

        let config = EngineDriverConfig {
            binary_path: Some(file.path().to_path_buf()),
            skill_level: None,
            threads: None,
            hash_mb: None,
            label: Some("fake".to_string()),
        };
        (Self { _script: file }, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::EngineDriver;
    use std::time::Duration;

    #[tokio::test]
    async fn fake_engine_answers_a_go_request() {
        let (_fake, config) = FakeEngine::config(FakeResponse::new("e2e4", 35));
        let mut driver = EngineDriver::spawn(config).await.expect("spawn fake engine");

        let variations = driver
            .analyze(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                &[],
                10,
                1,
                Duration::from_secs(2),
            )
            .await
            .expect("analyze against fake engine");

        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].white_cp, 35);
        assert_eq!(variations[0].best_move_uci(), Some("e2e4"));

        driver.shutdown().await;
    }
}
