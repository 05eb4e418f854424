use cozy_chess::{Color, Piece};

use super::detector::{TacticalContext, TacticalDetector};
use super::helpers::piece_value;
use super::tactical_types::{TacticalEvidence, TacticalTag, TacticalTagKind};

/// Detects deflection: the move attacks a piece that is the sole defender of
/// a more valuable square or piece, so moving the defender away (or losing
/// it) must concede that second target.
pub struct DeflectionDetector;

impl TacticalDetector for DeflectionDetector {
    fn detect(&self, ctx: &TacticalContext) -> Vec<TacticalTag> {
        let Some(mv) = ctx.mv else { return vec![] };
        let perspective = ctx.side_to_move_before;
        let enemy = !perspective;

        // Our move captured a piece that, before the capture, was the sole
        // defender of some other enemy-held square.
        let defender_sq = mv.to;
        if !ctx.before.colors(enemy).has(defender_sq) || !ctx.after.colors(perspective).has(defender_sq) {
            return vec![];
        }
        let Some(defender_piece) = ctx.before.piece_on(defender_sq) else {
            return vec![];
        };

        // Find what else `defender_sq` was guarding before this move: a
        // friendly-to-enemy square whose only defender was this piece, and
        // which our side now attacks.
        for candidate in ctx.before.colors(enemy) {
            if candidate == defender_sq {
                continue;
            }
            let defenders_before: Vec<_> = ctx
                .before_attacks
                .attackers_of(candidate, enemy)
                .iter()
                .collect();
            let sole_defender = defenders_before.len() == 1 && defenders_before[0].from == defender_sq;
            if !sole_defender {
                continue;
            }
            let attacked_after = ctx.after_attacks.is_attacked(candidate, perspective);
            if !attacked_after {
                continue;
            }
            let Some(candidate_piece) = ctx.before.piece_on(candidate) else {
                continue;
            };
            if piece_value(candidate_piece) < piece_value(Piece::Knight) {
                continue;
            }

            return vec![TacticalTag {
                kind: TacticalTagKind::Deflection,
                attacker: Some(mv.to.to_string()),
                victims: vec![defender_sq.to_string(), candidate.to_string()],
                target_square: Some(candidate.to_string()),
                confidence: 0.7,
                note: Some(format!(
                    "deflecting {:?} off {} exposes {}",
                    defender_piece, defender_sq, candidate
                )),
                evidence: TacticalEvidence {
                    lines: vec![],
                    threatened_pieces: vec![candidate.to_string()],
                    defended_by: vec![],
                },
            }];
        }

        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_analysis::attack_map::AttackMap;
    use cozy_chess::{Board, Move, Square};

    #[test]
    fn detects_deflection_of_sole_defender() {
        // Black knight on d7 is the sole defender of the rook on b8 (d7-b8 is
        // a valid knight move). White queen captures the knight on d7; the
        // rook on b1 already controls the open b-file, so with the knight
        // gone b8 is undefended and attacked.
        let before: Board = "1r2k3/3n4/8/8/3Q4/8/8/1R2K3 w - - 0 1".parse().expect("valid fen");
        let after: Board = "1r2k3/3Q4/8/8/8/8/8/1R2K3 b - - 1 1".parse().expect("valid fen");

        let before_attacks = AttackMap::compute(&before);
        let after_attacks = AttackMap::compute(&after);

        let mv = Move {
            from: Square::D4,
            to: Square::D7,
            promotion: None,
        };

        let ctx = TacticalContext {
            before: &before,
            after: &after,
            mv: Some(mv),
            side_to_move_before: Color::White,
            before_attacks: &before_attacks,
            after_attacks: &after_attacks,
            eval_before: None,
            eval_after: None,
            best_line: None,
        };

        let tags = DeflectionDetector.detect(&ctx);
        assert!(
            tags.iter().any(|t| t.kind == TacticalTagKind::Deflection),
            "expected a deflection tag, got: {:?}",
            tags
        );
    }

    #[test]
    fn starting_position_has_no_deflection() {
        let board = Board::default();
        let attacks = AttackMap::compute(&board);
        let ctx = TacticalContext {
            before: &board,
            after: &board,
            mv: None,
            side_to_move_before: Color::White,
            before_attacks: &attacks,
            after_attacks: &attacks,
            eval_before: None,
            eval_after: None,
            best_line: None,
        };
        assert!(DeflectionDetector.detect(&ctx).is_empty());
    }
}
