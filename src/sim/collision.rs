//! Swept collision tests between the player and pads
//!
//! Pads are only 10 units thick while a falling player can cover 20+ units
//! per tick, so overlap tests would tunnel. Instead each test compares one
//! edge of the player at the previous and current tick against a pad edge
//! and reports a hit when the edge crossed it.

use super::state::{Pad, Player};

/// Player's bottom edge crossed the pad's top edge while falling
pub fn lands_on(player: &Player, pad: &Pad) -> bool {
    if player.vel_y <= 0.0 {
        return false;
    }
    let top = pad.top();
    player.prev_bottom() <= top && player.bottom() >= top && overlaps_x(player, pad)
}

/// Player's top edge crossed a spike pad's bottom edge while rising
pub fn strikes_spike_from_below(player: &Player, pad: &Pad) -> bool {
    if !pad.kind.is_spike() || player.vel_y >= 0.0 {
        return false;
    }
    let bottom = pad.bottom();
    player.prev_top() >= bottom && player.top() <= bottom && overlaps_x(player, pad)
}

/// Narrowed hitbox against the full pad width
fn overlaps_x(player: &Player, pad: &Pad) -> bool {
    let (left, right) = player.hitbox_x();
    left < pad.right() && right > pad.left()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::PadKind;
    use glam::Vec2;

    /// Player whose center moved from `prev_y` to `y` this tick
    fn player_moving(x: f32, prev_y: f32, y: f32) -> Player {
        let mut player = Player::new(Vec2::new(x, y));
        player.prev_pos = Vec2::new(x, prev_y);
        player.vel_y = y - prev_y;
        player
    }

    #[test]
    fn test_landing_crossing() {
        let pad = Pad::new(100.0, 400.0, PadKind::Normal);
        // Bottom edge goes 395 -> 403
        let player = player_moving(140.0, 375.0, 383.0);
        assert!(lands_on(&player, &pad));
    }

    #[test]
    fn test_landing_catches_fast_fall() {
        let pad = Pad::new(100.0, 400.0, PadKind::Normal);
        // Bottom edge jumps from 390 to 440, entirely past the 10-unit pad
        let player = player_moving(140.0, 370.0, 420.0);
        assert!(lands_on(&player, &pad));
    }

    #[test]
    fn test_no_landing_while_rising() {
        let pad = Pad::new(100.0, 400.0, PadKind::Normal);
        let player = player_moving(140.0, 383.0, 375.0);
        assert!(!lands_on(&player, &pad));
    }

    #[test]
    fn test_no_landing_when_already_below() {
        let pad = Pad::new(100.0, 400.0, PadKind::Normal);
        let player = player_moving(140.0, 385.0, 395.0);
        assert!(!lands_on(&player, &pad));
    }

    #[test]
    fn test_landing_uses_narrow_hitbox() {
        let pad = Pad::new(100.0, 400.0, PadKind::Normal);
        // Sprite edge (x - 20) overlaps the pad, hitbox (x - 10) does not
        let player = player_moving(PAD_WIDTH + 100.0 + 15.0, 375.0, 383.0);
        assert!(!lands_on(&player, &pad));
        let player = player_moving(PAD_WIDTH + 100.0 + 9.0, 375.0, 383.0);
        assert!(lands_on(&player, &pad));
    }

    #[test]
    fn test_spike_from_below() {
        let pad = Pad::new(100.0, 200.0, PadKind::Spike);
        // Top edge goes 215 -> 205, spike bottom at 210
        let player = player_moving(140.0, 235.0, 225.0);
        assert!(strikes_spike_from_below(&player, &pad));
    }

    #[test]
    fn test_spike_from_below_ignores_other_kinds() {
        let player = player_moving(140.0, 235.0, 225.0);
        for kind in [PadKind::Normal, PadKind::Fake] {
            let pad = Pad::new(100.0, 200.0, kind);
            assert!(!strikes_spike_from_below(&player, &pad));
        }
    }

    #[test]
    fn test_spike_from_below_requires_rising() {
        let pad = Pad::new(100.0, 200.0, PadKind::Spike);
        let player = player_moving(140.0, 225.0, 235.0);
        assert!(!strikes_spike_from_below(&player, &pad));
    }

    #[test]
    fn test_spike_top_is_a_landing() {
        let pad = Pad::new(100.0, 400.0, PadKind::Spike);
        let player = player_moving(140.0, 375.0, 383.0);
        assert!(lands_on(&player, &pad));
        assert!(!strikes_spike_from_below(&player, &pad));
    }
}
