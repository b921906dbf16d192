//! Attract-mode steering
//!
//! Aims for the closest safe pad under the player's feet. Good enough to
//! keep a demo run alive for a while; it makes no attempt to dodge spikes.

use super::state::{Session, Steer};
use crate::consts::PLAYER_SPEED;

/// Horizontal distance treated as "on target"
const DEADZONE: f32 = PLAYER_SPEED;

/// Direction the autopilot would hold this tick
pub fn steer_for(session: &Session) -> Steer {
    let player = &session.player;
    let feet = player.bottom();

    let target = session
        .pads
        .iter()
        .filter(|p| !p.kind.is_fake() && p.top() >= feet)
        .min_by(|a, b| a.top().total_cmp(&b.top()));

    let Some(target) = target else {
        return Steer::Idle;
    };

    let dx = target.center_x() - player.pos.x;
    if dx > DEADZONE {
        Steer::Right
    } else if dx < -DEADZONE {
        Steer::Left
    } else {
        Steer::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Pad, PadKind, Player};
    use glam::Vec2;

    fn session_with(player_x: f32, pads: Vec<Pad>) -> Session {
        Session::with_layout(Player::new(Vec2::new(player_x, 200.0)), pads)
    }

    #[test]
    fn test_steers_toward_nearest_pad_below() {
        let pads = vec![
            Pad::new(20.0, 400.0, PadKind::Normal),
            Pad::new(280.0, 300.0, PadKind::Normal),
        ];
        assert_eq!(steer_for(&session_with(100.0, pads)), Steer::Right);
    }

    #[test]
    fn test_skips_fake_pads() {
        let pads = vec![
            Pad::new(280.0, 300.0, PadKind::Fake),
            Pad::new(0.0, 400.0, PadKind::Normal),
        ];
        assert_eq!(steer_for(&session_with(200.0, pads)), Steer::Left);
    }

    #[test]
    fn test_idle_when_on_target_or_nothing_below() {
        let pads = vec![Pad::new(60.0, 300.0, PadKind::Normal)];
        assert_eq!(steer_for(&session_with(100.0, pads)), Steer::Idle);

        let above = vec![Pad::new(60.0, 50.0, PadKind::Normal)];
        assert_eq!(steer_for(&session_with(300.0, above)), Steer::Idle);
    }
}
