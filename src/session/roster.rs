//! Seating a roster.

use rustc_hash::FxHashSet;

use crate::core::{Player, MAX_PLAYERS, MIN_PLAYERS};
use crate::error::RosterError;

/// Validate a roster and put it in seat order.
///
/// Tables seat 2-4 players with unique ids. When bots are present every
/// human is seated first, in join order, followed by the bots; a bot table
/// without a human is refused. Human-only rosters keep their order.
pub fn seat_roster(players: Vec<Player>) -> Result<Vec<Player>, RosterError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
        return Err(RosterError::PlayerCount(players.len()));
    }

    let mut seen = FxHashSet::default();
    for player in &players {
        if !seen.insert(player.id()) {
            return Err(RosterError::DuplicatePlayer(player.id().clone()));
        }
    }

    if !players.iter().any(Player::is_bot) {
        return Ok(players);
    }

    let (humans, bots): (Vec<_>, Vec<_>) = players.into_iter().partition(|p| !p.is_bot());
    if humans.is_empty() {
        return Err(RosterError::NoHuman);
    }

    Ok(humans.into_iter().chain(bots).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;

    #[test]
    fn test_humans_seated_before_bots() {
        let seated = seat_roster(vec![
            Player::bot("b1", "Robo", Difficulty::Easy),
            Player::human("h1", "Hana"),
            Player::bot("b2", "Unit", Difficulty::Hard),
            Player::human("h2", "Ivo"),
        ])
        .unwrap();

        let ids: Vec<_> = seated.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["h1", "h2", "b1", "b2"]);
    }

    #[test]
    fn test_human_order_kept() {
        let seated = seat_roster(vec![Player::human("z", "Zed"), Player::human("a", "Ann")]).unwrap();
        assert_eq!(seated[0].id().as_str(), "z");
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            seat_roster(vec![Player::human("a", "Ann")]),
            Err(RosterError::PlayerCount(1))
        );
        assert_eq!(
            seat_roster(vec![Player::human("a", "Ann"), Player::human("a", "Ann again")]),
            Err(RosterError::DuplicatePlayer("a".into()))
        );
        assert_eq!(
            seat_roster(vec![
                Player::bot("b1", "Robo", Difficulty::Easy),
                Player::bot("b2", "Unit", Difficulty::Easy),
            ]),
            Err(RosterError::NoHuman)
        );
    }
}
