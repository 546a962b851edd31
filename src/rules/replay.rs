//! Rebuild token positions from move history.

use crate::core::{GameState, MoveRecord, Player, SeatMap, TokenPosition, TOKENS_PER_PLAYER};
use crate::error::GameError;

/// Apply `history` to the starting layout of `roster`.
///
/// Each record must start where the token currently stands and each
/// captured token must be standing on the landing cell; otherwise the
/// index of the first diverging record is returned.
pub fn replay<'a>(
    roster: &[Player],
    history: impl IntoIterator<Item = &'a MoveRecord>,
) -> Result<SeatMap<[TokenPosition; TOKENS_PER_PLAYER]>, GameError> {
    let mut state = GameState::new(roster.to_vec());

    for (index, record) in history.into_iter().enumerate() {
        if record.seat.index() >= state.player_count()
            || state.position(record.seat, record.token) != record.from
        {
            return Err(GameError::ReplayMismatch { index });
        }
        state.place_token(record.seat, record.token, record.to);

        for victim in &record.captured {
            if victim.seat.index() >= state.player_count()
                || state.position(victim.seat, victim.token) != record.to
            {
                return Err(GameError::ReplayMismatch { index });
            }
            state.place_token(victim.seat, victim.token, TokenPosition::Home);
        }
    }

    Ok(state.positions())
}
