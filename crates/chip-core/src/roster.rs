//! Players seated at the table.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::money::{DEFAULT_BUY_IN, parse_amount_or, round_cents};
use crate::seat::SEAT_COUNT;

/// Maximum number of players seated at once.
pub const MAX_PLAYERS: usize = SEAT_COUNT as usize;

/// Unique player identifier. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Chip balance in dollars, always rounded to cents.
    pub chips: f64,
    /// Seat index in `0..SEAT_COUNT`.
    pub position: u8,
    /// Highlight flag for display.
    pub is_active: bool,
}

/// Reasons a roster operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// All seats are taken.
    #[error("table is full ({MAX_PLAYERS} players)")]
    TableFull,

    /// No seat index is free.
    #[error("no free seat")]
    NoFreeSeat,

    /// No player has this id.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

/// Players keyed by id.
///
/// Ids grow monotonically, so iteration order is creation order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: BTreeMap<PlayerId, Player>,
    /// Highest id ever handed out.
    last_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS || self.next_free_position().is_none()
    }

    /// Players in creation order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// The player sitting at `position`, if any.
    pub fn at_position(&self, position: u8) -> Option<&Player> {
        self.players.values().find(|p| p.position == position)
    }

    /// Smallest seat index not currently occupied.
    pub fn next_free_position(&self) -> Option<u8> {
        (0..SEAT_COUNT).find(|pos| self.at_position(*pos).is_none())
    }

    /// Sum of all chip balances.
    pub fn pot(&self) -> f64 {
        self.players.values().map(|p| p.chips).sum()
    }

    /// Seat a new player.
    ///
    /// A blank `name` becomes `"Player N"`, N being the seated count after
    /// this add. `buy_in` falls back to [`DEFAULT_BUY_IN`] when it does not
    /// parse. New players start inactive.
    pub fn add(&mut self, name: &str, buy_in: &str) -> Result<PlayerId, RosterError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(RosterError::TableFull);
        }
        let position = self.next_free_position().ok_or(RosterError::NoFreeSeat)?;

        let id = PlayerId(self.last_id + 1);
        let name = match name.trim() {
            "" => format!("Player {}", self.players.len() + 1),
            trimmed => trimmed.to_string(),
        };
        let player = Player {
            id,
            name,
            chips: parse_amount_or(buy_in, DEFAULT_BUY_IN),
            position,
            is_active: false,
        };

        tracing::debug!(id = id.0, name = %player.name, chips = player.chips, position, "player seated");
        self.last_id = id.0;
        self.players.insert(id, player);
        Ok(id)
    }

    /// The four-player table the tracker opens with.
    pub fn opening_table() -> Self {
        let mut roster = Self::new();
        for (name, chips, position, is_active) in [
            ("Player 1", 10.0, 0, true),
            ("Player 2", 20.0, 3, false),
            ("You", 15.0, 5, true),
            ("Player 4", 20.0, 7, true),
        ] {
            let id = PlayerId(roster.last_id + 1);
            roster.last_id = id.0;
            roster.players.insert(
                id,
                Player {
                    id,
                    name: name.to_string(),
                    chips,
                    position,
                    is_active,
                },
            );
        }
        roster
    }

    /// Remove a player, freeing their seat. The id is not handed out again.
    pub fn remove(&mut self, id: PlayerId) -> Result<Player, RosterError> {
        let player = self
            .players
            .remove(&id)
            .ok_or(RosterError::UnknownPlayer(id))?;
        tracing::debug!(id = id.0, name = %player.name, "player removed");
        Ok(player)
    }

    /// Update a player's name and chips.
    ///
    /// A blank `name` keeps the current name; an unparseable `buy_in` keeps
    /// the current chips.
    pub fn edit(&mut self, id: PlayerId, name: &str, buy_in: &str) -> Result<&Player, RosterError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(RosterError::UnknownPlayer(id))?;

        let name = name.trim();
        if !name.is_empty() {
            player.name = name.to_string();
        }
        player.chips = parse_amount_or(buy_in, player.chips);

        tracing::debug!(id = id.0, name = %player.name, chips = player.chips, "player edited");
        Ok(player)
    }

    /// Owned copy of the players in creation order.
    pub fn snapshot(&self) -> Vec<Player> {
        self.players.values().cloned().collect()
    }

    /// Chip total rounded to cents.
    pub fn rounded_pot(&self) -> f64 {
        round_cents(self.pot())
    }
}
