//! Teams formed once the asking player has requested a card.

use serde::{Deserialize, Serialize};

use super::cards::Hand;
use super::player::Player;
use super::pos::PlayerPos;
use super::rules::Rules;

/// Players sharing the cards they win.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    members: Vec<PlayerPos>,
    won: Hand,
}

impl Team {
    /// Creates a team.
    ///
    /// # Panics
    ///
    /// If `members` is empty.
    pub fn new(members: Vec<PlayerPos>) -> Self {
        assert!(!members.is_empty(), "a team needs at least one player");
        Team {
            members,
            won: Hand::new(),
        }
    }

    pub fn solo(member: PlayerPos) -> Self {
        Team::new(vec![member])
    }

    pub fn members(&self) -> &[PlayerPos] {
        &self.members
    }

    pub fn has_player(&self, pos: PlayerPos) -> bool {
        self.members.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Cards won by the team, as of the last [`Team::aggregate`].
    pub fn won(&self) -> &Hand {
        &self.won
    }

    pub fn value(&self) -> i32 {
        self.won.value()
    }

    /// Returns `true` if the asking player is in this team.
    pub fn is_asking(&self, players: &[Player]) -> bool {
        self.members.iter().any(|p| players[p.to_n()].is_asking())
    }

    /// Adds the cards won by every member to the team pool.
    pub fn aggregate(&mut self, players: &[Player]) {
        for pos in &self.members {
            self.won.merge(players[pos.to_n()].won());
        }
    }

    /// Gives every member their own copy of the team pool.
    pub fn distribute(&self, players: &mut [Player]) {
        for pos in &self.members {
            players[pos.to_n()].set_won(self.won.clone());
        }
    }

    pub fn set_debts(&self, players: &mut [Player], rules: &Rules) {
        for pos in &self.members {
            let player = &mut players[pos.to_n()];
            let debt = debt(player, rules);
            player.set_debt(debt);
        }
    }
}

/// The debt a player must cover before scoring, set by their role.
pub fn debt(player: &Player, rules: &Rules) -> i32 {
    rules.debt(player.is_asking())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Suit, FOOL};

    fn players() -> Vec<Player> {
        let mut players: Vec<Player> = (0..3).map(|i| Player::new(format!("p{}", i))).collect();
        players[0].set_asking(true);
        players[0].add_won(vec![FOOL, Card::new(Suit::Cup, 14)]);
        players[1].add_won(vec![Card::new(Suit::Trump, 21)]);
        players[2].add_won(vec![Card::new(Suit::Spade, 3)]);
        players
    }

    #[test]
    fn test_aggregate_and_distribute() {
        let mut players = players();
        let mut team = Team::new(vec![PlayerPos::new(0, 3), PlayerPos::new(1, 3)]);
        team.aggregate(&players);
        assert_eq!(team.won().len(), 3);
        assert_eq!(team.value(), 12 + 13 + 13);
        // Members keep their own pools until distribution
        assert_eq!(players[1].won().len(), 1);

        team.distribute(&mut players);
        assert_eq!(players[0].won(), team.won());
        assert_eq!(players[1].won(), team.won());
        assert_eq!(players[2].won().len(), 1);

        // Copies, not shared pools
        players[0].add_won(vec![Card::new(Suit::Club, 2)]);
        assert_eq!(players[0].won().len(), 4);
        assert_eq!(players[1].won().len(), 3);
        assert_eq!(team.won().len(), 3);
    }

    #[test]
    fn test_aggregate_twice() {
        let players = players();
        let mut team = Team::new(vec![PlayerPos::new(0, 3), PlayerPos::new(2, 3)]);
        team.aggregate(&players);
        team.aggregate(&players);
        assert_eq!(team.won().len(), 3);
    }

    #[test]
    fn test_debts() {
        let mut players = players();
        let rules = Rules::default();
        let asking = Team::solo(PlayerPos::new(0, 3));
        let others = Team::new(vec![PlayerPos::new(1, 3), PlayerPos::new(2, 3)]);
        asking.set_debts(&mut players, &rules);
        others.set_debts(&mut players, &rules);
        assert_eq!(players[0].debt(), 63);
        assert_eq!(players[1].debt(), 57);
        assert_eq!(players[2].debt(), 57);
        assert!(asking.is_asking(&players));
        assert!(!others.is_asking(&players));
        assert!(others.has_player(PlayerPos::new(2, 3)));
        assert_eq!(others.len(), 2);
    }

    #[test]
    #[should_panic]
    fn test_empty_team() {
        Team::new(vec![]);
    }
}
