//! A player: their hand, the cards they won and their score.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cards::{Card, Hand};
use super::points;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    hand: Hand,
    won: Hand,
    score: i32,
    debt: i32,
    asking: bool,
}

impl Player {
    /// Creates a player with a fresh, empty hand.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Player::with_hand(name, Hand::new())
    }

    pub fn with_hand<S: Into<String>>(name: S, hand: Hand) -> Self {
        Player {
            name: name.into(),
            hand,
            won: Hand::new(),
            score: 0,
            debt: 0,
            asking: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub(crate) fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    /// Cards won in tricks (and, for the asking player, the discarded ones).
    pub fn won(&self) -> &Hand {
        &self.won
    }

    pub(crate) fn add_won<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.won.add_all(cards);
    }

    pub(crate) fn set_won(&mut self, won: Hand) {
        self.won = won;
    }

    /// Points in the hand.
    pub fn value(&self) -> i32 {
        self.hand.value()
    }

    /// Points in the won cards.
    pub fn won_value(&self) -> i32 {
        self.won.value()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub(crate) fn add_score(&mut self, delta: i32) {
        self.score += delta;
    }

    pub fn debt(&self) -> i32 {
        self.debt
    }

    pub(crate) fn set_debt(&mut self, debt: i32) {
        self.debt = debt;
    }

    pub fn is_asking(&self) -> bool {
        self.asking
    }

    pub(crate) fn set_asking(&mut self, asking: bool) {
        self.asking = asking;
    }

    /// Replaces the hand and forgets won cards, before a new deal.
    pub(crate) fn take_deal(&mut self, hand: Hand) {
        self.hand = hand;
        self.won = Hand::new();
    }

    /// Adds the score earned with the won cards and returns it.
    pub(crate) fn update_score(&mut self) -> i32 {
        let delta = points::score_delta(self.won_value(), self.debt);
        self.score += delta;
        delta
    }

    pub fn notation(&self) -> String {
        format!("{}:\n{}", self.name, self.hand.notation())
    }

    /// Swaps `card_a` of `player_a` with `card_b` of `player_b`.
    ///
    /// # Panics
    ///
    /// If a card is not in its owner's hand.
    pub(crate) fn exchange(
        player_a: &mut Player,
        player_b: &mut Player,
        card_a: Card,
        card_b: Card,
    ) {
        Hand::exchange(&mut player_a.hand, &mut player_b.hand, card_a, card_b);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Suit, FOOL};

    #[test]
    fn test_fresh_players_do_not_share_hands() {
        let mut a = Player::new("a");
        let b = Player::new("b");
        a.hand_mut().add(FOOL);
        assert!(a.hand().has(FOOL));
        assert!(b.hand().is_empty());
    }

    #[test]
    fn test_update_score() {
        let mut player = Player::new("p");
        player.set_debt(57);
        player.add_won(vec![FOOL, Card::new(Suit::Trump, 1), Card::new(Suit::Trump, 21)]);
        player.add_won((1..=14).map(|r| Card::new(Suit::Cup, r)));
        // 38 + 44 = 82 points, 25 over the debt
        assert_eq!(player.won_value(), 82);
        assert_eq!(player.update_score(), 8);
        assert_eq!(player.score(), 8);
        assert_eq!(player.update_score(), 8);
        assert_eq!(player.score(), 16);
    }

    #[test]
    fn test_exchange() {
        let mut a = Player::with_hand("a", vec![FOOL].into_iter().collect());
        let mut b = Player::with_hand("b", vec![Card::new(Suit::Club, 14)].into_iter().collect());
        Player::exchange(&mut a, &mut b, FOOL, Card::new(Suit::Club, 14));
        assert!(a.hand().has(Card::new(Suit::Club, 14)));
        assert!(b.hand().has(FOOL));
    }

    #[test]
    fn test_notation() {
        let player = Player::with_hand(
            "alice",
            vec![Card::new(Suit::Spade, 5), FOOL].into_iter().collect(),
        );
        assert_eq!(player.notation(), "alice:\nt:[0]\ns:[5]\n");
        assert_eq!(player.to_string(), "alice");
    }
}
