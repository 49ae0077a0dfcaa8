//! Decisions a player makes during a game.
//!
//! The game only checks and applies choices; picking them is left to a
//! [`Strategy`], which can be random, scripted or driven by a human.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::cards::{Card, Hand, FOOL};

/// The choices a player makes.
pub trait Strategy {
    /// Names any card of the deck (used to request a partner's card).
    fn choose_any_card(&mut self) -> Card;

    /// Picks a card of `hand`, to play, give or discard.
    ///
    /// `None` lets the game decide.
    fn choose_from_hand(&mut self, hand: &Hand) -> Option<Card>;

    /// Whether to claim the prize, knowing the dealt `hand`.
    fn accept_prize(&mut self, hand: &Hand) -> bool;
}

/// Picks uniformly at random.
pub struct RandomStrategy {
    rng: StdRng,
    accept_probability: f64,
}

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy::from_rng(StdRng::from_entropy())
    }

    /// A strategy whose choices are determined by the seed.
    pub fn seeded(seed: [u8; 32]) -> Self {
        RandomStrategy::from_rng(StdRng::from_seed(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        RandomStrategy {
            rng,
            accept_probability: 0.5,
        }
    }

    /// Sets how likely the prize is claimed.
    ///
    /// # Panics
    ///
    /// If `p` is not in `[0, 1]`.
    pub fn with_accept_probability(mut self, p: f64) -> Self {
        assert!((0.0..=1.0).contains(&p), "invalid probability: {}", p);
        self.accept_probability = p;
        self
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        RandomStrategy::new()
    }
}

impl Strategy for RandomStrategy {
    fn choose_any_card(&mut self) -> Card {
        Card::random(&mut self.rng)
    }

    fn choose_from_hand(&mut self, hand: &Hand) -> Option<Card> {
        hand.list().choose(&mut self.rng).copied()
    }

    fn accept_prize(&mut self, _hand: &Hand) -> bool {
        self.rng.gen_bool(self.accept_probability)
    }
}

/// Replays prepared answers, in order.
///
/// When a queue runs dry: the Fool is requested (never a valid request),
/// hand choices are left to the game, and the prize is declined.
#[derive(Clone, Debug, Default)]
pub struct ScriptedStrategy {
    requests: VecDeque<Card>,
    picks: VecDeque<Card>,
    accepts: VecDeque<bool>,
}

impl ScriptedStrategy {
    pub fn new() -> Self {
        ScriptedStrategy::default()
    }

    /// Answers for [`Strategy::choose_any_card`].
    pub fn requesting<I: IntoIterator<Item = Card>>(mut self, cards: I) -> Self {
        self.requests.extend(cards);
        self
    }

    /// Answers for [`Strategy::choose_from_hand`].
    pub fn picking<I: IntoIterator<Item = Card>>(mut self, cards: I) -> Self {
        self.picks.extend(cards);
        self
    }

    /// Answers for [`Strategy::accept_prize`].
    pub fn accepting<I: IntoIterator<Item = bool>>(mut self, answers: I) -> Self {
        self.accepts.extend(answers);
        self
    }
}

impl Strategy for ScriptedStrategy {
    fn choose_any_card(&mut self) -> Card {
        self.requests.pop_front().unwrap_or(FOOL)
    }

    fn choose_from_hand(&mut self, _hand: &Hand) -> Option<Card> {
        self.picks.pop_front()
    }

    fn accept_prize(&mut self, _hand: &Hand) -> bool {
        self.accepts.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Deck, Suit};

    #[test]
    fn test_random_strategy() {
        let mut strategy = RandomStrategy::seeded([1; 32]);
        let hand: Hand = Deck::new().list()[..10].iter().copied().collect();
        for _ in 0..50 {
            let card = strategy.choose_from_hand(&hand).unwrap();
            assert!(hand.has(card));
        }
        assert_eq!(strategy.choose_from_hand(&Hand::new()), None);
    }

    #[test]
    fn test_accept_probability() {
        let mut always = RandomStrategy::seeded([2; 32]).with_accept_probability(1.0);
        let mut never = RandomStrategy::seeded([2; 32]).with_accept_probability(0.0);
        for _ in 0..20 {
            assert!(always.accept_prize(&Hand::new()));
            assert!(!never.accept_prize(&Hand::new()));
        }
    }

    #[test]
    fn test_scripted_strategy() {
        let king = Card::new(Suit::Cup, 14);
        let mut strategy = ScriptedStrategy::new()
            .requesting(vec![king])
            .picking(vec![FOOL])
            .accepting(vec![true]);
        assert_eq!(strategy.choose_any_card(), king);
        assert_eq!(strategy.choose_any_card(), FOOL);
        assert_eq!(strategy.choose_from_hand(&Hand::new()), Some(FOOL));
        assert_eq!(strategy.choose_from_hand(&Hand::new()), None);
        assert!(strategy.accept_prize(&Hand::new()));
        assert!(!strategy.accept_prize(&Hand::new()));
    }
}
