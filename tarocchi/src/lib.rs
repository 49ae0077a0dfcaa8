//! Models a game of tarocchi, a trick-taking game played with a 78-card tarot deck.
//!
//! Here is a simple example:
//!
//! ```rust
//! use tarocchi::game::{Game, Seat};
//! use tarocchi::rules::Rules;
//! use tarocchi::strategy::{RandomStrategy, Strategy};
//!
//! fn main() {
//!     // Three bots, each with its own seeded strategy
//!     let seats = (0..3)
//!         .map(|i| {
//!             let strategy: Box<dyn Strategy> = Box::new(RandomStrategy::seeded([i; 32]));
//!             Seat::new(format!("bot{}", i), strategy)
//!         })
//!         .collect();
//!
//!     let mut game = Game::new_seeded(seats, Rules::default(), [42; 32]).unwrap();
//!
//!     // Deal, claim the prize, form teams, play every trick and score
//!     let result = game.run().unwrap();
//!
//!     // Whatever the asking player wins, the others lose
//!     assert_eq!(result.deltas.iter().sum::<i32>(), 0);
//! }
//! ```

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod cards;
pub mod game;
pub mod player;
pub mod points;
pub mod pos;
pub mod rules;
pub mod strategy;
pub mod team;
pub mod trick;

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 5;

/// Cards dealt to each player per batch, after the initial hands.
pub const HAND_BATCH: usize = 5;

pub fn prize_size(players_count: usize) -> usize {
    match players_count {
        4 => 2,
        _ => 3,
    }
}

pub fn initial_hand_size(players_count: usize) -> usize {
    match players_count {
        4 => 4,
        _ => 5,
    }
}

/// Shuffles a full deck and deals it to `count` players.
///
/// The prize is set aside first, then each player gets an initial hand, then
/// batches of 5 cards until the deck is empty. A batch the deck cannot fill is
/// cut short.
pub fn deal_hands<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
) -> Result<(Vec<cards::Hand>, cards::Hand), game::GameError> {
    if count < MIN_PLAYERS || count > MAX_PLAYERS {
        return Err(game::GameError::InvalidPlayerCount(count));
    }

    let mut d = cards::Deck::new();
    d.shuffle(rng);

    let prize = d.draw_hand(prize_size(count));
    let mut hands = vec![cards::Hand::new(); count];
    for hand in hands.iter_mut() {
        hand.merge(&d.draw_hand(initial_hand_size(count)));
    }

    while !d.is_empty() {
        for (n, hand) in hands.iter_mut().enumerate() {
            if d.len() < HAND_BATCH {
                debug!("player {} only gets {} cards", n, d.len());
            }
            hand.merge(&d.draw_hand(HAND_BATCH));
        }
    }

    Ok((hands, prize))
}

/// Deal cards for players deterministically.
pub fn deal_seeded_hands(
    seed: [u8; 32],
    count: usize,
) -> Result<(Vec<cards::Hand>, cards::Hand), game::GameError> {
    let mut rng = StdRng::from_seed(seed);
    deal_hands(&mut rng, count)
}
