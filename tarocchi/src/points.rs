//! Manage card values and scores

use super::cards::{Card, Deck, Suit};

/// Value of the cards the asking player may request: trumps 1 and 21, and the kings.
pub const REQUEST_VALUE: i32 = 13;

/// Returns the number of points `card` is worth
pub fn value(card: Card) -> i32 {
    let rank = card.rank() as i32;
    match card.suit() {
        Suit::Trump => match rank {
            0 => 12,
            1 | 21 => 13,
            _ => 1,
        },
        _ if rank > 10 => (rank - 9) * 3 - 2,
        _ => 1,
    }
}

/// Sum of the values of `cards`.
pub fn total<'a, I>(cards: I) -> i32
where
    I: IntoIterator<Item = &'a Card>,
{
    cards.into_iter().map(|c| value(*c)).sum()
}

/// Cards worth [`REQUEST_VALUE`], in deck order.
pub fn request_candidates() -> Vec<Card> {
    Deck::new()
        .list()
        .iter()
        .filter(|c| value(**c) == REQUEST_VALUE)
        .copied()
        .collect()
}

/// Converts won points into a score, a third of what is left once the debt is paid.
pub fn score_delta(won_value: i32, debt: i32) -> i32 {
    (f64::from(won_value - debt) / 3.0).round() as i32
}
