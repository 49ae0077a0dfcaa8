//! This module represents the 78-cards tarocchi system: suits, cards, hands and decks.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use super::points;

/// Error raised when reading the card notation.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum NotationError {
    /// The suit letter is not one of `t`, `s`, `o`, `c`, `u`.
    #[error("invalid notation: unknown suit code {0:?}")]
    UnknownSuit(char),
    /// The rank does not exist in the suit.
    #[error("invalid notation: no rank {rank} in {suit}")]
    InvalidRank { suit: Suit, rank: u8 },
    /// The text does not follow the notation grammar.
    #[error("invalid notation: {0:?}")]
    Malformed(String),
}

/// One of the five suits, in their fixed order.
///
/// The order is `Trump < Spade < Coin < Club < Cup`.
#[derive(
    EnumIter, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize,
)]
pub enum Suit {
    /// The 22 permanent trumps, ranked 0 to 21.
    Trump,
    /// The suit of spades.
    Spade,
    /// The suit of coins.
    Coin,
    /// The suit of clubs.
    Club,
    /// The suit of cups.
    Cup,
}

impl Suit {
    /// Returns the suit corresponding to the number:
    ///
    /// * `0` -> Trump
    /// * `1` -> Spade
    /// * `2` -> Coin
    /// * `3` -> Club
    /// * `4` -> Cup
    ///
    /// # Panics
    ///
    /// If `n >= 5`.
    pub fn from_n(n: u32) -> Self {
        match n {
            0 => Suit::Trump,
            1 => Suit::Spade,
            2 => Suit::Coin,
            3 => Suit::Club,
            4 => Suit::Cup,
            other => panic!("bad suit number: {}", other),
        }
    }

    /// Returns the ordinal of the suit.
    pub fn to_n(self) -> usize {
        self as usize
    }

    pub fn is_trump(self) -> bool {
        self == Suit::Trump
    }

    /// Coins and cups rank their pip cards backwards: the 1 beats the 10.
    pub fn is_reversed(self) -> bool {
        matches!(self, Suit::Coin | Suit::Cup)
    }

    /// Ranks existing in this suit.
    pub fn ranks(self) -> RangeInclusive<u8> {
        match self {
            Suit::Trump => 0..=21,
            _ => 1..=14,
        }
    }

    /// Returns the letter used in the notation.
    pub fn notation(self) -> char {
        match self {
            Suit::Trump => 't',
            Suit::Spade => 's',
            Suit::Coin => 'o',
            Suit::Club => 'c',
            Suit::Cup => 'u',
        }
    }

    /// Reads a suit letter.
    pub fn from_notation(code: char) -> Result<Self, NotationError> {
        match code {
            't' => Ok(Suit::Trump),
            's' => Ok(Suit::Spade),
            'o' => Ok(Suit::Coin),
            'c' => Ok(Suit::Club),
            'u' => Ok(Suit::Cup),
            other => Err(NotationError::UnknownSuit(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Trump => "trumps",
            Suit::Spade => "spades",
            Suit::Coin => "coins",
            Suit::Club => "clubs",
            Suit::Cup => "cups",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suit {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, NotationError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Suit::from_notation(code),
            _ => Suit::iter()
                .find(|suit| suit.name() == s)
                .ok_or_else(|| NotationError::Malformed(s.to_owned())),
        }
    }
}

const TRUMP_NAMES: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "The Strength",
    "The Hermit",
    "The Wheel of Fortune",
    "The Justice",
    "The Hanged Man",
    "The Death",
    "The Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "The Judgement",
    "The World",
];

/// Represents a single card.
///
/// Cards are ordered by the hand order: trumps above everything else, then
/// suits by their ordinal, and inside a suit by rank, with the pip cards of
/// the reversed suits ranked backwards.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    suit: Suit,
    rank: u8,
}

// Unchecked form of a card, as it is read.
#[derive(Deserialize)]
struct RawCard {
    suit: Suit,
    rank: u8,
}

impl TryFrom<RawCard> for Card {
    type Error = NotationError;

    fn try_from(raw: RawCard) -> Result<Self, NotationError> {
        Card::try_new(raw.suit, raw.rank)
    }
}

/// The trump numbered 0, worth 12 points but unable to win a trick.
pub const FOOL: Card = Card {
    suit: Suit::Trump,
    rank: 0,
};

impl Card {
    /// Creates a card from the given suit and rank.
    ///
    /// # Panics
    ///
    /// If `rank` does not exist in `suit`.
    pub fn new(suit: Suit, rank: u8) -> Self {
        assert!(
            suit.ranks().contains(&rank),
            "invalid rank {} for {}",
            rank,
            suit
        );
        Card { suit, rank }
    }

    /// Creates a card, checking the rank against the suit.
    pub fn try_new(suit: Suit, rank: u8) -> Result<Self, NotationError> {
        if suit.ranks().contains(&rank) {
            Ok(Card { suit, rank })
        } else {
            Err(NotationError::InvalidRank { suit, rank })
        }
    }

    /// Draws any of the 78 cards uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let n: u8 = rng.gen_range(0, 78);
        if n < 22 {
            Card {
                suit: Suit::Trump,
                rank: n,
            }
        } else {
            let n = n - 22;
            Card {
                suit: Suit::from_n(1 + u32::from(n / 14)),
                rank: 1 + n % 14,
            }
        }
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn is_trump(self) -> bool {
        self.suit.is_trump()
    }

    pub fn is_fool(self) -> bool {
        self == FOOL
    }

    /// Knights, jacks, queens and kings of the four plain suits.
    pub fn is_figure(self) -> bool {
        !self.is_trump() && self.rank > 10
    }

    /// Returns the number of points the card is worth.
    pub fn value(self) -> i32 {
        points::value(self)
    }

    /// Returns the short notation of the card (ex: "5s").
    pub fn notation(self) -> String {
        format!("{}{}", self.rank, self.suit.notation())
    }

    /// Returns a descriptive name (ex: "Knight of coins", "The World").
    pub fn name(self) -> String {
        if self.is_trump() {
            return TRUMP_NAMES[self.rank as usize].to_owned();
        }
        match self.rank {
            1 => format!("Ace of {}", self.suit),
            11 => format!("Knight of {}", self.suit),
            12 => format!("Jack of {}", self.suit),
            13 => format!("Queen of {}", self.suit),
            14 => format!("King of {}", self.suit),
            n => format!("{} of {}", n, self.suit),
        }
    }

    // Trumps sit above the four plain suits, whose pips may count backwards.
    fn sort_key(self) -> (u8, u8) {
        match self.suit {
            Suit::Trump => (5, self.rank),
            suit if self.rank > 10 || !suit.is_reversed() => (suit as u8, self.rank),
            suit => (suit as u8, 11 - self.rank),
        }
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.notation())
    }
}

impl FromStr for Card {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, NotationError> {
        let text = s.trim();
        let mut chars = text.chars();
        let code = chars
            .next_back()
            .ok_or_else(|| NotationError::Malformed(s.to_owned()))?;
        let suit = Suit::from_notation(code)?;
        let rank = chars
            .as_str()
            .parse::<u8>()
            .map_err(|_| NotationError::Malformed(s.to_owned()))?;
        Card::try_new(suit, rank)
    }
}

/// Groups cards by suit, keeping their relative order.
pub fn group_by_suit<'a, I>(cards: I) -> BTreeMap<Suit, Vec<Card>>
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut groups: BTreeMap<Suit, Vec<Card>> = BTreeMap::new();
    for card in cards {
        groups.entry(card.suit()).or_default().push(*card);
    }
    groups
}

/// Writes cards as one `"<suit>:[<rank>, <rank>]"` line per non-empty suit.
pub fn notation<'a, I>(cards: I) -> String
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut text = String::new();
    for (suit, cards) in group_by_suit(cards) {
        let ranks: Vec<String> = cards.iter().map(|c| c.rank().to_string()).collect();
        text += &format!("{}:[{}]\n", suit.notation(), ranks.join(", "));
    }
    text
}

/// Reads cards written with [`notation`].
pub fn parse_notation(text: &str) -> Result<Vec<Card>, NotationError> {
    let mut cards = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let malformed = || NotationError::Malformed(line.to_owned());
        let mut parts = line.splitn(2, ':');
        let code = parts.next().map(str::trim).ok_or_else(malformed)?;
        let list = parts.next().map(str::trim).ok_or_else(malformed)?;

        let mut code_chars = code.chars();
        let suit = match (code_chars.next(), code_chars.next()) {
            (Some(c), None) => Suit::from_notation(c)?,
            _ => return Err(malformed()),
        };

        if !list.starts_with('[') || !list.ends_with(']') || list.len() < 2 {
            return Err(malformed());
        }
        let inner = &list[1..list.len() - 1];
        for rank in inner.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            let rank = rank.parse::<u8>().map_err(|_| malformed())?;
            cards.push(Card::try_new(suit, rank)?);
        }
    }
    Ok(cards)
}

/// Represents a set of cards, always sorted from the highest to the lowest.
///
/// Serialized as a plain list of cards, which is sorted and deduplicated when read back.
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Card>", into = "Vec<Card>")]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Returns an empty hand.
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    // Cards are kept in descending order.
    fn position(&self, card: Card) -> Result<usize, usize> {
        self.cards.binary_search_by(|c| card.cmp(c))
    }

    /// Add `card` to `self`.
    ///
    /// No effect if `self` already contains `card`.
    pub fn add(&mut self, card: Card) -> &mut Hand {
        if let Err(idx) = self.position(card) {
            self.cards.insert(idx, card);
        }
        self
    }

    pub fn add_all<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        for card in cards {
            self.add(card);
        }
    }

    /// Removes `card` from `self`.
    ///
    /// # Panics
    ///
    /// If `self` does not contain `card`: a card can only leave a pool it is in.
    pub fn remove(&mut self, card: Card) {
        match self.position(card) {
            Ok(idx) => {
                self.cards.remove(idx);
            }
            Err(_) => panic!("card {} is not in the hand", card),
        }
    }

    /// Remove all cards from `self`.
    pub fn clean(&mut self) {
        self.cards.clear();
    }

    /// Returns `true` if `self` contains `card`.
    pub fn has(&self, card: Card) -> bool {
        self.position(card).is_ok()
    }

    /// Returns `true` if the hand contains any card of the given suit.
    pub fn has_any(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit() == suit)
    }

    /// Returns `true` if `self` contains no card.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Returns the number of cards in `self`.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns the cards, highest first.
    pub fn list(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn cards_of_suit(&self, suit: Suit) -> Hand {
        self.cards
            .iter()
            .filter(|c| c.suit() == suit)
            .copied()
            .collect()
    }

    pub fn max_of_suit(&self, suit: Suit) -> Option<Card> {
        self.cards.iter().find(|c| c.suit() == suit).copied()
    }

    pub fn min_of_suit(&self, suit: Suit) -> Option<Card> {
        self.cards.iter().rev().find(|c| c.suit() == suit).copied()
    }

    /// Adds every card of `other`, skipping the ones already there.
    pub fn merge(&mut self, other: &Hand) {
        self.add_all(other.iter().copied());
    }

    /// Total points of the cards.
    pub fn value(&self) -> i32 {
        points::total(self.cards.iter())
    }

    pub fn group_by_suit(&self) -> BTreeMap<Suit, Vec<Card>> {
        group_by_suit(self.cards.iter())
    }

    pub fn notation(&self) -> String {
        notation(self.cards.iter())
    }

    pub fn from_notation(text: &str) -> Result<Self, NotationError> {
        Ok(parse_notation(text)?.into_iter().collect())
    }

    /// Moves `card_a` from `hand_a` to `hand_b` and `card_b` the other way.
    ///
    /// # Panics
    ///
    /// If either card is missing from its hand.
    pub fn exchange(hand_a: &mut Hand, hand_b: &mut Hand, card_a: Card, card_b: Card) {
        hand_a.remove(card_a);
        hand_b.remove(card_b);
        hand_a.add(card_b);
        hand_b.add(card_a);
    }
}

impl std::iter::FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut hand = Hand::new();
        hand.add_all(iter);
        hand
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        cards.into_iter().collect()
    }
}

impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.cards
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", cards.join(", "))
    }
}

/// A deck of cards.
#[derive(Clone, Debug, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}

impl Deck {
    /// Returns a full, sorted deck of 78 cards: trumps first, then each suit.
    pub fn new() -> Self {
        let mut d = Deck {
            cards: Vec::with_capacity(78),
        };

        for suit in Suit::iter() {
            for rank in suit.ranks() {
                d.cards.push(Card { suit, rank });
            }
        }

        d
    }

    pub fn empty() -> Self {
        Deck { cards: Vec::new() }
    }

    /// Shuffle this deck.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards[..].shuffle(rng);
    }

    /// Shuffle this deck with the given random seed.
    ///
    /// Result is determined by the seed.
    pub fn shuffle_seeded(&mut self, seed: [u8; 32]) {
        let mut rng = StdRng::from_seed(seed);
        self.shuffle(&mut rng);
    }

    /// Draw the top card from the deck.
    ///
    /// # Panics
    /// If `self` is empty.
    pub fn draw(&mut self) -> Card {
        self.cards.pop().expect("deck is empty")
    }

    /// Draws up to `n` cards; fewer when the deck runs out.
    pub fn draw_hand(&mut self, n: usize) -> Hand {
        let keep = self.cards.len().saturating_sub(n);
        self.cards.split_off(keep).into_iter().collect()
    }

    /// Returns `true` if this deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Returns the number of cards left in this deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn list(&self) -> &[Card] {
        &self.cards
    }

    pub fn has(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn value(&self) -> i32 {
        points::total(self.cards.iter())
    }

    pub fn notation(&self) -> String {
        notation(self.cards.iter())
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", cards.join(", "))
    }
}
