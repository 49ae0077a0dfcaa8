//! This module implements a trick: which cards may be played, and who wins.

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cards::{Card, Hand, Suit};
use super::player::Player;
use super::points;
use super::pos::PlayerPos;

/// Reason a card cannot be played, or a trick cannot be read.
#[derive(Error, PartialEq, Debug, Clone, Copy)]
pub enum PlayError {
    /// A player tried to play a card they don't have
    #[error("you can only play cards you have")]
    CardMissing,
    /// A player tried to play the wrong suit, while they still have some
    #[error("wrong suit played")]
    IncorrectSuit,
    /// A player tried to discard a plain card, while they still have trumps
    #[error("you must use trumps")]
    TrumpRequired,
    /// The winner of a trick was asked before any card was played
    #[error("no card has been played in this trick")]
    EmptyTrick,
}

/// A card on the table, with when and by whom it was played.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub card: Card,
    /// Turn index inside the trick, starting at 0 for the lead.
    pub order: usize,
    pub owner: PlayerPos,
}

impl PlayedCard {
    pub fn new(card: Card, order: usize, owner: PlayerPos) -> Self {
        PlayedCard { card, order, owner }
    }

    /// Compares two plays of a trick led in `led`.
    ///
    /// The Fool is below everything, trumps beat plain cards, and the led suit
    /// beats the other plain suits. Two discards of different plain suits
    /// rank by play order, the earlier one lower. Everything else follows the
    /// hand order of the cards.
    pub fn cmp_in_trick(&self, other: &PlayedCard, led: Suit) -> Ordering {
        let (a, b) = (self.card, other.card);
        if a == b {
            return Ordering::Equal;
        }
        if a.is_fool() {
            return Ordering::Less;
        }
        if b.is_fool() {
            return Ordering::Greater;
        }
        match (a.is_trump(), b.is_trump()) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => (),
        }
        if a.suit() != b.suit() {
            if a.suit() == led {
                return Ordering::Greater;
            }
            if b.suit() == led {
                return Ordering::Less;
            }
            return self.order.cmp(&other.order);
        }
        a.cmp(&b)
    }
}

/// The cards currently on the table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trick {
    plays: Vec<PlayedCard>,
}

impl Trick {
    /// Creates a new, empty trick.
    pub fn new() -> Self {
        Trick { plays: Vec::new() }
    }

    /// Returns the starting suit for this trick.
    ///
    /// Returns `None` if the trick hasn't started yet.
    pub fn suit(&self) -> Option<Suit> {
        self.plays.first().map(|p| p.card.suit())
    }

    pub fn plays(&self) -> &[PlayedCard] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// Returns `true` once each of the `count` players has played.
    pub fn is_complete(&self, count: usize) -> bool {
        self.plays.len() == count
    }

    /// Returns the cards of the trick, in play order.
    pub fn cards(&self) -> Vec<Card> {
        self.plays.iter().map(|p| p.card).collect()
    }

    /// Returns the points value of this trick.
    pub fn points(&self) -> i32 {
        self.plays.iter().map(|p| points::value(p.card)).sum()
    }

    pub fn card_played(&self, pos: PlayerPos) -> Option<Card> {
        self.plays.iter().find(|p| p.owner == pos).map(|p| p.card)
    }

    /// Returns the player who played a card
    pub fn player_played(&self, card: Card) -> Option<PlayerPos> {
        self.plays.iter().find(|p| p.card == card).map(|p| p.owner)
    }

    /// Cards of `hand` that this trick would accept.
    pub fn legal_cards(&self, hand: &Hand) -> Vec<Card> {
        hand.iter()
            .copied()
            .filter(|c| can_play(*c, hand, self).is_ok())
            .collect()
    }

    /// Offers `card` from `player`, sitting at `owner`.
    ///
    /// Returns `true` if the card was accepted: it then left the player's hand
    /// and lies on the table. A refused card changes nothing, so offering it
    /// again is refused again.
    pub fn offer(&mut self, card: Card, player: &mut Player, owner: PlayerPos) -> bool {
        self.play_card(card, player, owner).is_ok()
    }

    /// Plays a card, telling why it was refused.
    pub fn play_card(
        &mut self,
        card: Card,
        player: &mut Player,
        owner: PlayerPos,
    ) -> Result<(), PlayError> {
        can_play(card, player.hand(), self)?;

        player.hand_mut().remove(card);
        let order = self.plays.len();
        debug!("{} plays {} ({})", player, card, card.name());
        self.plays.push(PlayedCard::new(card, order, owner));
        Ok(())
    }

    /// Suit the plays are ranked against.
    ///
    /// Same as [`Trick::suit`], except that a lead by the Fool hands it over to
    /// the first card played after it.
    pub fn ranking_suit(&self) -> Option<Suit> {
        self.plays
            .iter()
            .find(|p| !p.card.is_fool())
            .or_else(|| self.plays.first())
            .map(|p| p.card.suit())
    }

    /// Returns the play winning the trick so far.
    pub fn winner(&self) -> Result<&PlayedCard, PlayError> {
        let led = self.ranking_suit().ok_or(PlayError::EmptyTrick)?;
        self.plays
            .iter()
            .max_by(|a, b| a.cmp_in_trick(b, led))
            .ok_or(PlayError::EmptyTrick)
    }
}

/// Returns `Ok` if `hand` may play `card` on `trick`.
pub fn can_play(card: Card, hand: &Hand, trick: &Trick) -> Result<(), PlayError> {
    // First, we need the card to be able to play
    if !hand.has(card) {
        return Err(PlayError::CardMissing);
    }

    let starting_suit = match trick.suit() {
        Some(suit) => suit,
        None => return Ok(()),
    };

    let card_suit = card.suit();
    if card_suit != starting_suit {
        if hand.has_any(starting_suit) {
            return Err(PlayError::IncorrectSuit);
        }

        if card_suit != Suit::Trump && hand.has_any(Suit::Trump) {
            return Err(PlayError::TrumpRequired);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::FOOL;

    fn player(name: &str, cards: &[&str]) -> Player {
        let hand = cards.iter().map(|c| c.parse::<Card>().unwrap()).collect();
        Player::with_hand(name, hand)
    }

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_play_card() {
        let mut p0 = player("p0", &["7c", "9c", "3s", "18t"]);
        let mut p1 = player("p1", &["12c", "2c", "5s", "13t"]);
        let mut p2 = player("p2", &["4o", "8u", "2t", "9t"]);
        let mut p3 = player("p3", &["3o", "5o", "6u", "1u"]);
        let pos = |n| PlayerPos::new(n, 4);

        let mut trick = Trick::new();
        assert_eq!(trick.suit(), None);
        assert_eq!(trick.winner().err(), Some(PlayError::EmptyTrick));

        // Anything may lead
        assert!(trick.offer(card("7c"), &mut p0, pos(0)));
        assert_eq!(trick.suit(), Some(Suit::Club));
        assert!(!p0.hand().has(card("7c")));

        // Card missing
        assert_eq!(
            trick.play_card(card("8c"), &mut p1, pos(1)),
            Err(PlayError::CardMissing)
        );
        // Wrong suit while holding clubs, twice
        assert!(!trick.offer(card("5s"), &mut p1, pos(1)));
        assert!(!trick.offer(card("5s"), &mut p1, pos(1)));
        assert_eq!(
            trick.play_card(card("13t"), &mut p1, pos(1)),
            Err(PlayError::IncorrectSuit)
        );
        assert!(p1.hand().has(card("5s")));
        assert!(trick.offer(card("12c"), &mut p1, pos(1)));

        // No club, but trumps
        assert_eq!(
            trick.play_card(card("4o"), &mut p2, pos(2)),
            Err(PlayError::TrumpRequired)
        );
        assert!(trick.offer(card("2t"), &mut p2, pos(2)));

        // No club, no trump: free discard
        assert!(trick.offer(card("6u"), &mut p3, pos(3)));

        assert!(trick.is_complete(4));
        assert_eq!(trick.winner().unwrap().owner, pos(2));
        assert_eq!(trick.points(), 1 + 7 + 1 + 1);
        assert_eq!(trick.player_played(card("6u")), Some(pos(3)));
        assert_eq!(trick.card_played(pos(1)), Some(card("12c")));
    }

    #[test]
    fn test_legal_cards() {
        let mut leader = player("l", &["3o"]);
        let hand: Hand = ["5o", "12s", "4t"].iter().map(|c| card(c)).collect();
        let mut trick = Trick::new();
        assert_eq!(trick.legal_cards(&hand).len(), 3);
        assert!(trick.offer(card("3o"), &mut leader, PlayerPos::new(0, 3)));
        assert_eq!(trick.legal_cards(&hand), vec![card("5o")]);

        let no_coin: Hand = ["12s", "4t", "1t"].iter().map(|c| card(c)).collect();
        assert_eq!(trick.legal_cards(&no_coin), vec![card("4t"), card("1t")]);
    }

    fn trick_of(cards: &[&str]) -> Trick {
        let count = cards.len();
        let mut trick = Trick::new();
        for (n, c) in cards.iter().enumerate() {
            trick.plays.push(PlayedCard::new(card(c), n, PlayerPos::new(n, count)));
        }
        trick
    }

    fn winning_card(cards: &[&str]) -> Card {
        trick_of(cards).winner().unwrap().card
    }

    #[test]
    fn test_winner() {
        // Highest of the led suit
        assert_eq!(winning_card(&["5s", "9s", "2s"]), card("9s"));
        // Reversed suits: low pips win
        assert_eq!(winning_card(&["5o", "9o", "2o"]), card("2o"));
        assert_eq!(winning_card(&["7u", "1u", "3u"]), card("1u"));
        // Figures beat pips, in every suit
        assert_eq!(winning_card(&["1u", "11u", "3u"]), card("11u"));
        assert_eq!(winning_card(&["13o", "14o", "1o"]), card("14o"));
        // Discards never win
        assert_eq!(winning_card(&["3s", "14c", "13u"]), card("3s"));
        assert_eq!(winning_card(&["10o", "14s", "1o", "12u"]), card("1o"));
        // Trumps win, the highest one
        assert_eq!(winning_card(&["14s", "2t", "14c"]), card("2t"));
        assert_eq!(winning_card(&["14s", "2t", "21t", "7t"]), card("21t"));
        // The Fool never wins
        assert_eq!(winning_card(&["3s", "0t", "4s"]), card("4s"));
        assert_eq!(winning_card(&["0t", "1t", "3s"]), card("1t"));
    }

    #[test]
    fn test_winner_dominates() {
        let trick = trick_of(&["6c", "0t", "13c", "9u", "3t"]);
        let led = trick.suit().unwrap();
        let winner = trick.winner().unwrap();
        assert_eq!(winner.card, card("3t"));
        for play in trick.plays() {
            if play != winner {
                assert_eq!(winner.cmp_in_trick(play, led), Ordering::Greater);
                assert_eq!(play.cmp_in_trick(winner, led), Ordering::Less);
            }
        }
    }

    #[test]
    fn test_fool_lead() {
        let trick = trick_of(&["0t", "3o", "5c", "5o"]);
        assert_eq!(trick.suit(), Some(Suit::Trump));
        assert_eq!(trick.ranking_suit(), Some(Suit::Coin));

        let led = trick.ranking_suit().unwrap();
        let winner = trick.winner().unwrap();
        assert_eq!(winner.card, card("3o"));
        for play in trick.plays() {
            if play != winner {
                assert_eq!(winner.cmp_in_trick(play, led), Ordering::Greater);
            }
        }

        // Trumps still win after a Fool lead
        assert_eq!(winning_card(&["0t", "14s", "2t", "13s"]), card("2t"));
        assert_eq!(winning_card(&["0t", "4t", "14s"]), card("4t"));
        assert_eq!(winning_card(&["0t"]), FOOL);
    }

    #[test]
    fn test_cmp_in_trick() {
        let pos = PlayerPos::new(0, 3);
        let fool = PlayedCard::new(FOOL, 0, pos);
        let low_spade = PlayedCard::new(card("1s"), 1, pos);
        let early_cup = PlayedCard::new(card("14u"), 1, pos);
        let late_club = PlayedCard::new(card("2c"), 2, pos);

        assert_eq!(fool.cmp_in_trick(&low_spade, Suit::Spade), Ordering::Less);
        assert_eq!(low_spade.cmp_in_trick(&fool, Suit::Trump), Ordering::Greater);
        // Two discards: recency decides
        assert_eq!(early_cup.cmp_in_trick(&late_club, Suit::Spade), Ordering::Less);
        assert_eq!(late_club.cmp_in_trick(&early_cup, Suit::Spade), Ordering::Greater);
        // The led suit beats any discard
        assert_eq!(low_spade.cmp_in_trick(&early_cup, Suit::Spade), Ordering::Greater);
        assert_eq!(fool.cmp_in_trick(&fool, Suit::Trump), Ordering::Equal);
    }
}
