//! Module for a whole game: deal, prize claim, team formation, tricks and scoring.
use std::fmt;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cards::{Card, Hand};
use super::player::Player;
use super::points;
use super::pos::PlayerPos;
use super::rules::Rules;
use super::strategy::Strategy;
use super::team::Team;
use super::trick::{self, PlayError, Trick};

/// Phases of a game, in the order they happen.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Cards are about to be dealt
    Dealing,
    /// Players decide whether to claim the prize
    PrizeClaim,
    /// The asking player requests a card and teams are formed
    TeamFormation,
    /// Tricks are being played
    Playing,
    /// Hands are empty, scores are not computed yet
    Scoring,
    /// The game is over
    Done,
}

/// Error that can occur while running a game
#[derive(Error, PartialEq, Debug)]
pub enum GameError {
    /// Games are played by 3 to 5 players
    #[error("a game needs 3 to 5 players, not {0}")]
    InvalidPlayerCount(usize),
    /// Provided hands cannot come from a single deck
    #[error("invalid deal: {0}")]
    InvalidDeal(String),
    /// An action was attempted at the wrong moment
    #[error("expected phase {expected:?}, the game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    /// Every strategy kept declining the prize
    #[error("nobody claimed the prize after {0} deals")]
    PrizeNeverClaimed(usize),
    #[error(transparent)]
    Play(#[from] PlayError),
}

/// Someone sitting at the table: a name and the strategy making their choices.
pub struct Seat {
    pub name: String,
    pub strategy: Box<dyn Strategy>,
}

impl Seat {
    pub fn new<S: Into<String>>(name: S, strategy: Box<dyn Strategy>) -> Self {
        Seat {
            name: name.into(),
            strategy,
        }
    }
}

/// Summary of a finished game.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameResult {
    pub asking: PlayerPos,
    /// Card requested by the asking player, if any could be.
    pub requested: Option<Card>,
    /// Score change of each seat.
    pub deltas: Vec<i32>,
    /// Value of the won cards of each seat, after team sharing.
    pub won_values: Vec<i32>,
    pub teams: Vec<Vec<PlayerPos>>,
}

/// A game between 3 to 5 players.
pub struct Game {
    players: Vec<Player>,
    strategies: Vec<Box<dyn Strategy>>,
    rules: Rules,
    rng: StdRng,
    phase: Phase,
    dealer: PlayerPos,
    leader: PlayerPos,
    asking: Option<PlayerPos>,
    requested: Option<Card>,
    prize: Hand,
    prize_claimed: bool,
    deals: usize,
    teams: Vec<Team>,
    tricks: Vec<Trick>,
}

// Asks `strategy` for a card of `hand` until `accept` agrees, a bounded number of times.
fn propose<F>(strategy: &mut dyn Strategy, hand: &Hand, attempts: usize, accept: F) -> Option<Card>
where
    F: Fn(Card) -> bool,
{
    for _ in 0..attempts {
        match strategy.choose_from_hand(hand) {
            Some(card) if hand.has(card) && accept(card) => return Some(card),
            Some(card) => debug!("{} refused", card),
            None => return None,
        }
    }
    None
}

// Two distinct players, mutably.
fn pair_mut(players: &mut [Player], a: usize, b: usize) -> (&mut Player, &mut Player) {
    assert_ne!(a, b, "cannot pair a player with themselves");
    if a < b {
        let (left, right) = players.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = players.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

impl Game {
    /// Creates a game, shuffled from entropy.
    pub fn new(seats: Vec<Seat>, rules: Rules) -> Result<Self, GameError> {
        Game::with_rng(seats, rules, StdRng::from_entropy())
    }

    /// Creates a game whose deals are determined by `seed`.
    pub fn new_seeded(seats: Vec<Seat>, rules: Rules, seed: [u8; 32]) -> Result<Self, GameError> {
        Game::with_rng(seats, rules, StdRng::from_seed(seed))
    }

    /// Creates a game from an existing deal, ready for the prize claim.
    ///
    /// Redeals, if nobody claims the prize, are determined by `seed`.
    pub fn from_deal(
        seats: Vec<Seat>,
        rules: Rules,
        hands: Vec<Hand>,
        prize: Hand,
        seed: [u8; 32],
    ) -> Result<Self, GameError> {
        let mut game = Game::new_seeded(seats, rules, seed)?;
        if hands.len() != game.players.len() {
            return Err(GameError::InvalidDeal(format!(
                "{} hands for {} players",
                hands.len(),
                game.players.len()
            )));
        }

        let mut seen = Hand::new();
        for card in prize.iter().chain(hands.iter().flat_map(|h| h.iter())) {
            if seen.has(*card) {
                return Err(GameError::InvalidDeal(format!("{} is dealt twice", card)));
            }
            seen.add(*card);
        }

        for (player, hand) in game.players.iter_mut().zip(hands) {
            player.take_deal(hand);
        }
        game.prize = prize;
        game.deals = 1;
        game.phase = Phase::PrizeClaim;
        Ok(game)
    }

    fn with_rng(seats: Vec<Seat>, rules: Rules, rng: StdRng) -> Result<Self, GameError> {
        let count = seats.len();
        if count < super::MIN_PLAYERS || count > super::MAX_PLAYERS {
            return Err(GameError::InvalidPlayerCount(count));
        }

        let (players, strategies): (Vec<Player>, Vec<Box<dyn Strategy>>) = seats
            .into_iter()
            .map(|seat| (Player::new(seat.name), seat.strategy))
            .unzip();
        let dealer = PlayerPos::new(count - 1, count);

        Ok(Game {
            players,
            strategies,
            rules,
            rng,
            phase: Phase::Dealing,
            dealer,
            leader: dealer.next(),
            asking: None,
            requested: None,
            prize: Hand::new(),
            prize_claimed: false,
            deals: 0,
            teams: Vec::new(),
            tricks: Vec::new(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, pos: PlayerPos) -> &Player {
        &self.players[pos.to_n()]
    }

    pub fn count(&self) -> usize {
        self.players.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn dealer(&self) -> PlayerPos {
        self.dealer
    }

    /// Returns the player expected to lead the next trick.
    pub fn leader(&self) -> PlayerPos {
        self.leader
    }

    pub fn asking(&self) -> Option<PlayerPos> {
        self.asking
    }

    /// Every seat but the asking player's.
    pub fn non_asking(&self) -> Vec<PlayerPos> {
        PlayerPos::all(self.count())
            .filter(|p| Some(*p) != self.asking)
            .collect()
    }

    /// The prize, until it joins the asking player's hand.
    pub fn prize(&self) -> &Hand {
        &self.prize
    }

    pub fn prize_claimed(&self) -> bool {
        self.prize_claimed
    }

    pub fn requested(&self) -> Option<Card> {
        self.requested
    }

    /// Number of deals so far, redeals included.
    pub fn deals(&self) -> usize {
        self.deals
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_of(&self, pos: PlayerPos) -> Option<&Team> {
        self.teams.iter().find(|t| t.has_player(pos))
    }

    /// Completed tricks, oldest first.
    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn scores(&self) -> Vec<i32> {
        self.players.iter().map(|p| p.score()).collect()
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn asking_pos(&self) -> Result<PlayerPos, GameError> {
        self.asking.ok_or(GameError::WrongPhase {
            expected: Phase::PrizeClaim,
            actual: self.phase,
        })
    }

    /// Shuffles a full deck and deals it.
    pub fn deal(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Dealing)?;

        let (hands, prize) = super::deal_hands(&mut self.rng, self.players.len())?;
        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.take_deal(hand);
        }
        self.prize = prize;
        self.deals += 1;
        self.phase = Phase::PrizeClaim;
        debug!("deal #{} done by {}", self.deals, self.players[self.dealer.to_n()]);
        Ok(())
    }

    /// Offers the prize to each player, starting after the dealer.
    ///
    /// Returns the asking player, or `None` when everybody declined: the game
    /// then goes back to dealing.
    pub fn claim_prize(&mut self) -> Result<Option<PlayerPos>, GameError> {
        self.expect_phase(Phase::PrizeClaim)?;

        for pos in self.dealer.next().until_n(self.count()) {
            let idx = pos.to_n();
            if self.strategies[idx].accept_prize(self.players[idx].hand()) {
                for player in self.players.iter_mut() {
                    player.set_asking(false);
                }
                self.players[idx].set_asking(true);
                self.asking = Some(pos);
                self.prize_claimed = true;
                self.phase = Phase::TeamFormation;
                info!("{} claims the prize", self.players[idx]);
                return Ok(Some(pos));
            }
        }

        debug!("nobody claimed the prize");
        self.phase = Phase::Dealing;
        Ok(None)
    }

    /// Deals until somebody claims the prize.
    pub fn setup(&mut self) -> Result<PlayerPos, GameError> {
        loop {
            if self.phase == Phase::Dealing {
                if self.deals > self.rules.max_redeals {
                    return Err(GameError::PrizeNeverClaimed(self.deals));
                }
                self.deal()?;
            }
            if let Some(pos) = self.claim_prize()? {
                return Ok(pos);
            }
        }
    }

    // Picks a card worth `REQUEST_VALUE` that the asking player does not hold.
    fn request_card(&mut self, asking: PlayerPos) -> Option<Card> {
        let idx = asking.to_n();
        let hand = self.players[idx].hand();
        let candidates: Vec<Card> = points::request_candidates()
            .into_iter()
            .filter(|c| !hand.has(*c))
            .collect();
        if candidates.is_empty() {
            info!("{} holds every card worth {}", self.players[idx], points::REQUEST_VALUE);
            return None;
        }

        for _ in 0..self.rules.max_attempts {
            let card = self.strategies[idx].choose_any_card();
            if candidates.contains(&card) {
                return Some(card);
            }
            debug!("{} cannot be requested", card);
        }

        let fallback = candidates.iter().max().copied();
        warn!("no valid request from {}, using the highest candidate", self.players[idx]);
        fallback
    }

    // Asks the strategy of `pos` for a card of their hand, the lowest one by default.
    fn pick_own_card(&mut self, pos: PlayerPos) -> Option<Card> {
        let idx = pos.to_n();
        let hand = self.players[idx].hand();
        propose(self.strategies[idx].as_mut(), hand, self.rules.max_attempts, |_| true)
            .or_else(|| {
                let lowest = hand.list().last().copied();
                if let Some(card) = lowest {
                    warn!("{} gives up {} by default", self.players[idx], card);
                }
                lowest
            })
    }

    fn find_card_owner(&self, card: Card) -> Option<PlayerPos> {
        PlayerPos::all(self.count()).find(|p| self.players[p.to_n()].hand().has(card))
    }

    /// Requests a card, hands over the prize and forms the teams.
    pub fn form_teams(&mut self) -> Result<&[Team], GameError> {
        self.expect_phase(Phase::TeamFormation)?;
        let asking = self.asking_pos()?;
        let a = asking.to_n();

        let requested = self.request_card(asking);
        let prize = std::mem::take(&mut self.prize);
        let prize_len = prize.len();
        let in_prize = requested.map_or(false, |c| prize.has(c));
        self.players[a].hand_mut().merge(&prize);

        let holder = match requested {
            Some(card) if !in_prize => self.find_card_owner(card),
            _ => None,
        };

        self.teams = match (requested, holder) {
            (Some(card), Some(holder)) => {
                if let Some(given) = self.pick_own_card(asking) {
                    let (asker, partner) = pair_mut(&mut self.players, a, holder.to_n());
                    Player::exchange(asker, partner, given, card);
                    debug!("{} gives {} for {}", asker, given, card);
                }

                let others: Vec<PlayerPos> = PlayerPos::all(self.count())
                    .filter(|p| *p != asking && *p != holder)
                    .collect();
                let mut teams = vec![Team::new(vec![asking, holder])];
                if self.count() == 4 {
                    teams.extend(others.into_iter().map(Team::solo));
                } else {
                    teams.push(Team::new(others));
                }
                teams
            }
            (requested, _) => {
                if let Some(card) = requested {
                    if !in_prize {
                        warn!("nobody holds {}, {} plays alone", card, self.players[a]);
                    }
                }
                vec![Team::solo(asking), Team::new(self.non_asking())]
            }
        };

        self.discard_prize(asking, prize_len);

        for team in &self.teams {
            team.set_debts(&mut self.players, &self.rules);
        }
        self.requested = requested;
        self.phase = Phase::Playing;
        info!(
            "{} requested {:?}, {} teams formed",
            self.players[a],
            requested.map(|c| c.name()),
            self.teams.len()
        );
        Ok(&self.teams)
    }

    // The asking player puts `count` cards aside, with their won cards.
    fn discard_prize(&mut self, asking: PlayerPos, count: usize) {
        let a = asking.to_n();
        for _ in 0..count {
            match self.pick_own_card(asking) {
                Some(card) => {
                    self.players[a].hand_mut().remove(card);
                    self.players[a].add_won(vec![card]);
                }
                None => break,
            }
        }
    }

    /// Plays one trick, each player in turn from the leader.
    ///
    /// Returns the winner, who leads the next trick.
    pub fn play_trick(&mut self) -> Result<PlayerPos, GameError> {
        self.expect_phase(Phase::Playing)?;

        let mut trick = Trick::new();
        for pos in self.leader.until_n(self.count()) {
            let idx = pos.to_n();
            let card = {
                let hand = self.players[idx].hand();
                let current = &trick;
                propose(self.strategies[idx].as_mut(), hand, self.rules.max_attempts, |c| {
                    trick::can_play(c, hand, current).is_ok()
                })
                .or_else(|| {
                    let fallback = current.legal_cards(hand).first().copied();
                    if let Some(card) = fallback {
                        warn!("{} plays {} by default", self.players[idx], card);
                    }
                    fallback
                })
            };

            match card {
                Some(card) => trick.play_card(card, &mut self.players[idx], pos)?,
                None => {
                    return Err(GameError::InvalidDeal(format!(
                        "{} has no card left",
                        self.players[idx]
                    )))
                }
            }
        }

        let winner = trick.winner()?.owner;
        self.players[winner.to_n()].add_won(trick.cards());
        debug!("{} wins trick #{}", self.players[winner.to_n()], self.tricks.len() + 1);
        self.tricks.push(trick);
        self.leader = winner;

        if self.asking_hand_is_empty()? {
            self.phase = Phase::Scoring;
        }
        Ok(winner)
    }

    fn asking_hand_is_empty(&self) -> Result<bool, GameError> {
        let asking = self.asking_pos()?;
        Ok(self.players[asking.to_n()].hand().is_empty())
    }

    /// Plays tricks until the hands are empty.
    pub fn play(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Playing)?;
        while self.phase == Phase::Playing {
            if self.asking_hand_is_empty()? {
                self.phase = Phase::Scoring;
            } else {
                self.play_trick()?;
            }
        }
        Ok(())
    }

    /// Shares won cards inside teams and updates the scores.
    ///
    /// Returns the score change of each seat; they add up to zero.
    pub fn score(&mut self) -> Result<Vec<i32>, GameError> {
        self.expect_phase(Phase::Scoring)?;
        let asking = self.asking_pos()?;

        for team in self.teams.iter_mut() {
            team.aggregate(&self.players);
        }
        for team in &self.teams {
            team.distribute(&mut self.players);
        }

        let mut deltas = vec![0; self.count()];
        for pos in self.non_asking() {
            deltas[pos.to_n()] = self.players[pos.to_n()].update_score();
        }
        let asking_delta = -deltas.iter().sum::<i32>();
        self.players[asking.to_n()].add_score(asking_delta);
        deltas[asking.to_n()] = asking_delta;

        self.phase = Phase::Done;
        info!("score changes: {:?}", deltas);
        Ok(deltas)
    }

    /// Runs every remaining phase and sums up the game.
    pub fn run(&mut self) -> Result<GameResult, GameError> {
        let asking = self.setup()?;
        self.form_teams()?;
        self.play()?;
        let deltas = self.score()?;

        Ok(GameResult {
            asking,
            requested: self.requested,
            deltas,
            won_values: self.players.iter().map(|p| p.won_value()).collect(),
            teams: self.teams.iter().map(|t| t.members().to_vec()).collect(),
        })
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for player in &self.players {
            writeln!(f, "{}", player.notation())?;
        }
        writeln!(f, "Dealer: {}", self.players[self.dealer.to_n()])?;
        if let Some(asking) = self.asking {
            writeln!(f, "Asked: {}", self.players[asking.to_n()])?;
        }
        if let Some(card) = self.requested {
            writeln!(f, "Requested: {} ({})", card, card.name())?;
        }
        for (i, team) in self.teams.iter().enumerate() {
            let names: Vec<&str> = team
                .members()
                .iter()
                .map(|p| self.players[p.to_n()].name())
                .collect();
            writeln!(f, "Team #{}: {}", i + 1, names.join(", "))?;
        }
        if !self.prize.is_empty() {
            writeln!(f, "Prize: {}", self.prize)?;
        }
        for player in &self.players {
            writeln!(
                f,
                "{}: score {}, debt {}, won {}",
                player,
                player.score(),
                player.debt(),
                player.won_value()
            )?;
        }
        Ok(())
    }
}
