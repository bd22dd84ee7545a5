use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::action::{Decision, PlayerId, TurnKind};
use crate::card::{CardValue, Census, card_census};
use crate::deck::{Deck, DiscardPile};
use crate::error::GameError;
use crate::grid::{GRID_SLOTS, PlayerGrid};
use crate::policy::{Policy, ThresholdPolicy};
use crate::score::{limit_reached, winner_index};
use crate::state::{GameOutcome, GameStatus, RoundPhase, RoundScores, ScoringMode, TurnRecord};

const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;
pub const DEFAULT_SCORE_LIMIT: i32 = 100;
/// Safety cap on rounds per game; only reachable under [`ScoringMode::Cumulative`].
pub const DEFAULT_MAX_ROUNDS: usize = 500;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub num_players: usize,
    pub seed: u64,
    pub scoring: ScoringMode,
    pub score_limit: i32,
    pub max_rounds: usize,
}

impl GameConfig {
    pub fn new(num_players: usize, seed: u64) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::InvalidConfiguration(
                "players must be between 2 and 8",
            ));
        }
        Ok(Self {
            num_players,
            seed,
            scoring: ScoringMode::default(),
            score_limit: DEFAULT_SCORE_LIMIT,
            max_rounds: DEFAULT_MAX_ROUNDS,
        })
    }
}

/// Builder that enables deterministic deck injection and custom policies for tests.
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<CardValue>>,
    policy: Option<Box<dyn Policy>>,
}

impl GameBuilder {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        Ok(Self {
            config: GameConfig::new(num_players, DEFAULT_SEED)?,
            deck: None,
            policy: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Use these cards for the first round instead of a shuffled deck.
    /// The last card is dealt first.
    pub fn with_deck(mut self, deck: Vec<CardValue>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.config.scoring = scoring;
        self
    }

    pub fn with_score_limit(mut self, limit: i32) -> Self {
        self.config.score_limit = limit;
        self
    }

    /// Abort the game with [`GameError::RoundLimitExceeded`] once this many rounds
    /// have been played without reaching the score limit.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.config.max_rounds = max_rounds;
        self
    }

    pub fn with_policy<P: Policy + 'static>(mut self, policy: P) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// A seat at the table.
#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    grid: PlayerGrid,
    round_scores: Vec<i32>,
    total_score: i32,
}

impl Player {
    fn new(name: String) -> Self {
        Self {
            name,
            grid: PlayerGrid::new(),
            round_scores: Vec::new(),
            total_score: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &PlayerGrid {
        &self.grid
    }

    /// Score of every completed round, oldest first.
    pub fn round_scores(&self) -> &[i32] {
        &self.round_scores
    }

    pub fn total_score(&self) -> i32 {
        self.total_score
    }
}

/// Core Skyjo game engine.
pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) status: GameStatus,
    pub(crate) round_phase: RoundPhase,
    pub(crate) rounds_played: usize,
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) discard: DiscardPile,
    pub(crate) history: Vec<RoundScores>,
    policy: Box<dyn Policy>,
    pub(crate) rng: StdRng,
}

impl Game {
    pub fn builder(num_players: usize) -> Result<GameBuilder, GameError> {
        GameBuilder::new(num_players)
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder {
            config,
            deck: None,
            policy: None,
        }
        .build()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn round_phase(&self) -> RoundPhase {
        self.round_phase
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id).ok_or(GameError::InvalidPlayer(id))
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard_pile(&self) -> &DiscardPile {
        &self.discard
    }

    /// Score snapshots of every completed round.
    pub fn history(&self) -> &[RoundScores] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::GameOver { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Tally of every card in the deck, the discard pile and all grids.
    pub fn card_census(&self) -> Census {
        let grids = self.players.iter().flat_map(|player| player.grid.cards());
        card_census(
            self.deck
                .cards()
                .iter()
                .chain(self.discard.cards())
                .copied()
                .chain(grids),
        )
    }

    /// Deals the grids and reveals two cards per player.
    pub fn start(&mut self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Setup => {}
            GameStatus::PlayingRounds => return Ok(()),
            GameStatus::GameOver { .. } => return Err(GameError::GameOver),
        }
        self.deal_round()?;
        self.status = GameStatus::PlayingRounds;
        Ok(())
    }

    /// Plays rounds until the game is decided and returns the result.
    pub fn play(&mut self) -> Result<GameOutcome, GameError> {
        self.start()?;
        while !self.is_finished() {
            self.play_round()?;
        }
        self.outcome().ok_or(GameError::GameOver)
    }

    /// Result of a finished game; `None` while still in play.
    pub fn outcome(&self) -> Option<GameOutcome> {
        let winner = self.winner()?;
        let final_scores = self
            .players
            .iter()
            .map(|player| (player.name.clone(), self.final_score(player)))
            .collect();
        Some(GameOutcome {
            winner,
            winner_name: self.players[winner].name.clone(),
            rounds_played: self.rounds_played,
            final_scores,
            history: self.history.clone(),
        })
    }

    /// Resolves one turn for `player`: draw, decide, exchange or reveal, then clear triples.
    ///
    /// Turns played while the round is in its final sweep are recorded as such.
    pub fn play_turn(&mut self, player: PlayerId) -> Result<TurnRecord, GameError> {
        self.start()?;
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        let kind = match self.round_phase {
            RoundPhase::FinalTurnSweep { .. } => TurnKind::FinalSweep,
            _ => TurnKind::Normal,
        };

        let mut reshuffled = false;
        let drawn = match self.deck.draw() {
            Ok(card) => card,
            Err(GameError::EmptyDeck) => {
                self.deck.reshuffle_from(&mut self.discard, &mut self.rng)?;
                reshuffled = true;
                debug!(
                    deck = self.deck.len(),
                    round = self.rounds_played,
                    "discard pile reshuffled into deck"
                );
                self.deck.draw()?
            }
            Err(err) => return Err(err),
        };

        let decision = self
            .policy
            .decide(drawn, &self.players[player].grid, &mut self.rng);
        let grid = &mut self.players[player].grid;
        let mut displaced = None;
        match decision {
            Decision::Keep(pos) => {
                displaced = grid.exchange(pos, drawn);
                if let Some(old) = displaced {
                    self.discard.push(old);
                }
            }
            Decision::Discard(pos) => {
                self.discard.push(drawn);
                grid.reveal(pos);
            }
        }
        let cleared = grid.check_and_clear_triples();
        for card in &cleared {
            self.discard.push(*card);
        }

        let record = TurnRecord {
            player,
            kind,
            drawn,
            decision,
            displaced,
            cleared,
            revealed_after: grid.revealed_count(),
            reshuffled,
        };
        trace!(
            player,
            drawn,
            decision = ?record.decision,
            revealed = record.revealed_after,
            "turn played"
        );
        Ok(record)
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            deck,
            policy,
        } = builder;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let deck = match deck {
            Some(cards) => {
                if cards.len() < config.num_players * GRID_SLOTS {
                    return Err(GameError::InvalidConfiguration(
                        "deck does not contain enough cards to deal grids",
                    ));
                }
                Deck::from_cards(cards)
            }
            None => Deck::new(&mut rng),
        };
        let players = (0..config.num_players)
            .map(|idx| Player::new(format!("Player {}", idx + 1)))
            .collect();

        Ok(Game {
            config,
            status: GameStatus::Setup,
            round_phase: RoundPhase::InProgress,
            rounds_played: 0,
            players,
            deck,
            discard: DiscardPile::new(),
            history: Vec::new(),
            policy: policy
                .unwrap_or_else(|| Box::new(ThresholdPolicy::default()) as Box<dyn Policy>),
            rng,
        })
    }

    /// Deals twelve cards to each player in seat order, each revealing two right away.
    fn deal_round(&mut self) -> Result<(), GameError> {
        for player in &mut self.players {
            player.grid.deal(&mut self.deck)?;
            player.grid.reveal_initial(&mut self.rng);
        }
        self.round_phase = RoundPhase::InProgress;
        Ok(())
    }

    /// Starts the next round from a freshly shuffled deck.
    pub(crate) fn redeal(&mut self) -> Result<(), GameError> {
        for player in &mut self.players {
            player.grid = PlayerGrid::new();
        }
        self.discard.clear();
        self.deck = Deck::new(&mut self.rng);
        self.deal_round()
    }

    /// Scores the round just ended and decides whether the game continues.
    pub(crate) fn finish_round(&mut self) -> Result<(), GameError> {
        let round_scores: Vec<i32> = self.players.iter().map(|p| p.grid.score()).collect();
        for (player, &score) in self.players.iter_mut().zip(&round_scores) {
            player.round_scores.push(score);
            player.total_score += score;
        }
        self.history.push(RoundScores {
            round: self.rounds_played,
            scores: self
                .players
                .iter()
                .zip(&round_scores)
                .map(|(player, &score)| (player.name.clone(), score))
                .collect(),
        });
        debug!(round = self.rounds_played, scores = ?round_scores, "round scored");

        let deciding: Vec<i32> = match self.config.scoring {
            ScoringMode::SingleRound => round_scores,
            ScoringMode::Cumulative => self.players.iter().map(|p| p.total_score).collect(),
        };
        let over = match self.config.scoring {
            // The round has ended, so the game ends whether or not the limit was hit.
            ScoringMode::SingleRound => true,
            ScoringMode::Cumulative => limit_reached(&deciding, self.config.score_limit),
        };
        if !over {
            if self.rounds_played >= self.config.max_rounds {
                return Err(GameError::RoundLimitExceeded(self.rounds_played));
            }
            return self.redeal();
        }
        let winner = winner_index(&deciding).ok_or(GameError::InvalidConfiguration(
            "cannot pick a winner without players",
        ))?;
        self.status = GameStatus::GameOver { winner };
        info!(
            winner = %self.players[winner].name,
            rounds = self.rounds_played,
            limit_reached = limit_reached(&deciding, self.config.score_limit),
            "game over"
        );
        Ok(())
    }

    fn final_score(&self, player: &Player) -> i32 {
        match self.config.scoring {
            ScoringMode::SingleRound => player.round_scores.last().copied().unwrap_or(0),
            ScoringMode::Cumulative => player.total_score,
        }
    }
}
