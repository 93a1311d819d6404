use std::time::Instant;

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use super::BotPlayer;
use crate::board::{Board, Move, Player};
use crate::config::{AgentConfig, EngineKind};
use crate::controller::DepthController;
use crate::errors::{AgentResult, SearchError, SearchOutcome};
use crate::search::{AlphaBeta, MemoMinimax, Minimax, SearchEngine, SearchResult};
use crate::transposition::TranspositionStore;

/// The engine an agent runs, fixed to the player it searches for
#[derive(Debug)]
enum Engine<B> {
    Minimax(Minimax),
    AlphaBeta(AlphaBeta),
    Memo(MemoMinimax<B>),
}

impl<B: Board> Engine<B> {
    fn build(config: &AgentConfig, player: Player) -> Self {
        match config.engine {
            EngineKind::Minimax => Engine::Minimax(Minimax::new(player, config.evaluator)),
            EngineKind::AlphaBeta => Engine::AlphaBeta(AlphaBeta::new(player, config.evaluator)),
            EngineKind::Memo => Engine::Memo(
                MemoMinimax::new(player, config.evaluator).with_pruning(config.memo_pruning),
            ),
        }
    }

    fn as_search(&mut self) -> &mut dyn SearchEngine<B> {
        match self {
            Engine::Minimax(engine) => engine,
            Engine::AlphaBeta(engine) => engine,
            Engine::Memo(engine) => engine,
        }
    }
}

/// Search-based agent: the depth controller picks a depth, the configured
/// engine searches, and a fallback policy covers searches that found
/// nothing worth playing.
#[derive(Debug)]
pub struct SearchPlayer<B> {
    config: AgentConfig,
    controller: DepthController,
    engine: Option<Engine<B>>,
    rng: XorShiftRng,
}

impl<B: Board> SearchPlayer<B> {
    pub fn new(config: AgentConfig) -> AgentResult<Self> {
        config.validate()?;
        Ok(SearchPlayer {
            controller: DepthController::new(config.depth),
            config,
            engine: None,
            rng: XorShiftRng::from_entropy(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = XorShiftRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn controller(&self) -> &DepthController {
        &self.controller
    }

    /// The player this agent searches for, once it has moved
    pub fn player(&self) -> Option<Player> {
        self.engine.as_ref().map(|engine| match engine {
            Engine::Minimax(e) => SearchEngine::<B>::player(e),
            Engine::AlphaBeta(e) => SearchEngine::<B>::player(e),
            Engine::Memo(e) => e.player(),
        })
    }

    /// Game tree kept by the memoized engine
    pub fn memo_store(&self) -> Option<&TranspositionStore<B>> {
        match &self.engine {
            Some(Engine::Memo(memo)) => Some(memo.store()),
            _ => None,
        }
    }

    /// Forget everything learned during the previous game
    pub fn new_game(&mut self) {
        self.controller.reset();
        if let Some(Engine::Memo(memo)) = &mut self.engine {
            memo.reset();
        }
        self.engine = None;
    }

    fn first_move(&mut self, board: &B) -> AgentResult<Move> {
        let player = board.turn_player();
        let mut engine = Engine::build(&self.config, player);
        if let Engine::Memo(memo) = &mut engine {
            memo.set_root(board)?;
        }

        let depth = self.controller.depth_for_turn();
        let search = engine.as_search();
        search.set_moves_made(Some(0));
        let start = Instant::now();
        let result = search.search(board, depth)?;
        let elapsed = start.elapsed();
        self.engine = Some(engine);

        info!(
            "{} opened as {:?}: depth {} in {}ms, {} nodes",
            self.config.name,
            player,
            depth,
            elapsed.as_millis(),
            result.nodes
        );
        if elapsed > self.controller.limits().first_move_time() {
            warn!(
                "{} overran its first move budget of {}ms",
                self.config.name,
                self.controller.limits().first_move_time_ms
            );
        }
        self.controller.advance();

        match result.best_move {
            Some(Move::Skip) if self.config.spare_opening_skip && !result.should_skip => {
                info!("{} keeps its skip for later", self.config.name);
                self.random_move(board)
            }
            Some(mv) if !result.should_skip => Ok(mv),
            _ => self.fallback(board),
        }
    }

    fn search(&mut self, board: &B, depth: i32) -> SearchOutcome<SearchResult> {
        let moves_made = self.controller.moves_made();
        let config = &self.config;
        let engine = self
            .engine
            .get_or_insert_with(|| Engine::build(config, board.turn_player()))
            .as_search();
        engine.set_moves_made(Some(moves_made));
        engine.search(board, depth)
    }

    /// Skip if a credit is banked, otherwise any sowing move
    fn fallback(&mut self, board: &B) -> AgentResult<Move> {
        let credit = board.credit(board.turn_player());
        if credit > 0 {
            warn!("{} sees no surviving line, skipping", self.config.name);
            return Ok(Move::Skip);
        }
        warn!("{} sees no surviving line and has no credit", self.config.name);
        self.random_move(board)
    }

    fn random_move(&mut self, board: &B) -> AgentResult<Move> {
        let moves: Vec<Move> = board
            .legal_moves()
            .into_iter()
            .filter(|mv| !mv.is_skip())
            .collect();
        moves
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| SearchError::NoLegalMoves.into())
    }
}

impl<B: Board> BotPlayer<B> for SearchPlayer<B> {
    fn id(&self) -> &str {
        &self.config.name
    }

    fn choose_move(&mut self, board: &B) -> AgentResult<Move> {
        if board.legal_moves().is_empty() {
            return Err(SearchError::NoLegalMoves.into());
        }
        if self.controller.is_first_move() {
            return self.first_move(board);
        }

        let depth = self.controller.depth_for_turn();
        let start = Instant::now();
        let result = self.search(board, depth)?;
        let elapsed = start.elapsed();
        info!(
            "{} searched depth {} in {}ms: {:?} ({:?}, {} nodes)",
            self.config.name,
            depth,
            elapsed.as_millis(),
            result.best_move,
            result.utility,
            result.nodes
        );
        self.controller.record(elapsed, result.full_simulation);

        match result.best_move {
            Some(mv) if !result.should_skip => {
                self.controller.advance();
                Ok(mv)
            }
            _ => self.fallback(board),
        }
    }
}
