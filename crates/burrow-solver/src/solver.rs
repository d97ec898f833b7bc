//! Dijkstra search over burrow states.
//!
//! States are generated on demand by the move generator. The frontier lives
//! in a [`DecreaseKeyQueue`] so that a cheaper route to a queued state lowers
//! its entry in place; states whose cost has been finalized go into the
//! explored set and are never relaxed again.

use std::time::Instant;

use log::{debug, trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::burrow::{BurrowState, Cost};
use crate::error::{BudgetReason, SolveError};
use crate::moves::Move;
use crate::pruning::{legal_moves, PruningMode};
use crate::queue::DecreaseKeyQueue;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub pruning: PruningMode,
    /// Give up after expanding this many states
    pub max_expansions: Option<usize>,
    /// Give up once every remaining state costs more than this
    pub max_cost: Option<Cost>,
    /// Keep predecessors so the optimal move sequence can be returned
    pub record_moves: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pruning: PruningMode::ForcedMoves,
            max_expansions: None,
            max_cost: None,
            record_moves: false,
        }
    }
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// States whose moves were generated
    pub expanded: usize,
    /// States added to the queue
    pub generated: usize,
    /// Successful decrease-key relaxations
    pub decreased: usize,
    /// Largest queue length seen
    pub max_frontier: usize,
    pub elapsed_ms: u64,
}

/// An optimal answer.
#[derive(Debug, Clone)]
pub struct Solution {
    pub cost: Cost,
    /// Optimal move sequence; empty unless `record_moves` was set
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

/// Where the search loop stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    Solved(Cost),
    Exhausted,
}

/// All mutable search state, owned by a single solve call.
///
/// [`solve_with`] drives this to completion; it is public so callers can
/// step the search themselves.
pub struct Search<'a> {
    config: &'a SolverConfig,
    goal: BurrowState,
    queue: DecreaseKeyQueue<BurrowState, Cost>,
    explored: FxHashSet<BurrowState>,
    parents: FxHashMap<BurrowState, (BurrowState, Move)>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub fn new(initial: BurrowState, config: &'a SolverConfig) -> Result<Self, SolveError> {
        let goal = BurrowState::goal(initial.layout());
        let mut queue = DecreaseKeyQueue::with_capacity(1024);
        queue.insert(initial, 0)?;
        Ok(Self {
            config,
            goal,
            queue,
            explored: FxHashSet::default(),
            parents: FxHashMap::default(),
            stats: SearchStats {
                generated: 1,
                max_frontier: 1,
                ..Default::default()
            },
        })
    }

    /// Pop the cheapest state and either finish or relax its successors.
    pub fn step(&mut self) -> Result<SearchStatus, SolveError> {
        if self.queue.is_empty() {
            return Ok(SearchStatus::Exhausted);
        }
        let (state, cost) = self.queue.extract_min()?;
        self.explored.insert(state.clone());

        // costs pop in non-decreasing order, so nothing left is cheaper
        if let Some(limit) = self.config.max_cost {
            if cost > limit {
                return Err(self.budget_exceeded(BudgetReason::Cost(limit)));
            }
        }
        if state == self.goal {
            return Ok(SearchStatus::Solved(cost));
        }
        if let Some(limit) = self.config.max_expansions {
            if self.stats.expanded >= limit {
                return Err(self.budget_exceeded(BudgetReason::Expansions(limit)));
            }
        }

        self.stats.expanded += 1;
        let moves = legal_moves(&state, self.config.pruning);
        trace!(
            "expanding state at cost {} with {} moves ({} queued)",
            cost,
            moves.len(),
            self.queue.len()
        );

        for mv in moves {
            let next = state.apply(&mv);
            if self.explored.contains(&next) {
                continue;
            }
            let next_cost = cost + mv.cost;
            match self.queue.contains(&next) {
                Some(queued) if next_cost < queued => {
                    self.queue.decrease_key(&next, next_cost);
                    self.stats.decreased += 1;
                    self.record_parent(next, &state, mv);
                }
                Some(_) => {}
                None => {
                    if self.config.record_moves {
                        self.record_parent(next.clone(), &state, mv);
                    }
                    self.queue.insert(next, next_cost)?;
                    self.stats.generated += 1;
                }
            }
        }

        self.stats.max_frontier = self.stats.max_frontier.max(self.queue.len());
        Ok(SearchStatus::Running)
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn record_parent(&mut self, next: BurrowState, parent: &BurrowState, mv: Move) {
        if self.config.record_moves {
            self.parents.insert(next, (parent.clone(), mv));
        }
    }

    fn budget_exceeded(&self, reason: BudgetReason) -> SolveError {
        SolveError::BudgetExceeded {
            expanded: self.stats.expanded,
            reason,
        }
    }

    /// Walk predecessors back from the goal.
    fn goal_path(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut current = &self.goal;
        while let Some((parent, mv)) = self.parents.get(current) {
            moves.push(*mv);
            current = parent;
        }
        moves.reverse();
        moves
    }
}

/// Minimum total energy to reach the goal, with the default configuration.
pub fn solve(initial: BurrowState) -> Result<Cost, SolveError> {
    solve_with(initial, &SolverConfig::default()).map(|solution| solution.cost)
}

/// Run the search from `initial` under `config`.
pub fn solve_with(initial: BurrowState, config: &SolverConfig) -> Result<Solution, SolveError> {
    let start_time = Instant::now();
    let layout = initial.layout();
    debug!(
        "solving {} rooms of depth {} with {:?}",
        layout.rooms(),
        layout.depth(),
        config.pruning
    );

    let mut search = Search::new(initial, config)?;
    loop {
        match search.step() {
            Ok(SearchStatus::Running) => {}
            Ok(SearchStatus::Solved(cost)) => {
                let mut stats = search.stats.clone();
                stats.elapsed_ms = start_time.elapsed().as_millis() as u64;
                debug!(
                    "solved at cost {} after {} expansions in {}ms",
                    cost, stats.expanded, stats.elapsed_ms
                );
                let moves = if config.record_moves {
                    search.goal_path()
                } else {
                    Vec::new()
                };
                return Ok(Solution { cost, moves, stats });
            }
            Ok(SearchStatus::Exhausted) => {
                debug!(
                    "state space exhausted after {} expansions",
                    search.stats.expanded
                );
                return Err(SolveError::Unsolvable {
                    explored: search.explored.len(),
                });
            }
            Err(err) => {
                if let SolveError::BudgetExceeded { .. } = err {
                    warn!("{}", err);
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burrow::{Cell, Layout, Token};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    const A: Token = Token::new(0);
    const B: Token = Token::new(1);
    const C: Token = Token::new(2);
    const D: Token = Token::new(3);

    fn sample() -> BurrowState {
        BurrowState::with_full_rooms(&[vec![B, A], vec![C, D], vec![B, C], vec![D, A]]).unwrap()
    }

    fn swapped_pair() -> BurrowState {
        BurrowState::with_full_rooms(&[vec![B, A], vec![A, B]]).unwrap()
    }

    #[test]
    fn test_swapped_pair_cost() {
        // B steps out to cell 3 (20), A to cell 5 (2), B home (20), A home (4)
        assert_eq!(solve(swapped_pair()), Ok(46));
    }

    #[test]
    fn test_sample_burrow() {
        assert_eq!(solve(sample()), Ok(12521));
    }

    #[test]
    fn test_unfolded_sample_burrow() {
        let unfolded = sample().unfold_standard().unwrap();
        assert_eq!(solve(unfolded), Ok(44169));
    }

    #[test]
    fn test_goal_start_costs_nothing() {
        let goal = BurrowState::goal(Layout::new(4, 2).unwrap());
        let solution = solve_with(goal, &SolverConfig::default()).unwrap();
        assert_eq!(solution.cost, 0);
        assert_eq!(solution.stats.expanded, 0);
        assert!(solution.moves.is_empty());
    }

    #[test]
    fn test_deadlocked_hallway_is_unsolvable() {
        // B at 3 waits on room 1, whose A can't leave; the A at 5 can't get past the B
        let layout = Layout::new(2, 2).unwrap();
        let mut hallway: [Cell; 7] = [None; 7];
        hallway[3] = Some(B);
        hallway[5] = Some(A);
        let state = BurrowState::from_parts(
            layout,
            &hallway,
            &[vec![None, Some(B)], vec![None, Some(A)]],
        )
        .unwrap();

        match solve(state) {
            Err(SolveError::Unsolvable { explored }) => assert_eq!(explored, 3),
            other => panic!("expected unsolvable, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_token_counts_are_unsolvable() {
        let state = BurrowState::with_full_rooms(&[vec![A], vec![A]]).unwrap();
        assert!(matches!(solve(state), Err(SolveError::Unsolvable { .. })));
    }

    #[test]
    fn test_expansion_budget() {
        let config = SolverConfig {
            max_expansions: Some(10),
            ..Default::default()
        };
        let err = solve_with(sample(), &config).unwrap_err();
        assert_eq!(
            err,
            SolveError::BudgetExceeded {
                expanded: 10,
                reason: BudgetReason::Expansions(10),
            }
        );
    }

    #[test]
    fn test_cost_budget() {
        let tight = SolverConfig {
            max_cost: Some(45),
            ..Default::default()
        };
        assert!(matches!(
            solve_with(swapped_pair(), &tight),
            Err(SolveError::BudgetExceeded {
                reason: BudgetReason::Cost(45),
                ..
            })
        ));

        let exact = SolverConfig {
            max_cost: Some(46),
            ..Default::default()
        };
        assert_eq!(solve_with(swapped_pair(), &exact).unwrap().cost, 46);
    }

    #[test]
    fn test_recorded_moves_replay_to_goal() {
        let config = SolverConfig {
            record_moves: true,
            ..Default::default()
        };
        let start = sample();
        let solution = solve_with(start.clone(), &config).unwrap();
        assert!(!solution.moves.is_empty());

        let mut state = start;
        for mv in &solution.moves {
            state = state.apply(mv);
        }
        assert!(state.is_goal());
        let total: Cost = solution.moves.iter().map(|m| m.cost).sum();
        assert_eq!(total, solution.cost);
    }

    #[test]
    fn test_step_reports_solved_for_goal_start() {
        let config = SolverConfig::default();
        let goal = BurrowState::goal(Layout::new(2, 2).unwrap());
        let mut search = Search::new(goal, &config).unwrap();
        assert_eq!(search.step(), Ok(SearchStatus::Solved(0)));
        assert_eq!(search.step(), Ok(SearchStatus::Exhausted));
    }

    #[test]
    fn test_repeated_solves_are_independent() {
        assert_eq!(solve(swapped_pair()), Ok(46));
        assert_eq!(solve(sample()), Ok(12521));
        assert_eq!(solve(swapped_pair()), Ok(46));
    }

    /// Shuffle a full burrow, then take a few random moves to put tokens in the hallway.
    fn random_instance(rng: &mut StdRng) -> BurrowState {
        let rooms = rng.gen_range(2..=3);
        let depth = rng.gen_range(1..=2);
        let mut tokens: Vec<Token> = (0..rooms)
            .flat_map(|rank| std::iter::repeat(Token::new(rank as u8)).take(depth))
            .collect();
        tokens.shuffle(rng);
        let full: Vec<Vec<Token>> = tokens.chunks(depth).map(|c| c.to_vec()).collect();
        let mut state = BurrowState::with_full_rooms(&full).unwrap();

        for _ in 0..rng.gen_range(0..4) {
            let moves = legal_moves(&state, PruningMode::Disabled);
            match moves.choose(rng) {
                Some(mv) => state = state.apply(mv),
                None => break,
            }
        }
        state
    }

    #[test]
    fn test_forced_move_pruning_preserves_optimum() {
        let mut rng = StdRng::seed_from_u64(23);
        let pruned = SolverConfig::default();
        let unpruned = SolverConfig {
            pruning: PruningMode::Disabled,
            ..Default::default()
        };

        for _ in 0..60 {
            let state = random_instance(&mut rng);
            let with = solve_with(state.clone(), &pruned).map(|s| s.cost);
            let without = solve_with(state.clone(), &unpruned).map(|s| s.cost);
            match (&with, &without) {
                (Ok(a), Ok(b)) => assert_eq!(a, b, "pruning changed the optimum for {:?}", state),
                (Err(SolveError::Unsolvable { .. }), Err(SolveError::Unsolvable { .. })) => {}
                _ => panic!("outcomes differ for {:?}: {:?} vs {:?}", state, with, without),
            }
        }
    }

    #[test]
    fn test_pruning_skips_work() {
        let pruned = solve_with(sample(), &SolverConfig::default()).unwrap();
        let unpruned = solve_with(
            sample(),
            &SolverConfig {
                pruning: PruningMode::Disabled,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(pruned.cost, unpruned.cost);
        assert!(pruned.stats.expanded <= unpruned.stats.expanded);
    }
}
