use crate::{
    pruning::AdmissibleHeuristic,
    puzzle::{CubeState, Move},
    start, success, working,
};
use fxhash::FxHashSet;
use log::{Level, debug, info, log_enabled};
use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    time::{Duration, Instant},
};
use thiserror::Error;

pub mod brute_force;

pub use brute_force::{BfsSolver, DfsSolver, IddfsSolver};

pub struct IdaStarSolver<H> {
    heuristic: H,
    max_solution_length: Option<usize>,
    time_limit: Option<Duration>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    #[error("The search space was exhausted without reaching the solved state")]
    SolutionDoesNotExist,
    #[error("Max solution length exceeded")]
    MaxSolutionLengthExceeded,
    #[error("Time limit exceeded")]
    TimeLimitExceeded,
}

struct SearchNode<C> {
    state: C,
    depth: u8,
    /// The node this one was expanded from and the move that led here.
    parent: Option<(usize, Move)>,
}

/// Everything one bounded pass needs. Cleared before every pass.
struct IdaStarSolverMutable<C> {
    nodes: Vec<SearchNode<C>>,
    /// Ordered by `f`, then `h`, then insertion order.
    open: BinaryHeap<Reverse<(u8, u8, usize)>>,
    visited: FxHashSet<C>,
    nodes_visited: u64,
}

enum PassOutcome {
    Solved(usize),
    /// The smallest `f` that was cut off, or `None` if nothing was.
    BoundExceeded(Option<u8>),
}

impl<C: CubeState> IdaStarSolverMutable<C> {
    fn clear(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.visited.clear();
        self.nodes_visited = 0;
    }

    fn push(&mut self, node: SearchNode<C>, h: u8) {
        let f = node.depth.saturating_add(h);
        self.open.push(Reverse((f, h, self.nodes.len())));
        self.nodes.push(node);
    }

    fn solution(&self, mut index: usize) -> Vec<Move> {
        let mut moves = vec![];
        while let Some((parent, move_)) = self.nodes[index].parent {
            moves.push(move_);
            index = parent;
        }
        moves.reverse();
        moves
    }
}

impl<H> IdaStarSolver<H> {
    pub fn new(heuristic: H) -> Self {
        Self {
            heuristic,
            max_solution_length: None,
            time_limit: None,
        }
    }

    #[must_use]
    pub fn with_max_solution_length(mut self, max_solution_length: usize) -> Self {
        self.max_solution_length = Some(max_solution_length);
        self
    }

    /// Give up once `time_limit` has passed. Only checked before a pass with
    /// a larger bound begins, so a single pass can overrun it.
    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn into_heuristic(self) -> H {
        self.heuristic
    }

    /// One pass that expands states in order of smallest `f = depth + h`,
    /// never expanding a state twice and never pushing a state whose `f`
    /// exceeds `bound`.
    fn search_bound<C: CubeState>(
        &self,
        mutable: &mut IdaStarSolverMutable<C>,
        root: &C,
        bound: u8,
    ) -> PassOutcome
    where
        H: AdmissibleHeuristic<C>,
    {
        let mut next_bound: Option<u8> = None;
        let root_h = self.heuristic.admissible_heuristic(root);
        mutable.push(
            SearchNode {
                state: root.clone(),
                depth: 0,
                parent: None,
            },
            root_h,
        );

        while let Some(Reverse((_, _, index))) = mutable.open.pop() {
            let node = &mutable.nodes[index];
            if mutable.visited.contains(&node.state) {
                continue;
            }
            if node.state.is_solved() {
                return PassOutcome::Solved(index);
            }
            let state = node.state.clone();
            let depth = node.depth + 1;

            if log_enabled!(Level::Debug) {
                mutable.nodes_visited += 1;
            }
            mutable.visited.insert(state.clone());

            for move_ in Move::ALL {
                let next = state.with_move(move_);
                if mutable.visited.contains(&next) {
                    continue;
                }
                let h = self.heuristic.admissible_heuristic(&next);
                let f = depth.saturating_add(h);
                if f > bound {
                    next_bound = Some(next_bound.map_or(f, |next_bound| next_bound.min(f)));
                    continue;
                }
                mutable.push(
                    SearchNode {
                        state: next,
                        depth,
                        parent: Some((index, move_)),
                    },
                    h,
                );
            }
        }

        PassOutcome::BoundExceeded(next_bound)
    }

    /// Find a shortest move sequence that solves `state`, provided the
    /// heuristic never overestimates.
    ///
    /// # Errors
    ///
    /// The solver fails if the bound grows past the max solution length or
    /// the time limit runs out. See `SolverError`.
    pub fn solve<C: CubeState>(&self, state: &C) -> Result<Vec<Move>, SolverError>
    where
        H: AdmissibleHeuristic<C>,
    {
        info!(start!("Searching for a solution"));
        let start = Instant::now();

        let mut mutable = IdaStarSolverMutable {
            nodes: vec![],
            open: BinaryHeap::new(),
            visited: FxHashSet::default(),
            nodes_visited: 0,
        };
        let mut bound = self.heuristic.admissible_heuristic(state);

        loop {
            if let Some(max_solution_length) = self.max_solution_length
                && bound as usize > max_solution_length
            {
                return Err(SolverError::MaxSolutionLengthExceeded);
            }

            debug!(working!("Searching bound {}..."), bound);
            let bound_start = Instant::now();
            let outcome = self.search_bound(&mut mutable, state, bound);
            debug!(
                working!("Traversed {} nodes in {:.3}s"),
                mutable.nodes_visited,
                bound_start.elapsed().as_secs_f64()
            );

            match outcome {
                PassOutcome::Solved(index) => {
                    let solution = mutable.solution(index);
                    info!(
                        success!("Solution of length {} found in {:.3}s"),
                        solution.len(),
                        start.elapsed().as_secs_f64()
                    );
                    debug!("");
                    return Ok(solution);
                }
                PassOutcome::BoundExceeded(None) => {
                    return Err(SolverError::SolutionDoesNotExist);
                }
                PassOutcome::BoundExceeded(Some(next_bound)) => {
                    // A saturated `f` means depths no longer fit
                    if next_bound == u8::MAX {
                        return Err(SolverError::SolutionDoesNotExist);
                    }
                    bound = next_bound;
                }
            }

            if let Some(time_limit) = self.time_limit
                && start.elapsed() >= time_limit
            {
                return Err(SolverError::TimeLimitExceeded);
            }
            mutable.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pruning::ZeroTable,
        puzzle::{bitboard::BitboardCube, facelet::FaceletCube, parse_moves, tests::apply_moves},
    };

    /// Pretends every state except the solved one is at least `self.0` away.
    struct Constant(u8);

    impl<C: CubeState> AdmissibleHeuristic<C> for Constant {
        fn admissible_heuristic(&self, state: &C) -> u8 {
            if state.is_solved() { 0 } else { self.0 }
        }
    }

    fn solves_short_scrambles<C: CubeState>() {
        let solver = IdaStarSolver::new(ZeroTable);
        for scramble in ["R", "U'", "F2", "R U", "L' D2", "B U2 R'"] {
            let state = apply_moves(&C::solved(), scramble, 1);
            let solution = solver.solve(&state).unwrap();
            assert_eq!(
                solution.len(),
                parse_moves(scramble).unwrap().len(),
                "{scramble}"
            );
            let mut solved = state.clone();
            solved.apply_moves(&solution);
            assert!(solved.is_solved(), "{scramble}");
        }
    }

    #[test_log::test]
    fn test_solves_short_scrambles() {
        solves_short_scrambles::<BitboardCube>();
        solves_short_scrambles::<FaceletCube>();
    }

    #[test_log::test]
    fn test_solved_needs_no_moves() {
        let solver = IdaStarSolver::new(ZeroTable);
        assert_eq!(solver.solve(&BitboardCube::solved()), Ok(vec![]));
    }

    #[test]
    fn test_single_move_is_inverted() {
        let solver = IdaStarSolver::new(ZeroTable);
        for move_ in Move::ALL {
            let state = BitboardCube::solved().with_move(move_);
            assert_eq!(solver.solve(&state), Ok(vec![move_.inverse()]));
        }
    }

    #[test]
    fn test_max_solution_length_exceeded() {
        let state = apply_moves(&BitboardCube::solved(), "R U F", 1);
        let solver = IdaStarSolver::new(ZeroTable).with_max_solution_length(2);
        assert_eq!(
            solver.solve(&state),
            Err(SolverError::MaxSolutionLengthExceeded)
        );

        let solver = IdaStarSolver::new(ZeroTable).with_max_solution_length(3);
        assert_eq!(solver.solve(&state).unwrap().len(), 3);
    }

    #[test]
    fn test_time_limit_exceeded() {
        let state = apply_moves(&BitboardCube::solved(), "R U F", 1);
        let solver = IdaStarSolver::new(ZeroTable).with_time_limit(Duration::ZERO);
        assert_eq!(solver.solve(&state), Err(SolverError::TimeLimitExceeded));
    }

    #[test]
    fn test_starting_bound_comes_from_heuristic() {
        let state = apply_moves(&BitboardCube::solved(), "R U", 1);
        let solver = IdaStarSolver::new(Constant(1)).with_max_solution_length(2);
        assert_eq!(solver.solve(&state).unwrap().len(), 2);

        // Rejected before the first pass because the root alone is bounded by 3
        let solver = IdaStarSolver::new(Constant(3)).with_max_solution_length(2);
        assert_eq!(
            solver.solve(&state),
            Err(SolverError::MaxSolutionLengthExceeded)
        );
    }

    #[test]
    fn test_into_heuristic() {
        let solver = IdaStarSolver::new(Constant(4));
        assert_eq!(solver.into_heuristic().0, 4);
    }
}
