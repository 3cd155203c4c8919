//! Uninformed searches. They are slow past a handful of moves and exist to
//! cross-check the heuristic search on short scrambles.

use super::SolverError;
use crate::{
    puzzle::{CubeState, Move},
    start, success, working,
};
use fxhash::FxHashSet;
use log::{debug, info};
use std::{collections::VecDeque, time::Instant};

/// Consecutive turns of one face can always be merged into at most one, so
/// none of the searches try them.
fn follows(previous: Option<Move>, move_: Move) -> bool {
    previous.is_none_or(|previous| previous.face != move_.face)
}

/// Depth first search with a fixed depth limit. Returns the first solution it
/// comes across, which is not necessarily the shortest.
pub struct DfsSolver {
    max_depth: usize,
}

impl Default for DfsSolver {
    fn default() -> Self {
        Self { max_depth: 8 }
    }
}

impl DfsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// # Errors
    ///
    /// `MaxSolutionLengthExceeded` if no sequence of at most `max_depth`
    /// moves solves `state`.
    pub fn solve<C: CubeState>(&self, state: &C) -> Result<Vec<Move>, SolverError> {
        info!(start!("Depth first search up to depth {}"), self.max_depth);
        let start = Instant::now();
        let mut state = state.clone();
        let mut path = Vec::with_capacity(self.max_depth);
        let mut nodes_visited = 0;

        if dfs(&mut state, &mut path, self.max_depth, &mut nodes_visited) {
            info!(
                success!("Solution of length {} found in {:.3}s after {} nodes"),
                path.len(),
                start.elapsed().as_secs_f64(),
                nodes_visited
            );
            Ok(path)
        } else {
            Err(SolverError::MaxSolutionLengthExceeded)
        }
    }
}

/// Applies and undoes moves on `state` in place, leaving the solution in
/// `path` when it returns true.
fn dfs<C: CubeState>(
    state: &mut C,
    path: &mut Vec<Move>,
    remaining: usize,
    nodes_visited: &mut u64,
) -> bool {
    *nodes_visited += 1;
    if state.is_solved() {
        return true;
    }
    if remaining == 0 {
        return false;
    }
    for move_ in Move::ALL {
        if !follows(path.last().copied(), move_) {
            continue;
        }
        state.apply_move(move_);
        path.push(move_);
        if dfs(state, path, remaining - 1, nodes_visited) {
            return true;
        }
        path.pop();
        state.apply_move(move_.inverse());
    }
    false
}

/// Runs `DfsSolver` with depth limits 0, 1, 2, ... so the first solution found
/// is a shortest one.
pub struct IddfsSolver {
    max_depth: usize,
}

impl Default for IddfsSolver {
    fn default() -> Self {
        Self { max_depth: 7 }
    }
}

impl IddfsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// # Errors
    ///
    /// `MaxSolutionLengthExceeded` if no sequence of at most `max_depth`
    /// moves solves `state`.
    pub fn solve<C: CubeState>(&self, state: &C) -> Result<Vec<Move>, SolverError> {
        info!(start!("Iterative deepening up to depth {}"), self.max_depth);
        let start = Instant::now();
        let mut state = state.clone();
        let mut path = Vec::with_capacity(self.max_depth);

        for depth in 0..=self.max_depth {
            let depth_start = Instant::now();
            let mut nodes_visited = 0;
            let found = dfs(&mut state, &mut path, depth, &mut nodes_visited);
            debug!(
                working!("Depth {} traversed {} nodes in {:.3}s"),
                depth,
                nodes_visited,
                depth_start.elapsed().as_secs_f64()
            );
            if found {
                info!(
                    success!("Solution of length {} found in {:.3}s"),
                    path.len(),
                    start.elapsed().as_secs_f64()
                );
                return Ok(path);
            }
        }
        Err(SolverError::MaxSolutionLengthExceeded)
    }
}

/// Breadth first search over every reachable state, remembering each one so
/// it is expanded once. Memory grows with the number of states within the
/// solution length, so keep scrambles short.
#[derive(Default)]
pub struct BfsSolver {
    max_depth: Option<usize>,
}

struct BfsNode<C> {
    state: C,
    depth: usize,
    parent: Option<(usize, Move)>,
}

impl BfsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// # Errors
    ///
    /// `MaxSolutionLengthExceeded` if the depth limit stopped the search, and
    /// `SolutionDoesNotExist` if every reachable state was visited without
    /// finding the solved one.
    pub fn solve<C: CubeState>(&self, state: &C) -> Result<Vec<Move>, SolverError> {
        info!(start!("Breadth first search"));
        let start = Instant::now();

        let mut nodes = vec![BfsNode {
            state: state.clone(),
            depth: 0,
            parent: None,
        }];
        let mut visited = FxHashSet::default();
        visited.insert(state.clone());
        let mut queue = VecDeque::from([0]);
        let mut cut_off = false;
        let mut layer = 0;

        while let Some(index) = queue.pop_front() {
            let node = &nodes[index];
            if node.state.is_solved() {
                let solution = bfs_solution(&nodes, index);
                info!(
                    success!("Solution of length {} found in {:.3}s after visiting {} states"),
                    solution.len(),
                    start.elapsed().as_secs_f64(),
                    visited.len()
                );
                return Ok(solution);
            }
            if node.depth > layer {
                layer = node.depth;
                debug!(working!("Reached depth {} with {} states"), layer, visited.len());
            }
            if self.max_depth.is_some_and(|max_depth| node.depth >= max_depth) {
                cut_off = true;
                continue;
            }

            let state = node.state.clone();
            let depth = node.depth + 1;
            let previous = node.parent.map(|(_, move_)| move_);
            for move_ in Move::ALL {
                if !follows(previous, move_) {
                    continue;
                }
                let next = state.with_move(move_);
                if visited.contains(&next) {
                    continue;
                }
                visited.insert(next.clone());
                queue.push_back(nodes.len());
                nodes.push(BfsNode {
                    state: next,
                    depth,
                    parent: Some((index, move_)),
                });
            }
        }

        if cut_off {
            Err(SolverError::MaxSolutionLengthExceeded)
        } else {
            Err(SolverError::SolutionDoesNotExist)
        }
    }
}

fn bfs_solution<C>(nodes: &[BfsNode<C>], mut index: usize) -> Vec<Move> {
    let mut moves = vec![];
    while let Some((parent, move_)) = nodes[index].parent {
        moves.push(move_);
        index = parent;
    }
    moves.reverse();
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{
        bitboard::BitboardCube, facelet::FaceletCube, format_moves, random_moves,
        tests::apply_moves,
    };

    fn assert_solves<C: CubeState>(state: &C, solution: &[Move]) {
        let mut solved = state.clone();
        solved.apply_moves(solution);
        assert!(solved.is_solved(), "{}", format_moves(solution));
    }

    fn shortest_solutions_agree<C: CubeState>() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..8 {
            let scramble = random_moves(&mut rng, 3);
            let mut state = C::solved();
            state.apply_moves(&scramble);

            let iddfs = IddfsSolver::new().with_max_depth(3).solve(&state).unwrap();
            let bfs = BfsSolver::new().solve(&state).unwrap();
            assert_solves(&state, &iddfs);
            assert_solves(&state, &bfs);
            assert_eq!(iddfs.len(), bfs.len(), "{}", format_moves(&scramble));
            assert!(iddfs.len() <= scramble.len());
        }
    }

    #[test_log::test]
    fn test_shortest_solutions_agree() {
        shortest_solutions_agree::<BitboardCube>();
        shortest_solutions_agree::<FaceletCube>();
    }

    #[test]
    fn test_solved_needs_no_moves() {
        let state = BitboardCube::solved();
        assert_eq!(DfsSolver::new().solve(&state), Ok(vec![]));
        assert_eq!(IddfsSolver::new().solve(&state), Ok(vec![]));
        assert_eq!(BfsSolver::new().solve(&state), Ok(vec![]));
        assert_eq!(
            IddfsSolver::new().with_max_depth(0).solve(&state),
            Ok(vec![])
        );
    }

    #[test]
    fn test_single_move_is_inverted() {
        for move_ in Move::ALL {
            let state = BitboardCube::solved().with_move(move_);
            assert_eq!(
                IddfsSolver::new().solve(&state),
                Ok(vec![move_.inverse()])
            );
            assert_eq!(BfsSolver::new().solve(&state), Ok(vec![move_.inverse()]));
        }
    }

    #[test_log::test]
    fn test_dfs_finds_a_solution_within_its_limit() {
        let state = apply_moves(&BitboardCube::solved(), "R U'", 1);
        let solution = DfsSolver::new().with_max_depth(3).solve(&state).unwrap();
        assert!(solution.len() <= 3);
        assert_solves(&state, &solution);
    }

    #[test]
    fn test_depth_limit_exceeded() {
        let state = apply_moves(&FaceletCube::solved(), "R U F", 1);
        assert_eq!(
            DfsSolver::new().with_max_depth(2).solve(&state),
            Err(SolverError::MaxSolutionLengthExceeded)
        );
        assert_eq!(
            IddfsSolver::new().with_max_depth(2).solve(&state),
            Err(SolverError::MaxSolutionLengthExceeded)
        );
        assert_eq!(
            BfsSolver::new().with_max_depth(2).solve(&state),
            Err(SolverError::MaxSolutionLengthExceeded)
        );
        assert_eq!(
            IddfsSolver::new().with_max_depth(3).solve(&state).unwrap().len(),
            3
        );
    }

    #[test]
    fn test_same_face_turns_are_not_repeated() {
        assert!(follows(None, Move::ALL[0]));
        for a in Move::ALL {
            for b in Move::ALL {
                assert_eq!(follows(Some(a), b), a.face != b.face);
            }
        }
    }
}
