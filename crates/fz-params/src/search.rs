//! Grid and random search over a [`ParamsGrid`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use fz_types::{FzResult, ParamName, SearchError};

use crate::grid::ParamsGrid;
use crate::params::Params;
use crate::trial::{ObjectiveDirection, SearchResult};

/// Common trait for all search strategies.
pub trait SearchStrategy: Send + Sync {
    /// Generate the next batch of parameter sets to evaluate.
    fn suggest(&mut self, count: usize) -> Vec<Params>;

    /// Human-readable strategy name.
    fn name(&self) -> &str;
}

// ---- Grid search ----

/// Exhaustive search over every combination of a grid.
///
/// Each suggestion is the base parameters overwritten by one combination.
#[derive(Debug, Clone)]
pub struct GridSearch {
    grid: ParamsGrid,
    base: Params,
    cursor: usize,
    total: usize,
}

impl GridSearch {
    pub fn new(grid: ParamsGrid, base: Params) -> Self {
        let total = grid.num_combinations();
        info!(dimensions = grid.len(), combinations = total, "grid search");
        Self {
            grid,
            base,
            cursor: 0,
            total,
        }
    }

    pub fn remaining(&self) -> usize {
        self.total - self.cursor
    }
}

impl SearchStrategy for GridSearch {
    fn suggest(&mut self, count: usize) -> Vec<Params> {
        let end = self.cursor.saturating_add(count).min(self.total);
        let batch = (self.cursor..end)
            .filter_map(|i| self.grid.combination(i))
            .map(|combo| self.base.overwrite(&combo))
            .collect();
        self.cursor = end;
        batch
    }

    fn name(&self) -> &str {
        "grid"
    }
}

// ---- Random search ----

/// Uniform sampling of grid combinations.
///
/// Draws without repetition until every combination has been suggested, then
/// starts a fresh round.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    grid: ParamsGrid,
    base: Params,
    rng: StdRng,
    total: usize,
    drawn: usize,
    // Sparse Fisher-Yates permutation: slot -> combination index.
    swaps: HashMap<usize, usize>,
}

impl RandomSearch {
    /// Seeds from `seed`, else the base `RandomState`, else OS entropy.
    pub fn new(grid: ParamsGrid, base: Params, seed: Option<u64>) -> FzResult<Self> {
        let total = grid
            .checked_num_combinations()
            .ok_or_else(|| SearchError::InvalidConfig {
                message: "grid has too many combinations to sample".to_string(),
            })?;

        let seed = seed.or_else(|| {
            base.lookup::<i64>(&ParamName::RANDOM_STATE)
                .found()
                .map(|s| s as u64)
        });
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(dimensions = grid.len(), combinations = total, seed = ?seed, "random search");

        Ok(Self {
            grid,
            base,
            rng,
            total,
            drawn: 0,
            swaps: HashMap::new(),
        })
    }

    fn slot(&self, i: usize) -> usize {
        self.swaps.get(&i).copied().unwrap_or(i)
    }

    fn draw_index(&mut self) -> usize {
        if self.drawn == self.total {
            debug!(combinations = self.total, "all combinations drawn, starting a new round");
            self.drawn = 0;
            self.swaps.clear();
        }
        let j = self.rng.random_range(self.drawn..self.total);
        let picked = self.slot(j);
        let displaced = self.slot(self.drawn);
        self.swaps.insert(j, displaced);
        self.drawn += 1;
        picked
    }
}

impl SearchStrategy for RandomSearch {
    fn suggest(&mut self, count: usize) -> Vec<Params> {
        let mut batch = Vec::new();
        for _ in 0..count {
            let index = self.draw_index();
            if let Some(combo) = self.grid.combination(index) {
                batch.push(self.base.overwrite(&combo));
            }
        }
        batch
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Drives `strategy` for at most `max_trials` evaluations of `objective`.
///
/// A failing evaluation aborts the search and its error is returned.
pub fn run_search<F>(
    strategy: &mut dyn SearchStrategy,
    max_trials: usize,
    direction: ObjectiveDirection,
    mut objective: F,
) -> FzResult<SearchResult>
where
    F: FnMut(&Params) -> FzResult<f32>,
{
    let mut result = SearchResult::new(direction);
    while result.len() < max_trials {
        let batch = strategy.suggest(max_trials - result.len());
        if batch.is_empty() {
            break;
        }
        for params in batch {
            let score = objective(&params)?;
            if result.record(params, score) {
                debug!(trial = result.len() - 1, score, "new best trial");
            }
        }
    }

    match result.best_score() {
        Some(best_score) => info!(
            strategy = strategy.name(),
            trials = result.len(),
            best_score,
            "search finished"
        ),
        None => warn!(strategy = strategy.name(), "search finished without a scored trial"),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use fz_types::FzError;
    use std::collections::HashSet;

    fn sample_grid() -> ParamsGrid {
        ParamsGrid::new()
            .with(ParamName::N_FACTORS, [8, 16, 32])
            .unwrap()
            .with(ParamName::REG, [0.01, 0.1])
            .unwrap()
    }

    #[test]
    fn grid_search_produces_every_combination() {
        let base = params! { ParamName::N_EPOCHS => 50 };
        let mut gs = GridSearch::new(sample_grid(), base);
        let batch = gs.suggest(100);
        assert_eq!(batch.len(), 6);
        for params in &batch {
            assert_eq!(params.get_int(&ParamName::N_EPOCHS, 0), 50);
            assert_eq!(params.len(), 3);
        }
    }

    #[test]
    fn grid_search_cursor_advances() {
        let mut gs = GridSearch::new(sample_grid(), Params::new());
        let first = gs.suggest(4);
        assert_eq!(first.len(), 4);
        assert_eq!(gs.remaining(), 2);
        let second = gs.suggest(10);
        assert_eq!(second.len(), 2); // only 2 remain
        assert!(gs.suggest(1).is_empty());
    }

    #[test]
    fn grid_values_override_base() {
        let base = params! { ParamName::REG => 0.5, ParamName::LR => 0.05 };
        let mut gs = GridSearch::new(sample_grid(), base);
        for params in gs.suggest(6) {
            assert_ne!(params.get_float32(&ParamName::REG, 0.0), 0.5);
            assert_eq!(params.get_float32(&ParamName::LR, 0.0), 0.05);
        }
    }

    #[test]
    fn random_search_covers_grid_before_repeating() {
        let mut rs = RandomSearch::new(sample_grid(), Params::new(), Some(7)).unwrap();
        let first_round = rs.suggest(6);
        let unique: HashSet<String> = first_round
            .iter()
            .map(|p| p.to_json().unwrap())
            .collect();
        assert_eq!(unique.len(), 6);

        let next = rs.suggest(4);
        assert_eq!(next.len(), 4);
    }

    #[test]
    fn random_search_is_reproducible_with_seed() {
        let mut a = RandomSearch::new(sample_grid(), Params::new(), Some(42)).unwrap();
        let mut b = RandomSearch::new(sample_grid(), Params::new(), Some(42)).unwrap();
        assert_eq!(a.suggest(5), b.suggest(5));
    }

    #[test]
    fn random_search_seeds_from_random_state() {
        let base = params! { ParamName::RANDOM_STATE => 3 };
        let mut a = RandomSearch::new(sample_grid(), base.clone(), None).unwrap();
        let mut b = RandomSearch::new(sample_grid(), Params::new(), Some(3)).unwrap();
        let factors = |batch: Vec<Params>| -> Vec<i32> {
            batch
                .iter()
                .map(|p| p.get_int(&ParamName::N_FACTORS, 0))
                .collect()
        };
        assert_eq!(factors(a.suggest(6)), factors(b.suggest(6)));
    }

    #[test]
    fn random_search_rejects_unbounded_grid() {
        let mut grid = ParamsGrid::new();
        for i in 0..70 {
            grid.insert(format!("P{i}"), [true, false]).unwrap();
        }
        assert!(matches!(
            RandomSearch::new(grid, Params::new(), Some(1)),
            Err(FzError::Search(SearchError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn run_search_finds_best_combination() {
        let mut gs = GridSearch::new(sample_grid(), Params::new());
        let result = run_search(&mut gs, 100, ObjectiveDirection::Minimize, |params| {
            let factors = params.get_int(&ParamName::N_FACTORS, 0) as f32;
            let reg = params.get_float32(&ParamName::REG, 0.0);
            Ok((factors - 16.0).abs() + reg)
        })
        .unwrap();

        assert_eq!(result.len(), 6);
        let best = result.best_params().unwrap();
        assert_eq!(best.get_int(&ParamName::N_FACTORS, 0), 16);
        assert_eq!(best.get_float32(&ParamName::REG, 0.0), 0.01);
    }

    #[test]
    fn run_search_respects_max_trials() {
        let mut rs = RandomSearch::new(sample_grid(), Params::new(), Some(1)).unwrap();
        let result = run_search(&mut rs, 10, ObjectiveDirection::Maximize, |_| Ok(1.0)).unwrap();
        assert_eq!(result.len(), 10);
    }

    #[test]
    fn run_search_propagates_objective_errors() {
        let mut gs = GridSearch::new(sample_grid(), Params::new());
        let err = run_search(&mut gs, 6, ObjectiveDirection::Maximize, |_| {
            Err(fz_types::validation_error!("model diverged"))
        })
        .unwrap_err();
        assert!(matches!(err, FzError::Validation(_)));
    }
}
