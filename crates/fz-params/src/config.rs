//! Search run configuration.

use serde::{Deserialize, Serialize};

use fz_types::{FzResult, SearchError};

use crate::grid::ParamsGrid;
use crate::params::Params;
use crate::search::{run_search, GridSearch, RandomSearch, SearchStrategy};
use crate::trial::{ObjectiveDirection, SearchResult};

/// Which search strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Grid,
    Random,
}

/// Top-level configuration for a search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: StrategyKind,

    /// Maximum number of trials. Grid search also stops once the grid is
    /// exhausted.
    pub max_trials: usize,

    /// Seed for random search. Falls back to `RandomState` in `base`.
    pub random_state: Option<u64>,

    pub direction: ObjectiveDirection,

    /// Parameters every trial starts from; grid values override them.
    pub base: Params,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Grid,
            max_trials: 100,
            random_state: None,
            direction: ObjectiveDirection::Maximize,
            base: Params::new(),
        }
    }
}

impl SearchConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_max_trials(mut self, n: usize) -> Self {
        self.max_trials = n;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_direction(mut self, direction: ObjectiveDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_base(mut self, base: Params) -> Self {
        self.base = base;
        self
    }

    pub fn from_json(json: &str) -> FzResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FzResult<()> {
        if self.max_trials == 0 {
            return Err(SearchError::InvalidConfig {
                message: "max_trials must be positive".to_string(),
            }
            .into());
        }
        self.base.validate()?;
        Ok(())
    }

    pub fn build(&self, grid: ParamsGrid) -> FzResult<Box<dyn SearchStrategy>> {
        self.validate()?;
        Ok(match self.strategy {
            StrategyKind::Grid => Box::new(GridSearch::new(grid, self.base.clone())),
            StrategyKind::Random => Box::new(RandomSearch::new(
                grid,
                self.base.clone(),
                self.random_state,
            )?),
        })
    }

    pub fn run<F>(&self, grid: ParamsGrid, objective: F) -> FzResult<SearchResult>
    where
        F: FnMut(&Params) -> FzResult<f32>,
    {
        let mut strategy = self.build(grid)?;
        run_search(strategy.as_mut(), self.max_trials, self.direction, objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use fz_types::{FzError, ParamName};

    fn sample_grid() -> ParamsGrid {
        ParamsGrid::new()
            .with(ParamName::N_EPOCHS, [10, 20])
            .unwrap()
            .with(ParamName::LR, [0.01, 0.05, 0.1])
            .unwrap()
    }

    #[test]
    fn defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.strategy, StrategyKind::Grid);
        assert_eq!(config.max_trials, 100);
        assert_eq!(config.direction, ObjectiveDirection::Maximize);
        assert!(config.base.is_empty());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = SearchConfig::from_json(
            r#"{"strategy": "random", "random_state": 7, "base": {"NFactors": 16}}"#,
        )
        .unwrap();
        assert_eq!(config.strategy, StrategyKind::Random);
        assert_eq!(config.random_state, Some(7));
        assert_eq!(config.max_trials, 100);
        assert_eq!(config.base.get_int(&ParamName::N_FACTORS, 0), 16);
    }

    #[test]
    fn from_json_rejects_zero_trials() {
        assert!(matches!(
            SearchConfig::from_json(r#"{"max_trials": 0}"#),
            Err(FzError::Search(SearchError::InvalidConfig { .. }))
        ));
        assert!(matches!(
            SearchConfig::from_json(r#"{"strategy": "bayesian"}"#),
            Err(FzError::Serialization(_))
        ));
    }

    #[test]
    fn builds_requested_strategy() {
        let grid = SearchConfig::new(StrategyKind::Grid).build(sample_grid()).unwrap();
        assert_eq!(grid.name(), "grid");

        let random = SearchConfig::new(StrategyKind::Random)
            .with_random_state(1)
            .build(sample_grid())
            .unwrap();
        assert_eq!(random.name(), "random");
    }

    #[test]
    fn run_grid_search_with_base() {
        let config = SearchConfig::new(StrategyKind::Grid)
            .with_direction(ObjectiveDirection::Minimize)
            .with_base(params! { ParamName::N_FACTORS => 32, ParamName::LR => 1.0 });

        let result = config
            .run(sample_grid(), |params| {
                assert_eq!(params.get_int(&ParamName::N_FACTORS, 0), 32);
                let lr = params.get_float32(&ParamName::LR, 1.0);
                let epochs = params.get_int(&ParamName::N_EPOCHS, 0) as f32;
                Ok(lr * epochs)
            })
            .unwrap();

        assert_eq!(result.len(), 6);
        let best = result.best_params().unwrap();
        assert_eq!(best.get_int(&ParamName::N_EPOCHS, 0), 10);
        assert_eq!(best.get_float32(&ParamName::LR, 0.0), 0.01);
    }

    #[test]
    fn config_round_trip() {
        let config = SearchConfig::new(StrategyKind::Random)
            .with_max_trials(20)
            .with_random_state(99)
            .with_base(params! { ParamName::SIMILARITY => "Cosine" });
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SearchConfig::from_json(&json).unwrap(), config);
    }
}
