//! Trial bookkeeping for a search run.

use serde::{Deserialize, Serialize};
use tracing::warn;

use fz_types::{FzResult, SearchError};

use crate::params::Params;

/// Whether we are maximizing or minimizing the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveDirection {
    #[default]
    Maximize,
    Minimize,
}

impl ObjectiveDirection {
    pub fn improves(&self, candidate: f32, current: f32) -> bool {
        match self {
            Self::Maximize => candidate > current,
            Self::Minimize => candidate < current,
        }
    }
}

/// One evaluated parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub params: Params,
    /// `None` when the objective produced a NaN or infinite score.
    pub score: Option<f32>,
}

/// Every trial of a search, plus the best one so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub direction: ObjectiveDirection,
    trials: Vec<TrialResult>,
    best_index: Option<usize>,
}

impl SearchResult {
    pub fn new(direction: ObjectiveDirection) -> Self {
        Self {
            direction,
            trials: Vec::new(),
            best_index: None,
        }
    }

    /// Records a trial and returns whether it became the best one.
    /// Non-finite scores are kept as unscored trials and never ranked.
    pub fn record(&mut self, params: Params, score: f32) -> bool {
        let score = if score.is_finite() {
            Some(score)
        } else {
            warn!(score = %score, "trial score is not finite, excluded from ranking");
            None
        };
        let improves = match (score, self.best_score()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(candidate), Some(current)) => self.direction.improves(candidate, current),
        };
        self.trials.push(TrialResult { params, score });
        if improves {
            self.best_index = Some(self.trials.len() - 1);
        }
        improves
    }

    pub fn best(&self) -> Option<&TrialResult> {
        self.best_index.and_then(|i| self.trials.get(i))
    }

    pub fn require_best(&self) -> FzResult<&TrialResult> {
        Ok(self.best().ok_or(SearchError::NoTrials)?)
    }

    pub fn best_params(&self) -> Option<&Params> {
        self.best().map(|t| &t.params)
    }

    pub fn best_score(&self) -> Option<f32> {
        self.best().and_then(|t| t.score)
    }

    pub fn trials(&self) -> &[TrialResult] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}
