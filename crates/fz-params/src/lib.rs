//! # fz-params
//!
//! Hyper-parameter configuration for Furze models.
//!
//! Provides the per-model parameter set ([`Params`]) with typed, default-backed
//! getters, the grid search space ([`ParamsGrid`]), and grid/random search
//! drivers that expand a grid into parameter sets and track the best trial.

mod config;
mod grid;
mod params;
mod search;
mod telemetry;
mod trial;

pub use config::{SearchConfig, StrategyKind};
pub use grid::{Combinations, ParamsGrid};
pub use params::{FromParamValue, Lookup, Params};
pub use search::{run_search, GridSearch, RandomSearch, SearchStrategy};
pub use telemetry::{init_tracing, DEFAULT_FILTER};
pub use trial::{ObjectiveDirection, SearchResult, TrialResult};

pub use fz_types::{
    FzError, FzResult, ParamKind, ParamName, ParamValue, ParamsError, SearchError,
    SIMILARITY_COSINE, SIMILARITY_DOT,
};
