//! Grid search spaces.

use serde::ser::{self, SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use fz_types::{FzResult, ParamName, ParamValue, ParamsError};

use crate::params::Params;

/// Candidate values per hyper-parameter.
///
/// Every dimension holds at least one candidate, so the number of
/// combinations is the product of the candidate counts and an empty grid has
/// exactly one (empty) combination.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<ParamName, Vec<ParamValue>>")]
pub struct ParamsGrid {
    dimensions: BTreeMap<ParamName, Vec<ParamValue>>,
}

impl ParamsGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the candidates of `name`, replacing any previous list.
    pub fn insert<V>(
        &mut self,
        name: impl Into<ParamName>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Option<Vec<ParamValue>>, ParamsError>
    where
        V: Into<ParamValue>,
    {
        let name = name.into();
        let values: Vec<ParamValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ParamsError::EmptyCandidates { name });
        }
        Ok(self.dimensions.insert(name, values))
    }

    pub fn with<V>(
        mut self,
        name: impl Into<ParamName>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, ParamsError>
    where
        V: Into<ParamValue>,
    {
        self.insert(name, values)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&[ParamValue]> {
        self.dimensions.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dimensions.contains_key(name)
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamName, &[ParamValue])> {
        self.dimensions
            .iter()
            .map(|(name, values)| (name, values.as_slice()))
    }

    /// `None` when the product overflows `usize`.
    pub fn checked_num_combinations(&self) -> Option<usize> {
        self.dimensions
            .values()
            .try_fold(1usize, |total, values| total.checked_mul(values.len()))
    }

    /// Product of the candidate counts, saturating at `usize::MAX`.
    pub fn num_combinations(&self) -> usize {
        self.checked_num_combinations().unwrap_or(usize::MAX)
    }

    /// Adds every dimension of `defaults` we lack. Our own dimensions are kept.
    pub fn fill(&mut self, defaults: &ParamsGrid) {
        for (name, values) in &defaults.dimensions {
            if !self.dimensions.contains_key(name) {
                debug!(param_name = %name, candidates = values.len(), "filled grid dimension");
                self.dimensions.insert(name.clone(), values.clone());
            }
        }
    }

    /// The combination at `index`, decoding it in mixed radix over the
    /// dimensions in name order. The last dimension varies fastest.
    pub fn combination(&self, index: usize) -> Option<Params> {
        let mut rest = index;
        let mut picks = Vec::with_capacity(self.dimensions.len());
        for (name, values) in self.dimensions.iter().rev() {
            picks.push((name.clone(), values[rest % values.len()].clone()));
            rest /= values.len();
        }
        if rest != 0 {
            return None;
        }
        Some(picks.into_iter().collect())
    }

    pub fn combinations(&self) -> Combinations<'_> {
        Combinations {
            grid: self,
            next: 0,
            remaining: self.checked_num_combinations(),
        }
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, values) in &self.dimensions {
            if values.is_empty() {
                return Err(ParamsError::EmptyCandidates { name: name.clone() });
            }
            if let Some(value) = values.iter().find(|v| !v.is_finite()) {
                return Err(ParamsError::NotRepresentable {
                    name: name.clone(),
                    reason: format!("candidate {value} is not finite"),
                });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> FzResult<String> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> FzResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<BTreeMap<ParamName, Vec<ParamValue>>> for ParamsGrid {
    type Error = ParamsError;

    fn try_from(dimensions: BTreeMap<ParamName, Vec<ParamValue>>) -> Result<Self, Self::Error> {
        let grid = Self { dimensions };
        match grid.dimensions.iter().find(|(_, values)| values.is_empty()) {
            Some((name, _)) => Err(ParamsError::EmptyCandidates { name: name.clone() }),
            None => Ok(grid),
        }
    }
}

impl Serialize for ParamsGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.validate().map_err(ser::Error::custom)?;
        let mut map = serializer.serialize_map(Some(self.dimensions.len()))?;
        for (name, values) in &self.dimensions {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Iterator over every combination of a [`ParamsGrid`].
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    grid: &'a ParamsGrid,
    next: usize,
    remaining: Option<usize>,
}

impl Iterator for Combinations<'_> {
    type Item = Params;

    fn next(&mut self) -> Option<Params> {
        let combination = self.grid.combination(self.next)?;
        self.next += 1;
        self.remaining = self.remaining.map(|n| n.saturating_sub(1));
        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}
