//! Hyper-parameter names.
//!
//! A [`ParamName`] is an open identifier: the associated constants cover the
//! names the built-in models read, and callers are free to mint their own with
//! [`ParamName::new`] without registering them anywhere.

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Name of a hyper-parameter, used as the key of parameter sets and grids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamName(Cow<'static, str>);

impl ParamName {
    /// Learning rate.
    pub const LR: ParamName = ParamName::from_static("Lr");
    /// Regularization strength.
    pub const REG: ParamName = ParamName::from_static("Reg");
    /// Number of training epochs.
    pub const N_EPOCHS: ParamName = ParamName::from_static("NEpochs");
    /// Number of latent factors.
    pub const N_FACTORS: ParamName = ParamName::from_static("NFactors");
    /// Random state (seed).
    pub const RANDOM_STATE: ParamName = ParamName::from_static("RandomState");
    /// Mean of the gaussian used to initialise factors.
    pub const INIT_MEAN: ParamName = ParamName::from_static("InitMean");
    /// Standard deviation of the gaussian used to initialise factors.
    pub const INIT_STD_DEV: ParamName = ParamName::from_static("InitStdDev");
    /// Weight for negative samples in ALS.
    pub const ALPHA: ParamName = ParamName::from_static("Alpha");
    /// Similarity metric, one of [`SIMILARITY_COSINE`] or [`SIMILARITY_DOT`].
    pub const SIMILARITY: ParamName = ParamName::from_static("Similarity");
    /// Whether side features are used.
    pub const USE_FEATURE: ParamName = ParamName::from_static("UseFeature");

    /// Names known to the built-in models.
    pub const WELL_KNOWN: [ParamName; 10] = [
        Self::LR,
        Self::REG,
        Self::N_EPOCHS,
        Self::N_FACTORS,
        Self::RANDOM_STATE,
        Self::INIT_MEAN,
        Self::INIT_STD_DEV,
        Self::ALPHA,
        Self::SIMILARITY,
        Self::USE_FEATURE,
    ];

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_well_known(&self) -> bool {
        Self::WELL_KNOWN.contains(self)
    }
}

/// Cosine similarity, a value for [`ParamName::SIMILARITY`].
pub const SIMILARITY_COSINE: &str = "Cosine";
/// Dot-product similarity, a value for [`ParamName::SIMILARITY`].
pub const SIMILARITY_DOT: &str = "Dot";

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ParamName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ParamName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParamName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ParamName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn custom_name_equals_constant_with_same_text() {
        assert_eq!(ParamName::new("Lr"), ParamName::LR);
        assert_eq!(ParamName::from("NFactors"), ParamName::N_FACTORS);

        let mut set = HashSet::new();
        set.insert(ParamName::LR);
        assert!(set.contains(&ParamName::new(String::from("Lr"))));
    }

    #[test]
    fn custom_names_need_no_registration() {
        let name = ParamName::new("Momentum");
        assert_eq!(name.as_str(), "Momentum");
        assert!(!name.is_well_known());
        assert!(ParamName::ALPHA.is_well_known());
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&ParamName::USE_FEATURE).unwrap();
        assert_eq!(json, "\"UseFeature\"");

        let back: ParamName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ParamName::USE_FEATURE);
    }

    #[test]
    fn display_uses_literal_name() {
        assert_eq!(ParamName::INIT_STD_DEV.to_string(), "InitStdDev");
    }
}
