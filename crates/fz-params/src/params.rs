//! Hyper-parameter sets.
//!
//! A [`Params`] maps each [`ParamName`] to exactly one [`ParamValue`]. There is
//! no static link between a name and a kind: the model reading a value decides
//! which kind it expects, and the typed getters apply the widening rules below.
//!
//! | getter        | accepted kinds                  |
//! |---------------|---------------------------------|
//! | `get_bool`    | bool                            |
//! | `get_int`     | int                             |
//! | `get_int64`   | int64, int                      |
//! | `get_float32` | float32, float64, int           |
//! | `get_string`  | string                          |

use serde::ser::{self, SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};

use fz_types::{FzResult, ParamKind, ParamName, ParamValue, ParamsError};

/// Conversion from a stored value into the type a getter returns.
pub trait FromParamValue: Sized {
    /// The kind reported as "expected" on a mismatch.
    const KIND: ParamKind;

    /// Returns `None` when `value` holds a kind this type does not accept.
    fn from_param_value(value: &ParamValue) -> Option<Self>;
}

impl FromParamValue for bool {
    const KIND: ParamKind = ParamKind::Bool;

    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromParamValue for i32 {
    const KIND: ParamKind = ParamKind::Int;

    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromParamValue for i64 {
    const KIND: ParamKind = ParamKind::Int64;

    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int64(v) => Some(*v),
            ParamValue::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }
}

impl FromParamValue for f32 {
    const KIND: ParamKind = ParamKind::Float32;

    // Narrowing from f64 (and i32 beyond 2^24) rounds to the nearest f32.
    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Float32(v) => Some(*v),
            ParamValue::Float64(v) => Some(*v as f32),
            ParamValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl FromParamValue for String {
    const KIND: ParamKind = ParamKind::Str;

    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Outcome of looking up a typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    KindMismatch { expected: ParamKind, actual: ParamKind },
    Absent,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::KindMismatch { .. })
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.found().unwrap_or(default)
    }

    /// Absent is `Ok(None)`; a wrong kind becomes [`ParamsError::KindMismatch`].
    pub fn into_result(self, name: &ParamName) -> Result<Option<T>, ParamsError> {
        match self {
            Self::Found(v) => Ok(Some(v)),
            Self::Absent => Ok(None),
            Self::KindMismatch { expected, actual } => Err(ParamsError::KindMismatch {
                name: name.clone(),
                expected,
                actual,
            }),
        }
    }
}

/// Hyper-parameters for a model.
///
/// ```
/// use fz_params::{params, Params};
/// use fz_types::ParamName;
///
/// let svd = params! {
///     ParamName::LR => 0.007,
///     ParamName::N_EPOCHS => 100,
///     ParamName::N_FACTORS => 80,
///     ParamName::REG => 0.1,
/// };
/// assert_eq!(svd.get_int(&ParamName::N_FACTORS, 10), 80);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<ParamName, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<ParamName>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Binds `name`, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<ParamName>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamName, &ParamValue)> {
        self.values.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &ParamName> {
        self.values.keys()
    }

    pub fn lookup<T: FromParamValue>(&self, name: &ParamName) -> Lookup<T> {
        match self.values.get(name) {
            None => Lookup::Absent,
            Some(value) => match T::from_param_value(value) {
                Some(v) => Lookup::Found(v),
                None => Lookup::KindMismatch {
                    expected: T::KIND,
                    actual: value.kind(),
                },
            },
        }
    }

    /// Typed read with default fallback. A wrong kind is logged and treated as
    /// absent; use [`Params::lookup`] to tell the two apart.
    pub fn get_or<T: FromParamValue>(&self, name: &ParamName, default: T) -> T {
        match self.lookup(name) {
            Lookup::Found(v) => v,
            Lookup::Absent => default,
            Lookup::KindMismatch { expected, actual } => {
                error!(
                    param_name = %name,
                    expected = %expected,
                    actual = %actual,
                    "type mismatch"
                );
                default
            }
        }
    }

    pub fn get_bool(&self, name: &ParamName, default: bool) -> bool {
        self.get_or(name, default)
    }

    pub fn get_int(&self, name: &ParamName, default: i32) -> i32 {
        self.get_or(name, default)
    }

    /// Accepts int64 and widens int.
    pub fn get_int64(&self, name: &ParamName, default: i64) -> i64 {
        self.get_or(name, default)
    }

    /// Accepts float32, and converts float64 and int.
    pub fn get_float32(&self, name: &ParamName, default: f32) -> f32 {
        self.get_or(name, default)
    }

    pub fn get_string(&self, name: &ParamName, default: &str) -> String {
        self.get_or(name, default.to_string())
    }

    /// Right-biased merge: bindings of `other` win over ours.
    pub fn overwrite(&self, other: &Params) -> Params {
        let mut merged = self.clone();
        merged
            .values
            .extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        debug!(
            base = self.len(),
            overrides = other.len(),
            merged = merged.len(),
            "merged params"
        );
        merged
    }

    /// Fails on the first value JSON cannot carry.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in &self.values {
            if !value.is_finite() {
                return Err(ParamsError::NotRepresentable {
                    name: name.clone(),
                    reason: format!("{} value {value} is not finite", value.kind()),
                });
            }
        }
        Ok(())
    }

    /// Canonical JSON object, keys in name order. Either the whole set is
    /// written or an error is returned.
    pub fn to_json(&self) -> FzResult<String> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> FzResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Serialize for Params {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.validate().map_err(ser::Error::custom)?;
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<N, V> FromIterator<(N, V)> for Params
where
    N: Into<ParamName>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<N, V> Extend<(N, V)> for Params
where
    N: Into<ParamName>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a ParamName, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, ParamName, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Builds a [`Params`] from `name => value` pairs.
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $( params.insert($name, $value); )+
        params
    }};
}
