// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Scalar and fixed-shape array observations.
//!
//! An [`Observation`] is a row-major buffer of `f64` values together with its
//! shape. A scalar has the empty shape `[]` and exactly one value.
//!
//! ```rust
//! # use accumulators::Observation;
//! let scalar = Observation::from(2.5);
//! assert!(scalar.is_scalar());
//! assert_eq!(scalar.as_scalar(), Some(2.5));
//!
//! let matrix = Observation::with_shape(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(matrix.shape(), &[2, 2]);
//! assert_eq!(Vec::<f64>::from(matrix), vec![1.0, 2.0, 3.0, 4.0]);
//! ```

use std::fmt;

use crate::error::Error;

/// A scalar or a fixed-shape array of scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl Observation {
    /// Creates an observation of the given shape from row-major values.
    ///
    /// Fails if the number of values does not match the product of the shape.
    pub fn with_shape(shape: Vec<usize>, values: Vec<f64>) -> Result<Self, Error> {
        if element_count(&shape) != Some(values.len()) {
            return Err(Error::config("number of values does not match shape")
                .with_context("shape", format!("{shape:?}"))
                .with_context("values", values.len()));
        }
        Ok(Self { shape, values })
    }

    /// Creates a scalar observation.
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            values: vec![value],
        }
    }

    /// Creates an observation of the given shape with every element set to `value`.
    pub fn filled(shape: &[usize], value: f64) -> Self {
        let len = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            values: vec![value; len],
        }
    }

    pub(crate) fn from_parts(shape: Vec<usize>, values: Vec<f64>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        Self { shape, values }
    }

    /// Returns the shape; empty for scalars.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the observation holds no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if this is a scalar (shape `[]`).
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Returns the single value of a one-element observation.
    pub fn as_scalar(&self) -> Option<f64> {
        match self.values.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }

    /// Consumes the observation and returns its row-major values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Returns a new observation with `f` applied to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            shape: self.shape.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combines two same-shaped observations element by element.
    pub(crate) fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.shape, other.shape);
        Self {
            shape: self.shape.clone(),
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Returns the outer product of the flattened `self` and `other`, shaped `[len, len]`.
    pub(crate) fn outer(&self, other: &Self) -> Self {
        let mut values = Vec::with_capacity(self.len() * other.len());
        for &a in &self.values {
            values.extend(other.values.iter().map(|&b| a * b));
        }
        Self {
            shape: vec![self.len(), other.len()],
            values,
        }
    }

    pub(crate) fn ensure_shape(&self, expected: &[usize]) -> Result<(), Error> {
        if self.shape == expected {
            Ok(())
        } else {
            Err(Error::shape_mismatch(expected, &self.shape))
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_scalar() {
            Some(value) if self.is_scalar() => write!(f, "{value}"),
            _ => write!(f, "{:?} {:?}", self.shape, self.values),
        }
    }
}

impl From<f64> for Observation {
    fn from(value: f64) -> Self {
        Observation::scalar(value)
    }
}

impl From<f32> for Observation {
    fn from(value: f32) -> Self {
        Observation::scalar(value as f64)
    }
}

impl From<i64> for Observation {
    fn from(value: i64) -> Self {
        Observation::scalar(value as f64)
    }
}

impl From<i32> for Observation {
    fn from(value: i32) -> Self {
        Observation::scalar(value as f64)
    }
}

impl From<Vec<f64>> for Observation {
    fn from(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }
}

impl From<&[f64]> for Observation {
    fn from(values: &[f64]) -> Self {
        Observation::from(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Observation {
    fn from(values: [f64; N]) -> Self {
        Observation::from(values.to_vec())
    }
}

impl From<Observation> for Vec<f64> {
    fn from(observation: Observation) -> Self {
        observation.values
    }
}

/// Number of elements in an array of `shape`, `None` on overflow.
pub(crate) fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |count, &dim| count.checked_mul(dim))
}

/// Element shape of an accumulator, locked by the first observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ShapeLock {
    shape: Option<Vec<usize>>,
}

impl ShapeLock {
    pub(crate) fn locked(shape: &[usize]) -> Self {
        Self {
            shape: Some(shape.to_vec()),
        }
    }

    pub(crate) fn get(&self) -> Option<&[usize]> {
        self.shape.as_deref()
    }

    /// Locks the shape on first use, otherwise checks `observation` against it.
    pub(crate) fn check(
        &mut self,
        kind: &'static str,
        observation: &Observation,
    ) -> Result<(), Error> {
        match &self.shape {
            Some(shape) => observation.ensure_shape(shape),
            None => {
                tracing::debug!(
                    kind,
                    shape = ?observation.shape(),
                    "locking element shape on first ingest"
                );
                self.shape = Some(observation.shape().to_vec());
                Ok(())
            }
        }
    }

    /// Checks that two accumulators agree on shape; an unlocked side is compatible
    /// with anything.
    pub(crate) fn check_merge(&self, other: &ShapeLock) -> Result<(), Error> {
        match (&self.shape, &other.shape) {
            (Some(a), Some(b)) if a != b => {
                tracing::warn!(expected = ?a, found = ?b, "rejected merge of mismatched shapes");
                Err(Error::shape_mismatch(a, b))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_shape_rejects_wrong_length() {
        let err = Observation::with_shape(vec![2, 3], vec![0.0; 5]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_outer_product() {
        let a = Observation::from([1.0, 2.0]);
        let b = Observation::from([3.0, 4.0]);
        let outer = a.outer(&b);
        assert_eq!(outer.shape(), &[2, 2]);
        assert_eq!(outer.values(), &[3.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_shape_lock() {
        let mut lock = ShapeLock::default();
        lock.check("Test", &Observation::from([1.0, 2.0])).unwrap();
        assert_eq!(lock.get(), Some(&[2usize][..]));
        let err = lock.check("Test", &Observation::from(1.0)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ShapeMismatch);
    }
}
