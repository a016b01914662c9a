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

use std::fmt;

use crate::accumulator::Accumulator;
use crate::accumulator::describe;
use crate::codec::Kind;
use crate::codec::StateBytes;
use crate::codec::StateSlice;
use crate::error::Error;
use crate::moments::Mean;
use crate::moments::deviations::Deviations;
use crate::moments::deviations::Product;
use crate::observation::Observation;

/// Sample variance with Bessel's correction, elementwise for array observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Variance {
    inner: Deviations<Mean>,
}

/// Sample covariance matrix of vector observations.
///
/// Observations of any shape are flattened; the value has shape `[len, len]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance {
    inner: Deviations<Mean>,
}

impl Variance {
    /// Creates an empty variance; the first observation locks the shape.
    pub fn new() -> Self {
        Self {
            inner: Deviations::new(Mean::new(), Mean::new(), Product::Elementwise),
        }
    }

    /// Returns the mean of the observations.
    pub fn mean(&self) -> Option<Observation> {
        self.inner.centre.value()
    }

    /// Returns the sample standard deviation.
    pub fn std(&self) -> Option<Observation> {
        self.value().map(|var| var.map(f64::sqrt))
    }

    /// Returns the root mean square of the observations.
    pub fn rms(&self) -> Option<Observation> {
        let mean = self.inner.centre.value()?;
        let spread = self.inner.spread.value()?;
        Some(mean.zip_with(&spread, |m, s| (m * m + s).sqrt()))
    }

    /// Serializes the current state.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        serialize(&self.inner, Kind::VARIANCE)
    }

    /// Deserializes a state produced by [`Variance::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            inner: deserialize(bytes, Kind::VARIANCE, Product::Elementwise)?,
        })
    }
}

impl Covariance {
    /// Creates an empty covariance; the first observation locks the shape.
    pub fn new() -> Self {
        Self {
            inner: Deviations::new(Mean::new(), Mean::new(), Product::Outer),
        }
    }

    /// Returns the mean vector of the observations.
    pub fn mean(&self) -> Option<Observation> {
        self.inner.centre.value()
    }

    /// Returns the per-element sample standard deviation, the root of the diagonal.
    pub fn std(&self) -> Option<Observation> {
        let covariance = self.value()?;
        let dim = covariance.shape()[0];
        let diagonal = (0..dim)
            .map(|i| covariance.values()[i * dim + i].sqrt())
            .collect::<Vec<_>>();
        Some(Observation::from(diagonal))
    }

    /// Serializes the current state.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        serialize(&self.inner, Kind::COVARIANCE)
    }

    /// Deserializes a state produced by [`Covariance::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            inner: deserialize(bytes, Kind::COVARIANCE, Product::Outer)?,
        })
    }
}

macro_rules! impl_welford {
    ($name:ident, $kind:literal) => {
        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Accumulator for $name {
            type Item = Observation;
            type Value = Observation;
            const KIND: &'static str = $kind;

            fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
                self.inner.fold(item.into())
            }

            fn merge(&mut self, other: &Self) -> Result<(), Error> {
                merge(&mut self.inner, &other.inner)
            }

            fn value(&self) -> Option<Observation> {
                bessel_corrected(&self.inner)
            }

            fn n(&self) -> u64 {
                self.inner.count()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                describe(self, f)
            }
        }
    };
}

impl_welford!(Variance, "Variance");
impl_welford!(Covariance, "Covariance");

fn bessel_corrected(inner: &Deviations<Mean>) -> Option<Observation> {
    let n = inner.count();
    if n < 2 {
        return None;
    }
    let correction = n as f64 / (n - 1) as f64;
    inner.spread.value().map(|spread| spread.map(|s| s * correction))
}

/// Parallel-variance combination of two Welford states.
///
/// With `S_i = spread_i * n_i` and `delta = mean_2 - mean_1`, the merged spread is
/// `(S_1 + S_2 + delta ⊗ delta * n_1 * n_2 / n) / n`.
fn merge(ours: &mut Deviations<Mean>, theirs: &Deviations<Mean>) -> Result<(), Error> {
    ours.centre.shape_lock().check_merge(theirs.centre.shape_lock())?;
    let (n1, n2) = (ours.count(), theirs.count());
    if n2 == 0 {
        return Ok(());
    }
    if n1 == 0 {
        *ours = theirs.clone();
        return Ok(());
    }
    let (Some(m1), Some(m2), Some(s1), Some(s2)) = (
        ours.centre.value(),
        theirs.centre.value(),
        ours.spread.value(),
        theirs.spread.value(),
    ) else {
        return Ok(());
    };

    let total = (n1 + n2) as f64;
    let (w1, w2) = (n1 as f64, n2 as f64);
    let delta = m2.zip_with(&m1, |a, b| a - b);
    let cross = ours.product.apply(&delta, &delta);
    let combined = s1
        .zip_with(&s2, |a, b| a * w1 + b * w2)
        .zip_with(&cross, |s, c| (s + c * w1 * w2 / total) / total);

    ours.centre.merge(&theirs.centre)?;
    ours.spread = Mean::from_parts(combined, n1 + n2);
    Ok(())
}

fn serialize(inner: &Deviations<Mean>, kind: Kind) -> Result<Vec<u8>, Error> {
    let mut bytes = StateBytes::with_capacity(64);
    bytes.write_preamble(kind, inner.count(), inner.centre.shape_lock().get())?;
    if let (Some(centre), Some(spread)) = (inner.centre.value(), inner.spread.value()) {
        bytes.write_values(centre.values());
        bytes.write_values(spread.values());
    }
    Ok(bytes.into_bytes())
}

fn deserialize(bytes: &[u8], kind: Kind, product: Product) -> Result<Deviations<Mean>, Error> {
    let mut slice = StateSlice::new(bytes);
    let (n, shape) = slice.read_preamble(kind)?;
    let mut inner = Deviations::new(Mean::new(), Mean::new(), product);
    if let Some(shape) = shape {
        if n > 0 {
            let centre = slice.read_observation(&shape)?;
            let spread_shape = match product {
                Product::Elementwise => shape.clone(),
                Product::Outer => vec![centre.len(), centre.len()],
            };
            let spread = slice.read_observation(&spread_shape)?;
            inner.centre = Mean::from_parts(centre, n);
            inner.spread = Mean::from_parts(spread, n);
        } else {
            inner.centre = Mean::with_locked_shape(&shape);
        }
    }
    slice.finish()?;
    Ok(inner)
}
