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
use crate::moments::deviations::Centre;
use crate::observation::Observation;
use crate::observation::ShapeLock;

/// Incremental arithmetic mean.
///
/// Each observation moves the mean by `(x - mean) / n`. Merging weights the two
/// means by their counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Mean {
    shape: ShapeLock,
    mean: Option<Observation>,
    n: u64,
}

impl Mean {
    /// Creates an empty mean; the first observation locks the shape.
    pub fn new() -> Self {
        Self {
            shape: ShapeLock::default(),
            mean: None,
            n: 0,
        }
    }

    /// Creates a mean that already summarizes `n` observations averaging `value`.
    ///
    /// The shape of `value` is locked.
    pub fn from_parts(value: impl Into<Observation>, n: u64) -> Self {
        let value = value.into();
        Self {
            shape: ShapeLock::locked(value.shape()),
            mean: Some(value),
            n,
        }
    }

    /// Returns `mean * n`, the sum of all observations.
    pub fn sum(&self) -> Option<Observation> {
        let n = self.n as f64;
        self.value().map(|mean| mean.map(|m| m * n))
    }

    /// Serializes the current state.
    ///
    /// Fails if the locked shape cannot be encoded.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let len = self.mean.as_ref().map_or(0, Observation::len);
        let mut bytes = StateBytes::with_capacity(16 + 8 * len);
        bytes.write_preamble(Kind::MEAN, self.n, self.shape.get())?;
        if let Some(mean) = self.value() {
            bytes.write_values(mean.values());
        }
        Ok(bytes.into_bytes())
    }

    /// Deserializes a state produced by [`Mean::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut slice = StateSlice::new(bytes);
        let mean = Self::read_from(&mut slice, Kind::MEAN)?;
        slice.finish()?;
        Ok(mean)
    }

    pub(crate) fn read_from(slice: &mut StateSlice<'_>, kind: Kind) -> Result<Self, Error> {
        let (n, shape) = slice.read_preamble(kind)?;
        let mut mean = Self::new();
        if let Some(shape) = shape {
            if n > 0 {
                mean = Self::from_parts(slice.read_observation(&shape)?, n);
            } else {
                mean = Self::with_locked_shape(&shape);
            }
        }
        Ok(mean)
    }

    /// An empty mean that only accepts observations of `shape`.
    pub(crate) fn with_locked_shape(shape: &[usize]) -> Self {
        Self {
            shape: ShapeLock::locked(shape),
            mean: None,
            n: 0,
        }
    }

    pub(crate) fn shape_lock(&self) -> &ShapeLock {
        &self.shape
    }
}

impl Default for Mean {
    fn default() -> Self {
        Self::new()
    }
}

impl Centre for Mean {
    fn current(&self) -> Option<&Observation> {
        self.mean.as_ref()
    }

    fn fold(&mut self, observation: Observation) -> Result<(), Error> {
        self.shape.check(Self::KIND, &observation)?;
        self.n += 1;
        let n = self.n as f64;
        self.mean = Some(match self.mean.take() {
            Some(mean) => mean.zip_with(&observation, |m, x| m + (x - m) / n),
            None => observation,
        });
        Ok(())
    }

    fn count(&self) -> u64 {
        self.n
    }
}

impl Accumulator for Mean {
    type Item = Observation;
    type Value = Observation;
    const KIND: &'static str = "Mean";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        self.fold(item.into())
    }

    fn merge(&mut self, other: &Self) -> Result<(), Error> {
        self.shape.check_merge(&other.shape)?;
        if other.n == 0 {
            return Ok(());
        }
        let (Some(ours), Some(theirs)) = (self.value(), other.value()) else {
            *self = other.clone();
            return Ok(());
        };
        let total = (self.n + other.n) as f64;
        let w1 = self.n as f64 / total;
        let w2 = other.n as f64 / total;
        self.mean = Some(ours.zip_with(&theirs, |m1, m2| m1 * w1 + m2 * w2));
        self.n += other.n;
        Ok(())
    }

    fn value(&self) -> Option<Observation> {
        if self.n == 0 {
            return None;
        }
        self.mean.clone()
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl fmt::Display for Mean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
