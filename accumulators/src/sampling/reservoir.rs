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
use crate::common::RandomSource;
use crate::common::XorShift64;
use crate::error::Error;
use crate::sampling::DEFAULT_RESERVOIR_LENGTH;

/// Fixed-size uniform sample of a stream (Algorithm R).
///
/// The sample depends on the random draws and on arrival order, so reservoirs
/// do not merge.
#[derive(Debug, Clone)]
pub struct ReservoirSampling<T, R = XorShift64> {
    length: usize,
    reservoir: Vec<T>,
    n: u64,
    rng: R,
}

impl<T> ReservoirSampling<T> {
    /// Creates a reservoir of `length` slots seeded from the clock.
    pub fn new(length: usize) -> Result<Self, Error> {
        Self::with_rng(length, XorShift64::default())
    }
}

impl<T, R: RandomSource> ReservoirSampling<T, R> {
    /// Creates a reservoir of `length` slots drawing from `rng`.
    pub fn with_rng(length: usize, rng: R) -> Result<Self, Error> {
        if length == 0 {
            return Err(
                Error::config("reservoir length must be positive").with_context("length", length)
            );
        }
        Ok(Self {
            length,
            reservoir: Vec::with_capacity(length),
            n: 0,
            rng,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the current sample. Slot order carries no meaning.
    pub fn sample(&self) -> &[T] {
        &self.reservoir
    }
}

impl<T> Default for ReservoirSampling<T> {
    fn default() -> Self {
        Self {
            length: DEFAULT_RESERVOIR_LENGTH,
            reservoir: Vec::with_capacity(DEFAULT_RESERVOIR_LENGTH),
            n: 0,
            rng: XorShift64::default(),
        }
    }
}

impl<T: Clone, R: RandomSource> Accumulator for ReservoirSampling<T, R> {
    type Item = T;
    type Value = Vec<T>;
    const KIND: &'static str = "ReservoirSampling";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        let item = item.into();
        self.n += 1;
        if self.reservoir.len() < self.length {
            self.reservoir.push(item);
            return Ok(());
        }
        // slot drawn uniformly from the n observations seen so far
        let slot = self.rng.next_below(self.n) as usize;
        if slot < self.length {
            self.reservoir[slot] = item;
        }
        Ok(())
    }

    fn value(&self) -> Option<Vec<T>> {
        if self.reservoir.is_empty() {
            return None;
        }
        Some(self.reservoir.clone())
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl<T: Clone, R: RandomSource> fmt::Display for ReservoirSampling<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_before_sampling() {
        let mut reservoir =
            ReservoirSampling::<i32, _>::with_rng(4, XorShift64::seeded(1)).unwrap();
        reservoir.ingest_all([1, 2, 3]).unwrap();
        assert_eq!(reservoir.value(), Some(vec![1, 2, 3]));
        reservoir.ingest(4).unwrap();
        assert_eq!(reservoir.sample(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_merge_unsupported() {
        let mut a = ReservoirSampling::<i32>::new(2).unwrap();
        let b = ReservoirSampling::<i32>::new(2).unwrap();
        assert!(a.merge(&b).is_err());
    }
}
