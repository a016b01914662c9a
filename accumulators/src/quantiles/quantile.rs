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
use crate::error::Error;
use crate::observation::Observation;
use crate::quantiles::CdfEstimator;

/// Marker tracking the target quantile.
const TARGET_MARKER: usize = 2;

/// Online estimate of a single quantile with five P² markers.
///
/// Markers sit at `[0, p/2, p, (1+p)/2, 1]`; the value is the height of the
/// middle one. It is available from the third observation on, while markers
/// still hold raw observations.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileEstimator {
    p: f64,
    estimator: CdfEstimator,
}

impl QuantileEstimator {
    /// Creates an estimator of the `p`-quantile.
    ///
    /// Fails unless `0 <= p <= 1`.
    pub fn new(p: f64) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::config("quantile must be in [0, 1]").with_context("p", p));
        }
        Ok(Self::unchecked(p))
    }

    fn unchecked(p: f64) -> Self {
        let desired = vec![0.0, p / 2.0, p, (1.0 + p) / 2.0, 1.0];
        Self {
            p,
            estimator: CdfEstimator::from_desired(desired),
        }
    }

    /// Returns the target quantile.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Returns the underlying CDF estimator and its accessors.
    pub fn estimator(&self) -> &CdfEstimator {
        &self.estimator
    }
}

impl Accumulator for QuantileEstimator {
    type Item = Observation;
    type Value = Observation;
    const KIND: &'static str = "QuantileEstimator";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        self.estimator.ingest(item)
    }

    fn value(&self) -> Option<Observation> {
        if !self.estimator.filled(TARGET_MARKER as u64 + 1) {
            return None;
        }
        self.estimator.observation(|markers| markers.heights()[TARGET_MARKER])
    }

    fn n(&self) -> u64 {
        self.estimator.n()
    }
}

/// Online estimate of the median; a [`QuantileEstimator`] with `p = 0.5`.
///
/// # Examples
///
/// ```
/// # use accumulators::Accumulator;
/// # use accumulators::quantiles::MedianEstimator;
/// let mut median = MedianEstimator::new();
/// median.ingest_all([0.02, 0.15]).unwrap();
/// assert!(median.value().is_none());
/// median.ingest(0.74).unwrap();
/// assert_eq!(median.value().unwrap().as_scalar(), Some(0.74));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MedianEstimator {
    inner: QuantileEstimator,
}

impl MedianEstimator {
    /// Creates a median estimator.
    pub fn new() -> Self {
        Self {
            inner: QuantileEstimator::unchecked(0.5),
        }
    }

    /// Returns the underlying CDF estimator and its accessors.
    pub fn estimator(&self) -> &CdfEstimator {
        self.inner.estimator()
    }
}

impl Default for MedianEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for MedianEstimator {
    type Item = Observation;
    type Value = Observation;
    const KIND: &'static str = "MedianEstimator";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        self.inner.ingest(item)
    }

    fn value(&self) -> Option<Observation> {
        self.inner.value()
    }

    fn n(&self) -> u64 {
        self.inner.n()
    }
}

impl fmt::Display for QuantileEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

impl fmt::Display for MedianEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
