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
use crate::observation::ShapeLock;
use crate::quantiles::Curve;
use crate::quantiles::Markers;

/// Quantile positions tracked by a [`CdfEstimator`].
#[derive(Debug, Clone, PartialEq)]
pub enum CdfPoints {
    /// `k` positions spaced linearly over `[0, 1]`.
    Count(usize),
    /// Explicit non-decreasing positions starting at 0 and ending at 1.
    Explicit(Vec<f64>),
}

impl From<usize> for CdfPoints {
    fn from(count: usize) -> Self {
        CdfPoints::Count(count)
    }
}

impl From<Vec<f64>> for CdfPoints {
    fn from(points: Vec<f64>) -> Self {
        CdfPoints::Explicit(points)
    }
}

impl From<&[f64]> for CdfPoints {
    fn from(points: &[f64]) -> Self {
        CdfPoints::Explicit(points.to_vec())
    }
}

impl CdfPoints {
    fn resolve(self) -> Result<Vec<f64>, Error> {
        let points = match self {
            CdfPoints::Count(count) => {
                if count < 2 {
                    return Err(Error::config("at least 2 quantile positions are required")
                        .with_context("points", count));
                }
                let last = (count - 1) as f64;
                (0..count).map(|i| i as f64 / last).collect()
            }
            CdfPoints::Explicit(points) => points,
        };

        if points.len() < 2 {
            return Err(Error::config("at least 2 quantile positions are required")
                .with_context("points", points.len()));
        }
        if points[0] != 0.0 || points[points.len() - 1] != 1.0 {
            return Err(Error::config("quantile positions must start at 0 and end at 1")
                .with_context("first", points[0])
                .with_context("last", points[points.len() - 1]));
        }
        let out_of_range = points.iter().any(|p| !(0.0..=1.0).contains(p));
        if out_of_range || points.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::config("quantile positions must be ascending")
                .with_context("points", format!("{points:?}")));
        }
        Ok(points)
    }
}

/// Online CDF estimator based on the P² algorithm.
///
/// Tracks one marker per configured quantile position. For array observations
/// every element is estimated independently; accessors return one curve per
/// element in row-major order.
///
/// NaN elements are skipped by their own markers only; the other elements of
/// the same observation are still folded in. Accessors stay `None` until every
/// element's markers are filled. The estimate depends on observation order, so
/// estimators do not merge.
#[derive(Debug, Clone, PartialEq)]
pub struct CdfEstimator {
    desired: Vec<f64>,
    shape: ShapeLock,
    markers: Vec<Markers>,
    n: u64,
}

impl CdfEstimator {
    /// Creates an estimator tracking the given quantile positions.
    ///
    /// Fails unless the positions are ascending, start at 0, end at 1 and number
    /// at least two.
    ///
    /// # Examples
    ///
    /// ```
    /// # use accumulators::quantiles::CdfEstimator;
    /// let estimator = CdfEstimator::new(5).unwrap();
    /// assert_eq!(estimator.desired(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    /// assert!(CdfEstimator::new(vec![0.1, 1.0]).is_err());
    /// ```
    pub fn new(points: impl Into<CdfPoints>) -> Result<Self, Error> {
        Ok(Self::from_desired(points.into().resolve()?))
    }

    pub(crate) fn from_desired(desired: Vec<f64>) -> Self {
        Self {
            desired,
            shape: ShapeLock::default(),
            markers: Vec::new(),
            n: 0,
        }
    }

    /// Returns the configured quantile positions.
    pub fn desired(&self) -> &[f64] {
        &self.desired
    }

    /// Returns the number of markers per element.
    pub fn num_markers(&self) -> usize {
        self.desired.len()
    }

    /// Returns true once every marker of every element holds an observation.
    pub fn is_initialized(&self) -> bool {
        self.filled(self.desired.len() as u64)
    }

    /// Returns true once every element's markers have folded at least `count` values.
    pub(crate) fn filled(&self, count: u64) -> bool {
        !self.markers.is_empty() && self.markers.iter().all(|m| m.count() >= count)
    }

    /// Returns the per-element marker states.
    pub fn markers(&self) -> &[Markers] {
        &self.markers
    }

    /// Returns the estimated CDF of each element: heights against normalized positions.
    pub fn cdf(&self) -> Option<Vec<Curve>> {
        self.per_element(Markers::cdf)
    }

    /// Returns the estimated quantile function of each element.
    pub fn quantile(&self) -> Option<Vec<Curve>> {
        self.per_element(Markers::quantile)
    }

    /// Returns the estimated density of each element, the gradient of its CDF.
    pub fn pdf(&self) -> Option<Vec<Curve>> {
        self.per_element(Markers::pdf)
    }

    /// Evaluates the CDF of every element at `x`.
    pub fn cdf_interp(&self, x: f64) -> Option<Observation> {
        self.elementwise(|markers| markers.cdf_interp(x))
    }

    /// Evaluates the quantile function of every element at `q`.
    pub fn quantile_interp(&self, q: f64) -> Option<Observation> {
        self.elementwise(|markers| markers.quantile_interp(q))
    }

    /// Returns the elementwise minimum seen so far.
    pub fn min(&self) -> Option<Observation> {
        if !self.filled(1) {
            return None;
        }
        self.observation(|markers| markers.min())
    }

    /// Returns the elementwise maximum seen so far.
    pub fn max(&self) -> Option<Observation> {
        if !self.filled(1) {
            return None;
        }
        self.observation(|markers| markers.max())
    }

    pub(crate) fn shape(&self) -> Option<&[usize]> {
        self.shape.get()
    }

    fn per_element(&self, f: impl Fn(&Markers) -> Curve) -> Option<Vec<Curve>> {
        if !self.is_initialized() {
            return None;
        }
        Some(self.markers.iter().map(f).collect())
    }

    fn elementwise(&self, f: impl Fn(&Markers) -> f64) -> Option<Observation> {
        if !self.is_initialized() {
            return None;
        }
        self.observation(f)
    }

    pub(crate) fn observation(&self, f: impl Fn(&Markers) -> f64) -> Option<Observation> {
        let shape = self.shape.get()?;
        let values = self.markers.iter().map(f).collect();
        Some(Observation::from_parts(shape.to_vec(), values))
    }
}

impl Accumulator for CdfEstimator {
    type Item = Observation;
    type Value = Vec<Curve>;
    const KIND: &'static str = "CDFEstimator";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        let observation = item.into();
        self.shape.check(Self::KIND, &observation)?;
        if self.markers.is_empty() {
            self.markers = vec![Markers::new(self.desired.len()); observation.len()];
        }

        let was_initialized = self.is_initialized();
        if observation.values().iter().any(|v| v.is_nan()) {
            tracing::trace!(n = self.n, "skipping NaN elements");
        }
        for (markers, &x) in self.markers.iter_mut().zip(observation.values()) {
            markers.fold(x, &self.desired);
        }
        self.n += 1;

        if !was_initialized && self.is_initialized() {
            tracing::debug!(markers = self.desired.len(), "P² markers initialized");
        }
        Ok(())
    }

    fn value(&self) -> Option<Vec<Curve>> {
        self.cdf()
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl fmt::Display for CdfEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
