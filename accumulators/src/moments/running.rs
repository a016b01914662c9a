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
use crate::moments::DEFAULT_LIFETIME;
use crate::moments::deviations::Centre;
use crate::moments::deviations::Deviations;
use crate::moments::deviations::Product;
use crate::observation::Observation;
use crate::observation::ShapeLock;

fn validate_lifetime(lifetime: f64) -> Result<(), Error> {
    if lifetime.is_finite() && lifetime >= 1.0 {
        Ok(())
    } else {
        Err(Error::config("lifetime must be finite and at least 1")
            .with_context("lifetime", lifetime))
    }
}

/// Exponentially weighted running mean.
///
/// Each observation moves the mean by `alpha * (x - mean)` with
/// `alpha = max(1 / lifetime, 1 / n)`, so the first `lifetime` observations are
/// averaged arithmetically rather than under-weighted.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningMean {
    shape: ShapeLock,
    mean: Option<Observation>,
    n: u64,
    lifetime: f64,
}

impl RunningMean {
    /// Creates a running mean with [`DEFAULT_LIFETIME`].
    pub fn new() -> Self {
        Self {
            shape: ShapeLock::default(),
            mean: None,
            n: 0,
            lifetime: DEFAULT_LIFETIME,
        }
    }

    /// Creates a running mean with the given lifetime.
    ///
    /// Fails unless `lifetime` is finite and at least 1.
    pub fn with_lifetime(lifetime: f64) -> Result<Self, Error> {
        let mut mean = Self::new();
        mean.set_lifetime(lifetime)?;
        Ok(mean)
    }

    /// Returns the configured lifetime.
    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    /// Changes the lifetime; the smoothing factor follows on the next observation.
    pub fn set_lifetime(&mut self, lifetime: f64) -> Result<(), Error> {
        validate_lifetime(lifetime)?;
        self.lifetime = lifetime;
        Ok(())
    }

    /// Returns the smoothing factor applied to the next observation.
    pub fn alpha(&self) -> f64 {
        (1.0 / self.lifetime).max(1.0 / (self.n + 1) as f64)
    }
}

impl Default for RunningMean {
    fn default() -> Self {
        Self::new()
    }
}

impl Centre for RunningMean {
    fn current(&self) -> Option<&Observation> {
        self.mean.as_ref()
    }

    fn fold(&mut self, observation: Observation) -> Result<(), Error> {
        self.shape.check(Self::KIND, &observation)?;
        let alpha = self.alpha();
        self.n += 1;
        self.mean = Some(match self.mean.take() {
            Some(mean) => mean.zip_with(&observation, |m, x| m + alpha * (x - m)),
            None => observation,
        });
        Ok(())
    }

    fn count(&self) -> u64 {
        self.n
    }
}

impl Accumulator for RunningMean {
    type Item = Observation;
    type Value = Observation;
    const KIND: &'static str = "RunningMean";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        self.fold(item.into())
    }

    fn value(&self) -> Option<Observation> {
        self.mean.clone()
    }

    fn n(&self) -> u64 {
        self.n
    }
}

/// Exponentially weighted running variance.
///
/// The value is the weighted population variance, defined once two observations
/// have been seen.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningVariance {
    inner: Deviations<RunningMean>,
}

/// Exponentially weighted running covariance matrix of flattened observations.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningCovariance {
    inner: Deviations<RunningMean>,
}

macro_rules! impl_running_spread {
    ($name:ident, $kind:literal, $product:expr) => {
        impl $name {
            /// Creates an accumulator with [`DEFAULT_LIFETIME`].
            pub fn new() -> Self {
                Self {
                    inner: Deviations::new(RunningMean::new(), RunningMean::new(), $product),
                }
            }

            /// Creates an accumulator with the given lifetime.
            ///
            /// Fails unless `lifetime` is finite and at least 1.
            pub fn with_lifetime(lifetime: f64) -> Result<Self, Error> {
                let mut acc = Self::new();
                acc.set_lifetime(lifetime)?;
                Ok(acc)
            }

            /// Returns the configured lifetime.
            pub fn lifetime(&self) -> f64 {
                self.inner.centre.lifetime()
            }

            /// Changes the lifetime of both the mean and the spread.
            pub fn set_lifetime(&mut self, lifetime: f64) -> Result<(), Error> {
                self.inner.centre.set_lifetime(lifetime)?;
                self.inner.spread.set_lifetime(lifetime)
            }

            /// Returns the exponentially weighted mean.
            pub fn mean(&self) -> Option<Observation> {
                self.inner.centre.value()
            }
        }

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

            fn value(&self) -> Option<Observation> {
                if self.inner.count() < 2 {
                    return None;
                }
                self.inner.spread.value()
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

impl_running_spread!(RunningVariance, "RunningVariance", Product::Elementwise);
impl_running_spread!(RunningCovariance, "RunningCovariance", Product::Outer);

impl RunningVariance {
    /// Returns the exponentially weighted standard deviation.
    pub fn std(&self) -> Option<Observation> {
        self.value().map(|var| var.map(f64::sqrt))
    }
}

impl RunningCovariance {
    /// Returns the root of the diagonal of the weighted covariance.
    pub fn std(&self) -> Option<Observation> {
        let covariance = self.value()?;
        let dim = covariance.shape()[0];
        let diagonal = (0..dim)
            .map(|i| covariance.values()[i * dim + i].sqrt())
            .collect::<Vec<_>>();
        Some(Observation::from(diagonal))
    }
}

impl fmt::Display for RunningMean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
