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

//! Welford deviation tracking shared by the variance and covariance kinds.

use crate::error::Error;
use crate::observation::Observation;

/// A running centre estimate that deviations are measured against.
pub(crate) trait Centre {
    /// Returns the raw centre, present once any state exists.
    fn current(&self) -> Option<&Observation>;

    /// Folds one observation in.
    fn fold(&mut self, observation: Observation) -> Result<(), Error>;

    /// Returns the number of observations folded in.
    fn count(&self) -> u64;
}

/// How a deviation vector is combined with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Product {
    /// `d ⊙ d`, giving per-element variances.
    Elementwise,
    /// `d ⊗ d`, giving a covariance matrix over the flattened elements.
    Outer,
}

impl Product {
    pub(crate) fn apply(self, left: &Observation, right: &Observation) -> Observation {
        match self {
            Product::Elementwise => left.zip_with(right, |a, b| a * b),
            Product::Outer => left.outer(right),
        }
    }
}

/// A centre plus the running centre of the deviation products.
///
/// `spread` holds the average of `(x - centre_before) * (x - centre_after)`. With an
/// arithmetic centre this is the population variance (the sum of squared
/// deviations divided by `n`); with an exponential centre it is the exponentially
/// weighted variance.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Deviations<C> {
    pub centre: C,
    pub spread: C,
    pub product: Product,
}

impl<C: Centre> Deviations<C> {
    pub(crate) fn new(centre: C, spread: C, product: Product) -> Self {
        Self {
            centre,
            spread,
            product,
        }
    }

    pub(crate) fn fold(&mut self, observation: Observation) -> Result<(), Error> {
        let before = self.centre.current().cloned();
        self.centre.fold(observation.clone())?;
        let deviation = match (before, self.centre.current()) {
            (Some(before), Some(after)) => self.product.apply(
                &observation.zip_with(&before, |x, m| x - m),
                &observation.zip_with(after, |x, m| x - m),
            ),
            _ => {
                let zero = observation.map(|_| 0.0);
                self.product.apply(&zero, &zero)
            }
        };
        self.spread.fold(deviation)
    }

    pub(crate) fn count(&self) -> u64 {
        self.centre.count()
    }
}
