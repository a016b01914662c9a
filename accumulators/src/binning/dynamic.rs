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
use std::sync::Arc;

use crate::accumulator::Accumulator;
use crate::accumulator::describe;
use crate::basic::Counter;
use crate::binning::density;
use crate::common::KeyFn;
use crate::common::bisect_right;
use crate::error::Error;
use crate::quantiles::CdfEstimator;

/// Histogram whose edges follow the data.
///
/// Every sort key feeds a P² estimator tracking `nbins + 1` equiprobable
/// quantiles; the estimated quantiles are the current bin edges. Data is routed
/// only once the estimator has seen more than `nbins` keys, so early observations
/// count towards [`n`](Accumulator::n) but land in no bin. There are no overflow
/// bins: keys outside the current edges go to the first or last bin. NaN keys
/// are counted but never routed.
///
/// Edges move as data arrives, so a bin's contents reflect the edges at the time
/// each observation was routed.
pub struct DynamicBinSorter<T, A: Accumulator> {
    estimator: CdfEstimator,
    bins: Vec<A>,
    sort_key: KeyFn<T, f64>,
    data_key: KeyFn<T, A::Item>,
    n: u64,
}

impl DynamicBinSorter<f64, Counter<f64>> {
    /// Creates a counting histogram with `nbins` equiprobable bins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use accumulators::Accumulator;
    /// # use accumulators::binning::DynamicBinSorter;
    /// let mut sorter = DynamicBinSorter::new(4).unwrap();
    /// sorter.ingest_all((0..400).map(|i| (i * 37 % 400) as f64)).unwrap();
    /// let (edges, counts) = sorter.histogram().unwrap();
    /// assert_eq!(edges.len(), 5);
    /// assert_eq!(counts.iter().sum::<u64>(), 400 - 4);
    /// ```
    pub fn new(nbins: usize) -> Result<Self, Error> {
        Self::with_accumulator(nbins, Counter::new)
    }
}

impl<A> DynamicBinSorter<f64, A>
where
    A: Accumulator,
    A::Item: From<f64>,
{
    /// Creates an equiprobable histogram with a sub-accumulator per bin.
    pub fn with_accumulator(nbins: usize, factory: impl FnMut() -> A) -> Result<Self, Error> {
        Self::with_keys(nbins, factory, |x: &f64| *x, |x: &f64| A::Item::from(*x))
    }
}

impl<T, A: Accumulator> DynamicBinSorter<T, A> {
    /// Creates an equiprobable histogram that bins by `sort_key` and accumulates
    /// `data_key`.
    pub fn with_keys(
        nbins: usize,
        mut factory: impl FnMut() -> A,
        sort_key: impl Fn(&T) -> f64 + Send + Sync + 'static,
        data_key: impl Fn(&T) -> A::Item + Send + Sync + 'static,
    ) -> Result<Self, Error> {
        if nbins == 0 {
            return Err(Error::config("at least one bin is required").with_context("nbins", nbins));
        }
        Ok(Self {
            estimator: CdfEstimator::new(nbins + 1)?,
            bins: (0..nbins).map(|_| factory()).collect(),
            sort_key: Arc::new(sort_key),
            data_key: Arc::new(data_key),
            n: 0,
        })
    }

    pub fn nbins(&self) -> usize {
        self.bins.len()
    }

    /// Returns the estimator that places the edges.
    pub fn estimator(&self) -> &CdfEstimator {
        &self.estimator
    }

    /// Returns whether observations are being routed to bins yet.
    pub fn is_routing(&self) -> bool {
        self.estimator.is_initialized()
    }

    /// Returns the current bin edges, once routing has started.
    pub fn bin_edges(&self) -> Option<Vec<f64>> {
        if !self.is_routing() {
            return None;
        }
        let markers = self.estimator.markers().first()?;
        Some(markers.heights().to_vec())
    }

    pub fn bins(&self) -> &[A] {
        &self.bins
    }

    /// Returns the current edges and the observation count of each bin.
    pub fn histogram(&self) -> Option<(Vec<f64>, Vec<u64>)> {
        let edges = self.bin_edges()?;
        Some((edges, self.bins.iter().map(A::n).collect()))
    }

    /// Returns the current edges and the count of each bin divided by its width.
    ///
    /// Bins whose edges coincide, as with a constant key stream, report 0.
    pub fn histogram_density(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        let (edges, counts) = self.histogram()?;
        let density = density(&edges, &counts);
        Some((edges, density))
    }

    fn route(&self, key: f64) -> Option<usize> {
        if key.is_nan() {
            return None;
        }
        let markers = self.estimator.markers().first()?;
        let index = bisect_right(markers.heights(), key).saturating_sub(1);
        Some(index.min(self.bins.len() - 1))
    }
}

impl<T, A: Accumulator> Accumulator for DynamicBinSorter<T, A> {
    type Item = T;
    type Value = Vec<Option<A::Value>>;
    const KIND: &'static str = "DynamicBinSorter";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        let item = item.into();
        let key = (self.sort_key)(&item);
        let was_routing = self.is_routing();
        self.estimator.ingest(key)?;
        self.n += 1;

        if !self.is_routing() {
            return Ok(());
        }
        if !was_routing {
            tracing::debug!(
                n = self.n,
                nbins = self.bins.len(),
                "bin edges established, routing started"
            );
        }
        if let Some(index) = self.route(key) {
            self.bins[index].ingest((self.data_key)(&item))?;
        }
        Ok(())
    }

    fn value(&self) -> Option<Self::Value> {
        Some(self.bins.iter().map(A::value).collect())
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl<T, A: Accumulator + Clone> Clone for DynamicBinSorter<T, A> {
    fn clone(&self) -> Self {
        Self {
            estimator: self.estimator.clone(),
            bins: self.bins.clone(),
            sort_key: Arc::clone(&self.sort_key),
            data_key: Arc::clone(&self.data_key),
            n: self.n,
        }
    }
}

impl<T, A: Accumulator + fmt::Debug> fmt::Debug for DynamicBinSorter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicBinSorter")
            .field("estimator", &self.estimator)
            .field("bins", &self.bins)
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl<T, A: Accumulator> fmt::Display for DynamicBinSorter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
