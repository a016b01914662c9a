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

/// Histogram over fixed, caller-supplied bin edges.
///
/// `nbins + 1` strictly increasing edges define `nbins` bins; bin `i` (1-based)
/// holds keys in `[edges[i-1], edges[i])`. Bin 0 catches keys below the first edge
/// (and NaN keys), bin `nbins + 1` catches keys at or above the last edge.
pub struct BinSorter<T, A: Accumulator> {
    edges: Vec<f64>,
    bins: Vec<A>,
    sort_key: KeyFn<T, f64>,
    data_key: KeyFn<T, A::Item>,
    n: u64,
}

impl BinSorter<f64, Counter<f64>> {
    /// Creates a counting histogram over `edges`.
    ///
    /// Fails unless there are at least two finite, strictly increasing edges.
    pub fn new(edges: Vec<f64>) -> Result<Self, Error> {
        Self::with_accumulator(edges, Counter::new)
    }
}

impl<A> BinSorter<f64, A>
where
    A: Accumulator,
    A::Item: From<f64>,
{
    /// Creates a histogram over scalar observations with a sub-accumulator per bin.
    pub fn with_accumulator(edges: Vec<f64>, factory: impl FnMut() -> A) -> Result<Self, Error> {
        Self::with_keys(edges, factory, |x: &f64| *x, |x: &f64| A::Item::from(*x))
    }
}

impl<T, A: Accumulator> BinSorter<T, A> {
    /// Creates a histogram that bins by `sort_key` and accumulates `data_key`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use accumulators::Accumulator;
    /// # use accumulators::binning::BinSorter;
    /// # use accumulators::moments::Mean;
    /// # use accumulators::Observation;
    /// // mean weight per height bin
    /// let mut sorter = BinSorter::with_keys(
    ///     vec![150.0, 170.0, 190.0],
    ///     Mean::new,
    ///     |person: &(f64, f64)| person.0,
    ///     |person: &(f64, f64)| Observation::scalar(person.1),
    /// )
    /// .unwrap();
    /// sorter.ingest((160.0, 55.0)).unwrap();
    /// sorter.ingest((165.0, 65.0)).unwrap();
    /// let mean = sorter.bins()[1].value().unwrap();
    /// assert_eq!(mean.as_scalar(), Some(60.0));
    /// ```
    pub fn with_keys(
        edges: Vec<f64>,
        mut factory: impl FnMut() -> A,
        sort_key: impl Fn(&T) -> f64 + Send + Sync + 'static,
        data_key: impl Fn(&T) -> A::Item + Send + Sync + 'static,
    ) -> Result<Self, Error> {
        validate_edges(&edges)?;
        let bins = (0..edges.len() + 1).map(|_| factory()).collect();
        Ok(Self {
            edges,
            bins,
            sort_key: Arc::new(sort_key),
            data_key: Arc::new(data_key),
            n: 0,
        })
    }

    /// Returns the number of in-range bins.
    pub fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Returns the bin edges.
    pub fn bin_edges(&self) -> &[f64] {
        &self.edges
    }

    /// Returns all sub-accumulators, underflow first and overflow last.
    pub fn bins(&self) -> &[A] {
        &self.bins
    }

    /// Returns the sub-accumulator of keys below the first edge.
    pub fn underflow(&self) -> &A {
        &self.bins[0]
    }

    /// Returns the sub-accumulator of keys at or above the last edge.
    pub fn overflow(&self) -> &A {
        &self.bins[self.bins.len() - 1]
    }

    /// Returns the edges and the observation count of each in-range bin.
    pub fn histogram(&self) -> (Vec<f64>, Vec<u64>) {
        let counts = self.bins[1..=self.nbins()].iter().map(A::n).collect();
        (self.edges.clone(), counts)
    }

    /// Returns the edges and the count of each in-range bin divided by its width.
    pub fn histogram_density(&self) -> (Vec<f64>, Vec<f64>) {
        let (edges, counts) = self.histogram();
        let density = density(&edges, &counts);
        (edges, density)
    }
}

fn validate_edges(edges: &[f64]) -> Result<(), Error> {
    if edges.len() < 2 {
        return Err(
            Error::config("at least 2 bin edges are required").with_context("edges", edges.len())
        );
    }
    if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[1] <= w[0]) {
        return Err(Error::config("bin edges must be finite and strictly increasing")
            .with_context("edges", format!("{edges:?}")));
    }
    Ok(())
}

impl<T, A: Accumulator + Clone> Accumulator for BinSorter<T, A> {
    type Item = T;
    type Value = Vec<Option<A::Value>>;
    const KIND: &'static str = "BinSorter";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        let item = item.into();
        let index = bisect_right(&self.edges, (self.sort_key)(&item));
        self.bins[index].ingest((self.data_key)(&item))?;
        self.n += 1;
        Ok(())
    }

    /// Merges bin by bin. Both sorters must share their edges and the
    /// sub-accumulator kind must be mergeable; on failure `self` is unchanged.
    fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.edges != other.edges {
            tracing::warn!("rejected merge of bin sorters with different edges");
            return Err(Error::config("bin sorters with different edges cannot be merged")
                .with_context("ours", format!("{:?}", self.edges))
                .with_context("theirs", format!("{:?}", other.edges)));
        }
        let mut merged = self.bins.clone();
        for (ours, theirs) in merged.iter_mut().zip(&other.bins) {
            ours.merge(theirs)?;
        }
        self.bins = merged;
        self.n += other.n;
        Ok(())
    }

    fn value(&self) -> Option<Self::Value> {
        Some(self.bins.iter().map(A::value).collect())
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl<T, A: Accumulator + Clone> Clone for BinSorter<T, A> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
            bins: self.bins.clone(),
            sort_key: Arc::clone(&self.sort_key),
            data_key: Arc::clone(&self.data_key),
            n: self.n,
        }
    }
}

impl<T, A: Accumulator + fmt::Debug> fmt::Debug for BinSorter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinSorter")
            .field("edges", &self.edges)
            .field("bins", &self.bins)
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl<T, A: Accumulator + Clone> fmt::Display for BinSorter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
