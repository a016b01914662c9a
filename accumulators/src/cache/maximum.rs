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

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;

use crate::accumulator::Accumulator;
use crate::accumulator::describe;
use crate::cache::DEFAULT_MAXIMUM_LENGTH;
use crate::cache::check_length;
use crate::common::KeyFn;
use crate::common::now_seconds;
use crate::error::Error;

#[derive(Debug, Clone)]
struct Entry<T> {
    rank: f64,
    time: f64,
    seq: u64,
    item: T,
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .total_cmp(&other.rank)
            .then(self.time.total_cmp(&other.time))
            .then(self.seq.cmp(&other.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

/// Top-`length` cache ranked by a key function.
///
/// Holds the observations with the highest rank seen so far, ties broken in
/// favour of the newer one. With a timeout configured, an overfull cache whose
/// retained items span at least `timeout` seconds evicts by age instead: it keeps
/// the `length` most recent observations regardless of rank. The age check runs
/// before rank eviction.
///
/// # Examples
///
/// ```
/// # use accumulators::Accumulator;
/// # use accumulators::cache::CacheMaximum;
/// // (brightness, time) pairs on a synthetic clock
/// let mut cache = CacheMaximum::builder(|star: &(f64, f64)| star.0)
///     .length(2)
///     .time_key(|star: &(f64, f64)| star.1)
///     .timeout(10.0)
///     .build()
///     .unwrap();
/// cache.ingest((100.0, 0.0)).unwrap();
/// cache.ingest((90.0, 1.0)).unwrap();
/// cache.ingest((1.0, 20.0)).unwrap();
/// assert_eq!(cache.value(), Some(vec![(90.0, 1.0), (1.0, 20.0)]));
/// ```
pub struct CacheMaximum<T> {
    length: usize,
    key: KeyFn<T, f64>,
    time_key: Option<KeyFn<T, f64>>,
    timeout: Option<f64>,
    heap: BinaryHeap<Reverse<Entry<T>>>,
    seq: u64,
    n: u64,
}

/// Configures a [`CacheMaximum`].
pub struct CacheMaximumBuilder<T> {
    length: usize,
    key: KeyFn<T, f64>,
    time_key: Option<KeyFn<T, f64>>,
    timeout: Option<f64>,
}

impl<T> CacheMaximumBuilder<T> {
    /// Set the number of retained observations. Defaults to [`DEFAULT_MAXIMUM_LENGTH`].
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Set the function reading an observation's timestamp in seconds.
    ///
    /// Without one, observations are stamped with the wall clock on ingest.
    pub fn time_key(mut self, time_key: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        self.time_key = Some(Arc::new(time_key));
        self
    }

    /// Set the age span, in seconds, beyond which eviction keeps the newest items.
    pub fn timeout(mut self, timeout: f64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the cache.
    ///
    /// Fails if `length` is zero or the timeout is not positive.
    pub fn build(self) -> Result<CacheMaximum<T>, Error> {
        let length = check_length(self.length)?;
        if let Some(timeout) = self.timeout {
            if timeout.is_nan() || timeout <= 0.0 {
                return Err(
                    Error::config("timeout must be positive").with_context("timeout", timeout)
                );
            }
        }
        Ok(CacheMaximum {
            length,
            key: self.key,
            time_key: self.time_key,
            timeout: self.timeout,
            heap: BinaryHeap::with_capacity(length + 1),
            seq: 0,
            n: 0,
        })
    }
}

impl CacheMaximum<f64> {
    /// Creates a cache of the `length` largest scalar observations.
    pub fn new(length: usize) -> Result<Self, Error> {
        Self::builder(|x: &f64| *x).length(length).build()
    }
}

impl<T> CacheMaximum<T> {
    /// Starts configuring a cache ranked by `key`, higher ranks retained.
    pub fn builder(key: impl Fn(&T) -> f64 + Send + Sync + 'static) -> CacheMaximumBuilder<T> {
        CacheMaximumBuilder {
            length: DEFAULT_MAXIMUM_LENGTH,
            key: Arc::new(key),
            time_key: None,
            timeout: None,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn timeout(&self) -> Option<f64> {
        self.timeout
    }

    /// Returns the number of observations currently held.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns the held observations with their ranks, highest rank first.
    pub fn ranked(&self) -> Vec<(f64, &T)> {
        let mut entries: Vec<&Entry<T>> = self.heap.iter().map(|Reverse(entry)| entry).collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|entry| (entry.rank, &entry.item)).collect()
    }

    fn push(&mut self, entry: Entry<T>) {
        self.heap.push(Reverse(entry));
    }

    fn span(&self) -> f64 {
        let (oldest, newest) = self
            .heap
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), Reverse(entry)| {
                (lo.min(entry.time), hi.max(entry.time))
            });
        newest - oldest
    }

    fn timed_out(&self) -> bool {
        self.timeout.is_some_and(|timeout| self.span() >= timeout)
    }

    /// Brings an overfull cache back to `length`.
    fn evict(&mut self) {
        if self.heap.len() <= self.length {
            return;
        }
        if self.timed_out() {
            self.keep_recent();
        }
        while self.heap.len() > self.length {
            if let Some(Reverse(entry)) = self.heap.pop() {
                tracing::trace!(rank = entry.rank, "evicted lowest ranked observation");
            }
        }
    }

    fn keep_recent(&mut self) {
        let mut entries: Vec<Entry<T>> = std::mem::take(&mut self.heap)
            .into_iter()
            .map(|Reverse(entry)| entry)
            .collect();
        entries.sort_by(|a, b| b.time.total_cmp(&a.time).then(b.seq.cmp(&a.seq)));
        let dropped = entries.len().saturating_sub(self.length);
        entries.truncate(self.length);
        tracing::trace!(dropped, "evicted observations outside the timeout window");
        self.heap = entries.into_iter().map(Reverse).collect();
    }
}

impl<T: Clone> Accumulator for CacheMaximum<T> {
    type Item = T;
    type Value = Vec<T>;
    const KIND: &'static str = "CacheMaximum";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        let item = item.into();
        let rank = (self.key)(&item);
        let time = match &self.time_key {
            Some(time_key) => time_key(&item),
            None => now_seconds(),
        };
        let seq = self.seq;
        self.push(Entry { rank, time, seq, item });
        self.seq += 1;
        self.n += 1;
        self.evict();
        Ok(())
    }

    /// Takes the union of both caches, applies the timeout rule once, then
    /// keeps the top `length` by rank. Without a timeout this equals ingesting
    /// both streams into one cache.
    fn merge(&mut self, other: &Self) -> Result<(), Error> {
        let offset = self.seq;
        for Reverse(entry) in &other.heap {
            self.push(Entry {
                seq: entry.seq + offset,
                ..entry.clone()
            });
        }
        self.seq += other.seq;
        self.n += other.n;
        self.evict();
        Ok(())
    }

    /// Returns the held observations, highest rank first.
    fn value(&self) -> Option<Vec<T>> {
        if self.heap.is_empty() {
            return None;
        }
        Some(self.ranked().into_iter().map(|(_, item)| item.clone()).collect())
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl<T: Clone> Clone for CacheMaximum<T> {
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            key: Arc::clone(&self.key),
            time_key: self.time_key.clone(),
            timeout: self.timeout,
            heap: self.heap.clone(),
            seq: self.seq,
            n: self.n,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CacheMaximum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheMaximum")
            .field("length", &self.length)
            .field("timeout", &self.timeout)
            .field("heap", &self.heap)
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl<T: Clone> fmt::Display for CacheMaximum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_prefer_newer() {
        let mut cache = CacheMaximum::builder(|pair: &(f64, u32)| pair.0)
            .length(1)
            .build()
            .unwrap();
        cache.ingest((5.0, 1)).unwrap();
        cache.ingest((5.0, 2)).unwrap();
        assert_eq!(cache.value(), Some(vec![(5.0, 2)]));
    }

    #[test]
    fn test_span_under_timeout_evicts_by_rank() {
        let mut cache = CacheMaximum::builder(|pair: &(f64, f64)| pair.0)
            .length(2)
            .time_key(|pair: &(f64, f64)| pair.1)
            .timeout(100.0)
            .build()
            .unwrap();
        for pair in [(3.0, 0.0), (1.0, 1.0), (2.0, 2.0)] {
            cache.ingest(pair).unwrap();
        }
        assert_eq!(cache.value(), Some(vec![(3.0, 0.0), (2.0, 2.0)]));
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(CacheMaximum::builder(|x: &f64| *x).timeout(0.0).build().is_err());
        assert!(CacheMaximum::builder(|x: &f64| *x).timeout(f64::NAN).build().is_err());
    }
}
