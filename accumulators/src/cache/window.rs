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

use std::collections::VecDeque;
use std::fmt;

use crate::accumulator::Accumulator;
use crate::accumulator::describe;
use crate::cache::DEFAULT_WINDOW_LENGTH;
use crate::cache::check_length;
use crate::common::now_seconds;
use crate::error::Error;

/// Fixed-length window over the most recent observations.
///
/// Once `length` observations are held, each new one drops the oldest.
/// The window is ordered by timestamp, newest last.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheAccumulator<T> {
    length: usize,
    window: VecDeque<(f64, T)>,
    n: u64,
}

impl<T> CacheAccumulator<T> {
    /// Creates a window holding up to `length` observations.
    pub fn new(length: usize) -> Result<Self, Error> {
        let length = check_length(length)?;
        Ok(Self {
            length,
            window: VecDeque::with_capacity(length),
            n: 0,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the number of observations currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Ingests `item` stamped with `timestamp` seconds.
    ///
    /// Timestamps should not decrease between calls; the window keeps arrival
    /// order and only [`merge`](Accumulator::merge) sorts by time.
    pub fn ingest_at(&mut self, item: impl Into<T>, timestamp: f64) {
        self.window.push_back((timestamp, item.into()));
        if self.window.len() > self.length {
            self.window.pop_front();
            tracing::trace!(length = self.length, "dropped oldest cached observation");
        }
        self.n += 1;
    }

    /// Iterates over the held observations, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.window.iter().map(|(_, item)| item)
    }

    /// Returns the timestamps of the held observations, oldest first.
    pub fn timestamps(&self) -> Vec<f64> {
        self.window.iter().map(|(time, _)| *time).collect()
    }
}

impl<T> Default for CacheAccumulator<T> {
    fn default() -> Self {
        Self {
            length: DEFAULT_WINDOW_LENGTH,
            window: VecDeque::with_capacity(DEFAULT_WINDOW_LENGTH),
            n: 0,
        }
    }
}

impl<T: Clone> Accumulator for CacheAccumulator<T> {
    type Item = T;
    type Value = Vec<T>;
    const KIND: &'static str = "CacheAccumulator";

    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
        self.ingest_at(item, now_seconds());
        Ok(())
    }

    /// Interleaves both windows by timestamp and keeps the newest `length`.
    /// On equal timestamps entries from `self` come first.
    fn merge(&mut self, other: &Self) -> Result<(), Error> {
        let mut ours = std::mem::take(&mut self.window).into_iter().peekable();
        let mut theirs = other.window.iter().cloned().peekable();
        let mut merged = VecDeque::with_capacity(self.length + other.window.len());
        loop {
            let take_ours = match (ours.peek(), theirs.peek()) {
                (Some(a), Some(b)) => a.0 <= b.0,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_ours { ours.next() } else { theirs.next() };
            merged.extend(next);
        }
        while merged.len() > self.length {
            merged.pop_front();
        }
        self.window = merged;
        self.n += other.n;
        Ok(())
    }

    fn value(&self) -> Option<Vec<T>> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.iter().cloned().collect())
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl<T: Clone> fmt::Display for CacheAccumulator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
