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
use std::marker::PhantomData;

use crate::accumulator::Accumulator;
use crate::accumulator::describe;
use crate::codec::Kind;
use crate::codec::StateBytes;
use crate::codec::StateSlice;
use crate::error::Error;

/// Counts observations of any type.
pub struct Counter<T = f64> {
    n: u64,
    _item: PhantomData<fn(T)>,
}

impl<T> Counter<T> {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::with_count(0)
    }

    /// Creates a counter starting at `n`.
    pub fn with_count(n: u64) -> Self {
        Self {
            n,
            _item: PhantomData,
        }
    }

    /// Serializes the count.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = StateBytes::with_capacity(12);
        bytes.write_preamble(Kind::COUNTER, self.n, None)?;
        Ok(bytes.into_bytes())
    }

    /// Deserializes a counter produced by [`Counter::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut slice = StateSlice::new(bytes);
        let (n, _) = slice.read_preamble(Kind::COUNTER)?;
        slice.finish()?;
        Ok(Self::with_count(n))
    }
}

impl<T> Accumulator for Counter<T> {
    type Item = T;
    type Value = u64;
    const KIND: &'static str = "Counter";

    fn ingest(&mut self, _item: impl Into<Self::Item>) -> Result<(), Error> {
        self.n += 1;
        Ok(())
    }

    fn merge(&mut self, other: &Self) -> Result<(), Error> {
        self.n += other.n;
        Ok(())
    }

    fn value(&self) -> Option<u64> {
        Some(self.n)
    }

    fn n(&self) -> u64 {
        self.n
    }
}

impl<T> Default for Counter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Counter<T> {
    fn clone(&self) -> Self {
        Self::with_count(self.n)
    }
}

impl<T> fmt::Debug for Counter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Counter").field("n", &self.n).finish()
    }
}

impl<T> fmt::Display for Counter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(self, f)
    }
}
