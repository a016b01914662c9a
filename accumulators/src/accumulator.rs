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

//! The capability every accumulator implements.
//!
//! An accumulator folds a stream of observations into a running statistic in a
//! single pass. Observations are folded in with [`Accumulator::ingest`]; two
//! accumulators of the same kind built over disjoint partitions of a stream are
//! combined with [`Accumulator::merge`]. Merge is only defined for kinds whose
//! statistic does not depend on observation order; every other kind reports
//! [`ErrorKind::UnsupportedOperation`](crate::error::ErrorKind::UnsupportedOperation).
//!
//! `value` returns `None` whenever the statistic is undefined for the number of
//! observations seen so far (a mean of nothing, a sample variance of one value).
//!
//! ```rust
//! # use accumulators::Accumulator;
//! # use accumulators::moments::Mean;
//! let mut left = Mean::new();
//! let mut right = Mean::new();
//! left.ingest_all([1.0, 2.0]).unwrap();
//! right.ingest_all([3.0, 4.0, 5.0]).unwrap();
//! left.merge(&right).unwrap();
//! assert_eq!(left.n(), 5);
//! assert_eq!(left.value().unwrap().as_scalar(), Some(3.0));
//! ```

use std::fmt;

use crate::error::Error;

/// A stateful single-pass statistic over a stream of observations.
pub trait Accumulator {
    /// The observation type folded in by [`ingest`](Accumulator::ingest).
    type Item;

    /// The primary statistic returned by [`value`](Accumulator::value).
    type Value;

    /// Name of this kind of accumulator, used in errors and logs.
    const KIND: &'static str;

    /// Folds one observation into the state.
    ///
    /// Fails if the observation is incompatible with the state, e.g. its shape
    /// differs from the shape locked by the first observation.
    fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error>;

    /// Combines another accumulator of the same kind into this one.
    ///
    /// The result equals ingesting the observations of both operands into a single
    /// accumulator. Kinds whose statistic depends on observation order keep this
    /// default and fail with an unsupported-operation error.
    fn merge(&mut self, other: &Self) -> Result<(), Error> {
        let _ = other;
        Err(Error::unsupported_merge(Self::KIND))
    }

    /// Returns the current statistic, or `None` if it is undefined so far.
    fn value(&self) -> Option<Self::Value>;

    /// Returns the number of observations folded in so far.
    fn n(&self) -> u64;

    /// Returns true if no observation has been folded in.
    fn is_empty(&self) -> bool {
        self.n() == 0
    }

    /// Folds every observation of `items` in order, stopping at the first failure.
    fn ingest_all<I>(&mut self, items: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<Self::Item>,
        Self: Sized,
    {
        for item in items {
            self.ingest(item)?;
        }
        Ok(())
    }
}

/// Reduces partial accumulators into one by successive merges.
///
/// Returns `Ok(None)` if `parts` is empty.
pub fn merge_all<A, I>(parts: I) -> Result<Option<A>, Error>
where
    A: Accumulator,
    I: IntoIterator<Item = A>,
{
    let mut parts = parts.into_iter();
    let Some(mut merged) = parts.next() else {
        return Ok(None);
    };
    for part in parts {
        merged.merge(&part)?;
    }
    Ok(Some(merged))
}

/// Writes the `<Kind of n observations>` summary shared by every accumulator.
pub(crate) fn describe<A: Accumulator>(acc: &A, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<{} of {} observations>", A::KIND, acc.n())
}
