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

//! Incremental mean, variance and covariance.
//!
//! [`Mean`], [`Variance`] and [`Covariance`] use Welford's algorithm: the running
//! average is kept directly (never a running sum), and each observation updates
//! the mean of squared deviations from the deviations before and after the mean
//! moves. Partial results over disjoint partitions merge exactly with the
//! parallel-variance formula.
//!
//! [`RunningMean`], [`RunningVariance`] and [`RunningCovariance`] are the
//! exponentially weighted analogues with smoothing factor `1 / lifetime`. Early
//! observations are weighted by `1 / n` until `n` exceeds the lifetime. They
//! depend on observation order and do not merge.
//!
//! # Usage
//!
//! ```rust
//! # use accumulators::Accumulator;
//! # use accumulators::moments::Variance;
//! let mut left = Variance::new();
//! let mut right = Variance::new();
//! left.ingest_all([2.0, 4.0, 4.0, 4.0]).unwrap();
//! right.ingest_all([5.0, 5.0, 7.0, 9.0]).unwrap();
//! left.merge(&right).unwrap();
//! let variance = left.value().unwrap().as_scalar().unwrap();
//! assert!((variance - 32.0 / 7.0).abs() < 1e-12);
//! ```

mod deviations;
mod mean;
mod running;
mod variance;

pub use self::mean::Mean;
pub use self::running::RunningCovariance;
pub use self::running::RunningMean;
pub use self::running::RunningVariance;
pub use self::variance::Covariance;
pub use self::variance::Variance;

/// Default lifetime of the exponentially weighted accumulators.
pub const DEFAULT_LIFETIME: f64 = 10.0;
