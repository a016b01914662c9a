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

//! Online CDF and quantile estimation with the P² algorithm.
//!
//! The P² algorithm (Jain & Chlamtac, "The P² algorithm for dynamic calculation
//! of quantiles and histograms without storing observations", CACM 1985) tracks
//! a fixed number of markers, each a `(position, height)` pair approximating a
//! target quantile. Every observation shifts marker positions; interior markers
//! that drift at least one position from their desired spot are moved by one,
//! with heights predicted by a piecewise-parabolic formula, falling back to
//! linear interpolation when the parabola would break height ordering.
//!
//! Memory is constant per element regardless of stream length. The estimate
//! depends on the order of observations, so none of these kinds merge.
//!
//! # Usage
//!
//! ```rust
//! # use accumulators::Accumulator;
//! # use accumulators::quantiles::CdfEstimator;
//! let mut estimator = CdfEstimator::new(11).unwrap();
//! for i in 0..1000 {
//!     estimator.ingest((i * 37 % 100) as f64).unwrap();
//! }
//! let median = estimator.quantile_interp(0.5).unwrap().as_scalar().unwrap();
//! assert!((median - 50.0).abs() < 10.0);
//! ```

mod estimator;
mod interp;
mod markers;
mod quantile;

pub use self::estimator::CdfEstimator;
pub use self::estimator::CdfPoints;
pub use self::interp::Curve;
pub use self::interp::gradient;
pub use self::interp::interp;
pub use self::markers::Markers;
pub use self::quantile::MedianEstimator;
pub use self::quantile::QuantileEstimator;
