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

//! Single-pass streaming accumulators.
//!
//! Every accumulator implements [`Accumulator`]: observations are folded in one
//! at a time with `ingest`, the current statistic is read with `value`, and
//! accumulators built over disjoint partitions of a stream are combined with
//! `merge` where the statistic allows it.
//!
//! | Module | Accumulators | Mergeable |
//! |--------|--------------|-----------|
//! | [`basic`] | [`Counter`](basic::Counter), [`Minimum`](basic::Minimum), [`Maximum`](basic::Maximum) | yes |
//! | [`moments`] | [`Mean`](moments::Mean), [`Variance`](moments::Variance), [`Covariance`](moments::Covariance) | yes |
//! | [`moments`] | [`RunningMean`](moments::RunningMean), [`RunningVariance`](moments::RunningVariance), [`RunningCovariance`](moments::RunningCovariance) | no |
//! | [`quantiles`] | [`CdfEstimator`](quantiles::CdfEstimator), [`QuantileEstimator`](quantiles::QuantileEstimator), [`MedianEstimator`](quantiles::MedianEstimator) | no |
//! | [`binning`] | [`BinSorter`](binning::BinSorter) | if its bins are |
//! | [`binning`] | [`DynamicBinSorter`](binning::DynamicBinSorter) | no |
//! | [`cache`] | [`CacheAccumulator`](cache::CacheAccumulator), [`CacheMaximum`](cache::CacheMaximum) | yes |
//! | [`sampling`] | [`ReservoirSampling`](sampling::ReservoirSampling) | no |
//!
//! Numeric observations are [`Observation`]s: a scalar or a fixed-shape array of
//! `f64`. The first observation locks the element shape; later observations of a
//! different shape are rejected.
//!
//! Accumulators are plain single-threaded values. To aggregate in parallel, build
//! one accumulator per partition and reduce them with [`merge_all`].
//!
//! # Usage
//!
//! ```rust
//! use accumulators::Accumulator;
//! use accumulators::moments::Variance;
//!
//! let mut variance = Variance::new();
//! variance.ingest_all([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
//! let value = variance.value().unwrap().as_scalar().unwrap();
//! assert!((value - 32.0 / 7.0).abs() < 1e-12);
//! assert_eq!(variance.to_string(), "<Variance of 8 observations>");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod accumulator;
mod codec;
mod observation;

pub mod basic;
pub mod binning;
pub mod cache;
pub mod common;
pub mod error;
pub mod moments;
pub mod quantiles;
pub mod sampling;

pub use self::accumulator::Accumulator;
pub use self::accumulator::merge_all;
pub use self::observation::Observation;
