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

//! Uniform random sampling of streams of unknown length.
//!
//! [`ReservoirSampling`] implements Vitter's Algorithm R: after `m` observations
//! every one of them is held with probability `length / m`.
//!
//! # Usage
//!
//! ```rust
//! # use accumulators::Accumulator;
//! # use accumulators::common::XorShift64;
//! # use accumulators::sampling::ReservoirSampling;
//! let mut reservoir = ReservoirSampling::<i32, _>::with_rng(5, XorShift64::seeded(42)).unwrap();
//! reservoir.ingest_all(0..1000).unwrap();
//! let sample = reservoir.value().unwrap();
//! assert_eq!(sample.len(), 5);
//! assert!(sample.iter().all(|x| (0..1000).contains(x)));
//! ```

mod reservoir;

pub use self::reservoir::ReservoirSampling;

/// Default reservoir size.
pub const DEFAULT_RESERVOIR_LENGTH: usize = 10;
