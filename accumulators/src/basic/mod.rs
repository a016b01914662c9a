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

//! Trivial leaf accumulators: a counter and elementwise extrema.
//!
//! All three are order-independent and therefore mergeable.
//!
//! # Usage
//!
//! ```rust
//! # use accumulators::Accumulator;
//! # use accumulators::basic::{Counter, Maximum};
//! let mut counter = Counter::<&str>::new();
//! counter.ingest_all(["a", "b", "c"]).unwrap();
//! assert_eq!(counter.value(), Some(3));
//!
//! let mut max = Maximum::new();
//! max.ingest([1.0, 5.0]).unwrap();
//! max.ingest([4.0, 2.0]).unwrap();
//! assert_eq!(max.value().unwrap().values(), &[4.0, 5.0]);
//! ```

mod counter;
mod extremum;

pub use self::counter::Counter;
pub use self::extremum::Maximum;
pub use self::extremum::Minimum;
