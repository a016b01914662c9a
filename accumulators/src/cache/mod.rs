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

//! Bounded caches of recent or highly ranked observations.
//!
//! [`CacheAccumulator`] keeps the last `length` observations in arrival order.
//! [`CacheMaximum`] keeps the `length` observations with the highest rank, and
//! optionally ages out observations once the retained items span more than a
//! timeout.
//!
//! Both record a timestamp per observation: wall-clock seconds since the Unix
//! epoch unless the caller supplies one.
//!
//! # Usage
//!
//! ```rust
//! # use accumulators::Accumulator;
//! # use accumulators::cache::CacheMaximum;
//! let mut brightest = CacheMaximum::new(3).unwrap();
//! brightest.ingest_all([4.0, 9.0, 1.0, 7.0, 8.0]).unwrap();
//! assert_eq!(brightest.value(), Some(vec![9.0, 8.0, 7.0]));
//! ```

mod maximum;
mod window;

pub use self::maximum::CacheMaximum;
pub use self::maximum::CacheMaximumBuilder;
pub use self::window::CacheAccumulator;

use crate::error::Error;

/// Default capacity of a [`CacheAccumulator`].
pub const DEFAULT_WINDOW_LENGTH: usize = 1;

/// Default capacity of a [`CacheMaximum`].
pub const DEFAULT_MAXIMUM_LENGTH: usize = 10;

fn check_length(length: usize) -> Result<usize, Error> {
    if length == 0 {
        return Err(Error::config("cache length must be positive").with_context("length", length));
    }
    Ok(length)
}
