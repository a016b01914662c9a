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

//! Utilities shared across accumulator kinds.

mod random;

pub use self::random::RandomSource;
pub use self::random::XorShift64;

use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Extracts a key or value from an observation.
pub(crate) type KeyFn<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// Returns wall-clock seconds since the Unix epoch.
pub(crate) fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Returns the number of `edges` less than or equal to `key`.
///
/// `edges` must be sorted ascending. A NaN key compares below every edge.
pub(crate) fn bisect_right(edges: &[f64], key: f64) -> usize {
    edges.partition_point(|&edge| edge <= key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisect_right() {
        let edges = [0.0, 1.0, 2.0];
        assert_eq!(bisect_right(&edges, -0.5), 0);
        assert_eq!(bisect_right(&edges, 0.0), 1);
        assert_eq!(bisect_right(&edges, 1.5), 2);
        assert_eq!(bisect_right(&edges, 2.0), 3);
        assert_eq!(bisect_right(&edges, f64::NAN), 0);
    }
}
