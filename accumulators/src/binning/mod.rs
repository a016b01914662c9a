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

//! Histogram binning with a sub-accumulator per bin.
//!
//! A bin sorter extracts a sort key and a data value from every observation,
//! locates the bin whose edges enclose the key, and feeds the data value to that
//! bin's sub-accumulator. With the default [`Counter`](crate::basic::Counter)
//! sub-accumulator this is a plain histogram; any other accumulator gives, for
//! example, the mean of one quantity binned by another.
//!
//! [`BinSorter`] uses fixed edges and catches keys outside them in an underflow
//! and an overflow bin. [`DynamicBinSorter`] derives equiprobable edges from a
//! P² [`CdfEstimator`](crate::quantiles::CdfEstimator) fed with every sort key.
//!
//! # Usage
//!
//! ```rust
//! # use accumulators::Accumulator;
//! # use accumulators::binning::BinSorter;
//! let mut sorter = BinSorter::new(vec![0.0, 1.0, 2.0]).unwrap();
//! sorter.ingest_all([-1.0, 0.5, 0.7, 1.5, 9.0]).unwrap();
//! let (edges, counts) = sorter.histogram();
//! assert_eq!(edges, vec![0.0, 1.0, 2.0]);
//! assert_eq!(counts, vec![2, 1]);
//! assert_eq!(sorter.underflow().n(), 1);
//! assert_eq!(sorter.overflow().n(), 1);
//! ```

mod dynamic;
mod fixed;

pub use self::dynamic::DynamicBinSorter;
pub use self::fixed::BinSorter;

/// Divides each count by the width of its bin. Zero-width bins have density 0.
pub(crate) fn density(edges: &[f64], counts: &[u64]) -> Vec<f64> {
    edges
        .windows(2)
        .zip(counts)
        .map(|(edge, &count)| {
            let width = edge[1] - edge[0];
            if width > 0.0 {
                count as f64 / width
            } else {
                0.0
            }
        })
        .collect()
}
