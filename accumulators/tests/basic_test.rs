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

use accumulators::Accumulator;
use accumulators::Observation;
use accumulators::basic::Counter;
use accumulators::basic::Maximum;
use accumulators::basic::Minimum;
use accumulators::error::ErrorKind;
use accumulators::merge_all;

#[test]
fn test_counter_counts_anything() {
    let mut counter = Counter::<&str>::new();
    assert_eq!(counter.value(), Some(0));
    assert!(counter.is_empty());
    counter.ingest_all(["a", "b", "c"]).unwrap();
    assert_eq!(counter.value(), Some(3));
    assert_eq!(counter.to_string(), "<Counter of 3 observations>");
}

#[test]
fn test_counter_merge_sums() {
    let parts = [2, 0, 5].map(Counter::<f64>::with_count);
    let merged = merge_all(parts).unwrap().unwrap();
    assert_eq!(merged.n(), 7);
    assert!(merge_all(Vec::<Counter>::new()).unwrap().is_none());
}

#[test]
fn test_extrema_of_scalars() {
    let mut min = Minimum::new();
    let mut max = Maximum::new();
    assert!(min.value().is_none());
    for x in [3.0, -1.5, 8.0, 2.0] {
        min.ingest(x).unwrap();
        max.ingest(x).unwrap();
    }
    assert_eq!(min.value().unwrap().as_scalar(), Some(-1.5));
    assert_eq!(max.value().unwrap().as_scalar(), Some(8.0));
    assert_eq!(max.n(), 4);
}

#[test]
fn test_extrema_are_elementwise() {
    let mut min = Minimum::new();
    let mut max = Maximum::new();
    for row in [[1.0, 5.0], [3.0, 2.0], [2.0, 9.0]] {
        min.ingest(row).unwrap();
        max.ingest(row).unwrap();
    }
    assert_eq!(min.value(), Some(Observation::from([1.0, 2.0])));
    assert_eq!(max.value(), Some(Observation::from([3.0, 9.0])));

    let err = min.ingest([1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn test_extrema_merge() {
    let mut left = Maximum::new();
    left.ingest_all([1.0, 4.0]).unwrap();
    let mut right = Maximum::new();
    right.ingest_all([7.0, 2.0, 3.0]).unwrap();

    let mut merged = left.clone();
    merged.merge(&right).unwrap();
    assert_eq!(merged.value().unwrap().as_scalar(), Some(7.0));
    assert_eq!(merged.n(), 5);

    let mut empty = Maximum::new();
    empty.merge(&left).unwrap();
    assert_eq!(empty.value(), left.value());

    let mut wide = Minimum::new();
    wide.ingest([0.0, 0.0]).unwrap();
    let mut narrow = Minimum::new();
    narrow.ingest(1.0).unwrap();
    assert!(wide.merge(&narrow).is_err());
}
