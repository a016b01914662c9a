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
use accumulators::cache::CacheAccumulator;
use accumulators::cache::CacheMaximum;
use accumulators::cache::DEFAULT_MAXIMUM_LENGTH;
use accumulators::cache::DEFAULT_WINDOW_LENGTH;
use accumulators::error::ErrorKind;

type Star = (f64, f64);

fn brightness(star: &Star) -> f64 {
    star.0
}

fn seen_at(star: &Star) -> f64 {
    star.1
}

#[test]
fn test_window_defaults_to_latest_only() {
    let mut cache = CacheAccumulator::<&str>::default();
    assert_eq!(cache.length(), DEFAULT_WINDOW_LENGTH);
    assert!(cache.value().is_none());
    cache.ingest_all(["first", "second"]).unwrap();
    assert_eq!(cache.value(), Some(vec!["second"]));
    assert_eq!(cache.n(), 2);
}

#[test]
fn test_window_merge_is_time_ordered_and_bounded() {
    let mut left = CacheAccumulator::<u32>::new(3).unwrap();
    for (x, t) in [(1u32, 10.0), (3, 30.0), (5, 50.0)] {
        left.ingest_at(x, t);
    }
    let mut right = CacheAccumulator::<u32>::new(3).unwrap();
    for (x, t) in [(2u32, 20.0), (4, 40.0), (6, 60.0)] {
        right.ingest_at(x, t);
    }

    let mut merged = left.clone();
    merged.merge(&right).unwrap();
    assert_eq!(merged.value(), Some(vec![4, 5, 6]));
    assert_eq!(merged.timestamps(), vec![40.0, 50.0, 60.0]);
    assert_eq!(merged.n(), 6);

    right.merge(&left).unwrap();
    assert_eq!(right.value(), merged.value());
}

#[test]
fn test_window_merge_with_empty() {
    let mut cache = CacheAccumulator::<u32>::new(2).unwrap();
    cache.ingest_at(7u32, 1.0);
    cache.merge(&CacheAccumulator::new(2).unwrap()).unwrap();
    assert_eq!(cache.value(), Some(vec![7]));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_maximum_keeps_top_ranks() {
    let mut cache = CacheMaximum::new(3).unwrap();
    let stream = (0..200).map(|i| f64::from((i * 7919) % 211));
    let mut seen = Vec::new();
    for x in stream {
        cache.ingest(x).unwrap();
        seen.push(x);
        seen.sort_by(|a, b| b.total_cmp(a));
        let expected: Vec<f64> = seen.iter().copied().take(3).collect();
        assert_eq!(cache.value().unwrap(), expected);
    }
    assert_eq!(cache.n(), 200);
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_maximum_defaults() {
    let cache = CacheMaximum::builder(brightness).build().unwrap();
    assert_eq!(cache.length(), DEFAULT_MAXIMUM_LENGTH);
    assert_eq!(cache.timeout(), None);
    assert!(cache.value().is_none());
    assert!(CacheMaximum::new(0).is_err());
}

#[test]
fn test_maximum_timeout_evicts_old_bright_items() {
    let mut cache = CacheMaximum::builder(brightness)
        .length(2)
        .time_key(seen_at)
        .timeout(10.0)
        .build()
        .unwrap();
    cache.ingest((100.0, 0.0)).unwrap();
    cache.ingest((90.0, 1.0)).unwrap();
    cache.ingest((1.0, 20.0)).unwrap();
    assert_eq!(cache.value(), Some(vec![(90.0, 1.0), (1.0, 20.0)]));
    cache.ingest((2.0, 21.0)).unwrap();
    assert_eq!(cache.value(), Some(vec![(2.0, 21.0), (1.0, 20.0)]));

    // within the timeout, rank decides again
    cache.ingest((0.5, 22.0)).unwrap();
    assert_eq!(cache.value(), Some(vec![(2.0, 21.0), (1.0, 20.0)]));
}

#[test]
fn test_maximum_ranked() {
    let mut cache = CacheMaximum::builder(brightness).length(2).build().unwrap();
    cache.ingest_all([(3.0, 0.0), (5.0, 0.0), (4.0, 0.0)]).unwrap();
    let ranks: Vec<f64> = cache.ranked().into_iter().map(|(rank, _)| rank).collect();
    assert_eq!(ranks, vec![5.0, 4.0]);
}

#[test]
fn test_maximum_merge_without_timeout_is_exact() {
    let values: Vec<f64> = (0..50).map(|i| f64::from((i * 37) % 53)).collect();
    let mut whole = CacheMaximum::new(5).unwrap();
    whole.ingest_all(values.iter().copied()).unwrap();

    let mut left = CacheMaximum::new(5).unwrap();
    left.ingest_all(values[..20].iter().copied()).unwrap();
    let mut right = CacheMaximum::new(5).unwrap();
    right.ingest_all(values[20..].iter().copied()).unwrap();
    left.merge(&right).unwrap();

    assert_eq!(left.value(), whole.value());
    assert_eq!(left.n(), 50);
}

#[test]
fn test_maximum_merge_applies_timeout() {
    let build = || {
        CacheMaximum::builder(brightness)
            .length(2)
            .time_key(seen_at)
            .timeout(10.0)
            .build()
            .unwrap()
    };
    let mut old = build();
    old.ingest_all([(100.0, 0.0), (90.0, 1.0)]).unwrap();
    let mut recent = build();
    recent.ingest_all([(1.0, 30.0), (2.0, 31.0)]).unwrap();

    old.merge(&recent).unwrap();
    assert_eq!(old.value(), Some(vec![(2.0, 31.0), (1.0, 30.0)]));
    assert_eq!(old.n(), 4);
}

#[test]
fn test_maximum_invalid_config() {
    let err = CacheMaximum::builder(brightness).length(0).build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    let err = CacheMaximum::builder(brightness).timeout(-1.0).build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}
