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
use accumulators::common::RandomSource;
use accumulators::common::XorShift64;
use accumulators::error::ErrorKind;
use accumulators::sampling::DEFAULT_RESERVOIR_LENGTH;
use accumulators::sampling::ReservoirSampling;
use googletest::assert_that;
use googletest::prelude::near;

#[test]
fn test_inclusion_frequency_is_uniform() {
    const N: usize = 20;
    const K: usize = 5;
    const TRIALS: usize = 20_000;

    let mut seeds = XorShift64::seeded(0x5eed);
    let mut hits = [0usize; N];
    for _ in 0..TRIALS {
        let rng = XorShift64::seeded(seeds.next_u64());
        let mut reservoir = ReservoirSampling::<usize, _>::with_rng(K, rng).unwrap();
        reservoir.ingest_all(0..N).unwrap();
        for &x in reservoir.sample() {
            hits[x] += 1;
        }
    }

    let expected = K as f64 / N as f64;
    for (position, &count) in hits.iter().enumerate() {
        let frequency = count as f64 / TRIALS as f64;
        assert_that!(frequency, near(expected, 0.02));
        assert!(count > 0, "position {position} never sampled");
    }
}

#[test]
fn test_sample_holds_distinct_stream_items() {
    let mut reservoir = ReservoirSampling::<u32, _>::with_rng(8, XorShift64::seeded(3)).unwrap();
    reservoir.ingest_all(0..10_000u32).unwrap();
    let mut sample = reservoir.value().unwrap();
    assert_eq!(sample.len(), 8);
    sample.sort_unstable();
    sample.dedup();
    assert_eq!(sample.len(), 8);
    assert_eq!(reservoir.n(), 10_000);
}

#[test]
fn test_seeded_reservoirs_are_reproducible() {
    let run = || {
        let mut reservoir =
            ReservoirSampling::<u32, _>::with_rng(4, XorShift64::seeded(99)).unwrap();
        reservoir.ingest_all(0..500u32).unwrap();
        reservoir.value()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_defaults_and_config() {
    let reservoir = ReservoirSampling::<f64>::default();
    assert_eq!(reservoir.length(), DEFAULT_RESERVOIR_LENGTH);
    assert!(reservoir.value().is_none());

    let err = ReservoirSampling::<f64>::new(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_merge_is_unsupported() {
    let mut left = ReservoirSampling::<f64>::new(3).unwrap();
    let right = ReservoirSampling::<f64>::new(3).unwrap();
    let err = left.merge(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}
