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
use accumulators::error::ErrorKind;
use accumulators::merge_all;
use accumulators::moments::Covariance;
use accumulators::moments::DEFAULT_LIFETIME;
use accumulators::moments::Mean;
use accumulators::moments::RunningCovariance;
use accumulators::moments::RunningMean;
use accumulators::moments::RunningVariance;
use accumulators::moments::Variance;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::near;

const TOLERANCE: f64 = 1e-12;

const SAMPLES: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

fn scalar(value: Option<Observation>) -> f64 {
    value.and_then(|obs| obs.as_scalar()).unwrap()
}

#[test]
fn test_empty_values_are_undefined() {
    assert!(Mean::new().value().is_none());
    assert!(Variance::new().value().is_none());
    assert!(Covariance::new().value().is_none());
    assert!(RunningMean::new().value().is_none());

    let mut variance = Variance::new();
    variance.ingest(3.0).unwrap();
    assert!(variance.value().is_none());
    assert_that!(scalar(variance.mean()), near(3.0, TOLERANCE));
}

#[test]
fn test_mean_and_sum() {
    let mut mean = Mean::new();
    mean.ingest_all(SAMPLES).unwrap();
    assert_eq!(mean.n(), 8);
    assert_that!(scalar(mean.value()), near(5.0, TOLERANCE));
    assert_that!(scalar(mean.sum()), near(40.0, TOLERANCE));
}

#[test]
fn test_variance_std_rms() {
    let mut variance = Variance::new();
    variance.ingest_all(SAMPLES).unwrap();
    assert_that!(scalar(variance.value()), near(32.0 / 7.0, TOLERANCE));
    assert_that!(scalar(variance.std()), near((32.0f64 / 7.0).sqrt(), TOLERANCE));
    // sqrt(mean of squares) = sqrt(232 / 8)
    assert_that!(scalar(variance.rms()), near(29.0f64.sqrt(), TOLERANCE));
}

#[test]
fn test_variance_is_stable_with_large_offset() {
    let mut variance = Variance::new();
    variance
        .ingest_all(SAMPLES.iter().map(|x| x + 1e9))
        .unwrap();
    assert_that!(scalar(variance.value()), near(32.0 / 7.0, 1e-4));
}

#[test]
fn test_array_variance_is_elementwise() {
    let mut variance = Variance::new();
    variance.ingest([1.0, 10.0]).unwrap();
    variance.ingest([3.0, 10.0]).unwrap();
    variance.ingest([5.0, 10.0]).unwrap();
    let value = variance.value().unwrap();
    assert_eq!(value.shape(), &[2]);
    assert_that!(value.values()[0], near(4.0, TOLERANCE));
    assert_that!(value.values()[1], near(0.0, TOLERANCE));
}

#[test]
fn test_merge_equals_single_pass() {
    let mut whole = Variance::new();
    whole.ingest_all(SAMPLES).unwrap();

    let parts = SAMPLES.chunks(3).map(|chunk| {
        let mut part = Variance::new();
        part.ingest_all(chunk.iter().copied()).unwrap();
        part
    });
    let merged = merge_all(parts).unwrap().unwrap();

    assert_eq!(merged.n(), whole.n());
    assert_that!(scalar(merged.value()), near(scalar(whole.value()), TOLERANCE));
    assert_that!(scalar(merged.mean()), near(scalar(whole.mean()), TOLERANCE));
}

#[test]
fn test_merge_is_order_independent() {
    let mut left = Variance::new();
    left.ingest_all([1.0, 2.0, 3.0]).unwrap();
    let mut right = Variance::new();
    right.ingest_all([10.0, 20.0]).unwrap();

    let mut ab = left.clone();
    ab.merge(&right).unwrap();
    let mut ba = right.clone();
    ba.merge(&left).unwrap();
    assert_that!(scalar(ab.value()), near(scalar(ba.value()), 1e-9));
}

#[test]
fn test_merge_with_empty_side() {
    let mut variance = Variance::new();
    variance.ingest_all(SAMPLES).unwrap();
    let before = scalar(variance.value());
    variance.merge(&Variance::new()).unwrap();
    assert_that!(scalar(variance.value()), near(before, TOLERANCE));

    let mut empty = Variance::new();
    empty.merge(&variance).unwrap();
    assert_eq!(empty.n(), 8);
    assert_that!(scalar(empty.value()), near(before, TOLERANCE));
}

#[test]
fn test_mean_from_parts_merges_weighted() {
    let mut mean = Mean::from_parts(2.0, 2);
    mean.merge(&Mean::from_parts(5.0, 1)).unwrap();
    assert_eq!(mean.n(), 3);
    assert_that!(scalar(mean.value()), near(3.0, TOLERANCE));
}

#[test]
fn test_covariance_matrix() {
    let mut covariance = Covariance::new();
    covariance.ingest_all([[1.0, 2.0], [2.0, 4.0], [3.0, 7.0]]).unwrap();
    let value = covariance.value().unwrap();
    assert_eq!(value.shape(), &[2, 2]);
    let expected = [1.0, 2.5, 2.5, 114.0 / 18.0];
    for (actual, expected) in value.values().iter().zip(expected) {
        assert_that!(*actual, near(expected, TOLERANCE));
    }
    let std = covariance.std().unwrap();
    assert_that!(std.values()[0], near(1.0, TOLERANCE));
    assert_that!(std.values()[1], near((114.0f64 / 18.0).sqrt(), TOLERANCE));
}

#[test]
fn test_covariance_merge() {
    let rows = [[1.0, 2.0], [2.0, 4.0], [3.0, 7.0], [0.5, -1.0], [4.0, 4.0]];
    let mut whole = Covariance::new();
    whole.ingest_all(rows).unwrap();

    let mut left = Covariance::new();
    left.ingest_all(rows[..2].iter().copied()).unwrap();
    let mut right = Covariance::new();
    right.ingest_all(rows[2..].iter().copied()).unwrap();
    left.merge(&right).unwrap();

    let (merged, whole) = (left.value().unwrap(), whole.value().unwrap());
    for (a, b) in merged.values().iter().zip(whole.values()) {
        assert_that!(*a, near(*b, 1e-9));
    }
}

#[test]
fn test_shape_mismatch_on_ingest() {
    let mut mean = Mean::new();
    mean.ingest([1.0, 2.0]).unwrap();
    let err = mean.ingest([1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(mean.n(), 1);

    let mut scalar_then_array = Variance::new();
    scalar_then_array.ingest(1.0).unwrap();
    assert!(scalar_then_array.ingest([1.0]).is_err());
}

#[test]
fn test_shape_mismatch_on_merge() {
    let mut left = Mean::new();
    left.ingest([1.0, 2.0]).unwrap();
    let mut right = Mean::new();
    right.ingest(1.0).unwrap();
    let err = left.merge(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn test_running_mean_is_exact_within_lifetime() {
    let mut mean = RunningMean::new();
    assert_eq!(mean.lifetime(), DEFAULT_LIFETIME);
    mean.ingest_all((1..=10).map(f64::from)).unwrap();
    assert_that!(scalar(mean.value()), near(5.5, TOLERANCE));
}

#[test]
fn test_running_mean_forgets_old_values() {
    let mut mean = RunningMean::with_lifetime(5.0).unwrap();
    mean.ingest_all(std::iter::repeat_n(0.0, 50)).unwrap();
    mean.ingest_all(std::iter::repeat_n(1.0, 50)).unwrap();
    // (1 - 1/5)^50 of the old level remains
    let expected = 1.0 - 0.8f64.powi(50);
    assert_that!(scalar(mean.value()), near(expected, 1e-12));
}

#[test]
fn test_running_mean_lifetime_changes_alpha() {
    let mut mean = RunningMean::new();
    mean.ingest_all((0..100).map(f64::from)).unwrap();
    assert_that!(mean.alpha(), near(0.1, TOLERANCE));
    mean.set_lifetime(4.0).unwrap();
    assert_that!(mean.alpha(), near(0.25, TOLERANCE));

    let err = mean.set_lifetime(0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(RunningMean::with_lifetime(f64::NAN).is_err());
    assert_that!(mean.lifetime(), near(4.0, TOLERANCE));
}

#[test]
fn test_lifetime_below_one_is_rejected() {
    for lifetime in [0.25, 0.5, 0.999] {
        let err = RunningMean::with_lifetime(lifetime).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(err.message(), contains_substring("at least 1"));
    }
    let mut variance = RunningVariance::with_lifetime(3.0).unwrap();
    assert!(variance.set_lifetime(0.5).is_err());
    assert_eq!(variance.lifetime(), 3.0);

    // the shortest lifetime tracks the latest observation without overshooting
    let mut mean = RunningMean::with_lifetime(1.0).unwrap();
    mean.ingest_all([0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
    assert_eq!(mean.alpha(), 1.0);
    assert_eq!(mean.value().unwrap().as_scalar(), Some(1.0));
}

#[test]
fn test_running_variance_within_lifetime() {
    let mut variance = RunningVariance::with_lifetime(100.0).unwrap();
    variance.ingest(SAMPLES[0]).unwrap();
    assert!(variance.value().is_none());
    variance.ingest_all(SAMPLES[1..].iter().copied()).unwrap();
    // population variance while every observation still has equal weight
    assert_that!(scalar(variance.value()), near(4.0, TOLERANCE));
    assert_that!(scalar(variance.std()), near(2.0, TOLERANCE));
    assert_that!(scalar(variance.mean()), near(5.0, TOLERANCE));
}

#[test]
fn test_running_variance_of_constant_stream_decays() {
    let mut variance = RunningVariance::new();
    variance.ingest_all([0.0, 10.0]).unwrap();
    variance.ingest_all(std::iter::repeat_n(5.0, 200)).unwrap();
    assert_that!(scalar(variance.value()), near(0.0, 1e-6));
}

#[test]
fn test_running_covariance_shape() {
    let mut covariance = RunningCovariance::new();
    covariance.ingest_all([[1.0, 2.0], [2.0, 4.0], [3.0, 7.0]]).unwrap();
    let value = covariance.value().unwrap();
    assert_eq!(value.shape(), &[2, 2]);
    // population covariance while within the lifetime
    assert_that!(value.values()[1], near(5.0 / 3.0, TOLERANCE));
    assert_eq!(covariance.std().unwrap().len(), 2);
}

#[test]
fn test_running_kinds_refuse_merge() {
    let mut mean = RunningMean::new();
    let err = mean.merge(&RunningMean::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    assert_that!(err.to_string(), contains_substring("RunningMean"));

    let mut variance = RunningVariance::new();
    assert!(variance.merge(&RunningVariance::new()).is_err());
}

#[test]
fn test_display() {
    let mut mean = Mean::new();
    mean.ingest_all([1.0, 2.0]).unwrap();
    assert_eq!(mean.to_string(), "<Mean of 2 observations>");
}
