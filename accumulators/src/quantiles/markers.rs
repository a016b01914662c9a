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

use crate::quantiles::interp::Curve;
use crate::quantiles::interp::gradient_unchecked;
use crate::quantiles::interp::interp_unchecked;

/// P² marker state of a single scalar element.
///
/// Holds `k` marker positions and heights. Until `k` observations have been
/// seen the heights are raw observations in arrival order (unfilled slots are
/// NaN); afterwards heights are sorted ascending, the first position is 0 and the
/// last is `count - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Markers {
    positions: Vec<f64>,
    heights: Vec<f64>,
    count: u64,
}

impl Markers {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            positions: (0..k).map(|i| i as f64).collect(),
            heights: vec![f64::NAN; k],
            count: 0,
        }
    }

    /// Returns the number of values folded into these markers.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the marker positions.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Returns the marker heights.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Returns the smallest height seen so far, NaN before any observation.
    pub fn min(&self) -> f64 {
        self.heights.iter().copied().fold(f64::NAN, f64::min)
    }

    /// Returns the largest height seen so far, NaN before any observation.
    pub fn max(&self) -> f64 {
        self.heights.iter().copied().fold(f64::NAN, f64::max)
    }

    /// Marker positions scaled to `[0, 1]`.
    fn normalized_positions(&self) -> Vec<f64> {
        let last = self.positions[self.positions.len() - 1];
        self.positions.iter().map(|p| p / last).collect()
    }

    pub(crate) fn cdf(&self) -> Curve {
        Curve {
            x: self.heights.clone(),
            y: self.normalized_positions(),
        }
    }

    pub(crate) fn quantile(&self) -> Curve {
        Curve {
            x: self.normalized_positions(),
            y: self.heights.clone(),
        }
    }

    pub(crate) fn pdf(&self) -> Curve {
        let cdf = self.cdf();
        let density = gradient_unchecked(&cdf.y, &cdf.x);
        Curve {
            x: cdf.x,
            y: density,
        }
    }

    pub(crate) fn cdf_interp(&self, x: f64) -> f64 {
        interp_unchecked(x, &self.heights, &self.normalized_positions())
    }

    pub(crate) fn quantile_interp(&self, q: f64) -> f64 {
        interp_unchecked(q, &self.normalized_positions(), &self.heights)
    }

    /// Folds `x` in, given the `desired` quantile positions. NaN is skipped.
    pub(crate) fn fold(&mut self, x: f64, desired: &[f64]) {
        if x.is_nan() {
            return;
        }
        let n = self.count;
        self.count += 1;

        let k = self.heights.len();
        let n_usize = n as usize;
        if n_usize < k - 1 {
            self.heights[n_usize] = x;
            return;
        }
        if n_usize == k - 1 {
            self.heights[n_usize] = x;
            self.heights.sort_by(f64::total_cmp);
            return;
        }

        if x < self.heights[0] {
            self.heights[0] = x;
        }
        if x > self.heights[k - 1] {
            self.heights[k - 1] = x;
        }
        for i in 1..k {
            if self.heights[i] >= x {
                self.positions[i] += 1.0;
            }
        }

        let n = n as f64;
        for i in 1..k - 1 {
            let offset = desired[i] * n - self.positions[i];
            let room_above = self.positions[i + 1] - self.positions[i] > 1.0;
            let room_below = self.positions[i - 1] - self.positions[i] < -1.0;
            if (offset >= 1.0 && room_above) || (offset <= -1.0 && room_below) {
                let d = offset.signum();
                let mut height = self.parabolic(i, d);
                if !(self.heights[i - 1] < height && height < self.heights[i + 1]) {
                    height = self.linear(i, d);
                }
                self.heights[i] = height;
                self.positions[i] += d;
            }
        }
    }

    /// Piecewise-parabolic prediction of marker `i` moved by `d`.
    fn parabolic(&self, i: usize, d: f64) -> f64 {
        let (q1, q2, q3) = (self.heights[i - 1], self.heights[i], self.heights[i + 1]);
        let (n1, n2, n3) = (self.positions[i - 1], self.positions[i], self.positions[i + 1]);
        let upper = (n2 - n1 + d) * (q3 - q2) / (n3 - n2);
        let lower = (n3 - n2 - d) * (q2 - q1) / (n2 - n1);
        q2 + d / (n3 - n1) * (upper + lower)
    }

    /// Linear prediction of marker `i` moved by `d` toward its neighbour.
    fn linear(&self, i: usize, d: f64) -> f64 {
        let j = if d > 0.0 { i + 1 } else { i - 1 };
        let slope = (self.heights[j] - self.heights[i]) / (self.positions[j] - self.positions[i]);
        self.heights[i] + d * slope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Jain & Chlamtac's worked example, with the second value corrected to 0.15.
    const SAMPLES: [f64; 20] = [
        0.02, 0.15, 0.74, 3.39, 0.83, 22.37, 10.15, 15.43, 38.62, 15.92, 34.6, 10.28, 1.47, 0.4,
        0.05, 11.39, 0.27, 0.42, 0.09, 11.37,
    ];

    #[test]
    fn test_paper_positions_and_heights() {
        let desired = [0.0, 0.25, 0.5, 0.75, 1.0];
        let mut markers = Markers::new(5);
        for &x in &SAMPLES {
            markers.fold(x, &desired);
        }
        assert_eq!(markers.count(), 20);
        assert_eq!(markers.positions(), &[0.0, 5.0, 9.0, 15.0, 19.0]);
        let expected = [0.02, 0.4938954475308638, 4.440634353260338, 17.203904274140214, 38.62];
        for (h, e) in markers.heights().iter().zip(expected) {
            assert!((h - e).abs() < 1e-10, "expected {e}, got {h}");
        }
    }

    #[test]
    fn test_warm_up_keeps_arrival_order() {
        let desired = [0.0, 0.25, 0.5, 0.75, 1.0];
        let mut markers = Markers::new(5);
        markers.fold(3.0, &desired);
        markers.fold(f64::NAN, &desired);
        markers.fold(1.0, &desired);
        assert_eq!(markers.count(), 2);
        assert_eq!(markers.heights()[..2], [3.0, 1.0]);
        assert!(markers.heights()[2].is_nan());
        assert_eq!(markers.min(), 1.0);
        assert_eq!(markers.max(), 3.0);
    }

    #[test]
    fn test_parabolic_matches_paper_step() {
        let markers = Markers {
            positions: vec![0.0, 1.0, 2.0, 3.0, 6.0],
            heights: vec![0.02, 0.15, 0.74, 0.83, 22.37],
            count: 6,
        };
        assert!((markers.parabolic(3, 1.0) - 4.465).abs() < 1e-12);
    }
}
