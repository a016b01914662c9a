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

use crate::error::Error;

/// A piecewise-linear curve sampled at the P² markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Abscissae, ascending.
    pub x: Vec<f64>,
    /// Ordinates, one per abscissa.
    pub y: Vec<f64>,
}

/// Linearly interpolates `fp` over the ascending sample points `xp` at `x`.
///
/// Values of `x` outside `xp` clamp to the first or last ordinate. Fails if
/// `xp` and `fp` are empty or differ in length.
///
/// ```rust
/// # use accumulators::quantiles::interp;
/// assert_eq!(interp(1.5, &[1.0, 2.0], &[10.0, 20.0]).unwrap(), 15.0);
/// assert_eq!(interp(9.0, &[1.0, 2.0], &[10.0, 20.0]).unwrap(), 20.0);
/// ```
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> Result<f64, Error> {
    check_lengths(xp, fp, 1)?;
    Ok(interp_unchecked(x, xp, fp))
}

/// Numeric derivative of `f` with respect to the ascending sample points `x`.
///
/// Interior points use second-order central differences for uneven spacing;
/// the end points use one-sided first differences. Fails if the inputs differ
/// in length or hold fewer than two points.
pub fn gradient(f: &[f64], x: &[f64]) -> Result<Vec<f64>, Error> {
    check_lengths(x, f, 2)?;
    Ok(gradient_unchecked(f, x))
}

fn check_lengths(xs: &[f64], ys: &[f64], min_len: usize) -> Result<(), Error> {
    if xs.len() != ys.len() {
        return Err(Error::config("sample points and values differ in length")
            .with_context("points", xs.len())
            .with_context("values", ys.len()));
    }
    if xs.len() < min_len {
        return Err(Error::config(format!("at least {min_len} sample points are required"))
            .with_context("points", xs.len()));
    }
    Ok(())
}

pub(crate) fn interp_unchecked(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let j = xp.partition_point(|&p| p <= x);
    if j == 0 {
        return fp[0];
    }
    if j == xp.len() {
        return fp[fp.len() - 1];
    }
    let (x0, x1) = (xp[j - 1], xp[j]);
    let (y0, y1) = (fp[j - 1], fp[j]);
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

pub(crate) fn gradient_unchecked(f: &[f64], x: &[f64]) -> Vec<f64> {
    let len = f.len();
    let mut out = vec![0.0; len];
    out[0] = (f[1] - f[0]) / (x[1] - x[0]);
    out[len - 1] = (f[len - 1] - f[len - 2]) / (x[len - 1] - x[len - 2]);
    for i in 1..len - 1 {
        let hd = x[i] - x[i - 1];
        let hs = x[i + 1] - x[i];
        out[i] = (hd * hd * f[i + 1] + (hs * hs - hd * hd) * f[i] - hs * hs * f[i - 1])
            / (hs * hd * (hd + hs));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_interp_clamps_and_interpolates() {
        let xp = [0.0, 1.0, 3.0];
        let fp = [0.0, 10.0, 30.0];
        assert_eq!(interp(-1.0, &xp, &fp).unwrap(), 0.0);
        assert_eq!(interp(2.0, &xp, &fp).unwrap(), 20.0);
        assert_eq!(interp(3.0, &xp, &fp).unwrap(), 30.0);
        assert!(interp(f64::NAN, &xp, &fp).unwrap().is_nan());
    }

    #[test]
    fn test_interp_rejects_mismatched_lengths() {
        let err = interp(0.0, &[0.0, 1.0], &[0.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(interp(0.0, &[], &[]).is_err());
    }

    #[test]
    fn test_gradient_of_quadratic_is_exact_inside() {
        let x = [0.0, 1.0, 3.0, 4.0];
        let f: Vec<f64> = x.iter().map(|v| v * v).collect();
        let g = gradient(&f, &x).unwrap();
        assert!((g[1] - 2.0).abs() < 1e-12);
        assert!((g[2] - 6.0).abs() < 1e-12);
        assert_eq!(g[0], 1.0);
        assert_eq!(g[3], 7.0);
    }
}
