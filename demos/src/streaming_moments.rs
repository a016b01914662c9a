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

//! Example demonstrating moment accumulators over a partitioned stream

use accumulators::Accumulator;
use accumulators::Observation;
use accumulators::error::Error;
use accumulators::merge_all;
use accumulators::moments::Covariance;
use accumulators::moments::RunningMean;
use accumulators::moments::Variance;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn scalar(value: Option<Observation>) -> f64 {
    value.and_then(|obs| obs.as_scalar()).unwrap_or(f64::NAN)
}

fn main() -> Result<(), Error> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber");

    println!("=== Streaming Moments Example ===\n");

    // Example 1: one variance per partition, reduced afterwards
    println!("1. Partitioned variance:");
    let stream: Vec<f64> = (0..10_000).map(|i| ((i * 7919) % 1000) as f64 / 10.0).collect();
    let parts = stream
        .chunks(2_500)
        .map(|chunk| {
            let mut part = Variance::new();
            part.ingest_all(chunk.iter().copied())?;
            Ok::<_, Error>(part)
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let merged = merge_all(parts)?.unwrap_or_default();
    println!("   {merged}");
    println!("   Mean: {:.4}", scalar(merged.mean()));
    println!("   Variance: {:.4}", scalar(merged.value()));
    println!("   Std: {:.4}", scalar(merged.std()));
    println!();

    // Example 2: covariance of correlated pairs
    println!("2. Covariance of (x, 2x + noise):");
    let mut covariance = Covariance::new();
    for (i, &x) in stream.iter().enumerate().take(1_000) {
        let noise = ((i * 31) % 7) as f64 - 3.0;
        covariance.ingest([x, 2.0 * x + noise])?;
    }
    if let Some(matrix) = covariance.value() {
        println!("   Matrix: {matrix}");
    }
    println!();

    // Example 3: exponentially weighted mean tracking a level shift
    println!("3. Running mean across a level shift:");
    let mut running = RunningMean::with_lifetime(20.0)?;
    for step in 0..100 {
        let level = if step < 50 { 1.0 } else { 5.0 };
        running.ingest(level)?;
        if step % 25 == 24 {
            println!("   step {:>3}: {:.4}", step + 1, scalar(running.value()));
        }
    }
    println!();

    Ok(())
}
