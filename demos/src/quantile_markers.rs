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

//! Example demonstrating P² quantile estimation and adaptive histograms

use accumulators::Accumulator;
use accumulators::binning::DynamicBinSorter;
use accumulators::cache::CacheMaximum;
use accumulators::error::Error;
use accumulators::quantiles::CdfEstimator;
use accumulators::quantiles::MedianEstimator;
use accumulators::sampling::ReservoirSampling;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Error> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber");

    println!("=== Quantile Markers Example ===\n");

    let stream = [
        0.02, 0.15, 0.74, 3.39, 0.83, 22.37, 10.15, 15.43, 38.62, 15.92, 34.6, 10.28, 1.47, 0.4,
        0.05, 11.39, 0.27, 0.42, 0.19, 11.37,
    ];

    // Example 1: running median
    println!("1. Running median:");
    let mut median = MedianEstimator::new();
    for x in stream {
        median.ingest(x)?;
        match median.value().and_then(|obs| obs.as_scalar()) {
            Some(m) => println!("   after {:>5.2}: {m:.6}", x),
            None => println!("   after {:>5.2}: not enough observations", x),
        }
    }
    println!();

    // Example 2: CDF curve from five markers
    println!("2. Estimated CDF:");
    let mut cdf = CdfEstimator::new(5)?;
    cdf.ingest_all(stream)?;
    if let Some(curves) = cdf.cdf() {
        for (x, y) in curves[0].x.iter().zip(&curves[0].y) {
            println!("   F({x:>8.4}) = {y:.4}");
        }
    }
    println!();

    // Example 3: equiprobable bins
    println!("3. Dynamic histogram:");
    let mut histogram = DynamicBinSorter::new(4)?;
    histogram.ingest_all((0..2_000).map(|i| ((i * 7919) % 1000) as f64))?;
    if let Some((edges, counts)) = histogram.histogram() {
        println!("   Edges: {edges:.1?}");
        println!("   Counts: {counts:?}");
    }
    println!();

    // Example 4: top values and a uniform sample
    println!("4. Top three and a sample of five:");
    let mut top = CacheMaximum::new(3)?;
    top.ingest_all(stream)?;
    let mut sample = ReservoirSampling::<f64>::new(5)?;
    sample.ingest_all(stream)?;
    println!("   Top: {:?}", top.value().unwrap_or_default());
    println!("   Sample: {:?}", sample.value().unwrap_or_default());
    println!();

    Ok(())
}
