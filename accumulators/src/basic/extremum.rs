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

use std::fmt;

use crate::accumulator::Accumulator;
use crate::accumulator::describe;
use crate::codec::Kind;
use crate::codec::StateBytes;
use crate::codec::StateSlice;
use crate::error::Error;
use crate::observation::Observation;
use crate::observation::ShapeLock;

/// Running elementwise reduction shared by [`Minimum`] and [`Maximum`].
#[derive(Debug, Clone, PartialEq)]
struct Extremum {
    shape: ShapeLock,
    current: Option<Observation>,
    n: u64,
}

impl Extremum {
    fn new() -> Self {
        Self {
            shape: ShapeLock::default(),
            current: None,
            n: 0,
        }
    }

    fn ingest(
        &mut self,
        kind: &'static str,
        observation: Observation,
        pick: fn(f64, f64) -> f64,
    ) -> Result<(), Error> {
        self.shape.check(kind, &observation)?;
        self.current = Some(match self.current.take() {
            Some(current) => current.zip_with(&observation, pick),
            None => observation,
        });
        self.n += 1;
        Ok(())
    }

    fn merge(&mut self, other: &Self, pick: fn(f64, f64) -> f64) -> Result<(), Error> {
        self.shape.check_merge(&other.shape)?;
        if let Some(theirs) = &other.current {
            self.current = Some(match self.current.take() {
                Some(ours) => ours.zip_with(theirs, pick),
                None => theirs.clone(),
            });
            self.shape = other.shape.clone();
        }
        self.n += other.n;
        Ok(())
    }

    fn serialize(&self, kind: Kind) -> Result<Vec<u8>, Error> {
        let len = self.current.as_ref().map_or(0, Observation::len);
        let mut bytes = StateBytes::with_capacity(16 + 8 * len);
        bytes.write_preamble(kind, self.n, self.shape.get())?;
        if let Some(current) = &self.current {
            bytes.write_values(current.values());
        }
        Ok(bytes.into_bytes())
    }

    fn deserialize(bytes: &[u8], kind: Kind) -> Result<Self, Error> {
        let mut slice = StateSlice::new(bytes);
        let (n, shape) = slice.read_preamble(kind)?;
        let mut extremum = Self::new();
        extremum.n = n;
        if let Some(shape) = shape {
            if n > 0 {
                extremum.current = Some(slice.read_observation(&shape)?);
            }
            extremum.shape = ShapeLock::locked(&shape);
        }
        slice.finish()?;
        Ok(extremum)
    }
}

macro_rules! impl_extremum {
    ($name:ident, $kind:expr, $codec_kind:expr, $pick:expr, $doc:literal) => {
        #[doc = $doc]
        ///
        /// NaN elements are skipped in favour of the other operand.
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            inner: Extremum,
        }

        impl $name {
            /// Creates an empty accumulator; the first observation locks the shape.
            pub fn new() -> Self {
                Self {
                    inner: Extremum::new(),
                }
            }

            /// Serializes the current state.
            pub fn serialize(&self) -> Result<Vec<u8>, Error> {
                self.inner.serialize($codec_kind)
            }

            /// Deserializes a state produced by `serialize`.
            pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
                Ok(Self {
                    inner: Extremum::deserialize(bytes, $codec_kind)?,
                })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Accumulator for $name {
            type Item = Observation;
            type Value = Observation;
            const KIND: &'static str = $kind;

            fn ingest(&mut self, item: impl Into<Self::Item>) -> Result<(), Error> {
                self.inner.ingest(Self::KIND, item.into(), $pick)
            }

            fn merge(&mut self, other: &Self) -> Result<(), Error> {
                self.inner.merge(&other.inner, $pick)
            }

            fn value(&self) -> Option<Observation> {
                self.inner.current.clone()
            }

            fn n(&self) -> u64 {
                self.inner.n
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                describe(self, f)
            }
        }
    };
}

impl_extremum!(
    Minimum,
    "Minimum",
    Kind::MINIMUM,
    f64::min,
    "Elementwise minimum of all observations."
);
impl_extremum!(
    Maximum,
    "Maximum",
    Kind::MAXIMUM,
    f64::max,
    "Elementwise maximum of all observations."
);
