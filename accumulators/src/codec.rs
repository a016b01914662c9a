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

//! Binary encoding of mergeable accumulator state.
//!
//! Partial accumulators built by separate workers are shipped to a reducer as
//! bytes and merged there. Every encoded state starts with the same preamble:
//!
//! ```text
//! byte 0      kind id
//! byte 1      serial version
//! byte 2      flags (bit 0: empty)
//! byte 3      shape rank
//! bytes 4..12 observation count n (u64, little-endian)
//! then        rank x u32 dimensions, followed by the kind's payload
//! ```

mod kind;

use std::io;
use std::io::Cursor;
use std::io::Read;

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use byteorder::ReadBytesExt;

pub(crate) use self::kind::Kind;
use crate::error::Error;
use crate::observation::Observation;
use crate::observation::element_count;

pub(crate) const SERIAL_VERSION: u8 = 1;
pub(crate) const FLAG_EMPTY: u8 = 1;

pub(crate) struct StateBytes {
    bytes: Vec<u8>,
}

impl StateBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    pub fn write_u8(&mut self, n: u8) {
        self.bytes.push(n);
    }

    pub fn write_u32_le(&mut self, n: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, n);
        self.write(&buf);
    }

    pub fn write_u64_le(&mut self, n: u64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, n);
        self.write(&buf);
    }

    pub fn write_f64_le(&mut self, n: f64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, n);
        self.write(&buf);
    }

    /// Writes the common preamble for `kind`.
    ///
    /// Fails if the shape has more than 255 dimensions or a dimension above `u32::MAX`.
    pub fn write_preamble(
        &mut self,
        kind: Kind,
        n: u64,
        shape: Option<&[usize]>,
    ) -> Result<(), Error> {
        let shape = shape.unwrap_or_default();
        let rank = u8::try_from(shape.len()).map_err(|_| {
            Error::config("shape has too many dimensions to encode")
                .with_context("rank", shape.len())
        })?;
        let dims = shape
            .iter()
            .map(|&dim| {
                u32::try_from(dim).map_err(|_| {
                    Error::config("shape dimension too large to encode").with_context("dim", dim)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.write_u8(kind.id);
        self.write_u8(SERIAL_VERSION);
        self.write_u8(if n == 0 { FLAG_EMPTY } else { 0 });
        self.write_u8(rank);
        self.write_u64_le(n);
        for dim in dims {
            self.write_u32_le(dim);
        }
        Ok(())
    }

    pub fn write_values(&mut self, values: &[f64]) {
        for &value in values {
            self.write_f64_le(value);
        }
    }
}

pub(crate) struct StateSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl StateSlice<'_> {
    pub fn new(slice: &[u8]) -> StateSlice<'_> {
        StateSlice {
            slice: Cursor::new(slice),
        }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.slice.read_u8()
    }

    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.slice.read_u32::<LittleEndian>()
    }

    pub fn read_u64_le(&mut self) -> io::Result<u64> {
        self.slice.read_u64::<LittleEndian>()
    }

    pub fn read_f64_le(&mut self) -> io::Result<f64> {
        self.slice.read_f64::<LittleEndian>()
    }

    /// Returns the number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len() as u64;
        len.saturating_sub(self.slice.position()) as usize
    }

    /// Returns true if every byte has been consumed.
    pub fn is_exhausted(&mut self) -> bool {
        let mut probe = [0u8; 1];
        matches!(self.slice.read(&mut probe), Ok(0))
    }

    /// Reads and validates the common preamble, returning `n` and the shape.
    ///
    /// The shape is `None` for an empty state that never locked one.
    pub fn read_preamble(&mut self, kind: Kind) -> Result<(u64, Option<Vec<usize>>), Error> {
        let kind_id = self.read_u8().map_err(make_error("kind_id"))?;
        let serial_version = self.read_u8().map_err(make_error("serial_version"))?;
        let flags = self.read_u8().map_err(make_error("flags"))?;
        let rank = self.read_u8().map_err(make_error("rank"))?;
        let n = self.read_u64_le().map_err(make_error("n"))?;

        kind.validate_id(kind_id)?;
        if serial_version != SERIAL_VERSION {
            return Err(Error::deserial(format!(
                "invalid serial version: expected {SERIAL_VERSION}, got {serial_version}"
            )));
        }
        let is_empty = flags & FLAG_EMPTY != 0;
        if is_empty != (n == 0) {
            return Err(Error::deserial(format!(
                "empty flag disagrees with count: flags {flags}, n {n}"
            )));
        }
        if is_empty && rank == 0 {
            return Ok((0, None));
        }

        let mut shape = Vec::with_capacity(rank as usize);
        for _ in 0..rank {
            let dim = self.read_u32_le().map_err(make_error("shape"))?;
            shape.push(dim as usize);
        }
        Ok((n, Some(shape)))
    }

    /// Reads the values of an observation of `shape`.
    ///
    /// The element count is checked against the remaining bytes before anything
    /// is allocated.
    pub fn read_observation(&mut self, shape: &[usize]) -> Result<Observation, Error> {
        let len = element_count(shape)
            .filter(|len| len.checked_mul(8).is_some_and(|size| size <= self.remaining()))
            .ok_or_else(|| {
                Error::insufficient_data("values").with_context("shape", format!("{shape:?}"))
            })?;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(self.read_f64_le().map_err(make_error("values"))?);
        }
        Ok(Observation::from_parts(shape.to_vec(), values))
    }

    /// Fails if trailing bytes remain after the payload.
    pub fn finish(mut self) -> Result<(), Error> {
        if self.is_exhausted() {
            Ok(())
        } else {
            Err(Error::deserial("trailing bytes after accumulator state"))
        }
    }
}

pub(crate) fn make_error(tag: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |err| Error::insufficient_data(tag).set_source(err)
}
