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

/// Identifies the accumulator kind stored in an encoded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Kind {
    pub id: u8,
    pub name: &'static str,
}

impl Kind {
    pub const COUNTER: Kind = Kind {
        id: 1,
        name: "Counter",
    };

    pub const MINIMUM: Kind = Kind {
        id: 2,
        name: "Minimum",
    };

    pub const MAXIMUM: Kind = Kind {
        id: 3,
        name: "Maximum",
    };

    pub const MEAN: Kind = Kind {
        id: 4,
        name: "Mean",
    };

    pub const VARIANCE: Kind = Kind {
        id: 5,
        name: "Variance",
    };

    pub const COVARIANCE: Kind = Kind {
        id: 6,
        name: "Covariance",
    };
}

impl Kind {
    pub fn validate_id(&self, kind_id: u8) -> Result<(), Error> {
        if kind_id != self.id {
            Err(Error::invalid_kind(self.id, kind_id, self.name))
        } else {
            Ok(())
        }
    }
}
