// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Synthetic GPU utilization provider.

use calibra_core::UtilizationProvider;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::borrow::Cow;
use std::ops::RangeInclusive;

/// Band the synthetic readings are drawn from, in percent.
pub const GPU_BAND: RangeInclusive<u32> = 20..=100;

/// Produces uniformly random whole percentages in [`GPU_BAND`].
#[derive(Debug)]
pub struct SyntheticGpuProvider {
    rng: SmallRng,
}

impl SyntheticGpuProvider {
    /// Creates a provider seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates a deterministic provider.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticGpuProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilizationProvider for SyntheticGpuProvider {
    fn provider_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("gpu.synthetic")
    }

    fn sample(&mut self) -> f32 {
        self.rng.gen_range(GPU_BAND) as f32
    }
}
