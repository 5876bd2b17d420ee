/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

//! The staged pipeline builder.
//!
//! `FQueueRegistry::build_fqueue::<T>()` returns an [`FQueueBuilder`] for the
//! pipeline-wide settings; [`FQueueBuilder::batch`] moves on to the
//! [`BatchBuilder`]; [`BatchBuilder::done`] yields a [`BatchedFQueueBuilder`]
//! whose [`consume`](BatchedFQueueBuilder::consume) starts the pipeline. Each
//! stage only offers the calls that make sense at that point.

pub use batch_builder::{BatchBuilder, BatchedFQueueBuilder};
pub use fqueue_builder::FQueueBuilder;

mod batch_builder;
mod fqueue_builder;

use crate::message::FQueueError;

/// A builder value that may be assigned once.
///
/// A second assignment keeps the newest value but is remembered, so finalizing
/// reports [`FQueueError::DuplicateSetting`].
pub(crate) struct Setting<V> {
    name: &'static str,
    value: Option<V>,
    duplicated: bool,
}

impl<V> Setting<V> {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            value: None,
            duplicated: false,
        }
    }

    pub(crate) fn set(&mut self, value: V) {
        self.duplicated |= self.value.is_some();
        self.value = Some(value);
    }

    pub(crate) const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn optional(self) -> Result<Option<V>, FQueueError> {
        if self.duplicated {
            return Err(FQueueError::DuplicateSetting(self.name));
        }
        Ok(self.value)
    }

    pub(crate) fn required(self) -> Result<V, FQueueError> {
        let name = self.name;
        self.optional()?.ok_or(FQueueError::MissingSetting(name))
    }
}
