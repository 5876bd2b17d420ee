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

use std::fmt;

use crate::common::WeightFn;
use crate::message::BatchReason;

/// What the accumulator asks its worker to do after an element arrives.
pub(crate) enum Accumulated<T> {
    /// Keep buffering.
    Pending,
    /// Deliver `batch` to the consumer.
    Flush {
        reason: BatchReason,
        batch: Vec<T>,
    },
}

/// Outcome of a flush-interval tick.
pub(crate) enum Tick<T> {
    /// Deliver everything that was buffered, as a [`BatchReason::TimeFlush`].
    Flush(Vec<T>),
    /// Nothing was buffered.
    Idle,
}

/// Buffers elements for one worker and decides when they flush.
///
/// Not synchronized: it is owned by a single worker loop.
pub(crate) struct BatchAccumulator<T> {
    buffer: Vec<T>,
    weight: u64,
    chunk_size: u64,
    weigh: WeightFn<T>,
}

impl<T> BatchAccumulator<T> {
    pub(crate) fn new(chunk_size: u64, weigh: WeightFn<T>) -> Self {
        Self {
            buffer: Vec::new(),
            weight: 0,
            chunk_size,
            weigh,
        }
    }

    /// Buffers `element`; flushes the whole buffer once the weight reaches the chunk size.
    pub(crate) fn add(&mut self, element: T) -> Accumulated<T> {
        self.weight = self.weight.saturating_add((self.weigh)(&element));
        self.buffer.push(element);

        if self.weight >= self.chunk_size {
            Accumulated::Flush {
                reason: BatchReason::MaxWeightReached,
                batch: self.take(),
            }
        } else {
            Accumulated::Pending
        }
    }

    pub(crate) fn on_timer_tick(&mut self) -> Tick<T> {
        if self.is_empty() {
            Tick::Idle
        } else {
            Tick::Flush(self.take())
        }
    }

    /// Drops whatever is buffered and returns how many elements were lost.
    pub(crate) fn discard(&mut self) -> usize {
        self.take().len()
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub(crate) const fn weight(&self) -> u64 {
        self.weight
    }

    fn take(&mut self) -> Vec<T> {
        self.weight = 0;
        std::mem::take(&mut self.buffer)
    }
}

impl<T> fmt::Debug for BatchAccumulator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchAccumulator")
            .field("buffered", &self.buffer.len())
            .field("weight", &self.weight)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}
