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
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fqueue::prelude::*;
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Shared log of every batch delivered to the consumers it created.
#[derive(Clone)]
pub struct Batches<T> {
    delivered: Arc<Mutex<Vec<(BatchReason, Vec<T>)>>>,
}

impl<T> Default for Batches<T> {
    fn default() -> Self {
        Self {
            delivered: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Element> Batches<T> {
    /// A consumer recording into this log. Usable as a consumer factory.
    pub fn recorder(&self) -> Recorder<T> {
        Recorder {
            delivered: self.delivered.clone(),
        }
    }

    pub fn push(&self, reason: BatchReason, batch: Vec<T>) {
        self.delivered.lock().push((reason, batch));
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().len()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.delivered.lock().iter().map(|(_, batch)| batch.len()).collect()
    }

    pub fn reasons(&self) -> Vec<BatchReason> {
        self.delivered.lock().iter().map(|(reason, _)| *reason).collect()
    }

    pub fn total_elements(&self) -> usize {
        self.sizes().iter().sum()
    }

    /// Every delivered element, batch after batch.
    pub fn elements(&self) -> Vec<T> {
        self.delivered
            .lock()
            .iter()
            .flat_map(|(_, batch)| batch.iter().cloned())
            .collect()
    }
}

/// Consumer that appends each batch to a shared [`Batches`] log.
pub struct Recorder<T> {
    delivered: Arc<Mutex<Vec<(BatchReason, Vec<T>)>>>,
}

#[async_trait]
impl<T: Element> Consumer<T> for Recorder<T> {
    async fn consume(
        &mut self,
        _pipeline: &PipelineHandle,
        reason: BatchReason,
        batch: Vec<T>,
    ) -> anyhow::Result<()> {
        assert!(!batch.is_empty(), "empty batch delivered");
        self.delivered.lock().push((reason, batch));
        Ok(())
    }
}

/// Counts calls; clones share the count.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records every fault reported to a failure handler.
#[derive(Clone, Default)]
pub struct Faults {
    reported: Arc<Mutex<Vec<String>>>,
    shutdowns: Counter,
    consumer_faults: Counter,
}

impl Faults {
    /// A failure handler recording into this log.
    pub fn handler(&self) -> impl Fn(&ActorFault) + Send + Sync + 'static {
        let faults = self.clone();
        move |fault: &ActorFault| {
            if fault.is_shutdown() {
                faults.shutdowns.bump();
            }
            if fault.is_consumer_fault() {
                faults.consumer_faults.bump();
            }
            faults.reported.lock().push(fault.to_string());
        }
    }

    pub fn count(&self) -> usize {
        self.reported.lock().len()
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.get()
    }

    pub fn consumer_faults(&self) -> usize {
        self.consumer_faults.get()
    }

    pub fn messages(&self) -> Vec<String> {
        self.reported.lock().clone()
    }
}

/// Consumer that parks on every batch until released.
#[derive(Clone)]
pub struct Gate {
    pub entered: Arc<AtomicBool>,
    pub release: Arc<Notify>,
}

impl Gate {
    /// The consumer plus its `entered` flag and its release signal.
    pub fn pair() -> (Self, Arc<AtomicBool>, Arc<Notify>) {
        let entered = Arc::new(AtomicBool::new(false));
        let release = Arc::new(Notify::new());
        (
            Self {
                entered: entered.clone(),
                release: release.clone(),
            },
            entered,
            release,
        )
    }
}

#[async_trait]
impl<T: Element> Consumer<T> for Gate {
    async fn consume(
        &mut self,
        _pipeline: &PipelineHandle,
        _reason: BatchReason,
        _batch: Vec<T>,
    ) -> anyhow::Result<()> {
        self.entered.store(true, Ordering::SeqCst);
        self.release.notified().await;
        Ok(())
    }
}

/// Consumer that takes `delay` per batch.
#[derive(Clone)]
pub struct Slow {
    pub delay: Duration,
    pub entered: Arc<AtomicBool>,
}

#[async_trait]
impl<T: Element> Consumer<T> for Slow {
    async fn consume(
        &mut self,
        _pipeline: &PipelineHandle,
        _reason: BatchReason,
        _batch: Vec<T>,
    ) -> anyhow::Result<()> {
        self.entered.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
