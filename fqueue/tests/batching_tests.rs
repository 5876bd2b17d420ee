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
#![allow(dead_code, unused_doc_comments)]

use std::sync::Arc;
use std::time::Duration;

use fqueue::prelude::*;
use fqueue_test::prelude::*;
use parking_lot::Mutex;

use crate::setup::consumers::{Batches, Counter};
use crate::setup::elements::{json_size, ComplexObject};
use crate::setup::{initialize_tracing, wait_until};

mod setup;

const NEVER: Duration = Duration::from_secs(3600);

/// 100 elements with a chunk of 5 and no fan-out arrive as 20 full batches, in order.
#[fqueue_test]
async fn weight_flush_without_fan_out() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let batches = Batches::<u32>::default();

    let fqueue = registry
        .build_fqueue::<u32>()
        .batch()
        .with_chunk_size(5)
        .with_flush_interval(NEVER)
        .done()
        .consume(|| batches.recorder())?;

    for n in 0..100_u32 {
        assert_eq!(registry.send_broadcast(n).await, 1);
    }

    assert!(wait_until(Duration::from_secs(5), || batches.count() == 20).await);
    assert!(batches.sizes().iter().all(|size| *size == 5));
    assert!(batches
        .reasons()
        .iter()
        .all(|reason| *reason == BatchReason::MaxWeightReached));
    assert_eq!(batches.elements(), (0..100).collect::<Vec<u32>>());

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

/// With fan-out 5 each worker batches its own share of 20 elements.
#[fqueue_test]
async fn weight_flush_with_fan_out() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let batches = Batches::<u32>::default();

    let fqueue = registry
        .build_fqueue::<u32>()
        .fan_out(5)
        .batch()
        .with_chunk_size(5)
        .with_flush_interval(NEVER)
        .done()
        .consume(|| batches.recorder())?;

    for n in 0..100_u32 {
        registry.send_broadcast(n).await;
    }

    assert!(wait_until(Duration::from_secs(5), || batches.count() == 20).await);
    assert!(batches.sizes().iter().all(|size| *size == 5));

    // Round-robin: a batch only holds elements of one residue class mod 5,
    // and each worker sees its share in send order.
    let mut elements = batches.elements();
    for batch in elements.chunks(5) {
        assert!(batch.iter().all(|n| n % 5 == batch[0] % 5), "{batch:?}");
        assert!(batch.windows(2).all(|pair| pair[0] < pair[1]), "{batch:?}");
    }
    for residue in 0..5 {
        let share: Vec<u32> = elements.iter().copied().filter(|n| n % 5 == residue).collect();
        assert_eq!(share.len(), 20);
        assert!(share.windows(2).all(|pair| pair[0] < pair[1]), "{share:?}");
    }
    elements.sort_unstable();
    assert_eq!(elements, (0..100).collect::<Vec<u32>>());

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

/// 30-byte objects with a 150-byte chunk flush five at a time.
#[fqueue_test]
async fn custom_weight_without_fan_out() -> anyhow::Result<()> {
    initialize_tracing();
    assert_eq!(json_size(&ComplexObject::default()), 30);

    let registry = FQueueRegistry::default();
    let batches = Batches::<ComplexObject>::default();

    let fqueue = registry
        .build_fqueue::<ComplexObject>()
        .batch()
        .with_chunk_size(150)
        .with_flush_interval(NEVER)
        .with_weight_fn(json_size)
        .done()
        .consume(|| batches.recorder())?;

    for _ in 0..50 {
        registry.send_broadcast(ComplexObject::default()).await;
    }

    assert!(wait_until(Duration::from_secs(5), || batches.count() == 10).await);
    assert!(batches.sizes().iter().all(|size| *size == 5));

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

#[fqueue_test]
async fn custom_weight_with_fan_out() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let batches = Batches::<ComplexObject>::default();

    let fqueue = registry
        .build_fqueue::<ComplexObject>()
        .fan_out(5)
        .batch()
        .with_chunk_size(150)
        .with_flush_interval(NEVER)
        .with_weight_fn(json_size)
        .done()
        .consume(|| batches.recorder())?;

    for _ in 0..50 {
        registry.send_broadcast(ComplexObject::default()).await;
    }

    assert!(wait_until(Duration::from_secs(5), || batches.count() == 10).await);
    assert!(batches.sizes().iter().all(|size| *size == 5));

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

/// The remainder below the chunk size is delivered by the timer.
#[fqueue_test]
async fn time_flush_delivers_the_remainder() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let batches = Batches::<u32>::default();

    let fqueue = registry
        .build_fqueue::<u32>()
        .batch()
        .with_chunk_size(5)
        .with_flush_interval(Duration::from_millis(300))
        .done()
        .consume(|| batches.recorder())?;

    for n in 0..7_u32 {
        registry.send_broadcast(n).await;
    }

    assert!(wait_until(Duration::from_secs(5), || batches.count() == 2).await);
    assert_eq!(batches.sizes(), vec![5, 2]);
    assert_eq!(
        batches.reasons(),
        vec![BatchReason::MaxWeightReached, BatchReason::TimeFlush]
    );
    assert_eq!(batches.elements(), (0..7).collect::<Vec<u32>>());

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

/// Each worker's timer flushes its own partial batch.
#[fqueue_test]
async fn time_flush_with_fan_out() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let batches = Batches::<u32>::default();

    let fqueue = registry
        .build_fqueue::<u32>()
        .fan_out(2)
        .batch()
        .with_chunk_size(5)
        .with_flush_interval(Duration::from_millis(200))
        .done()
        .consume(|| batches.recorder())?;

    for n in 0..7_u32 {
        registry.send_broadcast(n).await;
    }

    assert!(wait_until(Duration::from_secs(5), || batches.total_elements() == 7).await);
    let mut sizes = batches.sizes();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 4]);
    assert!(batches
        .reasons()
        .iter()
        .all(|reason| *reason == BatchReason::TimeFlush));

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

/// An idle worker reports a no-op per elapsed interval and never delivers an empty batch.
#[fqueue_test]
async fn idle_worker_reports_noops() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let batches = Batches::<u32>::default();
    let noops = Counter::default();
    let on_noop = noops.clone();

    let fqueue = registry
        .build_fqueue::<u32>()
        .with_noop_handler(move || on_noop.bump())
        .batch()
        .with_chunk_size(5)
        .with_flush_interval(Duration::from_millis(40))
        .done()
        .consume(|| batches.recorder())?;

    assert!(wait_until(Duration::from_secs(5), || noops.get() >= 3).await);
    assert_eq!(batches.count(), 0);

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

/// Every worker runs its own timer; the dispatcher never ticks.
#[fqueue_test]
async fn idle_fanned_out_workers_report_noops() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let batches = Batches::<u32>::default();
    let noops = Counter::default();
    let on_noop = noops.clone();

    let fqueue = registry
        .build_fqueue::<u32>()
        .fan_out(3)
        .with_noop_handler(move || on_noop.bump())
        .batch()
        .with_chunk_size(5)
        .with_flush_interval(Duration::from_millis(40))
        .done()
        .consume(|| batches.recorder())?;

    assert!(wait_until(Duration::from_secs(5), || noops.get() >= 6).await);
    assert_eq!(batches.count(), 0);

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}

/// Consumers see the pipeline they serve.
#[fqueue_test]
async fn consumers_receive_the_pipeline_handle() -> anyhow::Result<()> {
    initialize_tracing();
    let registry = FQueueRegistry::default();
    let seen: Arc<Mutex<Vec<(String, usize, bool)>>> = Arc::default();

    let fqueue = registry
        .build_fqueue::<u32>()
        .named("metrics")
        .fan_out(2)
        .batch()
        .with_chunk_size(1)
        .with_flush_interval(NEVER)
        .done()
        .consume(|| {
            let seen = seen.clone();
            move |pipeline: &PipelineHandle, _: BatchReason, _: Vec<u32>| -> anyhow::Result<()> {
                seen.lock().push((
                    pipeline.name().to_string(),
                    pipeline.fan_out(),
                    pipeline.element_type().ends_with("u32"),
                ));
                Ok(())
            }
        })?;

    registry.send_broadcast(1_u32).await;
    registry.send_broadcast(2_u32).await;

    assert!(wait_until(Duration::from_secs(5), || seen.lock().len() == 2).await);
    assert!(seen
        .lock()
        .iter()
        .all(|entry| *entry == ("metrics".to_string(), 2, true)));
    assert_eq!(fqueue.handle().name(), "metrics");
    assert!(fqueue.id().to_string().contains("metrics"));

    assert!(fqueue.destroy_and_await(Duration::from_secs(5)).await);
    Ok(())
}
