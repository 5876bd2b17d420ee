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

use std::panic;
use std::sync::Once;

use parking_lot::Mutex;
use tracing::error;

/// A panic observed on one of the runtime threads owned by a test.
struct CaughtPanic {
    thread: String,
    message: String,
    location: String,
}

static CAUGHT: Mutex<Vec<CaughtPanic>> = parking_lot::const_mutex(Vec::new());
static HOOK: Once = Once::new();

/// Records panics raised on the worker threads of one test runtime.
///
/// The process-wide hook is installed once and chained in front of the previous
/// hook; each test only looks at panics from threads carrying its own name, so
/// tests running in parallel do not see each other's failures.
#[derive(Debug)]
pub struct PanicWatch {
    thread_name: String,
}

impl PanicWatch {
    /// Installs the shared hook (first call only) and starts watching `test_name`.
    pub fn install(test_name: &str) -> Self {
        HOOK.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                let thread = std::thread::current()
                    .name()
                    .unwrap_or_default()
                    .to_string();
                if thread.starts_with("fqueue-test::") {
                    let payload = info.payload();
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "no panic message".to_string());
                    let location = info
                        .location()
                        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                        .unwrap_or_else(|| "unknown location".to_string());
                    error!(%thread, %location, "panic: {}", message.trim().replace('\n', " "));
                    CAUGHT.lock().push(CaughtPanic {
                        thread,
                        message,
                        location,
                    });
                }
                previous(info);
            }));
        });

        Self {
            thread_name: format!("fqueue-test::{test_name}"),
        }
    }

    /// Name given to every thread of the test runtime.
    pub fn thread_name(&self) -> String {
        self.thread_name.clone()
    }

    /// Fails the test if any of its runtime threads panicked.
    ///
    /// # Panics
    ///
    /// Panics with the first recorded message and location.
    pub fn check(self) {
        let mine: Vec<CaughtPanic> = {
            let mut caught = CAUGHT.lock();
            let (mine, others) = caught
                .drain(..)
                .partition(|p: &CaughtPanic| p.thread == self.thread_name);
            *caught = others;
            mine
        };

        if let Some(first) = mine.first() {
            panic!(
                "{} panic(s) inside actor tasks; first at {}: {}",
                mine.len(),
                first.location,
                first.message.trim().replace('\n', " ")
            );
        }
    }
}
