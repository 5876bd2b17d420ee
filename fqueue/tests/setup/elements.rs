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
use serde::Serialize;

/// A payload whose JSON encoding is exactly 30 bytes long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexObject {
    pub name: String,
    pub age: u32,
}

impl Default for ComplexObject {
    fn default() -> Self {
        Self {
            name: "Anna Smith".to_string(),
            age: 22,
        }
    }
}

/// Weight function used by the weighted batching tests.
pub fn json_size(object: &ComplexObject) -> u64 {
    serde_json::to_vec(object).map_or(0, |bytes| bytes.len() as u64)
}

/// A payload type no pipeline is ever registered for.
#[derive(Debug, Clone)]
pub struct Unrouted(pub u8);
