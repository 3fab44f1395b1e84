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

use async_trait::async_trait;

/// An opaque text-generation capability: prompt in, text out.
///
/// Providers are consumed by handlers, never by the bus itself. A call may
/// incur network latency; a handler awaiting one suspends only its own
/// agent's receive loop. Provider failures surface as ordinary handler
/// errors and are isolated per agent.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Generates a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
