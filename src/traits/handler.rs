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

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::common::MailboxRegistry;
use crate::message::Message;

/// A pinned, boxed, dynamically dispatched future returned by closure-based
/// handlers. This is the required return type when a plain closure stands in
/// for a [`Handler`] implementation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// User-supplied per-message logic bound to exactly one agent.
///
/// The only externally observable effect of a handler is further
/// [`send`](MailboxRegistry::send) calls through the registry handle it is
/// given; nothing it returns is consumed beyond the `Result`. An `Err` is
/// logged by the agent's runner and discarded, and the receive loop keeps
/// going — a failing handler degrades only its own agent.
///
/// Invocations for a single agent are strictly serialized: the runner never
/// begins a second invocation before the first completes or fails.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Processes one message. `registry` may be used to send to any name.
    async fn on_message(
        &self,
        message: Message,
        registry: &MailboxRegistry,
    ) -> anyhow::Result<()>;
}

/// Lets a plain closure act as a handler, preserving function-reference
/// ergonomics for callers that don't need a stateful implementation.
#[async_trait]
impl<F> Handler for F
where
    F: Fn(Message, MailboxRegistry) -> HandlerFuture + Send + Sync + 'static,
{
    async fn on_message(
        &self,
        message: Message,
        registry: &MailboxRegistry,
    ) -> anyhow::Result<()> {
        (self)(message, registry.clone()).await
    }
}
