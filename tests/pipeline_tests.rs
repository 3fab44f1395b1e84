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

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::unbounded_channel;
use tokio::time::timeout;

use mailbus::prelude::*;

use crate::setup::{initialize_tracing, EchoProvider};

mod setup;

/// End-to-end review/debug round trip.
///
/// **Scenario:**
/// 1. The reviewer forwards user reports to the debugger, prefixed with
///    "Please investigate: ".
/// 2. The debugger consults the provider and sends the suggestion back to
///    the reviewer.
/// 3. An external caller kicks the pipeline off with a bug report.
///
/// **Verification:**
/// - The reviewer receives exactly one reply, from "debugger", whose content
///   is the provider's transformation of the forwarded report.
#[tokio::test(flavor = "multi_thread")]
async fn test_review_debug_round_trip() -> anyhow::Result<()> {
    initialize_tracing();
    let manager = AgentManager::new();
    let provider = Arc::new(EchoProvider { tag: "claude-stub" });
    let (probe_tx, mut probe_rx) = unbounded_channel::<Message>();

    let reviewer = move |message: Message, registry: MailboxRegistry| -> HandlerFuture {
        let probe = probe_tx.clone();
        Box::pin(async move {
            if message.sender == "debugger" {
                // The suggestion came back; surface it to the test.
                probe.send(message).ok();
            } else {
                let _ = registry.send(Message::new(
                    "reviewer".to_string(),
                    "debugger".to_string(),
                    format!("Please investigate: {}", message.content),
                ));
            }
            Ok(())
        })
    };

    let debugger_provider = provider.clone();
    let debugger = move |message: Message, registry: MailboxRegistry| -> HandlerFuture {
        let provider = debugger_provider.clone();
        Box::pin(async move {
            let suggestion = provider.generate(&message.content).await?;
            let _ = registry.send(Message::new(
                "debugger".to_string(),
                "reviewer".to_string(),
                suggestion,
            ));
            Ok(())
        })
    };

    manager.add_agent("reviewer", reviewer)?;
    manager.add_agent("debugger", debugger)?;
    manager.start_all();

    let status = manager.send("user", "reviewer", "bug: null pointer");
    assert!(status.is_delivered());

    let reply = timeout(Duration::from_secs(2), probe_rx.recv())
        .await?
        .expect("probe closed");
    assert_eq!(reply.sender, "debugger");
    assert_eq!(reply.recipient, "reviewer");
    assert_eq!(
        reply.content,
        "[claude-stub] Please investigate: bug: null pointer"
    );

    // Exactly one reply: nothing else reaches the reviewer.
    assert!(timeout(Duration::from_millis(200), probe_rx.recv())
        .await
        .is_err());

    manager.stop_all().await;
    Ok(())
}

/// Three cooperating agents with a shared provider, shut down as a group.
///
/// **Scenario:**
/// 1. The writer implements whatever it is asked and reports to the
///    reviewer; the reviewer collects reports.
/// 2. A provider failure inside the debugger degrades only the debugger.
///
/// **Verification:**
/// - The writer's output reaches the reviewer while the debugger keeps
///   failing, and `stop_all` leaves every runner `Stopped`.
#[tokio::test(flavor = "multi_thread")]
async fn test_three_agent_pipeline_stops_cleanly() -> anyhow::Result<()> {
    initialize_tracing();
    let manager = AgentManager::new();
    let provider = Arc::new(EchoProvider { tag: "openai-stub" });
    let (probe_tx, mut probe_rx) = unbounded_channel::<Message>();

    let reviewer = move |message: Message, _registry: MailboxRegistry| -> HandlerFuture {
        let probe = probe_tx.clone();
        Box::pin(async move {
            probe.send(message).ok();
            Ok(())
        })
    };

    let writer_provider = provider.clone();
    let writer = move |message: Message, registry: MailboxRegistry| -> HandlerFuture {
        let provider = writer_provider.clone();
        Box::pin(async move {
            let code = provider
                .generate(&format!("Implement: {}", message.content))
                .await?;
            let _ = registry.send(Message::new(
                "writer".to_string(),
                "reviewer".to_string(),
                code,
            ));
            Ok(())
        })
    };

    let debugger = move |_message: Message, _registry: MailboxRegistry| -> HandlerFuture {
        Box::pin(async move { anyhow::bail!("provider unavailable") })
    };

    manager.add_agent("reviewer", reviewer)?;
    manager.add_agent("writer", writer)?;
    manager.add_agent("debugger", debugger)?;
    manager.start_all();
    assert_eq!(manager.agent_count(), 3);

    // The debugger fails on this one; nobody else should notice.
    let _ = manager.send("user", "debugger", "broken request");
    let status = manager.send("user", "writer", "a caching layer");
    assert!(status.is_delivered());

    let report = timeout(Duration::from_secs(2), probe_rx.recv())
        .await?
        .expect("probe closed");
    assert_eq!(report.sender, "writer");
    assert_eq!(report.content, "[openai-stub] Implement: a caching layer");

    manager.stop_all().await;
    for name in ["reviewer", "writer", "debugger"] {
        assert_eq!(manager.runner_state(name), Some(RunnerState::Stopped));
    }
    Ok(())
}
