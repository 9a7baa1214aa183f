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
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;

use ap_core::prelude::*;

/// A minimal behavior that counts its units of work.
pub struct ProbeTask {
    units: Arc<AtomicUsize>,
}

impl ProbeTask {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let units = Arc::new(AtomicUsize::new(0));
        (
            ProbeTask {
                units: units.clone(),
            },
            units,
        )
    }
}

#[async_trait::async_trait]
impl AgentTask for ProbeTask {
    async fn run_unit(&mut self, _ctx: &mut TaskContext) -> anyhow::Result<()> {
        self.units.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(5)).await;
        Ok(())
    }
}

/// Records every envelope handed to it, in arrival order.
pub struct RecorderTask {
    received: Arc<Mutex<Vec<MessageEnvelope>>>,
}

impl RecorderTask {
    pub fn new() -> (Self, Arc<Mutex<Vec<MessageEnvelope>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        (
            RecorderTask {
                received: received.clone(),
            },
            received,
        )
    }
}

#[async_trait::async_trait]
impl AgentTask for RecorderTask {
    async fn run_unit(&mut self, _ctx: &mut TaskContext) -> anyhow::Result<()> {
        sleep(Duration::from_millis(5)).await;
        Ok(())
    }

    async fn on_envelope(
        &mut self,
        envelope: MessageEnvelope,
        _ctx: &mut TaskContext,
    ) -> anyhow::Result<()> {
        self.received.lock().unwrap().push(envelope);
        Ok(())
    }
}

/// A behavior that refuses every graceful quit.
pub struct StubbornTask;

#[async_trait::async_trait]
impl AgentTask for StubbornTask {
    async fn run_unit(&mut self, _ctx: &mut TaskContext) -> anyhow::Result<()> {
        sleep(Duration::from_millis(5)).await;
        Ok(())
    }

    fn accept_quit(&self) -> bool {
        false
    }
}
