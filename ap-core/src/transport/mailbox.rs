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

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::message::MessageEnvelope;

/// Per-agent FIFO buffer for envelopes that cannot be delivered yet.
///
/// Owned by the transport service on behalf of one agent. Unbounded unless
/// a capacity is configured; enqueue and the dequeue-on-wake drain are
/// mutually exclusive, while mailboxes of different agents are independent.
#[derive(Debug, Default)]
pub struct Mailbox {
    queue: Mutex<VecDeque<MessageEnvelope>>,
    capacity: usize,
}

impl Mailbox {
    /// A mailbox with the given capacity; `0` means unbounded.
    pub(crate) fn new(capacity: usize) -> Self {
        Mailbox {
            queue: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Appends an envelope, refusing once the configured capacity is hit.
    pub(crate) fn push(&self, envelope: MessageEnvelope) -> bool {
        let mut queue = self.queue.lock();
        if self.capacity != 0 && queue.len() >= self.capacity {
            return false;
        }
        queue.push_back(envelope);
        true
    }

    /// Removes and returns every buffered envelope in FIFO order.
    pub(crate) fn drain(&self) -> Vec<MessageEnvelope> {
        self.queue.lock().drain(..).collect()
    }

    /// Number of envelopes currently buffered.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Whether the mailbox is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
