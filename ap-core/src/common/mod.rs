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

//! Common structures: the platform container, configuration, agent
//! handles, and the directory facilitator.

pub use agent_handle::AgentHandle;
pub use config::{LimitsConfig, PlatformConfig, TimeoutConfig, CONFIG};
pub use directory::{DirectoryError, DirectoryFacilitator, SearchCriteria, ServiceDescription};
pub use platform::AgentPlatform;
pub(crate) use types::{
    ControlReceiver, ControlSender, InboundReceiver, InboundSender, SharedStateMachine,
};

mod agent_handle;
mod config;
mod directory;
mod platform;
mod types;
