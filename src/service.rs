// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::AuthBrokerError;
use crate::provider::Provider;

/// The assembled service.
///
/// Constructed once at startup; every field is read-only afterwards, so the
/// request path shares it without locks.
pub struct Service {
    /// Config file.
    pub config: Config,
    /// Service providers.
    pub provider: Provider,
}

pub type ServiceState = Arc<Service>;

impl Service {
    pub fn new(cfg: Config, provider: Provider) -> Result<Self, AuthBrokerError> {
        // Fail startup on an unusable base URL rather than on the first
        // authorization request.
        cfg.default.base_url()?;

        Ok(Self {
            config: cfg,
            provider,
        })
    }

    pub async fn terminate(&self) -> Result<(), AuthBrokerError> {
        info!("Terminating authbroker");
        Ok(())
    }
}
