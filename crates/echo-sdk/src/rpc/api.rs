//! API identifiers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::SdkError;

/// Node API a method lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Api {
    /// Login API, always id 1
    Login,
    /// Chain state queries and subscriptions
    Database,
    /// Transaction broadcast
    NetworkBroadcast,
    /// Account history
    History,
    /// Account registration
    Registration,
}

impl Api {
    /// Fixed id of the login API
    pub const LOGIN_ID: u64 = 1;

    /// Name used to access the API through login
    pub fn name(self) -> &'static str {
        match self {
            Api::Login => "login",
            Api::Database => "database",
            Api::NetworkBroadcast => "network_broadcast",
            Api::History => "history",
            Api::Registration => "registration",
        }
    }
}

/// API ids assigned by the node for the current connection
#[derive(Debug, Clone, Default)]
pub struct ApiRegistry {
    ids: HashMap<Api, u64>,
}

impl ApiRegistry {
    /// Record the id the node assigned to `api`
    pub fn register(&mut self, api: Api, id: u64) {
        self.ids.insert(api, id);
    }

    /// Id of `api` on this connection
    pub fn id(&self, api: Api) -> Result<u64, SdkError> {
        if api == Api::Login {
            return Ok(Api::LOGIN_ID);
        }
        self.ids
            .get(&api)
            .copied()
            .ok_or_else(|| SdkError::ApiUnavailable(api.name().to_string()))
    }

    /// Forget every assigned id
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
