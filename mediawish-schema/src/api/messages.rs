use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful bulk removal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemovedBody {
    pub message: String,
    pub removed: usize,
}

/// Public view of the notification config. The credential never leaves the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfigView {
    pub account: Option<String>,
    pub configured: bool,
}
