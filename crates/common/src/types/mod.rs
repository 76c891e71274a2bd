use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body of the informational root route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Info {
    pub message: String,
}

impl Info {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
