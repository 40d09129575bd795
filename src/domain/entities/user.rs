use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a chat user as delivered by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nickname: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: None,
            region: None,
            city: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_locality(mut self, region: Option<impl Into<String>>, city: Option<impl Into<String>>) -> Self {
        self.region = region.map(|r| r.into());
        self.city = city.map(|c| c.into());
        self
    }

    pub fn display_name(&self) -> String {
        match self.nickname {
            Some(ref nickname) if !nickname.is_empty() => nickname.clone(),
            _ => self.id.clone(),
        }
    }

    /// Region followed by city, or `None` when neither is known
    pub fn locality(&self) -> Option<String> {
        let joined = format!(
            "{}{}",
            self.region.as_deref().unwrap_or(""),
            self.city.as_deref().unwrap_or("")
        );
        let joined = joined.trim().to_string();
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
