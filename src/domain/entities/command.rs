use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::User;

/// A bot command triggered by a prefixed token such as `/weather`
#[async_trait]
pub trait Command: Send + Sync {
    /// Unique name including the prefix
    fn name(&self) -> &str;

    /// Short help line
    fn description(&self) -> &str {
        ""
    }

    /// Run the command. `params[0]` is the command name itself.
    async fn execute(&self, user: &User, params: &[String]) -> Result<String, CommandError>;
}

/// Command registry, filled at startup and read-only afterwards
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: Command + 'static>(&mut self, command: C) -> Result<(), CommandError> {
        self.register_arc(Arc::new(command))
    }

    pub fn register_arc(&mut self, command: Arc<dyn Command>) -> Result<(), CommandError> {
        let name = command.name().to_string();
        if name.trim().is_empty() {
            return Err(CommandError::InvalidName(name));
        }
        if self.commands.contains_key(&name) {
            return Err(CommandError::Duplicate(name));
        }
        self.commands.insert(name, command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Command>, CommandError> {
        self.commands
            .get(name)
            .cloned()
            .ok_or_else(|| CommandError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
