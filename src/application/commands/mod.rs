//! Bot commands

pub mod emoji;
pub mod group;
pub mod notify;
pub mod weather;

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::CommandRegistry;
use crate::domain::traits::{ChatGateway, PictureService, WeatherService};

pub use emoji::RandomPictureCommand;
pub use group::GroupCommand;
pub use notify::NotifyCommand;
pub use weather::WeatherCommand;

/// Collaborators the built-in commands need
pub struct CommandDeps {
    pub gateway: Arc<dyn ChatGateway>,
    pub weather: Arc<dyn WeatherService>,
    pub pictures: Arc<dyn PictureService>,
    pub default_location: String,
    pub scratch_dir: PathBuf,
}

/// Registry with the built-in commands. Fails on a name clash.
pub fn default_registry(deps: CommandDeps) -> Result<CommandRegistry, CommandError> {
    let mut registry = CommandRegistry::new();
    registry.register(NotifyCommand::new(deps.gateway.clone()))?;
    registry.register(GroupCommand::new(deps.gateway.clone()))?;
    registry.register(WeatherCommand::new(deps.weather, deps.default_location))?;
    registry.register(RandomPictureCommand::new(deps.pictures, deps.gateway, deps.scratch_dir))?;
    Ok(registry)
}
