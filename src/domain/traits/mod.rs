//! Domain traits - Abstractions for infrastructure implementations

pub mod gateway;
pub mod services;
pub mod store;

pub use gateway::{ChatGateway, Contact, GatewayInfo};
pub use services::{PictureService, WeatherService};
pub use store::Store;
