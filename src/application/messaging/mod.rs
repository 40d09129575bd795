//! Message handling - Event-driven message processing

pub mod dispatcher;
pub mod parser;
pub mod router;

pub use dispatcher::MessageDispatcher;
pub use router::EventRouter;
