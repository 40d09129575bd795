//! Local functions the model may call during a conversation

pub mod weather;

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::FunctionError;
use crate::domain::entities::FunctionDescriptor;

pub use weather::CurrentWeatherFunction;

/// A function exposed to the model. Calls are synchronous and local.
pub trait LocalFunction: Send + Sync {
    fn descriptor(&self) -> FunctionDescriptor;

    /// Run with already-decoded JSON arguments, returning the text fed back to the model
    fn call(&self, args: serde_json::Value) -> Result<String, FunctionError>;
}

/// Name → function lookup owned by the conversation service
#[derive(Default, Clone)]
pub struct FunctionTable {
    functions: HashMap<String, Arc<dyn LocalFunction>>,
    /// Registration order, so descriptors go out in a stable order
    order: Vec<String>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every built-in function
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        // Fresh table, names cannot collide
        let _ = table.register(CurrentWeatherFunction);
        table
    }

    pub fn register<F: LocalFunction + 'static>(&mut self, function: F) -> Result<(), FunctionError> {
        let name = function.descriptor().name;
        if self.functions.contains_key(&name) {
            return Err(FunctionError::Duplicate(name));
        }
        self.order.push(name.clone());
        self.functions.insert(name, Arc::new(function));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn LocalFunction>> {
        self.functions.get(name).cloned()
    }

    pub fn descriptors(&self) -> Vec<FunctionDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.functions.get(name))
            .map(|f| f.descriptor())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }
}
