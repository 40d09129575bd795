use serde::{Deserialize, Serialize};

use super::LocalFunction;
use crate::application::errors::FunctionError;
use crate::domain::entities::{FunctionDescriptor, ParameterSchema, Property};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Deserialize)]
struct Args {
    location: String,
    #[serde(default)]
    unit: Option<Unit>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    location: &'a str,
    temperature: &'a str,
    unit: Unit,
    forecast: [&'a str; 2],
}

/// `get_current_weather`: canned report used to exercise the function round trip
pub struct CurrentWeatherFunction;

impl LocalFunction for CurrentWeatherFunction {
    fn descriptor(&self) -> FunctionDescriptor {
        FunctionDescriptor::new(
            "get_current_weather",
            "Get the current weather in a given location",
            ParameterSchema::object()
                .property(
                    "location",
                    Property::string().with_description("The city and state, e.g. San Francisco, CA"),
                )
                .property("unit", Property::string().with_enum(&["celsius", "fahrenheit"]))
                .required("location"),
        )
    }

    fn call(&self, args: serde_json::Value) -> Result<String, FunctionError> {
        let args: Args = serde_json::from_value(args)
            .map_err(|e| FunctionError::InvalidArguments(e.to_string()))?;

        let report = Report {
            location: &args.location,
            temperature: "72",
            unit: args.unit.unwrap_or_default(),
            forecast: ["sunny", "windy"],
        };
        serde_json::to_string(&report).map_err(|e| FunctionError::Failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_defaults_to_celsius() {
        let out = CurrentWeatherFunction
            .call(json!({"location": "Boston, MA"}))
            .unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["location"], "Boston, MA");
        assert_eq!(report["unit"], "celsius");
        assert_eq!(report["forecast"], json!(["sunny", "windy"]));
    }

    #[test]
    fn test_explicit_unit_is_kept() {
        let out = CurrentWeatherFunction
            .call(json!({"location": "Austin", "unit": "fahrenheit"}))
            .unwrap();
        assert!(out.contains("\"fahrenheit\""));
    }

    #[test]
    fn test_missing_location_is_invalid() {
        let err = CurrentWeatherFunction.call(json!({"unit": "celsius"})).unwrap_err();
        assert!(matches!(err, FunctionError::InvalidArguments(_)));

        let err = CurrentWeatherFunction
            .call(json!({"location": "Oslo", "unit": "kelvin"}))
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidArguments(_)));
    }
}
