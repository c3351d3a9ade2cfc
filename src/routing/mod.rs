// Tool-call routing gateway — validates the agent's chosen action against
// a per-action schema, then dispatches to the registered destination.
//
// The gateway never touches the ledger. It returns a uniform RouteResult
// and the caller decides mark_processed vs mark_error. Side effects happen
// only after successful validation, and dry-run mode replaces dispatch
// with a success no-op so validation is exercised identically.

pub mod destinations;

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use destinations::Destination;

/// The designated no-dispatch action.
pub const SKIP_ACTION: &str = "skip";

/// Primitive types a schema field can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    StringArray,
}

/// One field in an action schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

const fn req(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        ty,
        required: true,
    }
}

const fn opt(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        ty,
        required: false,
    }
}

/// Fixed schema for one known action.
pub struct ActionSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Every action the agent may emit.
pub const ACTIONS: &[ActionSchema] = &[
    ActionSchema {
        name: "create_task",
        fields: &[
            req("title", FieldType::String),
            opt("notes", FieldType::String),
            opt("project", FieldType::String),
            opt("tags", FieldType::StringArray),
        ],
    },
    ActionSchema {
        name: "save_for_later",
        fields: &[
            req("url", FieldType::String),
            opt("title", FieldType::String),
            opt("tags", FieldType::StringArray),
        ],
    },
    ActionSchema {
        name: "save_reference",
        fields: &[
            req("url", FieldType::String),
            opt("title", FieldType::String),
            opt("notes", FieldType::String),
            opt("tags", FieldType::StringArray),
        ],
    },
    ActionSchema {
        name: SKIP_ACTION,
        fields: &[req("reason", FieldType::String)],
    },
];

/// Why an invocation was rejected. Unknown action is deliberately a
/// distinct kind from schema validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    UnknownAction(String),
    Validation(Vec<String>),
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::UnknownAction(name) => write!(f, "unknown action `{name}`"),
            RouteError::Validation(errors) => {
                write!(f, "invalid input: {}", errors.join("; "))
            }
        }
    }
}

/// Validate an action name and payload against the known schemas.
pub fn validate(action: &str, input: &Value) -> Result<(), RouteError> {
    let schema = ACTIONS
        .iter()
        .find(|s| s.name == action)
        .ok_or_else(|| RouteError::UnknownAction(action.to_string()))?;

    let Some(object) = input.as_object() else {
        return Err(RouteError::Validation(vec![
            "input must be a JSON object".to_string(),
        ]));
    };

    let mut errors = Vec::new();
    for field in schema.fields {
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    errors.push(format!("missing required field `{}`", field.name));
                }
            }
            Some(value) => {
                if !type_matches(value, field.ty) {
                    errors.push(format!(
                        "field `{}` must be a {}",
                        field.name,
                        type_name(field.ty)
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RouteError::Validation(errors))
    }
}

fn type_matches(value: &Value, ty: FieldType) -> bool {
    match ty {
        FieldType::String => value.is_string(),
        FieldType::StringArray => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
    }
}

fn type_name(ty: FieldType) -> &'static str {
    match ty {
        FieldType::String => "string",
        FieldType::StringArray => "string array",
    }
}

/// Uniform routing outcome handed back to the pipeline.
#[derive(Debug, Clone)]
pub struct RouteResult {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

impl RouteResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
        }
    }
}

/// The routing gateway: destinations registered under action names, plus
/// the dry-run switch.
pub struct Gateway {
    destinations: HashMap<&'static str, Box<dyn Destination>>,
    dry_run: bool,
}

impl Gateway {
    pub fn new(dry_run: bool) -> Self {
        Self {
            destinations: HashMap::new(),
            dry_run,
        }
    }

    /// Register the destination that handles `action`.
    pub fn register(mut self, action: &'static str, destination: Box<dyn Destination>) -> Self {
        self.destinations.insert(action, destination);
        self
    }

    /// Name of the destination an action would dispatch to, if any.
    pub fn destination_name(&self, action: &str) -> Option<&str> {
        self.destinations.get(action).map(|d| d.name())
    }

    /// Validate and dispatch one invocation.
    pub async fn route(&self, action: &str, input: &Value) -> RouteResult {
        if let Err(e) = validate(action, input) {
            warn!(action = action, error = %e, "Invocation rejected");
            return RouteResult::failed(format!("rejected `{action}`"), e.to_string());
        }

        if action == SKIP_ACTION {
            let reason = input
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return RouteResult::ok(format!("skipped: {reason}"));
        }

        let Some(destination) = self.destinations.get(action) else {
            return RouteResult::failed(
                format!("cannot dispatch `{action}`"),
                format!("no destination registered for `{action}`"),
            );
        };

        if !destination.is_configured() {
            return RouteResult::failed(
                format!("cannot dispatch `{action}`"),
                format!("destination `{}` is not configured", destination.name()),
            );
        }

        if self.dry_run {
            debug!(action = action, destination = destination.name(), "Dry run, skipping dispatch");
            return RouteResult::ok(format!(
                "dry run: would send `{action}` to {}",
                destination.name()
            ));
        }

        match destination.send(input).await {
            Ok(result) => RouteResult {
                success: result.success,
                message: result.message,
                error: result.error,
            },
            Err(e) => RouteResult::failed(
                format!("dispatch of `{action}` failed"),
                format!("{e:#}"),
            ),
        }
    }
}
