//! # Schema Value Resolver
//!
//! Turns a node's prop bag into concrete runtime values. Literals pass
//! through, expressions are evaluated against the data context, callbacks
//! are packaged uninvoked for the rendered component to call later.
//!
//! Resolution is pure with respect to the schema: neither the prop bag nor
//! the data context is mutated. An expression failure never escapes — it is
//! logged and the original source text becomes the value, so the breakage
//! stays visible without taking down sibling rendering.

use crate::evaluator::{DataContext, EvalResult, Evaluator};
use crate::value::Value;
use lowpage_schema::PropValue;
use std::collections::BTreeMap;
use tracing::warn;

/// A resolved prop: a concrete value, or a deferred callback
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedProp {
    Value(Value),
    Callback(CallbackHandle),
}

impl ResolvedProp {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ResolvedProp::Value(value) => Some(value),
            ResolvedProp::Callback(_) => None,
        }
    }

    pub fn as_callback(&self) -> Option<&CallbackHandle> {
        match self {
            ResolvedProp::Callback(handle) => Some(handle),
            ResolvedProp::Value(_) => None,
        }
    }
}

/// Callback code bound to the data context it was resolved against.
///
/// Not invoked at resolution time. Invocation compiles and runs the code;
/// a compile failure surfaces here as the invoking component's concern —
/// the resolver does not swallow it.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackHandle {
    code: String,
    context: DataContext,
}

impl CallbackHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Invoke with positional arguments, bound as the `arguments` array
    pub fn invoke(&self, evaluator: &dyn Evaluator, args: &[Value]) -> EvalResult<Value> {
        let mut context = self.context.clone();
        context.set("arguments", Value::Array(args.to_vec()));
        evaluator.evaluate(&self.code, &context)
    }
}

pub type ResolvedProps = BTreeMap<String, ResolvedProp>;

/// Resolve a prop bag against a data context
pub fn resolve(
    props: &BTreeMap<String, PropValue>,
    context: &DataContext,
    evaluator: &dyn Evaluator,
) -> ResolvedProps {
    let mut resolved = BTreeMap::new();

    for (name, prop) in props {
        let value = match prop {
            PropValue::Literal { value } => ResolvedProp::Value(Value::from_json(value)),

            PropValue::Expression { value: code } => {
                match evaluator.evaluate(code, context) {
                    Ok(value) => ResolvedProp::Value(value),
                    Err(error) => {
                        warn!(prop = %name, source = %code, %error, "expression failed, falling back to source text");
                        ResolvedProp::Value(Value::String(code.clone()))
                    }
                }
            }

            PropValue::Callback { value: code } => ResolvedProp::Callback(CallbackHandle {
                code: code.clone(),
                context: context.clone(),
            }),
        };

        resolved.insert(name.clone(), value);
    }

    resolved
}
