use serde::{Deserialize, Serialize};

/// A single value in a node's prop bag.
///
/// The wire shape is tagged by `type`: static literals pass through to the
/// rendered component unchanged, expressions are re-evaluated against the
/// data context on every render, and callbacks are compiled once per
/// resolution into a deferred handle the component invokes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropValue {
    /// Static value, passed through unchanged
    Literal { value: serde_json::Value },

    /// Embedded expression, evaluated each render (no side effects expected)
    Expression { value: String },

    /// Embedded callback code, handed to the component uninvoked
    Callback { value: String },
}

impl PropValue {
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        PropValue::Literal {
            value: value.into(),
        }
    }

    pub fn expression(code: impl Into<String>) -> Self {
        PropValue::Expression { value: code.into() }
    }

    pub fn callback(code: impl Into<String>) -> Self {
        PropValue::Callback { value: code.into() }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, PropValue::Expression { .. })
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, PropValue::Callback { .. })
    }

    /// Source text of an embedded expression or callback
    pub fn source_text(&self) -> Option<&str> {
        match self {
            PropValue::Expression { value } | PropValue::Callback { value } => Some(value),
            PropValue::Literal { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_wire_shape() {
        let prop = PropValue::expression("state.count+1");
        let json = serde_json::to_value(&prop).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "type": "Expression", "value": "state.count+1" })
        );
    }

    #[test]
    fn test_literal_round_trip() {
        let prop = PropValue::literal(serde_json::json!({ "size": "large" }));

        let json = serde_json::to_string(&prop).unwrap();
        let back: PropValue = serde_json::from_str(&json).unwrap();

        assert_eq!(prop, back);
    }

    #[test]
    fn test_source_text() {
        assert_eq!(
            PropValue::callback("this.count += 1").source_text(),
            Some("this.count += 1")
        );
        assert_eq!(PropValue::literal(1).source_text(), None);
    }
}
