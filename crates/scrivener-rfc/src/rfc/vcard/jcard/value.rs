//! The value slots of a jCard property array.

use serde_json::Value;

/// Everything after the data type in a jCard property array.
///
/// A plain property has one value, a list property (CATEGORIES) several,
/// and a structured property (ADR, N) one array of components, where each
/// component is `""` when empty, a string when it has one value and an
/// array otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JCardValue {
    values: Vec<Value>,
}

impl JCardValue {
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            values: vec![Value::String(value.into())],
        }
    }

    #[must_use]
    pub fn multi<S: AsRef<str>>(values: &[S]) -> Self {
        Self {
            values: values
                .iter()
                .map(|v| Value::String(v.as_ref().to_string()))
                .collect(),
        }
    }

    /// Builds a structured value from components.
    #[must_use]
    pub fn structured<C, S>(components: &[C]) -> Self
    where
        C: AsRef<[S]>,
        S: AsRef<str>,
    {
        let components = components
            .iter()
            .map(|component| match component.as_ref() {
                [] => Value::String(String::new()),
                [one] => Value::String(one.as_ref().to_string()),
                many => Value::Array(
                    many.iter()
                        .map(|v| Value::String(v.as_ref().to_string()))
                        .collect(),
                ),
            })
            .collect();

        Self {
            values: vec![Value::Array(components)],
        }
    }

    /// Wraps raw JSON values read from a property array.
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// The first value as a string; empty when there is none.
    #[must_use]
    pub fn as_single(&self) -> String {
        self.values.first().map(scalar_text).unwrap_or_default()
    }

    /// Every value as a string.
    #[must_use]
    pub fn as_multi(&self) -> Vec<String> {
        self.values.iter().map(scalar_text).collect()
    }

    /// The components of a structured value.
    ///
    /// A single array is the normal shape. Several scalar values are read
    /// as one component each, and a lone scalar as a one-component value.
    #[must_use]
    pub fn as_structured(&self) -> Vec<Vec<String>> {
        match self.values.as_slice() {
            [] => Vec::new(),
            [Value::Array(components)] => components.iter().map(component).collect(),
            values => values.iter().map(component).collect(),
        }
    }
}

/// Text of a scalar; arrays contribute their first element.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.first().map(scalar_text).unwrap_or_default(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}

fn component(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        other => vec![scalar_text(other)],
    }
}
