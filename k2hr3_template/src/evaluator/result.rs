//! Execution result record and the ways results are combined

use super::Value;
use serde::Serialize;
use std::fmt;

/// Where a just-evaluated variable reference lives in the variable map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariablePath {
    pub name: String,
    /// Array position or object key, when the reference was subscripted
    pub index: Option<Value>,
}

impl VariablePath {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: Value) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for VariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            Some(Value::String(key)) => write!(f, "%{}%{{{}}}", self.name, key),
            Some(index) => write!(f, "%{}%[{}]", self.name, index),
            None => write!(f, "%{}%", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output_text: String,
    pub condition: bool,
    pub last_value: Value,
    pub is_break: bool,
    pub is_continue: bool,
    pub touched_path: Option<VariablePath>,
    /// Failure message, set when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl ExecutionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            output_text: String::new(),
            condition: false,
            last_value: Value::Null,
            is_break: false,
            is_continue: false,
            touched_path: None,
            error: None,
            error_code: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let output_text = text.into();
        Self {
            condition: !output_text.is_empty(),
            output_text,
            ..Self::ok()
        }
    }

    /// Result carrying a value; the condition is the value's truthiness
    pub fn value(value: Value) -> Self {
        Self {
            condition: value.is_truthy(),
            last_value: value,
            ..Self::ok()
        }
    }

    pub fn failure(code: impl fmt::Display, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            error_code: Some(code.to_string()),
            ..Self::ok()
        }
    }

    pub fn with_path(mut self, path: Option<VariablePath>) -> Self {
        self.touched_path = path;
        self
    }

    pub fn with_break(mut self) -> Self {
        self.is_break = true;
        self
    }

    pub fn with_continue(mut self) -> Self {
        self.is_continue = true;
        self
    }

    pub fn clear_loop_flags(&mut self) {
        self.is_break = false;
        self.is_continue = false;
    }

    /// `self` then `other`: texts concatenated, values taken from `other`
    pub fn merge(self, other: Self) -> Self {
        let mut output_text = self.output_text;
        output_text.push_str(&other.output_text);
        Self {
            success: self.success && other.success,
            output_text,
            condition: other.condition,
            last_value: other.last_value,
            is_break: self.is_break || other.is_break,
            is_continue: self.is_continue || other.is_continue,
            touched_path: other.touched_path,
            error: self.error.or(other.error),
            error_code: self.error_code.or(other.error_code),
        }
    }

    /// Like [`merge`](Self::merge) but `other`'s text comes first
    pub fn insert(self, other: Self) -> Self {
        let mut output_text = other.output_text;
        output_text.push_str(&self.output_text);
        Self {
            success: self.success && other.success,
            output_text,
            condition: other.condition,
            last_value: other.last_value,
            is_break: self.is_break || other.is_break,
            is_continue: self.is_continue || other.is_continue,
            touched_path: other.touched_path,
            error: self.error.or(other.error),
            error_code: self.error_code.or(other.error_code),
        }
    }

    /// Prepend the printed form of `other`'s value
    pub fn insert_print(self, other: Self) -> Self {
        let printed = Self {
            output_text: other.last_value.stringify(),
            ..other
        };
        self.insert(printed)
    }

    /// Keep `self`'s text and values, only folding in status and flags
    pub fn merge_stop(self, other: Self) -> Self {
        Self {
            success: self.success && other.success,
            is_break: self.is_break || other.is_break,
            is_continue: self.is_continue || other.is_continue,
            error: self.error.or(other.error),
            error_code: self.error_code.or(other.error_code),
            ..self
        }
    }

    /// Whether a statement chain must stop after this result
    pub fn interrupts(&self) -> bool {
        !self.success || self.is_break || self.is_continue
    }
}
