// src/core/validation.rs

use crate::core::{
    catalog::{ArgumentSpec, CatalogError},
    selection::WorkloadSelectionEngine,
};
use serde::Serialize;
use std::fmt;

/// Why a visible argument blocks a submission.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FieldErrorReason {
    /// The value is empty once surrounding whitespace is removed.
    Empty,
    /// The value does not match the argument's pattern as a whole.
    PatternMismatch,
}

impl fmt::Display for FieldErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorReason::Empty => write!(f, "value is empty"),
            FieldErrorReason::PatternMismatch => write!(f, "value does not match its pattern"),
        }
    }
}

/// One argument in error.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Argument name, as submitted.
    pub name: String,
    /// Label shown in the form.
    pub label: String,
    /// What is wrong with the value.
    pub reason: FieldErrorReason,
}

/// Everything that currently blocks a submission.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Nothing is selected. A submission needs at least one command.
    pub empty_workload: bool,
    /// Visible arguments in error, in catalog order.
    pub fields: Vec<FieldError>,
}

impl ValidationReport {
    /// `true` when the submission is blocked.
    pub fn has_errors(&self) -> bool {
        self.empty_workload || !self.fields.is_empty()
    }
}

/// Checks a single value against its spec.
///
/// Hidden fields never fail. A visible field fails when its trimmed value is empty, or
/// when the raw value does not match the pattern.
pub fn check_field(spec: &ArgumentSpec, value: &str, visible: bool) -> Option<FieldErrorReason> {
    if !visible {
        return None;
    }
    if value.trim().is_empty() {
        return Some(FieldErrorReason::Empty);
    }
    if !spec.matches(value) {
        return Some(FieldErrorReason::PatternMismatch);
    }
    None
}

/// Read-only view over an engine that answers validation questions.
///
/// It never changes values or visibility; those belong to the selection engine.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentValidator<'a> {
    engine: &'a WorkloadSelectionEngine,
}

impl<'a> ArgumentValidator<'a> {
    /// Wraps an engine.
    pub fn new(engine: &'a WorkloadSelectionEngine) -> Self {
        Self { engine }
    }

    /// Whether a single argument is currently in error.
    pub fn has_error(&self, name: &str) -> Result<bool, CatalogError> {
        Ok(self.engine.argument(name)?.has_error())
    }

    /// Whether a submission is blocked: nothing selected, or any visible field in error.
    pub fn form_has_error(&self) -> bool {
        !self.engine.has_selection() || self.engine.arguments().any(|view| view.has_error())
    }

    /// Lists every problem [`form_has_error`](Self::form_has_error) accounts for.
    pub fn report(&self) -> ValidationReport {
        let fields = self
            .engine
            .arguments()
            .filter_map(|view| {
                check_field(view.spec, view.value, view.visible).map(|reason| FieldError {
                    name: view.spec.name.clone(),
                    label: view.spec.label.clone(),
                    reason,
                })
            })
            .collect();

        ValidationReport {
            empty_workload: self.engine.workloads().is_empty(),
            fields,
        }
    }
}
