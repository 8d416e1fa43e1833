/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashSet;

use crate::error::ConfigurationError;
use crate::types::{Constraint, ParamKind};

/// Declaration of a single operation parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    kind: ParamKind,
    constraint: Option<Constraint>,
}

impl ParamSpec {
    /// Create a parameter of the given kind without a constraint
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            constraint: None,
        }
    }

    /// A [`ParamKind::String`] parameter
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String)
    }

    /// A [`ParamKind::Integer`] parameter
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    /// A [`ParamKind::Float`] parameter
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Float)
    }

    /// A [`ParamKind::StringList`] parameter
    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::StringList)
    }

    /// Attach a constraint, replacing any previous one
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Shorthand for `.constraint(Constraint::NonEmpty)`
    pub fn non_empty(self) -> Self {
        self.constraint(Constraint::NonEmpty)
    }

    /// The parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind values for this parameter must have
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The constraint values for this parameter must satisfy, if any
    pub fn get_constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }
}

/// The declarative schema of an operation: its name, parameters and output fields.
///
/// Only obtainable through [`describe`] or [`OperationDescriptor::builder`], so every
/// descriptor in circulation has unique, non-empty parameter names.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    name: String,
    required: Vec<ParamSpec>,
    optional: Vec<ParamSpec>,
    outputs: Vec<String>,
}

/// Declare an operation with no output fields.
///
/// Fails if `name` is empty, if a parameter name is empty or repeated, or if a required
/// parameter shares its name with an optional one.
pub fn describe(
    name: impl Into<String>,
    required: Vec<ParamSpec>,
    optional: Vec<ParamSpec>,
) -> Result<OperationDescriptor, ConfigurationError> {
    let name = name.into();
    if name.trim().is_empty() {
        return Err(ConfigurationError::new("operation name must not be empty"));
    }

    let mut required_names = HashSet::new();
    for spec in &required {
        check_param_name(&name, spec)?;
        if !required_names.insert(spec.name()) {
            return Err(ConfigurationError::new(format!(
                "operation '{name}' declares required parameter '{}' more than once",
                spec.name()
            )));
        }
    }

    let mut optional_names = HashSet::new();
    for spec in &optional {
        check_param_name(&name, spec)?;
        if required_names.contains(spec.name()) {
            return Err(ConfigurationError::new(format!(
                "operation '{name}' declares parameter '{}' as both required and optional",
                spec.name()
            )));
        }
        if !optional_names.insert(spec.name()) {
            return Err(ConfigurationError::new(format!(
                "operation '{name}' declares optional parameter '{}' more than once",
                spec.name()
            )));
        }
    }

    Ok(OperationDescriptor {
        name,
        required,
        optional,
        outputs: Vec::new(),
    })
}

fn check_param_name(operation: &str, spec: &ParamSpec) -> Result<(), ConfigurationError> {
    if spec.name().trim().is_empty() {
        return Err(ConfigurationError::new(format!(
            "operation '{operation}' declares a parameter with an empty name"
        )));
    }
    Ok(())
}

impl OperationDescriptor {
    /// Create a new builder for an operation called `name`
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            required: Vec::new(),
            optional: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// The operation name, e.g. `CreateBucket`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required parameters in declaration order
    pub fn required_params(&self) -> &[ParamSpec] {
        &self.required
    }

    /// Optional parameters in declaration order
    pub fn optional_params(&self) -> &[ParamSpec] {
        &self.optional
    }

    /// Output fields in the order they are reported
    pub fn output_fields(&self) -> &[String] {
        &self.outputs
    }

    /// Required then optional parameters
    pub fn params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Look up a declared parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params().find(|spec| spec.name() == name)
    }

    /// One-line usage string listing required parameters positionally and optional ones
    /// in brackets.
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for spec in &self.required {
            usage.push_str(&format!(" <{}>", spec.name()));
        }
        for spec in &self.optional {
            usage.push_str(&format!(" [{}]", spec.name()));
        }
        usage
    }
}

/// Fluent builder for [`OperationDescriptor`]
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    required: Vec<ParamSpec>,
    optional: Vec<ParamSpec>,
    outputs: Vec<String>,
}

impl DescriptorBuilder {
    /// Add a required parameter
    pub fn required(mut self, spec: ParamSpec) -> Self {
        self.required.push(spec);
        self
    }

    /// Add an optional parameter
    pub fn optional(mut self, spec: ParamSpec) -> Self {
        self.optional.push(spec);
        self
    }

    /// Add an output field. Fields are reported in the order they are added.
    pub fn output(mut self, field: impl Into<String>) -> Self {
        self.outputs.push(field.into());
        self
    }

    /// Consumes the builder and constructs an [`OperationDescriptor`]
    pub fn build(self) -> Result<OperationDescriptor, ConfigurationError> {
        let mut descriptor = describe(self.name, self.required, self.optional)?;

        let mut seen = HashSet::new();
        for field in &self.outputs {
            if field.trim().is_empty() {
                return Err(ConfigurationError::new(format!(
                    "operation '{}' declares an output field with an empty name",
                    descriptor.name
                )));
            }
            if !seen.insert(field.as_str()) {
                return Err(ConfigurationError::new(format!(
                    "operation '{}' declares output field '{field}' more than once",
                    descriptor.name
                )));
            }
        }

        descriptor.outputs = self.outputs;
        Ok(descriptor)
    }
}
