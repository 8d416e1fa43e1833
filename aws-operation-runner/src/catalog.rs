/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::operation::OperationDescriptor;

/// The set of operations a client knows how to invoke, keyed by unique operation name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: BTreeMap<String, Arc<OperationDescriptor>>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `descriptor`. Fails if an operation with the same name is already registered.
    pub fn register(&mut self, descriptor: OperationDescriptor) -> Result<(), ConfigurationError> {
        if self.descriptors.contains_key(descriptor.name()) {
            return Err(ConfigurationError::new(format!(
                "operation '{}' is already registered",
                descriptor.name()
            )));
        }
        self.descriptors
            .insert(descriptor.name().to_owned(), Arc::new(descriptor));
        Ok(())
    }

    /// Look up an operation by name
    pub fn get(&self, operation: &str) -> Option<&Arc<OperationDescriptor>> {
        self.descriptors.get(operation)
    }

    /// All operations, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.descriptors.values().map(|d| d.as_ref())
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
