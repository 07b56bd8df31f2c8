// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running operation registry.
//!
//! Holds every operation and the resource → active operation map under a
//! single lock, so admission (check + register) is atomic. Completed,
//! failed and cancelled operations stay pollable until their TTL expires.

use crate::cancel::CancellationToken;
use crate::error::ManagerError;
use parking_lot::Mutex;
use pl_core::{
    BuildOperationMetadata, BuildResponse, Clock, ErrorCode, Operation, OperationError,
    OperationName, OperationPhase, ResourceName,
};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Page size used when a list request asks for 0.
pub const DEFAULT_PAGE_SIZE: usize = 50;

struct Entry {
    operation: Operation,
    cancel: CancellationToken,
    completed_at_ms: Option<u64>,
}

#[derive(Default)]
struct OperationTable {
    operations: HashMap<OperationName, Entry>,
    active: HashMap<ResourceName, OperationName>,
}

impl OperationTable {
    /// Mark `name` done, stamp completion time and release its resource.
    fn finish(&mut self, name: &OperationName, now_ms: u64) {
        if let Some(entry) = self.operations.get_mut(name) {
            entry.operation.done = true;
            entry.completed_at_ms = Some(now_ms);
            let resource = entry.operation.resource_name.clone();
            if self.active.get(&resource) == Some(name) {
                self.active.remove(&resource);
            }
        }
    }
}

/// Parsed `list_operations` filter
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub resource_prefix: Option<String>,
    pub done: Option<bool>,
}

impl ListFilter {
    /// Parse a whitespace-separated list of `resource=<prefix>` and
    /// `done=true|false` terms. An empty filter matches everything.
    pub fn parse(filter: &str) -> Result<Self, ManagerError> {
        let mut parsed = ListFilter::default();
        for term in filter.split_whitespace() {
            let invalid = || ManagerError::InvalidFilter(term.to_string());
            let (key, value) = term.split_once('=').ok_or_else(invalid)?;
            match key {
                "resource" => parsed.resource_prefix = Some(value.to_string()),
                "done" => {
                    parsed.done = Some(match value {
                        "true" => true,
                        "false" => false,
                        _ => return Err(invalid()),
                    })
                }
                _ => return Err(invalid()),
            }
        }
        Ok(parsed)
    }

    fn matches(&self, op: &Operation) -> bool {
        let resource_ok = self
            .resource_prefix
            .as_deref()
            .is_none_or(|p| op.resource_name.as_str().starts_with(p));
        let done_ok = self.done.is_none_or(|d| op.done == d);
        resource_ok && done_ok
    }
}

/// One page of `list_operations`
#[derive(Debug, Clone)]
pub struct ListOperationsPage {
    pub operations: Vec<Operation>,
    /// Opaque token for the next page; `None` on the last page.
    pub next_page_token: Option<String>,
}

pub struct OperationManager<C: Clock> {
    table: Mutex<OperationTable>,
    clock: C,
    ttl: Duration,
}

impl<C: Clock> OperationManager<C> {
    pub fn new(clock: C, ttl: Duration) -> Self {
        Self {
            table: Mutex::new(OperationTable::default()),
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Admit a new operation for `resource`.
    ///
    /// If the resource already has an active operation (or `name` is
    /// taken) an already-done ABORTED operation is returned and nothing is
    /// registered.
    pub fn create_operation(
        &self,
        name: OperationName,
        resource: ResourceName,
        metadata: BuildOperationMetadata,
        cancel: CancellationToken,
    ) -> Operation {
        let mut table = self.table.lock();

        if let Some(active) = table.active.get(&resource) {
            tracing::warn!(resource = %resource, active = %active, "rejecting build, resource busy");
            return Operation::aborted(name, resource, metadata, active);
        }
        if table.operations.contains_key(&name) {
            tracing::warn!(operation = %name, "rejecting build, operation name in use");
            return Operation::aborted(name.clone(), resource, metadata, &name);
        }

        let operation = Operation::pending(name.clone(), resource.clone(), metadata);
        table.active.insert(resource, name.clone());
        table.operations.insert(
            name.clone(),
            Entry {
                operation: operation.clone(),
                cancel,
                completed_at_ms: None,
            },
        );
        tracing::info!(operation = %name, "operation created");
        operation
    }

    /// Snapshot of an operation, or `None` if unknown or expired.
    pub fn get_operation(&self, name: &OperationName) -> Option<Operation> {
        self.table
            .lock()
            .operations
            .get(name)
            .map(|e| e.operation.clone())
    }

    /// Latest metadata snapshot for `name`.
    pub fn metadata(&self, name: &OperationName) -> Option<BuildOperationMetadata> {
        self.table
            .lock()
            .operations
            .get(name)
            .map(|e| e.operation.metadata.clone())
    }

    pub fn cancellation_token(&self, name: &OperationName) -> Option<CancellationToken> {
        self.table
            .lock()
            .operations
            .get(name)
            .map(|e| e.cancel.clone())
    }

    pub fn active_operation(&self, resource: &ResourceName) -> Option<OperationName> {
        self.table.lock().active.get(resource).cloned()
    }

    /// Replace the metadata snapshot of a live operation.
    ///
    /// Returns false for unknown or done operations and for snapshots that
    /// would move the phase backward.
    pub fn update_metadata(&self, name: &OperationName, metadata: BuildOperationMetadata) -> bool {
        let mut table = self.table.lock();
        let Some(entry) = table.operations.get_mut(name) else {
            return false;
        };
        if entry.operation.done {
            return false;
        }
        let current = entry.operation.metadata.current_phase;
        if metadata.current_phase != current && !current.can_advance_to(metadata.current_phase) {
            tracing::debug!(
                operation = %name,
                from = ?current,
                to = ?metadata.current_phase,
                "ignoring non-monotonic metadata update"
            );
            return false;
        }
        entry.operation.metadata = metadata;
        true
    }

    /// Record a successful (or partially successful) completion.
    pub fn complete_operation(
        &self,
        name: &OperationName,
        response: BuildResponse,
    ) -> Result<(), ManagerError> {
        let now = self.clock.epoch_ms();
        let mut table = self.table.lock();
        let entry = table
            .operations
            .get_mut(name)
            .ok_or_else(|| ManagerError::NotFound(name.clone()))?;
        if entry.operation.done {
            return Err(ManagerError::AlreadyDone(name.clone()));
        }
        entry.operation.metadata = response.metadata.clone();
        entry.operation.result = Some(response);
        table.finish(name, now);
        tracing::info!(operation = %name, "operation completed");
        Ok(())
    }

    /// Record a failure with code INTERNAL.
    pub fn fail_operation(&self, name: &OperationName, message: &str) -> Result<(), ManagerError> {
        let now = self.clock.epoch_ms();
        let mut table = self.table.lock();
        let entry = table
            .operations
            .get_mut(name)
            .ok_or_else(|| ManagerError::NotFound(name.clone()))?;
        if entry.operation.done {
            return Err(ManagerError::AlreadyDone(name.clone()));
        }
        entry.operation.metadata.advance(OperationPhase::Failed);
        entry.operation.error = Some(OperationError::new(ErrorCode::Internal, message));
        table.finish(name, now);
        tracing::error!(operation = %name, error = message, "operation failed");
        Ok(())
    }

    /// Request cancellation.
    ///
    /// Trips the token, marks the operation done with CANCELLED and frees
    /// the resource right away. The worker only notices the token at its
    /// next checkpoint, so a tool process may still be running. Returns
    /// false for unknown or already-done operations.
    pub fn cancel_operation(&self, name: &OperationName) -> bool {
        let now = self.clock.epoch_ms();
        let mut table = self.table.lock();
        let Some(entry) = table.operations.get_mut(name) else {
            return false;
        };
        if entry.operation.done {
            return false;
        }
        entry.cancel.cancel();
        entry.operation.metadata.advance(OperationPhase::Cancelled);
        entry.operation.error = Some(OperationError::new(
            ErrorCode::Cancelled,
            "Operation cancelled by user",
        ));
        table.finish(name, now);
        tracing::info!(operation = %name, "operation cancelled");
        true
    }

    /// List operations sorted by name.
    ///
    /// `page_token` is the last name of the previous page.
    pub fn list_operations(
        &self,
        filter: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<ListOperationsPage, ManagerError> {
        let filter = ListFilter::parse(filter)?;
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        let table = self.table.lock();
        let mut matching: Vec<&Operation> = table
            .operations
            .values()
            .map(|e| &e.operation)
            .filter(|op| filter.matches(op))
            .filter(|op| page_token.is_none_or(|t| op.name.as_str() > t))
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let has_more = matching.len() > page_size;
        let operations: Vec<Operation> =
            matching.into_iter().take(page_size).cloned().collect();
        let next_page_token = if has_more {
            operations.last().map(|op| op.name.to_string())
        } else {
            None
        };
        Ok(ListOperationsPage {
            operations,
            next_page_token,
        })
    }

    /// Forget an operation. Cancels it first if it is still running.
    pub fn delete_operation(&self, name: &OperationName) -> bool {
        let mut table = self.table.lock();
        let Some(entry) = table.operations.remove(name) else {
            return false;
        };
        if !entry.operation.done {
            entry.cancel.cancel();
        }
        let resource = entry.operation.resource_name;
        if table.active.get(&resource) == Some(name) {
            table.active.remove(&resource);
        }
        true
    }

    /// Drop done operations whose completion is older than the TTL.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.epoch_ms();
        let ttl_ms = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        let mut table = self.table.lock();
        let before = table.operations.len();
        table.operations.retain(|_, entry| match entry.completed_at_ms {
            Some(done_at) => now.saturating_sub(done_at) < ttl_ms,
            None => true,
        });
        let removed = before - table.operations.len();
        if removed > 0 {
            tracing::debug!(removed, "expired operations cleaned up");
        }
        removed
    }

    /// Cancel every operation that is still running.
    pub fn shutdown(&self) -> usize {
        let running: Vec<OperationName> = {
            let table = self.table.lock();
            table
                .operations
                .values()
                .filter(|e| !e.operation.done)
                .map(|e| e.operation.name.clone())
                .collect()
        };
        let cancelled = running
            .iter()
            .filter(|name| self.cancel_operation(name))
            .count();
        tracing::info!(cancelled, "operation manager shut down");
        cancelled
    }

    /// Run [`cleanup_expired`](Self::cleanup_expired) every `interval` until
    /// the manager is dropped.
    pub fn spawn_cleanup(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(manager) = weak.upgrade() else {
                    break;
                };
                manager.cleanup_expired();
            }
        })
    }
}

#[cfg(test)]
#[path = "operations_tests.rs"]
mod tests;
