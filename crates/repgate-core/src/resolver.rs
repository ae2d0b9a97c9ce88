//! Target resolution: state + catalog -> blocked and accessible lists

use repgate_api::{AccessState, Resolution, Target, TargetDecision};
use std::collections::HashSet;
use tracing::debug;

use crate::CatalogError;

/// Decides, per target, whether it is blocked in a given state
///
/// Implementors only supply [`decide`](TargetResolver::decide). The provided
/// methods validate the catalog and partition it, so every target ends up in
/// exactly one of the two lists whatever the decision policy is.
pub trait TargetResolver {
    fn decide(&self, state: AccessState, target: &Target) -> TargetDecision;

    /// Targets to block, in catalog order
    fn resolve_blocked(
        &self,
        state: AccessState,
        targets: &[Target],
    ) -> Result<Vec<Target>, CatalogError> {
        Ok(self.resolve(state, targets)?.blocked)
    }

    /// Targets to leave accessible, in catalog order
    fn resolve_accessible(
        &self,
        state: AccessState,
        targets: &[Target],
    ) -> Result<Vec<Target>, CatalogError> {
        Ok(self.resolve(state, targets)?.accessible)
    }

    fn resolve(&self, state: AccessState, targets: &[Target]) -> Result<Resolution, CatalogError> {
        validate_catalog(targets)?;

        let (blocked, accessible): (Vec<Target>, Vec<Target>) = targets
            .iter()
            .cloned()
            .partition(|target| self.decide(state, target) == TargetDecision::Block);

        debug!(
            state = %state,
            blocked = blocked.len(),
            accessible = accessible.len(),
            "Targets resolved"
        );

        Ok(Resolution {
            blocked,
            accessible,
        })
    }
}

/// Blocks every target unless an unlock window is active
#[derive(Debug, Clone, Copy, Default)]
pub struct AllOrNothingResolver;

impl TargetResolver for AllOrNothingResolver {
    fn decide(&self, state: AccessState, _target: &Target) -> TargetDecision {
        if state.grants_access() {
            TargetDecision::Allow
        } else {
            TargetDecision::Block
        }
    }
}

/// Reject blank or repeated identifiers instead of silently fixing them
pub fn validate_catalog(targets: &[Target]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(targets.len());
    for (index, target) in targets.iter().enumerate() {
        if target.id.is_blank() {
            return Err(CatalogError::EmptyIdentifier { index });
        }
        if !seen.insert(&target.id) {
            return Err(CatalogError::DuplicateIdentifier(target.id.clone()));
        }
    }
    Ok(())
}
