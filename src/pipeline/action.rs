//! Policy actions and the ordered, identity-deduplicated action set.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::ApiError;
use crate::pipeline::scope::Scope;

/// One middleware step in the pipeline.
///
/// An action receives exclusive ownership of the scope, may transform or
/// enrich it, and must return a scope for the next action. Returning an
/// error aborts the request: an [`ApiError::Edge`] surfaces its status and
/// message to the client, anything else becomes a logged 500.
#[async_trait]
pub trait Action: Send + Sync {
    async fn execute(&self, scope: Scope) -> Result<Scope, ApiError>;
}

/// An ordered set of actions, deduplicated by instance identity.
///
/// Identity means the `Arc`'s data pointer: registering the same instance
/// twice is a no-op, while two structurally identical instances are
/// distinct. Insertion order is execution order.
#[derive(Clone, Default)]
pub struct ActionSet {
    actions: Vec<Arc<dyn Action>>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action unless this exact instance is already present.
    /// Returns false if the registration was a no-op.
    pub fn insert(&mut self, action: Arc<dyn Action>) -> bool {
        if self.contains(&action) {
            return false;
        }
        self.actions.push(action);
        true
    }

    pub fn contains(&self, action: &Arc<dyn Action>) -> bool {
        self.actions
            .iter()
            .any(|a| Arc::as_ptr(a) as *const () == Arc::as_ptr(action) as *const ())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Action>> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every action in insertion order, handing the scope from one to
    /// the next. The first error aborts the pipeline.
    pub async fn run(&self, mut scope: Scope) -> Result<Scope, ApiError> {
        for action in &self.actions {
            scope = action.execute(scope).await?;
        }
        Ok(scope)
    }
}

impl std::fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSet")
            .field("len", &self.actions.len())
            .finish()
    }
}
