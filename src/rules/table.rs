//! The two-phase rule table.
//!
//! # Responsibilities
//! - Collect rules in registration order during the configuration phase
//! - Broadcast action registrations to every collected rule
//! - Freeze into an immutable table consulted by the listeners
//!
//! # Design Decisions
//! - Freezing consumes the builder: post-listen mutation is unrepresentable
//! - The frozen table is an `Arc` slice, shared lock-free across requests

use std::sync::Arc;

use axum::response::Response;

use crate::http::request::GatewayRequest;
use crate::pipeline::Action;
use crate::rules::rule::{Rule, UnsupportedProtocol};

/// Ordered rule collection for the configuration phase.
#[derive(Default)]
pub struct RuleTableBuilder {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Apply an action to every rule collected so far.
    pub fn broadcast_action(&self, action: &Arc<dyn Action>) {
        for rule in &self.rules {
            rule.register_action(action.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Freeze the builder into the immutable dispatch table, appending the
    /// extra rules and then the fallback (which must come last).
    pub fn freeze(
        self,
        extra_rules: Vec<Arc<dyn Rule>>,
        fallback: Option<Arc<dyn Rule>>,
    ) -> RuleTable {
        let mut rules = self.rules;
        rules.extend(extra_rules);
        if let Some(fallback) = fallback {
            rules.push(fallback);
        }
        RuleTable {
            rules: rules.into(),
        }
    }
}

/// The frozen, ordered dispatch table consulted per inbound request.
#[derive(Clone)]
pub struct RuleTable {
    rules: Arc<[Arc<dyn Rule>]>,
}

impl RuleTable {
    /// Walk the table in order; the first rule producing a response owns
    /// the request. None means no rule handled it.
    pub async fn dispatch(&self, req: &GatewayRequest) -> Option<(Response, &str)> {
        for rule in self.rules.iter() {
            if let Some(response) = rule.try_handle(req).await {
                return Some((response, rule.name()));
            }
        }
        None
    }

    /// WebSocket dispatch: every rule rejects, so this reports the
    /// unsupported-protocol error as soon as any rule is consulted.
    pub async fn dispatch_web_socket(&self, href: &str) -> Result<bool, UnsupportedProtocol> {
        for rule in self.rules.iter() {
            match rule.try_handle_web_socket(href).await {
                Ok(true) => return Ok(true),
                Ok(false) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(false)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
