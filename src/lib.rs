//! HTTP(S) API gateway core.
//!
//! A single entry point in front of many backend APIs: each backend is
//! registered by URI, described by the schema it serves at `/.api-core`,
//! and reached through a derived route pattern. Requests are matched
//! first-rule-wins, run through an ordered action pipeline, and forwarded
//! to a weighted upstream target.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────┐
//!                        │                  API GATEWAY                    │
//!                        │                                                 │
//!   Client Request       │  ┌─────────┐   ┌──────────┐   ┌────────────┐   │
//!   ─────────────────────┼─▶│  http   │──▶│  rules   │──▶│  routing   │   │
//!                        │  │ server  │   │  table   │   │  matcher   │   │
//!                        │  └─────────┘   └────┬─────┘   └─────┬──────┘   │
//!                        │                     │               │          │
//!                        │                     ▼               ▼          │
//!                        │              ┌────────────┐   ┌────────────┐   │
//!                        │              │  pipeline  │   │    api     │   │
//!                        │              │scope+action│   │ descriptor │   │
//!                        │              └─────┬──────┘   └────────────┘   │
//!                        │                    │                           │
//!   Client Response      │  ┌─────────┐   ┌──┴───────┐                    │
//!   ◀────────────────────┼──│ http    │◀──│ upstream │◀───────────────────┼── Backend
//!                        │  │ error   │   │ forward  │                    │    Server
//!                        │  └─────────┘   └──────────┘                    │
//!                        │                                                 │
//!                        │  ┌──────────────────────────────────────────┐  │
//!                        │  │          Cross-Cutting Concerns           │  │
//!                        │  │  ┌────────┐ ┌───────────┐ ┌───────────┐  │  │
//!                        │  │  │ config │ │ lifecycle │ │observabi- │  │  │
//!                        │  │  │        │ │start/stop │ │   lity    │  │  │
//!                        │  │  └────────┘ └───────────┘ └───────────┘  │  │
//!                        │  └──────────────────────────────────────────┘  │
//!                        └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod api;
pub mod gateway;
pub mod http;
pub mod pipeline;
pub mod routing;
pub mod rules;
pub mod upstream;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use gateway::{Gateway, GatewayError, GatewayHandle, GatewayOptions, TlsOptions};
pub use lifecycle::Shutdown;
pub use pipeline::{Action, Scope};
pub use rules::Rule;
pub use upstream::Credentials;
