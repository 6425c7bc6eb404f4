//! Health-aware HTTP load balancer with hot configuration reload.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                    SLB PROXY                      │
//!                  │                                                   │
//!  Client Request  │  ┌──────────┐   ┌──────────┐   ┌──────────────┐  │
//!  ────────────────┼─▶│   net    │──▶│  proxy   │──▶│   routing    │  │
//!                  │  │ listener │   │ dispatch │   │  snapshot    │  │
//!                  │  └──────────┘   └────┬─────┘   └──────┬───────┘  │
//!                  │                      │                │          │
//!                  │                      ▼                ▼          │
//!  Client Response │                ┌──────────┐    ┌──────────────┐  │
//!  ◀───────────────┼────────────────│ forward  │    │   balance    │  │
//!                  │                │ (proxy)  │    │  strategies  │  │
//!                  │                └──────────┘    └──────────────┘  │
//!                  │                                                   │
//!                  │  ┌────────────────────────────────────────────┐  │
//!                  │  │ reload cycle: config file → health probes  │  │
//!                  │  │ → RoutingTable publish → coordinator swap  │  │
//!                  │  │ → listener restart on port change          │  │
//!                  │  └────────────────────────────────────────────┘  │
//!                  └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod net;
pub mod proxy;
pub mod routing;

// Traffic management
pub mod balance;
pub mod health;
pub mod reload;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::Settings;
pub use config::SlbConfig;
pub use lifecycle::Shutdown;
pub use routing::RoutingTable;
