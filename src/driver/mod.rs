//! # Driver Module
//!
//! Core driver implementation for StrataDB distributed SQL database.
//!
//! This module provides the primary API for routing requests across a
//! cluster and interacting with the table, rate-limiter, and coordination
//! services.
//!
//! ## Core Types
//!
//! - [`Driver`] - Main entry point owning the connection router
//! - [`Router`] - Cluster-aware connection selection
//! - [`CallContext`] - Per-call context (pinned endpoint, idempotency)
//! - [`TableClient`] - Session-based retried query execution
//! - [`RatelimiterClient`] - Rate-limiter resource lifecycle
//! - [`CoordinationClient`] - Coordination node lifecycle
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stratadb_driver::{CallContext, Driver, QueryParameters, TxControl};
//!
//! # async fn example(conns: Vec<stratadb_driver::ConnRef>) -> Result<(), Box<dyn std::error::Error>> {
//! // Create driver
//! let driver = Driver::from_connection_string("strata://db.cluster:2135/?database=/local")?;
//!
//! // Feed discovery output into the router
//! driver.update_endpoints(conns)?;
//!
//! // Run a query with retries
//! let table = driver.table();
//! let result = table
//!     .retry_idempotent(&CallContext::new().with_idempotent(true), |session| async move {
//!         session
//!             .execute(
//!                 TxControl::online_ro().with_commit(),
//!                 "SELECT series_id, title FROM series;",
//!                 QueryParameters::new(),
//!             )
//!             .await
//!     })
//!     .await?;
//!
//! for row in result.result_sets.into_iter().flatten() {
//!     println!("{:?}", row);
//! }
//!
//! driver.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Submodules
//!
//! - [`router`] - Connection snapshot and tiered selection
//! - [`table`] - Table service client and value types
//! - [`balancer`] - Prefer-predicate policies for the router

pub mod balancer;
pub mod coordination;
pub mod ratelimiter;
pub mod router;
pub mod table;
mod config;
mod conn;
mod context;
mod driver;
mod endpoint;
mod error;
mod retry;

// Re-exports
pub use balancer::{BalancerConfig, PreferPolicy, PreferPredicate};
pub use config::{Credentials, DriverConfig, DriverConfigBuilder};
pub use conn::{Conn, ConnRef, ConnState, Request, Response};
pub use context::CallContext;
pub use coordination::{ConsistencyMode, CoordinationClient, NodeConfig, RatelimiterCountersMode};
pub use driver::Driver;
pub use endpoint::Endpoint;
pub use error::{DriverError, DriverResult, StatusCode, TransportErrorCode};
pub use ratelimiter::{HierarchicalDrrSettings, RatelimiterClient, Resource};
pub use retry::RetryPolicy;
pub use router::{ConnectionsState, RandomSource, Router, RouterMetrics};
pub use table::{
    Query, QueryParameters, QueryResult, ResultSet, Row, RowStream, Session, TableClient,
    TemplateConfig, TxControl, Value, ValueType,
};

/// 쿼리 파라미터 생성 매크로
#[macro_export]
macro_rules! params {
    () => {
        $crate::driver::QueryParameters::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::driver::QueryParameters::new();
        $(
            params.insert($key, $crate::driver::Value::from($value));
        )+
        params
    }};
}
