//! # StrataDB Driver
//!
//! A Rust client driver for [StrataDB](https://github.com/zeta9044/stratadb)
//! distributed SQL database with cluster-aware request routing.
//!
//! ## Features
//!
//! - **Connection Routing** - Locality-aware, health-aware connection
//!   selection with tiered fallback on every outbound call
//! - **Async/Await** - Built on Tokio for high-performance async operations
//! - **Retried Execution** - Session-based table workflow with transparent
//!   retries for transient errors
//! - **Type Safety** - Strongly typed query parameters and result values
//! - **Service Clients** - Table, rate-limiter, and coordination services
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use stratadb_driver::{
//!     BalancerConfig, CallContext, Credentials, Driver, DriverConfig,
//!     QueryParameters, TxControl,
//! };
//! use std::time::Duration;
//!
//! # async fn example(conns: Vec<stratadb_driver::ConnRef>) -> Result<(), Box<dyn std::error::Error>> {
//! // Configure the driver
//! let config = DriverConfig::builder("strata://db.cluster:2135/?database=/local")?
//!     .with_credentials(Credentials::anonymous())
//!     .with_location("dc-1")
//!     .with_request_timeout(Duration::from_secs(2))
//!     .with_balancer(BalancerConfig::random_choice().prefer_local_dc_with_fallback())
//!     .build();
//! let driver = Driver::new(config)?;
//!
//! // Connections come from the discovery/transport layer
//! driver.update_endpoints(conns)?;
//!
//! // Execute a query with retries
//! let result = driver
//!     .table()
//!     .retry_idempotent(&CallContext::new(), |session| async move {
//!         session
//!             .execute(
//!                 TxControl::online_ro().with_commit(),
//!                 "SELECT series_id, title FROM series;",
//!                 QueryParameters::new().with_param("$limit", 10u64),
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
//! ## Connection Routing
//!
//! The router serves every outbound call from an immutable snapshot of the
//! current cluster connections:
//!
//! 1. A caller-pinned endpoint on the [`CallContext`] wins outright.
//! 2. Otherwise a healthy connection is drawn uniformly from the preferred
//!    (e.g. local-DC) pool.
//! 3. Then from the fallback pool.
//! 4. As a last resort, banned connections are allowed.
//!
//! The number of unhealthy probes observed along the way is reported to the
//! caller for backoff policy.
//!
//! ## Pinning a Call to an Endpoint
//!
//! ```rust
//! use stratadb_driver::{CallContext, Endpoint};
//!
//! let ctx = CallContext::new()
//!     .with_endpoint(Endpoint::new(7, "node7.cluster:2135", "dc-1"));
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`DriverResult`]. Transient errors are retryable;
//! complete endpoint starvation surfaces as [`DriverError::NoEndpoints`]:
//!
//! ```rust,no_run
//! # use stratadb_driver::{Driver, DriverError};
//! # fn example() {
//! let driver = Driver::from_connection_string("strata://db.cluster:2135/?database=/local");
//!
//! match driver {
//!     Ok(d) => println!("configured: {:?}", d),
//!     Err(DriverError::Configuration(msg)) => eprintln!("bad connection string: {}", msg),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod driver;

// Re-exports for convenience
pub use driver::{
    BalancerConfig, CallContext, Conn, ConnRef, ConnState, ConnectionsState, ConsistencyMode,
    CoordinationClient, Credentials, Driver, DriverConfig, DriverConfigBuilder, DriverError,
    DriverResult, Endpoint, HierarchicalDrrSettings, NodeConfig, PreferPolicy, PreferPredicate,
    Query, QueryParameters, QueryResult, RandomSource, RatelimiterClient, RatelimiterCountersMode,
    Request, Resource, Response, ResultSet, RetryPolicy, Router, RouterMetrics, Row, RowStream,
    Session, StatusCode, TableClient, TemplateConfig, TransportErrorCode, TxControl, Value,
    ValueType,
};

/// Config alias for convenience
pub type Config = DriverConfig;
