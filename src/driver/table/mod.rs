//! Table Service
//!
//! 테이블 서비스 클라이언트
//!
//! 세션 기반의 재시도 실행 워크플로를 제공합니다. 시도마다 라우터가
//! 고른 연결로 새 세션을 만들고, 일시적 에러에는 재시도 정책을
//! 적용합니다.

pub mod options;
pub mod query;
pub mod result;
pub mod session;
pub mod types;

pub use options::{
    Column, ReadTableOptions, TableDescription, TableOptions, TableOptionsDescription, TxControl,
    TxMode,
};
pub use query::{render, Query, QueryParameters, TemplateConfig};
pub use result::{
    AccessStats, QueryPhase, QueryResult, QueryStats, ResultSet, Row, RowStream, TableAccess,
};
pub use session::{PreparedQuery, Session};
pub use types::{Value, ValueType};

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;

use super::config::DriverConfig;
use super::context::CallContext;
use super::error::{DriverError, DriverResult};
use super::retry::RetryPolicy;
use super::router::Router;

// ============================================================================
// TableClient - 테이블 클라이언트
// ============================================================================

/// 테이블 서비스 클라이언트
pub struct TableClient {
    router: Arc<Router>,
    config: Arc<DriverConfig>,
    retry: RetryPolicy,
    open: Arc<RwLock<bool>>,
}

impl TableClient {
    pub(crate) fn new(
        router: Arc<Router>,
        config: Arc<DriverConfig>,
        open: Arc<RwLock<bool>>,
    ) -> Self {
        Self {
            router,
            config,
            retry: RetryPolicy::default(),
            open,
        }
    }

    /// 재시도 정책 교체
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 멱등 작업을 재시도 포함 실행
    ///
    /// 시도마다 새 세션이 만들어집니다. 모든 재시도 가능 에러를
    /// 재시도합니다.
    pub async fn retry_idempotent<F, Fut, T>(&self, ctx: &CallContext, work: F) -> DriverResult<T>
    where
        F: Fn(Session) -> Fut,
        Fut: Future<Output = DriverResult<T>>,
    {
        self.ensure_open()?;
        self.retry
            .retry(true, || {
                let session = self.session(ctx);
                async { work(session?).await }
            })
            .await
    }

    /// 비멱등 작업을 재시도 포함 실행
    ///
    /// 요청이 실행되지 않았음이 확실한 경우에만 재시도합니다.
    pub async fn retry_non_idempotent<F, Fut, T>(
        &self,
        ctx: &CallContext,
        work: F,
    ) -> DriverResult<T>
    where
        F: Fn(Session) -> Fut,
        Fut: Future<Output = DriverResult<T>>,
    {
        self.ensure_open()?;
        self.retry
            .retry(false, || {
                let session = self.session(ctx);
                async { work(session?).await }
            })
            .await
    }

    /// 라우터에서 연결을 골라 세션 생성
    pub fn session(&self, ctx: &CallContext) -> DriverResult<Session> {
        self.ensure_open()?;

        let (conn, failed_count) = self.router.connection(ctx);
        if failed_count > 0 {
            tracing::debug!(failed_count, "connection selected after unhealthy probes");
        }
        let conn = conn.ok_or(DriverError::NoEndpoints)?;

        let request_timeout = ctx
            .operation_timeout()
            .unwrap_or(self.config.request_timeout);
        Ok(Session::new(conn, request_timeout, self.config.stream_timeout))
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if *self.open.read() {
            Ok(())
        } else {
            Err(DriverError::session("Driver is closed"))
        }
    }
}

impl std::fmt::Debug for TableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableClient")
            .field("database", &self.config.database)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::future::BoxFuture;

    use super::super::conn::{Conn, ConnRef, ConnState, Request, Response};
    use super::super::endpoint::Endpoint;
    use super::super::error::TransportErrorCode;
    use super::super::router::RandomSource;
    use super::*;

    /// 처음 `failures`번은 Unavailable, 이후 성공하는 테스트 연결
    struct FlakyConn {
        calls: AtomicUsize,
        failures: usize,
    }

    impl Conn for FlakyConn {
        fn endpoint(&self) -> Endpoint {
            Endpoint::new(1, "node1.cluster:2135", "dc-1")
        }

        fn state(&self) -> ConnState {
            ConnState::Online
        }

        fn call(&self, _request: Request) -> BoxFuture<'_, DriverResult<Response>> {
            let attempt = self.calls.fetch_add(1, Ordering::SeqCst);
            let failures = self.failures;
            Box::pin(async move {
                if attempt < failures {
                    Err(DriverError::transport(
                        TransportErrorCode::Unavailable,
                        "node restarting",
                    ))
                } else {
                    Ok(Response::Done)
                }
            })
        }
    }

    fn client_with_conn(conn: ConnRef) -> TableClient {
        let router = Arc::new(Router::with_random_source(RandomSource::with_seed(1)));
        router.update(vec![conn], None, true);

        TableClient::new(
            router,
            Arc::new(DriverConfig::default()),
            Arc::new(RwLock::new(true)),
        )
        .with_retry_policy(RetryPolicy {
            max_retry_time: Duration::from_secs(1),
            delay_step: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        })
    }

    #[tokio::test]
    async fn test_retry_idempotent_recovers() {
        let client = client_with_conn(Arc::new(FlakyConn {
            calls: AtomicUsize::new(0),
            failures: 2,
        }));

        client
            .retry_idempotent(&CallContext::new(), |session| async move {
                session.drop_table("/local/series").await
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_retry_non_idempotent_does_not_retry_transport_error() {
        let client = client_with_conn(Arc::new(FlakyConn {
            calls: AtomicUsize::new(0),
            failures: 1,
        }));

        let result = client
            .retry_non_idempotent(&CallContext::new(), |session| async move {
                session.drop_table("/local/series").await
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_no_endpoints() {
        let router = Arc::new(Router::with_random_source(RandomSource::with_seed(2)));
        let client = TableClient::new(
            router,
            Arc::new(DriverConfig::default()),
            Arc::new(RwLock::new(true)),
        )
        .with_retry_policy(RetryPolicy::no_retry());

        let result = client
            .retry_idempotent(&CallContext::new(), |session| async move {
                session.drop_table("/local/series").await
            })
            .await;

        assert!(matches!(result, Err(DriverError::NoEndpoints)));
    }

    #[tokio::test]
    async fn test_closed_client() {
        let router = Arc::new(Router::new());
        let client = TableClient::new(
            router,
            Arc::new(DriverConfig::default()),
            Arc::new(RwLock::new(false)),
        );

        let result = client.session(&CallContext::new());
        assert!(matches!(result, Err(DriverError::Session(_))));
    }

    #[tokio::test]
    async fn test_session_uses_pinned_endpoint() {
        let conn: ConnRef = Arc::new(FlakyConn {
            calls: AtomicUsize::new(0),
            failures: 0,
        });
        let client = client_with_conn(conn);

        let ctx = CallContext::new().with_endpoint(Endpoint::new(1, "node1.cluster:2135", "dc-1"));
        let session = client.session(&ctx).unwrap();
        assert_eq!(session.endpoint().node_id(), 1);
    }
}
