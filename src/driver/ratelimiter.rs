//! Ratelimiter Service
//!
//! 레이트리미터 서비스 클라이언트
//!
//! 코디네이션 노드에 속한 리소스의 수명 주기와 유닛 획득을 다룹니다.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::config::DriverConfig;
use super::conn::{ConnRef, Request, Response};
use super::context::CallContext;
use super::error::{DriverError, DriverResult};
use super::router::Router;

// ============================================================================
// HierarchicalDrrSettings - 계층적 DRR 설정
// ============================================================================

/// 계층적 DRR(Deficit Round Robin) 설정
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalDrrSettings {
    /// 초당 최대 유닛 수
    pub max_units_per_second: f64,
    /// 최대 버스트 크기 계수
    pub max_burst_size_coefficient: f64,
    /// 프리페치 계수
    pub prefetch_coefficient: f64,
    /// 프리페치 워터마크
    pub prefetch_watermark: f64,
}

// ============================================================================
// Resource - 리소스
// ============================================================================

/// 레이트리미터 리소스
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// 코디네이션 노드 내 리소스 경로
    pub resource_path: String,
    /// 계층적 DRR 설정
    pub hierarchical_drr: HierarchicalDrrSettings,
}

impl Resource {
    /// 새 리소스 생성
    pub fn new(resource_path: impl Into<String>, hierarchical_drr: HierarchicalDrrSettings) -> Self {
        Self {
            resource_path: resource_path.into(),
            hierarchical_drr,
        }
    }
}

// ============================================================================
// RatelimiterClient - 레이트리미터 클라이언트
// ============================================================================

/// 레이트리미터 서비스 클라이언트
pub struct RatelimiterClient {
    router: Arc<Router>,
    config: Arc<DriverConfig>,
    open: Arc<RwLock<bool>>,
}

impl RatelimiterClient {
    pub(crate) fn new(
        router: Arc<Router>,
        config: Arc<DriverConfig>,
        open: Arc<RwLock<bool>>,
    ) -> Self {
        Self {
            router,
            config,
            open,
        }
    }

    /// 리소스 생성
    pub async fn create_resource(
        &self,
        ctx: &CallContext,
        coordination_path: impl Into<String>,
        resource: Resource,
    ) -> DriverResult<()> {
        let response = self
            .call(
                ctx,
                Request::CreateResource {
                    coordination_path: coordination_path.into(),
                    resource,
                },
            )
            .await?;
        expect_done("CreateResource", response)
    }

    /// 리소스 설정 변경
    pub async fn alter_resource(
        &self,
        ctx: &CallContext,
        coordination_path: impl Into<String>,
        resource: Resource,
    ) -> DriverResult<()> {
        let response = self
            .call(
                ctx,
                Request::AlterResource {
                    coordination_path: coordination_path.into(),
                    resource,
                },
            )
            .await?;
        expect_done("AlterResource", response)
    }

    /// 리소스 삭제
    pub async fn drop_resource(
        &self,
        ctx: &CallContext,
        coordination_path: impl Into<String>,
        resource_path: impl Into<String>,
    ) -> DriverResult<()> {
        let response = self
            .call(
                ctx,
                Request::DropResource {
                    coordination_path: coordination_path.into(),
                    resource_path: resource_path.into(),
                },
            )
            .await?;
        expect_done("DropResource", response)
    }

    /// 리소스 목록 조회
    ///
    /// `recursive`가 true이면 `prefix` 아래의 모든 리소스를 나열합니다.
    pub async fn list_resources(
        &self,
        ctx: &CallContext,
        coordination_path: impl Into<String>,
        prefix: impl Into<String>,
        recursive: bool,
    ) -> DriverResult<Vec<String>> {
        let response = self
            .call(
                ctx,
                Request::ListResources {
                    coordination_path: coordination_path.into(),
                    prefix: prefix.into(),
                    recursive,
                },
            )
            .await?;

        match response {
            Response::ResourceList(paths) => Ok(paths),
            other => Err(unexpected_response("ListResources", &other)),
        }
    }

    /// 리소스 설명 조회
    pub async fn describe_resource(
        &self,
        ctx: &CallContext,
        coordination_path: impl Into<String>,
        resource_path: impl Into<String>,
    ) -> DriverResult<Resource> {
        let response = self
            .call(
                ctx,
                Request::DescribeResource {
                    coordination_path: coordination_path.into(),
                    resource_path: resource_path.into(),
                },
            )
            .await?;

        match response {
            Response::ResourceDescription(resource) => Ok(resource),
            other => Err(unexpected_response("DescribeResource", &other)),
        }
    }

    /// 유닛 획득
    ///
    /// `is_used_amount`가 true이면 이미 소비한 유닛을 보고만 하고,
    /// false이면 유닛을 요청하며 버킷이 고갈된 경우 거부될 수 있습니다.
    pub async fn acquire_resource(
        &self,
        ctx: &CallContext,
        coordination_path: impl Into<String>,
        resource_path: impl Into<String>,
        amount: u64,
        is_used_amount: bool,
    ) -> DriverResult<()> {
        let response = self
            .call(
                ctx,
                Request::AcquireResource {
                    coordination_path: coordination_path.into(),
                    resource_path: resource_path.into(),
                    amount,
                    is_used_amount,
                },
            )
            .await?;
        expect_done("AcquireResource", response)
    }

    /// 라우터에서 연결을 골라 호출
    async fn call(&self, ctx: &CallContext, request: Request) -> DriverResult<Response> {
        self.ensure_open()?;

        let (conn, _) = self.router.connection(ctx);
        let conn: ConnRef = conn.ok_or(DriverError::NoEndpoints)?;

        let timeout = ctx
            .operation_timeout()
            .unwrap_or(self.config.request_timeout);
        tokio::time::timeout(timeout, conn.call(request))
            .await
            .map_err(|_| DriverError::timeout("request deadline exceeded"))?
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if *self.open.read() {
            Ok(())
        } else {
            Err(DriverError::session("Driver is closed"))
        }
    }
}

impl std::fmt::Debug for RatelimiterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatelimiterClient")
            .field("database", &self.config.database)
            .finish()
    }
}

fn expect_done(operation: &str, response: Response) -> DriverResult<()> {
    match response {
        Response::Done => Ok(()),
        other => Err(unexpected_response(operation, &other)),
    }
}

fn unexpected_response(operation: &str, response: &Response) -> DriverError {
    DriverError::protocol(format!(
        "unexpected response for {}: {:?}",
        operation, response
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;

    use super::super::conn::{Conn, ConnState};
    use super::super::endpoint::Endpoint;
    use super::super::router::RandomSource;
    use super::*;

    struct ResourceConn;

    impl Conn for ResourceConn {
        fn endpoint(&self) -> Endpoint {
            Endpoint::new(1, "node1.cluster:2135", "dc-1")
        }

        fn state(&self) -> ConnState {
            ConnState::Online
        }

        fn call(&self, request: Request) -> BoxFuture<'_, DriverResult<Response>> {
            Box::pin(async move {
                match request {
                    Request::CreateResource { .. } | Request::DropResource { .. } => {
                        Ok(Response::Done)
                    }
                    Request::DescribeResource { resource_path, .. } => {
                        Ok(Response::ResourceDescription(Resource::new(
                            resource_path,
                            HierarchicalDrrSettings {
                                max_units_per_second: 1.0,
                                max_burst_size_coefficient: 2.0,
                                ..Default::default()
                            },
                        )))
                    }
                    Request::ListResources { prefix, .. } => {
                        Ok(Response::ResourceList(vec![prefix]))
                    }
                    _ => Ok(Response::Done),
                }
            })
        }
    }

    fn client() -> RatelimiterClient {
        let router = Arc::new(Router::with_random_source(RandomSource::with_seed(1)));
        router.update(vec![Arc::new(ResourceConn)], None, true);

        RatelimiterClient::new(
            router,
            Arc::new(DriverConfig::default()),
            Arc::new(RwLock::new(true)),
        )
    }

    #[tokio::test]
    async fn test_create_and_describe_resource() {
        let client = client();
        let ctx = CallContext::new();

        client
            .create_resource(
                &ctx,
                "/local/test",
                Resource::new(
                    "test_res",
                    HierarchicalDrrSettings {
                        max_units_per_second: 1.0,
                        max_burst_size_coefficient: 2.0,
                        ..Default::default()
                    },
                ),
            )
            .await
            .unwrap();

        let described = client
            .describe_resource(&ctx, "/local/test", "test_res")
            .await
            .unwrap();
        assert_eq!(described.resource_path, "test_res");
        assert_eq!(described.hierarchical_drr.max_units_per_second, 1.0);
    }

    #[tokio::test]
    async fn test_list_resources() {
        let list = client()
            .list_resources(&CallContext::new(), "/local/test", "test_res", true)
            .await
            .unwrap();
        assert_eq!(list, vec!["test_res".to_string()]);
    }

    #[tokio::test]
    async fn test_no_endpoints() {
        let router = Arc::new(Router::new());
        let client = RatelimiterClient::new(
            router,
            Arc::new(DriverConfig::default()),
            Arc::new(RwLock::new(true)),
        );

        let result = client
            .acquire_resource(&CallContext::new(), "/local/test", "test_res", 1, false)
            .await;
        assert!(matches!(result, Err(DriverError::NoEndpoints)));
    }

    #[tokio::test]
    async fn test_closed_client() {
        let client = client();
        *client.open.write() = false;

        let result = client
            .drop_resource(&CallContext::new(), "/local/test", "test_res")
            .await;
        assert!(matches!(result, Err(DriverError::Session(_))));
    }
}
