//! Coordination Service
//!
//! 코디네이션 서비스 클라이언트
//!
//! 코디네이션 노드의 수명 주기를 다룹니다. 레이트리미터 리소스는
//! 코디네이션 노드 아래에 만들어집니다.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::config::DriverConfig;
use super::conn::{ConnRef, Request, Response};
use super::context::CallContext;
use super::error::{DriverError, DriverResult};
use super::router::Router;

// ============================================================================
// NodeConfig - 노드 설정
// ============================================================================

/// 읽기/어태치 일관성 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyMode {
    /// 미지정 (서버 기본값)
    #[default]
    Unset,
    /// 엄격한 일관성
    Strict,
    /// 완화된 일관성
    Relaxed,
}

/// 레이트리미터 카운터 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatelimiterCountersMode {
    /// 미지정 (서버 기본값)
    #[default]
    Unset,
    /// 집계 카운터
    Aggregated,
    /// 상세 카운터
    Detailed,
}

/// 코디네이션 노드 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// 노드 경로 (응답에서 채워짐)
    pub path: String,
    /// 자가 점검 주기 (밀리초)
    pub self_check_period_millis: u32,
    /// 세션 유예 기간 (밀리초)
    pub session_grace_period_millis: u32,
    /// 읽기 일관성 모드
    pub read_consistency_mode: ConsistencyMode,
    /// 어태치 일관성 모드
    pub attach_consistency_mode: ConsistencyMode,
    /// 레이트리미터 카운터 모드
    pub ratelimiter_counters_mode: RatelimiterCountersMode,
}

// ============================================================================
// CoordinationClient - 코디네이션 클라이언트
// ============================================================================

/// 코디네이션 서비스 클라이언트
pub struct CoordinationClient {
    router: Arc<Router>,
    config: Arc<DriverConfig>,
    open: Arc<RwLock<bool>>,
}

impl CoordinationClient {
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

    /// 노드 생성
    pub async fn create_node(
        &self,
        ctx: &CallContext,
        path: impl Into<String>,
        config: NodeConfig,
    ) -> DriverResult<()> {
        let response = self
            .call(
                ctx,
                Request::CreateNode {
                    path: path.into(),
                    config,
                },
            )
            .await?;
        expect_done("CreateNode", response)
    }

    /// 노드 설정 변경
    pub async fn alter_node(
        &self,
        ctx: &CallContext,
        path: impl Into<String>,
        config: NodeConfig,
    ) -> DriverResult<()> {
        let response = self
            .call(
                ctx,
                Request::AlterNode {
                    path: path.into(),
                    config,
                },
            )
            .await?;
        expect_done("AlterNode", response)
    }

    /// 노드 삭제
    pub async fn drop_node(&self, ctx: &CallContext, path: impl Into<String>) -> DriverResult<()> {
        let response = self.call(ctx, Request::DropNode { path: path.into() }).await?;
        expect_done("DropNode", response)
    }

    /// 노드 설명 조회
    pub async fn describe_node(
        &self,
        ctx: &CallContext,
        path: impl Into<String>,
    ) -> DriverResult<NodeConfig> {
        let response = self
            .call(ctx, Request::DescribeNode { path: path.into() })
            .await?;

        match response {
            Response::NodeDescription(config) => Ok(config),
            other => Err(DriverError::protocol(format!(
                "unexpected response for DescribeNode: {:?}",
                other
            ))),
        }
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

impl std::fmt::Debug for CoordinationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinationClient")
            .field("database", &self.config.database)
            .finish()
    }
}

fn expect_done(operation: &str, response: Response) -> DriverResult<()> {
    match response {
        Response::Done => Ok(()),
        other => Err(DriverError::protocol(format!(
            "unexpected response for {}: {:?}",
            operation, other
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
