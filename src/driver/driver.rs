//! Driver
//!
//! 드라이버 인스턴스
//!
//! 라우터를 소유하고 서비스 클라이언트를 노출하는 진입점입니다.
//! 연결 다이얼링과 클러스터 디스커버리는 외부 협력자의 소관이며,
//! 준비된 연결은 [`Driver::update_endpoints`]로 공급됩니다.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::config::DriverConfig;
use super::conn::ConnRef;
use super::context::CallContext;
use super::coordination::CoordinationClient;
use super::error::{DriverError, DriverResult};
use super::ratelimiter::RatelimiterClient;
use super::router::{Router, RouterMetrics};
use super::table::TableClient;

// ============================================================================
// Driver - 드라이버
// ============================================================================

/// 분산 SQL 데이터베이스 드라이버
pub struct Driver {
    /// 설정
    config: Arc<DriverConfig>,
    /// 연결 라우터
    router: Arc<Router>,
    /// 열린 상태
    open: Arc<RwLock<bool>>,
}

impl Driver {
    /// 설정으로 드라이버 생성
    pub fn new(config: DriverConfig) -> DriverResult<Self> {
        if config.database.is_empty() {
            return Err(DriverError::configuration("database must not be empty"));
        }

        Ok(Self {
            config: Arc::new(config),
            router: Arc::new(Router::new()),
            open: Arc::new(RwLock::new(true)),
        })
    }

    /// 연결 문자열로 드라이버 생성
    pub fn from_connection_string(dsn: &str) -> DriverResult<Self> {
        Self::new(DriverConfig::from_connection_string(dsn)?)
    }

    /// 드라이버 설정
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// 클러스터 엔드포인트 갱신
    ///
    /// 디스커버리 결과를 받아 설정된 밸런서 정책으로 라우터 스냅샷을
    /// 교체합니다. 진행 중인 호출은 이전 스냅샷으로 계속됩니다.
    pub fn update_endpoints(&self, conns: Vec<ConnRef>) -> DriverResult<()> {
        self.ensure_open()?;

        let predicate = self.config.balancer.predicate(&self.config.location);
        self.router
            .update(conns, predicate.as_ref(), self.config.balancer.allow_fallback());
        Ok(())
    }

    /// 연결 선택
    ///
    /// 서비스 클라이언트 밖에서 직접 라우팅이 필요할 때 사용합니다.
    pub fn connection(&self, ctx: &CallContext) -> (Option<ConnRef>, usize) {
        self.router.connection(ctx)
    }

    /// 테이블 서비스 클라이언트
    pub fn table(&self) -> TableClient {
        TableClient::new(self.router.clone(), self.config.clone(), self.open.clone())
    }

    /// 레이트리미터 서비스 클라이언트
    pub fn ratelimiter(&self) -> RatelimiterClient {
        RatelimiterClient::new(self.router.clone(), self.config.clone(), self.open.clone())
    }

    /// 코디네이션 서비스 클라이언트
    pub fn coordination(&self) -> CoordinationClient {
        CoordinationClient::new(self.router.clone(), self.config.clone(), self.open.clone())
    }

    /// 드라이버 종료
    ///
    /// 이미 닫힌 드라이버에 대해서는 아무것도 하지 않습니다.
    pub async fn close(&self) -> DriverResult<()> {
        let mut open = self.open.write();
        if !*open {
            return Ok(());
        }

        *open = false;
        self.router.update(Vec::new(), None, true);
        Ok(())
    }

    /// 라우터 메트릭
    pub fn metrics(&self) -> RouterMetrics {
        self.router.metrics()
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if *self.open.read() {
            Ok(())
        } else {
            Err(DriverError::session("Driver is closed"))
        }
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("address", &self.config.address)
            .field("database", &self.config.database)
            .field("open", &*self.open.read())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
