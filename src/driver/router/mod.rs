//! Router
//!
//! 연결 라우터
//!
//! 현재 스냅샷을 보유하고, 클러스터 멤버십이나 선호 정책이 변할 때
//! 원자적으로 교체합니다. 모든 아웃바운드 호출은 스냅샷 포인터를 한 번
//! 읽고 셀렉터에 위임합니다.

mod random;
mod state;

pub use random::RandomSource;
pub use state::ConnectionsState;

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::balancer::PreferPredicate;
use super::conn::ConnRef;
use super::context::CallContext;

// ============================================================================
// Router - 라우터
// ============================================================================

/// 연결 라우터
///
/// 스냅샷 슬롯은 단일 퍼블리셔, 다수 리더 구조입니다. 리더는 이전
/// 스냅샷 전체 또는 새 스냅샷 전체만 관측하며, 반쯤 구성된 상태는
/// 결코 보지 못합니다.
pub struct Router {
    /// 현재 스냅샷
    state: ArcSwap<ConnectionsState>,
    /// 공유 난수 소스 (스냅샷 외부, 모든 선택이 공유)
    rand: RandomSource,
}

impl Router {
    /// 빈 라우터 생성
    pub fn new() -> Self {
        Self::with_random_source(RandomSource::new())
    }

    /// 난수 소스를 지정하여 생성 (테스트용 시드 주입)
    pub fn with_random_source(rand: RandomSource) -> Self {
        Self {
            state: ArcSwap::from_pointee(ConnectionsState::new(Vec::new(), None, true)),
            rand,
        }
    }

    /// 스냅샷 전체 교체
    ///
    /// 클러스터 디스커버리 결과나 선호 정책 변경 시 외부에서 호출됩니다.
    /// 진행 중인 호출자가 보유한 이전 스냅샷은 계속 유효합니다.
    pub fn update(
        &self,
        conns: Vec<ConnRef>,
        prefer_func: Option<&PreferPredicate>,
        allow_fallback: bool,
    ) {
        let next = ConnectionsState::new(conns, prefer_func, allow_fallback);
        tracing::debug!(
            prefer = next.prefer_count(),
            fallback = next.fallback_count(),
            known_nodes = next.known_node_count(),
            "router snapshot replaced"
        );
        self.state.store(Arc::new(next));
    }

    /// 연결 선택
    ///
    /// 반환된 `usize`는 상위 백오프 정책을 위한 비정상 프로브 횟수입니다.
    /// `(None, _)`은 완전 고갈을 의미하며, 호출자는 보통
    /// `DriverError::NoEndpoints`로 변환합니다.
    pub fn connection(&self, ctx: &CallContext) -> (Option<ConnRef>, usize) {
        let state = self.state.load();
        state.connection(ctx, &self.rand)
    }

    /// 현재 스냅샷 조회
    pub fn snapshot(&self) -> Arc<ConnectionsState> {
        self.state.load_full()
    }

    /// 라우터 메트릭
    pub fn metrics(&self) -> RouterMetrics {
        let state = self.state.load();
        RouterMetrics {
            prefer_count: state.prefer_count(),
            fallback_count: state.fallback_count(),
            known_node_count: state.known_node_count(),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("state", &**self.state.load())
            .finish()
    }
}

// ============================================================================
// RouterMetrics - 라우터 메트릭
// ============================================================================

/// 라우터 메트릭
#[derive(Debug, Clone, Default)]
pub struct RouterMetrics {
    /// 선호 풀 크기
    pub prefer_count: usize,
    /// 폴백 풀 크기
    pub fallback_count: usize,
    /// 노드 ID로 식별된 연결 수
    pub known_node_count: usize,
}

// ============================================================================
// Tests
// ============================================================================
