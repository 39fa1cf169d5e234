//! Call Context
//!
//! 호출별 컨텍스트
//!
//! 동적 컨텍스트 백이 없는 대신 명시적 요청 구조체를 호출 스택으로
//! 전달합니다. 수명은 호출 한 번입니다.

use std::time::Duration;

use super::endpoint::Endpoint;

// ============================================================================
// CallContext - 호출 컨텍스트
// ============================================================================

/// 호출별 컨텍스트
///
/// 고정 엔드포인트는 호출자의 명시적 오버라이드이며, 라우터의
/// 무작위 선택과 실패 카운팅을 모두 우회합니다.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// 고정 엔드포인트 (Tier 0)
    pinned_endpoint: Option<Endpoint>,
    /// 멱등 호출 여부 (재시도 정책용)
    idempotent: bool,
    /// 작업 타임아웃 오버라이드
    operation_timeout: Option<Duration>,
}

impl CallContext {
    /// 새 컨텍스트 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 엔드포인트 고정
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.pinned_endpoint = Some(endpoint);
        self
    }

    /// 멱등 호출로 표시
    pub fn with_idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = idempotent;
        self
    }

    /// 작업 타임아웃 오버라이드
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// 고정 엔드포인트 조회
    pub fn pinned_endpoint(&self) -> Option<&Endpoint> {
        self.pinned_endpoint.as_ref()
    }

    /// 멱등 호출 여부
    pub fn is_idempotent(&self) -> bool {
        self.idempotent
    }

    /// 작업 타임아웃 조회
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout
    }
}
