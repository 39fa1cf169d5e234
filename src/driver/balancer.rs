//! Balancer Policy
//!
//! 밸런서 정책
//!
//! 연결을 선호/폴백 풀로 분류하는 순수 술어를 구성합니다. 술어는
//! I/O를 수행하지 않으며 스냅샷 구성 동안 참조 투명해야 합니다.

use std::sync::Arc;

use super::conn::Conn;
use super::endpoint::Endpoint;

/// 선호 술어
///
/// 연결을 선호 풀로 분류하면 true를 반환합니다.
pub type PreferPredicate = Arc<dyn Fn(&dyn Conn) -> bool + Send + Sync>;

// ============================================================================
// PreferPolicy - 선호 정책
// ============================================================================

/// 선호 풀 분류 정책
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreferPolicy {
    /// 전체 연결을 선호 풀로 (무작위 선택)
    #[default]
    All,
    /// 드라이버와 같은 데이터센터의 연결 선호
    LocalDc,
    /// 지정한 로컬리티 목록 선호
    Locations(Vec<String>),
    /// 지정한 엔드포인트 목록 선호
    Endpoints(Vec<Endpoint>),
}

// ============================================================================
// BalancerConfig - 밸런서 설정
// ============================================================================

/// 밸런서 설정
#[derive(Debug, Clone, Default)]
pub struct BalancerConfig {
    /// 선호 정책
    policy: PreferPolicy,
    /// 선호 풀이 비었을 때 폴백 풀 사용 허용 여부
    allow_fallback: bool,
}

impl BalancerConfig {
    /// 전체 연결에서 무작위 선택
    pub fn random_choice() -> Self {
        Self {
            policy: PreferPolicy::All,
            allow_fallback: false,
        }
    }

    /// 로컬 데이터센터 선호 (폴백 없음)
    ///
    /// 엄격한 로컬리티: 비선호 연결은 스냅샷에서 완전히 제외됩니다.
    pub fn prefer_local_dc(mut self) -> Self {
        self.policy = PreferPolicy::LocalDc;
        self
    }

    /// 로컬 데이터센터 선호 + 폴백 허용
    pub fn prefer_local_dc_with_fallback(mut self) -> Self {
        self.policy = PreferPolicy::LocalDc;
        self.allow_fallback = true;
        self
    }

    /// 지정 로컬리티 선호
    pub fn prefer_locations(mut self, locations: Vec<String>) -> Self {
        self.policy = PreferPolicy::Locations(locations);
        self
    }

    /// 지정 엔드포인트 선호
    pub fn prefer_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.policy = PreferPolicy::Endpoints(endpoints);
        self
    }

    /// 폴백 허용 여부 설정
    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    /// 선호 정책 조회
    pub fn policy(&self) -> &PreferPolicy {
        &self.policy
    }

    /// 폴백 허용 여부
    pub fn allow_fallback(&self) -> bool {
        self.allow_fallback
    }

    /// 정책을 술어로 변환
    ///
    /// `local_location`은 드라이버 자신의 로컬리티 태그입니다.
    /// `All` 정책은 술어 없음(전체 선호)으로 표현됩니다.
    pub fn predicate(&self, local_location: &str) -> Option<PreferPredicate> {
        match &self.policy {
            PreferPolicy::All => None,
            PreferPolicy::LocalDc => {
                let local = local_location.to_string();
                Some(Arc::new(move |c: &dyn Conn| {
                    c.endpoint().location().eq_ignore_ascii_case(&local)
                }))
            }
            PreferPolicy::Locations(locations) => {
                let locations = locations.clone();
                Some(Arc::new(move |c: &dyn Conn| {
                    let endpoint = c.endpoint();
                    locations
                        .iter()
                        .any(|l| endpoint.location().eq_ignore_ascii_case(l))
                }))
            }
            PreferPolicy::Endpoints(endpoints) => {
                let endpoints = endpoints.clone();
                Some(Arc::new(move |c: &dyn Conn| {
                    let endpoint = c.endpoint();
                    endpoints.iter().any(|e| {
                        e.node_id() == endpoint.node_id() && e.address() == endpoint.address()
                    })
                }))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
