//! Endpoint
//!
//! 클러스터 노드 식별자

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint - 엔드포인트
// ============================================================================

/// 클러스터 노드 엔드포인트
///
/// 노드 ID, 네트워크 주소, 로컬리티(데이터센터) 태그로 구성됩니다.
/// 노드 ID 0은 "미식별" 노드를 의미합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// 노드 ID (0 = 미식별)
    node_id: u32,
    /// 네트워크 주소 (host:port)
    address: String,
    /// 로컬리티 태그 (데이터센터)
    location: String,
}

impl Endpoint {
    /// 새 엔드포인트 생성
    pub fn new(node_id: u32, address: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            node_id,
            address: address.into(),
            location: location.into(),
        }
    }

    /// 노드 ID
    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    /// 네트워크 주소
    pub fn address(&self) -> &str {
        &self.address
    }

    /// 로컬리티 태그
    pub fn location(&self) -> &str {
        &self.location
    }

    /// 식별된 노드 여부
    pub fn has_node_id(&self) -> bool {
        self.node_id != 0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (node {})", self.address, self.node_id)
    }
}
