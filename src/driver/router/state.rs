//! Connections State
//!
//! 연결 상태 스냅샷과 계층적 선택 알고리즘
//!
//! 스냅샷은 생성 후 불변이며, 교체는 전체 단위로만 일어납니다. 진행 중인
//! 호출자는 이미 보유한 스냅샷을 계속 사용합니다.

use std::collections::HashMap;

use super::super::balancer::PreferPredicate;
use super::super::conn::ConnRef;
use super::super::context::CallContext;
use super::random::RandomSource;

// ============================================================================
// ConnectionsState - 연결 스냅샷
// ============================================================================

/// 연결들의 불변 3분할 인덱스
///
/// `prefer` / `fallback` / `last_attempt` 풀과 노드 ID 조회 맵으로
/// 구성됩니다. 클러스터 상태가 변할 때마다 새로 만들어집니다.
pub struct ConnectionsState {
    /// 노드 ID → 연결 (ID 0 제외)
    by_node_id: HashMap<u32, ConnRef>,
    /// 선호 풀 (입력 순서 유지)
    prefer: Vec<ConnRef>,
    /// 폴백 풀 (폴백 비허용 시 비어 있음)
    fallback: Vec<ConnRef>,
    /// 최후 시도 풀
    last_attempt: Vec<ConnRef>,
    /// 선호 풀 크기
    prefer_count: usize,
}

impl ConnectionsState {
    /// 새 스냅샷 생성
    ///
    /// 입력을 한 번씩 순회하며 노드 ID 맵과 풀 분할을 구성합니다.
    /// 중복 노드 ID는 뒤의 항목이 앞의 항목을 덮어씁니다.
    pub fn new(
        conns: Vec<ConnRef>,
        prefer_func: Option<&PreferPredicate>,
        allow_fallback: bool,
    ) -> Self {
        let by_node_id = conns_to_node_id_map(&conns);
        let (prefer, fallback) = sort_prefer_connections(&conns, prefer_func, allow_fallback);
        let last_attempt = if allow_fallback {
            conns
        } else {
            prefer.clone()
        };
        let prefer_count = prefer.len();

        Self {
            by_node_id,
            prefer,
            fallback,
            last_attempt,
            prefer_count,
        }
    }

    /// 선호 풀 크기
    pub fn prefer_count(&self) -> usize {
        self.prefer_count
    }

    /// 폴백 풀 크기
    pub fn fallback_count(&self) -> usize {
        self.fallback.len()
    }

    /// 노드 ID로 식별된 연결 수
    pub fn known_node_count(&self) -> usize {
        self.by_node_id.len()
    }

    /// 고정 엔드포인트 연결 조회 (Tier 0)
    ///
    /// 고정 경로는 무작위 선택과 실패 카운팅을 모두 우회합니다.
    fn pinned_connection(&self, ctx: &CallContext) -> Option<ConnRef> {
        let endpoint = ctx.pinned_endpoint()?;
        let conn = self.by_node_id.get(&endpoint.node_id())?;
        if conn.state().is_usable(true) {
            return Some(conn.clone());
        }
        None
    }

    /// 계층적 연결 선택
    ///
    /// 반환된 `usize`는 상위 백오프 정책을 위한 비정상 프로브 횟수입니다.
    pub fn connection(&self, ctx: &CallContext, rand: &RandomSource) -> (Option<ConnRef>, usize) {
        if let Some(conn) = self.pinned_connection(ctx) {
            return (Some(conn), 0);
        }

        let mut failed_count = 0;

        // Tier 1: 선호 풀
        let (conn, tier_failed) = select_random(&self.prefer, rand, false);
        failed_count += tier_failed;
        if let Some(conn) = conn {
            return (Some(conn), failed_count);
        }

        // Tier 2: 폴백 풀
        let (conn, tier_failed) = select_random(&self.fallback, rand, false);
        failed_count += tier_failed;
        if let Some(conn) = conn {
            return (Some(conn), failed_count);
        }

        // Tier 3: 최후 시도 풀. 이 계층의 실패 수는 버립니다.
        let (conn, _) = select_random(&self.last_attempt, rand, true);
        (conn, failed_count)
    }
}

impl std::fmt::Debug for ConnectionsState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionsState")
            .field("prefer", &self.prefer.len())
            .field("fallback", &self.fallback.len())
            .field("last_attempt", &self.last_attempt.len())
            .field("known_nodes", &self.by_node_id.len())
            .finish()
    }
}

// ============================================================================
// 선택 알고리즘
// ============================================================================

/// 풀에서 사용 가능한 연결 하나를 무작위로 선택
///
/// 빠른 경로는 균등 프로브 한 번으로 끝나며 할당이 없습니다. 빠른
/// 경로가 빗나가면 셔플된 인덱스 전수 조사로 모든 연결을 한 번씩
/// 검사합니다. 빠른 경로 프로브의 실패는 세지 않으며, 전수 조사의
/// 비정상 프로브만 한 번씩 집계됩니다.
fn select_random(
    conns: &[ConnRef],
    rand: &RandomSource,
    allow_banned: bool,
) -> (Option<ConnRef>, usize) {
    let conn_count = conns.len();
    if conn_count == 0 {
        // 빈 풀은 난수 소스를 건드리지 않고 반환
        return (None, 0);
    }

    // 빠른 경로
    let probed = rand.int(conn_count);
    if conns[probed].state().is_usable(allow_banned) {
        return (Some(conns[probed].clone()), 0);
    }

    // 전수 조사: 셔플된 인덱스로 모든 연결을 한 번씩 검사
    let mut indexes: Vec<usize> = (0..conn_count).collect();
    rand.shuffle(conn_count, |i, j| indexes.swap(i, j));

    let mut failed_count = 0;
    for index in indexes {
        if conns[index].state().is_usable(allow_banned) {
            return (Some(conns[index].clone()), failed_count);
        }
        failed_count += 1;
    }

    (None, failed_count)
}

/// 노드 ID 조회 맵 구성
///
/// 노드 ID 0(미식별)은 제외합니다.
fn conns_to_node_id_map(conns: &[ConnRef]) -> HashMap<u32, ConnRef> {
    let mut map = HashMap::with_capacity(conns.len());
    for conn in conns {
        let node_id = conn.endpoint().node_id();
        if node_id == 0 {
            continue;
        }
        map.insert(node_id, conn.clone());
    }
    map
}

/// 선호/폴백 풀 분할
///
/// 술어가 없으면 전체가 선호 풀이 됩니다. 폴백 비허용 시 비선호
/// 연결은 완전히 버려집니다.
fn sort_prefer_connections(
    conns: &[ConnRef],
    prefer_func: Option<&PreferPredicate>,
    allow_fallback: bool,
) -> (Vec<ConnRef>, Vec<ConnRef>) {
    let prefer_func = match prefer_func {
        Some(f) => f,
        None => return (conns.to_vec(), Vec::new()),
    };

    let mut prefer = Vec::with_capacity(conns.len());
    let mut fallback = if allow_fallback {
        Vec::with_capacity(conns.len())
    } else {
        Vec::new()
    };

    for conn in conns {
        if prefer_func(conn.as_ref()) {
            prefer.push(conn.clone());
        } else if allow_fallback {
            fallback.push(conn.clone());
        }
    }

    (prefer, fallback)
}

// ============================================================================
// Tests
// ============================================================================
