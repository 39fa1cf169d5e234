//! Connection Contract
//!
//! 연결 계약 정의
//!
//! 라우터는 연결의 엔드포인트와 상태만 읽습니다. 실제 전송 계층은
//! [`Conn::call`] 경계 뒤에 있으며, 이 크레이트는 다이얼링을 수행하지
//! 않습니다.

use std::sync::Arc;

use futures::future::BoxFuture;

use super::coordination::NodeConfig;
use super::endpoint::Endpoint;
use super::error::DriverResult;
use super::ratelimiter::Resource;
use super::table::options::{ReadTableOptions, TableDescription, TableOptions, TableOptionsDescription, TxControl};
use super::table::query::{Query, QueryParameters};
use super::table::result::{QueryStats, ResultSet, RowStream};

// ============================================================================
// ConnState - 연결 상태
// ============================================================================

/// 연결 상태
///
/// 상태는 동시적으로 변할 수 있으며, 라우터는 읽기 시점의 값을
/// 최선 노력으로 취급합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnState {
    /// 생성됨 (아직 검증 전)
    Created,
    /// 온라인
    Online,
    /// 오프라인 (재연결 대상)
    Offline,
    /// 차단됨 (최후 수단으로만 사용)
    Banned,
    /// 알 수 없음
    Unknown,
}

impl ConnState {
    /// 사용 가능 여부
    ///
    /// `banned_ok`가 true이면 `Banned` 상태도 사용 가능으로 취급합니다.
    pub fn is_usable(self, banned_ok: bool) -> bool {
        match self {
            Self::Online | Self::Created | Self::Offline => true,
            Self::Banned => banned_ok,
            Self::Unknown => false,
        }
    }
}

// ============================================================================
// Conn - 연결 핸들
// ============================================================================

/// 클러스터 노드에 대한 연결 핸들
///
/// 라우터가 소비하는 관측 가능한 계약은 [`Conn::endpoint`]와
/// [`Conn::state`] 뿐입니다. 상태 승격/강등 결정은 연결 계층의 소관입니다.
pub trait Conn: Send + Sync {
    /// 연결의 엔드포인트 (연결 수명 동안 불변)
    fn endpoint(&self) -> Endpoint;

    /// 현재 상태 (호출 간 변할 수 있음)
    fn state(&self) -> ConnState;

    /// RPC 호출
    fn call(&self, request: Request) -> BoxFuture<'_, DriverResult<Response>>;
}

/// 공유 연결 핸들
pub type ConnRef = Arc<dyn Conn>;

// ============================================================================
// Request - 요청
// ============================================================================

/// 서비스 요청
#[derive(Debug, Clone)]
pub enum Request {
    /// 데이터 쿼리 실행
    ExecuteQuery {
        tx: TxControl,
        query: Query,
        params: QueryParameters,
    },
    /// 쿼리 준비
    Prepare { text: String },
    /// 준비된 쿼리 실행
    ExecutePrepared {
        query_id: String,
        tx: TxControl,
        params: QueryParameters,
    },
    /// 테이블 스트림 읽기
    StreamReadTable {
        path: String,
        options: ReadTableOptions,
    },
    /// 스캔 쿼리 스트림 실행
    StreamScanQuery {
        query: Query,
        params: QueryParameters,
    },
    /// 테이블 생성
    CreateTable {
        path: String,
        options: TableOptions,
    },
    /// 테이블 삭제
    DropTable { path: String },
    /// 테이블 설명 조회
    DescribeTable { path: String },
    /// 테이블 옵션 프리셋 조회
    DescribeTableOptions,
    /// 레이트리미터 리소스 생성
    CreateResource {
        coordination_path: String,
        resource: Resource,
    },
    /// 레이트리미터 리소스 변경
    AlterResource {
        coordination_path: String,
        resource: Resource,
    },
    /// 레이트리미터 리소스 삭제
    DropResource {
        coordination_path: String,
        resource_path: String,
    },
    /// 레이트리미터 리소스 목록 조회
    ListResources {
        coordination_path: String,
        prefix: String,
        recursive: bool,
    },
    /// 레이트리미터 리소스 설명 조회
    DescribeResource {
        coordination_path: String,
        resource_path: String,
    },
    /// 레이트리미터 유닛 획득
    AcquireResource {
        coordination_path: String,
        resource_path: String,
        amount: u64,
        is_used_amount: bool,
    },
    /// 코디네이션 노드 생성
    CreateNode { path: String, config: NodeConfig },
    /// 코디네이션 노드 변경
    AlterNode { path: String, config: NodeConfig },
    /// 코디네이션 노드 삭제
    DropNode { path: String },
    /// 코디네이션 노드 설명 조회
    DescribeNode { path: String },
}

// ============================================================================
// Response - 응답
// ============================================================================

/// 서비스 응답
#[derive(Debug)]
pub enum Response {
    /// 쿼리 실행 결과
    Executed {
        tx_id: Option<String>,
        result_sets: Vec<ResultSet>,
        stats: Option<QueryStats>,
    },
    /// 준비된 쿼리 ID
    Prepared { query_id: String },
    /// 결과 스트림
    Stream(RowStream),
    /// 테이블 설명
    TableDescription(TableDescription),
    /// 테이블 옵션 프리셋
    TableOptionsDescription(TableOptionsDescription),
    /// 리소스 설명
    ResourceDescription(Resource),
    /// 리소스 경로 목록
    ResourceList(Vec<String>),
    /// 노드 설명
    NodeDescription(NodeConfig),
    /// 반환값 없는 확인 응답
    Done,
}
