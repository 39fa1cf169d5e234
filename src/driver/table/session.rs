//! Table Session
//!
//! 테이블 세션
//!
//! 세션은 시도 한 번 동안 라우터가 고른 연결 위에서 동작합니다.
//! 재시도는 [`TableClient`](super::TableClient)가 시도마다 새 세션으로
//! 수행합니다.

use std::time::Duration;

use super::super::conn::{ConnRef, Request, Response};
use super::super::endpoint::Endpoint;
use super::super::error::{DriverError, DriverResult};
use super::options::{ReadTableOptions, TableDescription, TableOptions, TableOptionsDescription, TxControl};
use super::query::{Query, QueryParameters};
use super::result::{QueryResult, RowStream};

// ============================================================================
// Session - 세션
// ============================================================================

/// 테이블 세션
pub struct Session {
    /// 이 세션이 사용하는 연결
    conn: ConnRef,
    /// 단건 요청 타임아웃
    request_timeout: Duration,
    /// 스트림 요청 타임아웃
    stream_timeout: Duration,
}

impl Session {
    /// 새 세션 생성
    pub(crate) fn new(conn: ConnRef, request_timeout: Duration, stream_timeout: Duration) -> Self {
        Self {
            conn,
            request_timeout,
            stream_timeout,
        }
    }

    /// 세션이 묶인 엔드포인트
    pub fn endpoint(&self) -> Endpoint {
        self.conn.endpoint()
    }

    /// 데이터 쿼리 실행
    pub async fn execute(
        &self,
        tx: TxControl,
        query: impl Into<Query>,
        params: QueryParameters,
    ) -> DriverResult<QueryResult> {
        let response = self
            .call(
                Request::ExecuteQuery {
                    tx,
                    query: query.into(),
                    params,
                },
                self.request_timeout,
            )
            .await?;

        match response {
            Response::Executed {
                tx_id,
                result_sets,
                stats,
            } => Ok(QueryResult {
                tx_id,
                result_sets,
                stats,
            }),
            other => Err(unexpected_response("ExecuteQuery", &other)),
        }
    }

    /// 쿼리 준비
    pub async fn prepare(&self, text: impl Into<String>) -> DriverResult<PreparedQuery<'_>> {
        let response = self
            .call(Request::Prepare { text: text.into() }, self.request_timeout)
            .await?;

        match response {
            Response::Prepared { query_id } => Ok(PreparedQuery {
                session: self,
                query_id,
            }),
            other => Err(unexpected_response("Prepare", &other)),
        }
    }

    /// 테이블 스트림 읽기
    pub async fn stream_read_table(
        &self,
        path: impl Into<String>,
        options: ReadTableOptions,
    ) -> DriverResult<RowStream> {
        let response = self
            .call(
                Request::StreamReadTable {
                    path: path.into(),
                    options,
                },
                self.stream_timeout,
            )
            .await?;

        match response {
            Response::Stream(stream) => Ok(stream),
            other => Err(unexpected_response("StreamReadTable", &other)),
        }
    }

    /// 스캔 쿼리 스트림 실행
    pub async fn stream_scan_query(
        &self,
        query: impl Into<Query>,
        params: QueryParameters,
    ) -> DriverResult<RowStream> {
        let response = self
            .call(
                Request::StreamScanQuery {
                    query: query.into(),
                    params,
                },
                self.stream_timeout,
            )
            .await?;

        match response {
            Response::Stream(stream) => Ok(stream),
            other => Err(unexpected_response("StreamScanQuery", &other)),
        }
    }

    /// 테이블 생성
    pub async fn create_table(
        &self,
        path: impl Into<String>,
        options: TableOptions,
    ) -> DriverResult<()> {
        let response = self
            .call(
                Request::CreateTable {
                    path: path.into(),
                    options,
                },
                self.request_timeout,
            )
            .await?;

        match response {
            Response::Done => Ok(()),
            other => Err(unexpected_response("CreateTable", &other)),
        }
    }

    /// 테이블 삭제
    pub async fn drop_table(&self, path: impl Into<String>) -> DriverResult<()> {
        let response = self
            .call(Request::DropTable { path: path.into() }, self.request_timeout)
            .await?;

        match response {
            Response::Done => Ok(()),
            other => Err(unexpected_response("DropTable", &other)),
        }
    }

    /// 테이블 설명 조회
    pub async fn describe_table(&self, path: impl Into<String>) -> DriverResult<TableDescription> {
        let response = self
            .call(Request::DescribeTable { path: path.into() }, self.request_timeout)
            .await?;

        match response {
            Response::TableDescription(description) => Ok(description),
            other => Err(unexpected_response("DescribeTable", &other)),
        }
    }

    /// 테이블 옵션 프리셋 조회
    pub async fn describe_table_options(&self) -> DriverResult<TableOptionsDescription> {
        let response = self
            .call(Request::DescribeTableOptions, self.request_timeout)
            .await?;

        match response {
            Response::TableOptionsDescription(description) => Ok(description),
            other => Err(unexpected_response("DescribeTableOptions", &other)),
        }
    }

    /// 타임아웃을 적용한 연결 호출
    async fn call(&self, request: Request, timeout: Duration) -> DriverResult<Response> {
        tokio::time::timeout(timeout, self.conn.call(request))
            .await
            .map_err(|_| DriverError::timeout("request deadline exceeded"))?
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.conn.endpoint())
            .finish()
    }
}

/// 예상 밖 응답 종류에 대한 프로토콜 에러
fn unexpected_response(operation: &str, response: &Response) -> DriverError {
    DriverError::protocol(format!(
        "unexpected response for {}: {:?}",
        operation, response
    ))
}

// ============================================================================
// PreparedQuery - 준비된 쿼리
// ============================================================================

/// 준비된 쿼리
///
/// 준비를 수행한 세션에 묶입니다.
pub struct PreparedQuery<'a> {
    session: &'a Session,
    query_id: String,
}

impl PreparedQuery<'_> {
    /// 서버가 부여한 쿼리 ID
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    /// 준비된 쿼리 실행
    pub async fn execute(&self, tx: TxControl, params: QueryParameters) -> DriverResult<QueryResult> {
        let response = self
            .session
            .call(
                Request::ExecutePrepared {
                    query_id: self.query_id.clone(),
                    tx,
                    params,
                },
                self.session.request_timeout,
            )
            .await?;

        match response {
            Response::Executed {
                tx_id,
                result_sets,
                stats,
            } => Ok(QueryResult {
                tx_id,
                result_sets,
                stats,
            }),
            other => Err(unexpected_response("ExecutePrepared", &other)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
