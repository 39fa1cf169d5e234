//! Query Results
//!
//! 쿼리 결과와 스트림

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio_stream::StreamExt;

use super::super::error::{DriverError, DriverResult};
use super::types::Value;

// ============================================================================
// Row - 행
// ============================================================================

/// 결과 행
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 컬럼 이름
    columns: Vec<String>,
    /// 값
    values: Vec<Value>,
}

impl Row {
    /// 새 행 생성
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// 인덱스로 값 조회
    pub fn get(&self, index: usize) -> DriverResult<&Value> {
        self.values.get(index).ok_or_else(|| {
            DriverError::type_conversion(format!(
                "column index {} out of range ({} columns)",
                index,
                self.values.len()
            ))
        })
    }

    /// 컬럼 이름으로 값 조회
    pub fn get_by_name(&self, name: &str) -> DriverResult<&Value> {
        let index = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DriverError::type_conversion(format!("unknown column: {}", name)))?;
        self.get(index)
    }

    /// 컬럼 이름 목록
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 값 목록
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

// ============================================================================
// ResultSet - 결과 집합
// ============================================================================

/// 결과 집합
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// 컬럼 이름
    columns: Vec<String>,
    /// 행 목록
    rows: Vec<Row>,
}

impl ResultSet {
    /// 새 결과 집합 생성
    pub fn new(columns: Vec<String>, row_values: Vec<Vec<Value>>) -> Self {
        let rows = row_values
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect();
        Self { columns, rows }
    }

    /// 컬럼 이름 목록
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 행 수
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 행 순회
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

// ============================================================================
// QueryStats - 쿼리 통계
// ============================================================================

/// 테이블 접근 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessStats {
    /// 행 수
    pub rows: u64,
    /// 바이트 수
    pub bytes: u64,
}

/// 테이블별 접근 통계
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableAccess {
    /// 테이블 이름
    pub name: String,
    /// 읽기 통계
    pub reads: AccessStats,
    /// 쓰기 통계
    pub updates: AccessStats,
}

/// 쿼리 실행 단계 통계
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPhase {
    /// 단계 소요 시간
    pub duration: Duration,
    /// 접근한 테이블
    pub table_access: Vec<TableAccess>,
}

/// 쿼리 통계
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStats {
    /// 실행 단계
    pub phases: Vec<QueryPhase>,
}

impl QueryStats {
    /// 단계 순회
    pub fn phases(&self) -> impl Iterator<Item = &QueryPhase> {
        self.phases.iter()
    }

    /// 전체 소요 시간
    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

// ============================================================================
// QueryResult - 쿼리 실행 결과
// ============================================================================

/// 쿼리 실행 결과
#[derive(Debug, Default)]
pub struct QueryResult {
    /// 트랜잭션 ID (비커밋 트랜잭션에서 후속 호출용)
    pub tx_id: Option<String>,
    /// 결과 집합
    pub result_sets: Vec<ResultSet>,
    /// 수집된 통계
    pub stats: Option<QueryStats>,
}

impl QueryResult {
    /// 첫 번째 결과 집합
    pub fn first_result_set(&self) -> Option<&ResultSet> {
        self.result_sets.first()
    }
}

// ============================================================================
// RowStream - 결과 스트림
// ============================================================================

/// 결과 집합 청크의 순서 있는 스트림
pub struct RowStream {
    inner: Pin<Box<dyn Stream<Item = DriverResult<ResultSet>> + Send>>,
}

impl RowStream {
    /// 스트림에서 생성
    pub fn new(stream: impl Stream<Item = DriverResult<ResultSet>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// 고정 결과 집합 목록에서 생성
    pub fn from_result_sets(sets: Vec<ResultSet>) -> Self {
        Self::new(tokio_stream::iter(sets.into_iter().map(Ok)))
    }

    /// 다음 결과 집합
    pub async fn next_result_set(&mut self) -> Option<DriverResult<ResultSet>> {
        self.inner.next().await
    }
}

impl Stream for RowStream {
    type Item = DriverResult<ResultSet>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for RowStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStream").finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
