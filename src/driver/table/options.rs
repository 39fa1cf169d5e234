//! Table Options
//!
//! 트랜잭션 제어와 테이블 옵션

use serde::{Deserialize, Serialize};

use super::types::ValueType;

// ============================================================================
// TxControl - 트랜잭션 제어
// ============================================================================

/// 트랜잭션 격리 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxMode {
    /// 직렬화 가능한 읽기/쓰기
    #[default]
    SerializableReadWrite,
    /// 온라인 읽기 전용
    OnlineReadOnly,
    /// 스테일 읽기 전용
    StaleReadOnly,
}

/// 트랜잭션 제어
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxControl {
    /// 격리 모드
    mode: TxMode,
    /// 실행 후 커밋 여부
    commit: bool,
}

impl TxControl {
    /// 직렬화 가능한 읽기/쓰기 트랜잭션
    pub fn serializable_rw() -> Self {
        Self {
            mode: TxMode::SerializableReadWrite,
            commit: false,
        }
    }

    /// 온라인 읽기 전용 트랜잭션
    pub fn online_ro() -> Self {
        Self {
            mode: TxMode::OnlineReadOnly,
            commit: false,
        }
    }

    /// 스테일 읽기 전용 트랜잭션
    pub fn stale_ro() -> Self {
        Self {
            mode: TxMode::StaleReadOnly,
            commit: false,
        }
    }

    /// 실행 후 커밋
    pub fn with_commit(mut self) -> Self {
        self.commit = true;
        self
    }

    /// 격리 모드
    pub fn mode(&self) -> TxMode {
        self.mode
    }

    /// 커밋 여부
    pub fn is_commit(&self) -> bool {
        self.commit
    }
}

impl Default for TxControl {
    fn default() -> Self {
        Self::serializable_rw().with_commit()
    }
}

// ============================================================================
// Column / TableOptions - 테이블 DDL 옵션
// ============================================================================

/// 테이블 컬럼
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// 컬럼 이름
    pub name: String,
    /// 컬럼 타입
    pub value_type: ValueType,
}

/// 테이블 생성 옵션
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOptions {
    /// 컬럼 목록
    pub columns: Vec<Column>,
    /// 기본 키 컬럼
    pub primary_key: Vec<String>,
}

impl TableOptions {
    /// 빈 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 컬럼 추가
    pub fn with_column(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.columns.push(Column {
            name: name.into(),
            value_type,
        });
        self
    }

    /// 기본 키 컬럼 추가
    pub fn with_primary_key_column(mut self, name: impl Into<String>) -> Self {
        self.primary_key.push(name.into());
        self
    }
}

// ============================================================================
// ReadTableOptions - 테이블 읽기 옵션
// ============================================================================

/// 테이블 스트림 읽기 옵션
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadTableOptions {
    /// 키 순서 보장 여부
    pub ordered: bool,
    /// 읽을 컬럼 (비어 있으면 전체)
    pub columns: Vec<String>,
    /// 행 수 제한
    pub row_limit: Option<u64>,
}

impl ReadTableOptions {
    /// 빈 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 키 순서 보장
    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    /// 읽을 컬럼 추가
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// 행 수 제한
    pub fn with_row_limit(mut self, limit: u64) -> Self {
        self.row_limit = Some(limit);
        self
    }
}

// ============================================================================
// TableDescription - 테이블 설명
// ============================================================================

/// 테이블 설명
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDescription {
    /// 테이블 경로
    pub path: String,
    /// 컬럼 목록
    pub columns: Vec<Column>,
    /// 기본 키 컬럼
    pub primary_key: Vec<String>,
}

/// 테이블 옵션 프리셋 설명
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOptionsDescription {
    /// 테이블 프로파일 프리셋
    pub table_profile_presets: Vec<String>,
    /// 스토리지 정책 프리셋
    pub storage_policy_presets: Vec<String>,
    /// 컴팩션 정책 프리셋
    pub compaction_policy_presets: Vec<String>,
    /// 파티셔닝 정책 프리셋
    pub partitioning_policy_presets: Vec<String>,
    /// 실행 정책 프리셋
    pub execution_policy_presets: Vec<String>,
    /// 복제 정책 프리셋
    pub replication_policy_presets: Vec<String>,
    /// 캐싱 정책 프리셋
    pub caching_policy_presets: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_control() {
        let tx = TxControl::online_ro().with_commit();
        assert_eq!(tx.mode(), TxMode::OnlineReadOnly);
        assert!(tx.is_commit());

        let tx = TxControl::serializable_rw();
        assert_eq!(tx.mode(), TxMode::SerializableReadWrite);
        assert!(!tx.is_commit());
    }

    #[test]
    fn test_tx_control_default() {
        let tx = TxControl::default();
        assert_eq!(tx.mode(), TxMode::SerializableReadWrite);
        assert!(tx.is_commit());
    }

    #[test]
    fn test_table_options_builder() {
        let options = TableOptions::new()
            .with_column("series_id", ValueType::optional(ValueType::Uint64))
            .with_column("title", ValueType::optional(ValueType::Utf8))
            .with_primary_key_column("series_id");

        assert_eq!(options.columns.len(), 2);
        assert_eq!(options.columns[0].name, "series_id");
        assert_eq!(options.primary_key, vec!["series_id".to_string()]);
    }

    #[test]
    fn test_read_table_options() {
        let options = ReadTableOptions::new()
            .ordered()
            .with_column("series_id")
            .with_column("title")
            .with_row_limit(100);

        assert!(options.ordered);
        assert_eq!(options.columns.len(), 2);
        assert_eq!(options.row_limit, Some(100));
    }
}
