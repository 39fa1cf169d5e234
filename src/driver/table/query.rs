//! Query
//!
//! 쿼리와 템플릿 렌더링
//!
//! 서비스 쿼리는 테이블 경로 프리픽스를 템플릿 변수로 받습니다.
//! `{{ table_path_prefix }}` 자리 표시자가 설정된 프리픽스로 치환됩니다.

use std::collections::HashMap;

use super::types::Value;

/// 템플릿 자리 표시자
const TABLE_PATH_PREFIX_VAR: &str = "{{ table_path_prefix }}";

// ============================================================================
// TemplateConfig - 템플릿 설정
// ============================================================================

/// 쿼리 템플릿 설정
#[derive(Debug, Clone, Default)]
pub struct TemplateConfig {
    /// 테이블 경로 프리픽스
    pub table_path_prefix: String,
}

impl TemplateConfig {
    /// 새 템플릿 설정 생성
    pub fn new(table_path_prefix: impl Into<String>) -> Self {
        Self {
            table_path_prefix: table_path_prefix.into(),
        }
    }
}

/// 템플릿 렌더링
pub fn render(template: &str, config: &TemplateConfig) -> String {
    template.replace(TABLE_PATH_PREFIX_VAR, &config.table_path_prefix)
}

// ============================================================================
// Query - 쿼리
// ============================================================================

/// 쿼리
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// 쿼리 텍스트
    text: String,
}

impl Query {
    /// 새 쿼리 생성
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 템플릿에서 쿼리 생성
    pub fn from_template(template: &str, config: &TemplateConfig) -> Self {
        Self {
            text: render(template, config),
        }
    }

    /// 쿼리 텍스트
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

// ============================================================================
// QueryParameters - 쿼리 파라미터
// ============================================================================

/// 쿼리 파라미터
///
/// `$name` 형식의 선언 이름을 타입 있는 값에 매핑합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    params: HashMap<String, Value>,
}

impl QueryParameters {
    /// 빈 파라미터 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 파라미터 삽입
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.params.insert(name.into(), value);
    }

    /// 파라미터 추가 (빌더)
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// 파라미터 조회
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// 파라미터 수
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_prefix() {
        let template = r#"
            PRAGMA TablePathPrefix("{{ table_path_prefix }}");
            SELECT series_id, title FROM series;
        "#;
        let rendered = render(template, &TemplateConfig::new("/local/series"));

        assert!(rendered.contains(r#"PRAGMA TablePathPrefix("/local/series");"#));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_render_without_placeholder() {
        let text = "SELECT 1;";
        assert_eq!(render(text, &TemplateConfig::new("/local")), text);
    }

    #[test]
    fn test_query_from_template() {
        let query = Query::from_template(
            r#"PRAGMA TablePathPrefix("{{ table_path_prefix }}"); SELECT 1;"#,
            &TemplateConfig::new("/local"),
        );
        assert_eq!(
            query.text(),
            r#"PRAGMA TablePathPrefix("/local"); SELECT 1;"#
        );
    }

    #[test]
    fn test_query_parameters() {
        let params = QueryParameters::new()
            .with_param("$seriesID", 1u64)
            .with_param("$title", "IT Crowd");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("$seriesID"), Some(&Value::Uint64(1)));
        assert_eq!(params.get("$missing"), None);
    }

    #[test]
    fn test_query_parameters_empty() {
        let params = QueryParameters::new();
        assert!(params.is_empty());
    }

    #[test]
    fn test_params_macro() {
        let params = crate::params!(
            "$seriesID" => 1u64,
            "$title" => "IT Crowd",
        );

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("$seriesID"), Some(&Value::Uint64(1)));
        assert_eq!(params.get("$title"), Some(&Value::Utf8("IT Crowd".to_string())));

        let empty = crate::params!();
        assert!(empty.is_empty());
    }
}
