//! Driver Configuration
//!
//! 드라이버 설정

use std::time::Duration;

use super::balancer::BalancerConfig;
use super::error::{DriverError, DriverResult};

// ============================================================================
// Credentials - 자격 증명
// ============================================================================

/// 자격 증명
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// 익명
    #[default]
    Anonymous,
    /// 액세스 토큰
    AccessToken(String),
}

impl Credentials {
    /// 익명 자격 증명
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// 액세스 토큰 자격 증명
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(token.into())
    }
}

// ============================================================================
// DriverConfig - 드라이버 설정
// ============================================================================

/// 드라이버 설정
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// 초기 디스커버리 주소 (host:port)
    pub address: String,
    /// 데이터베이스 경로
    pub database: String,
    /// TLS 사용 여부
    pub secure: bool,
    /// 자격 증명
    pub credentials: Credentials,
    /// 드라이버 자신의 로컬리티 태그 (로컬 DC 선호용)
    pub location: String,
    /// 단건 요청 타임아웃
    pub request_timeout: Duration,
    /// 스트림 요청 타임아웃
    pub stream_timeout: Duration,
    /// 서버측 작업 타임아웃
    pub operation_timeout: Duration,
    /// 서버측 작업 취소 유예
    pub operation_cancel_after: Duration,
    /// 밸런서 설정
    pub balancer: BalancerConfig,
}

impl DriverConfig {
    /// 연결 문자열에서 설정 생성
    ///
    /// 형식: `strata://host:port/?database=/path` (TLS는 `strata+s://`)
    pub fn from_connection_string(dsn: &str) -> DriverResult<Self> {
        let secure = dsn.starts_with("strata+s://");
        let rest = dsn
            .trim_start_matches("strata+s://")
            .trim_start_matches("strata://");
        if rest.len() == dsn.len() {
            return Err(DriverError::configuration(format!(
                "unsupported scheme in connection string: {}",
                dsn
            )));
        }

        let (address, query) = match rest.split_once('?') {
            Some((head, query)) => (head.trim_end_matches('/'), query),
            None => (rest.trim_end_matches('/'), ""),
        };
        if address.is_empty() {
            return Err(DriverError::configuration("empty address in connection string"));
        }

        let mut database = String::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some(("database", value)) => database = value.to_string(),
                Some(_) | None => {
                    return Err(DriverError::configuration(format!(
                        "unknown connection string parameter: {}",
                        pair
                    )))
                }
            }
        }
        if database.is_empty() {
            return Err(DriverError::configuration(
                "connection string must carry a database parameter",
            ));
        }

        Ok(Self {
            address: address.to_string(),
            database,
            secure,
            ..Self::default()
        })
    }

    /// 빌더 시작
    pub fn builder(dsn: &str) -> DriverResult<DriverConfigBuilder> {
        let config = Self::from_connection_string(dsn)?;
        Ok(DriverConfigBuilder { config })
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            address: "localhost:2135".to_string(),
            database: "/local".to_string(),
            secure: false,
            credentials: Credentials::Anonymous,
            location: String::new(),
            request_timeout: Duration::from_secs(10),
            stream_timeout: Duration::from_secs(60),
            operation_timeout: Duration::from_secs(10),
            operation_cancel_after: Duration::from_secs(10),
            balancer: BalancerConfig::random_choice(),
        }
    }
}

// ============================================================================
// DriverConfigBuilder - 설정 빌더
// ============================================================================

/// 드라이버 설정 빌더
#[derive(Debug, Clone)]
pub struct DriverConfigBuilder {
    config: DriverConfig,
}

impl DriverConfigBuilder {
    /// 자격 증명 설정
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// 익명 자격 증명 설정
    pub fn with_anonymous_credentials(mut self) -> Self {
        self.config.credentials = Credentials::Anonymous;
        self
    }

    /// 로컬리티 태그 설정
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.config.location = location.into();
        self
    }

    /// 단건 요청 타임아웃 설정
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// 스트림 요청 타임아웃 설정
    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.config.stream_timeout = timeout;
        self
    }

    /// 서버측 작업 타임아웃 설정
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.config.operation_timeout = timeout;
        self
    }

    /// 서버측 작업 취소 유예 설정
    pub fn with_operation_cancel_after(mut self, timeout: Duration) -> Self {
        self.config.operation_cancel_after = timeout;
        self
    }

    /// 밸런서 설정
    pub fn with_balancer(mut self, balancer: BalancerConfig) -> Self {
        self.config.balancer = balancer;
        self
    }

    /// 빌드
    pub fn build(self) -> DriverConfig {
        self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
