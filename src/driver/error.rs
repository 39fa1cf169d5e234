//! Driver Error Types
//!
//! 드라이버 에러 정의

use std::fmt;
use std::io;

use thiserror::Error;

// ============================================================================
// TransportErrorCode - 전송 에러 코드
// ============================================================================

/// 전송 계층 에러 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorCode {
    /// 취소됨
    Canceled,
    /// 알 수 없음
    Unknown,
    /// 데드라인 초과
    DeadlineExceeded,
    /// 리소스 고갈
    ResourceExhausted,
    /// 미구현
    Unimplemented,
    /// 사용 불가
    Unavailable,
}

impl TransportErrorCode {
    /// 재시도 가능 여부
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::DeadlineExceeded | Self::ResourceExhausted | Self::Unavailable
        )
    }
}

impl fmt::Display for TransportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Canceled => "CANCELED",
            Self::Unknown => "UNKNOWN",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Unavailable => "UNAVAILABLE",
        };
        f.write_str(s)
    }
}

// ============================================================================
// StatusCode - 작업 상태 코드
// ============================================================================

/// 서버 작업 상태 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 잘못된 요청
    BadRequest,
    /// 권한 없음
    Unauthorized,
    /// 스키마 에러
    SchemeError,
    /// 내부 에러
    InternalError,
    /// 과부하
    Overloaded,
    /// 사용 불가
    Unavailable,
    /// 타임아웃
    Timeout,
    /// 선행 조건 실패
    PreconditionFailed,
    /// 이미 존재함
    AlreadyExists,
    /// 찾을 수 없음
    NotFound,
    /// 세션 만료
    SessionExpired,
    /// 취소됨
    Cancelled,
}

impl StatusCode {
    /// 재시도 가능 여부
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Overloaded | Self::Unavailable | Self::SessionExpired
        )
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::SchemeError => "SCHEME_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Overloaded => "OVERLOADED",
            Self::Unavailable => "UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::PreconditionFailed => "PRECONDITION_FAILED",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

// ============================================================================
// DriverError - 드라이버 에러
// ============================================================================

/// 드라이버 에러
#[derive(Error, Debug)]
pub enum DriverError {
    /// 전송 에러
    #[error("Transport error: {code} - {message}")]
    Transport {
        code: TransportErrorCode,
        message: String,
    },

    /// 작업 에러
    #[error("Operation error: {status} - {message}")]
    Operation {
        status: StatusCode,
        message: String,
    },

    /// 사용 가능한 엔드포인트 없음
    #[error("No endpoints available")]
    NoEndpoints,

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 세션 에러
    #[error("Session error: {0}")]
    Session(String),

    /// 프로토콜 에러
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// 타임아웃 에러
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 타입 변환 에러
    #[error("Type conversion error: {0}")]
    TypeConversion(String),

    /// I/O 에러
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DriverError {
    /// 전송 에러 생성
    pub fn transport(code: TransportErrorCode, message: impl Into<String>) -> Self {
        Self::Transport {
            code,
            message: message.into(),
        }
    }

    /// 작업 에러 생성
    pub fn operation(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Operation {
            status,
            message: message.into(),
        }
    }

    /// 설정 에러 생성
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 세션 에러 생성
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// 프로토콜 에러 생성
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// 타임아웃 에러 생성
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// 타입 변환 에러 생성
    pub fn type_conversion(msg: impl Into<String>) -> Self {
        Self::TypeConversion(msg.into())
    }

    /// 전송 에러 코드 조회
    pub fn transport_code(&self) -> Option<TransportErrorCode> {
        match self {
            Self::Transport { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// 작업 상태 코드 조회
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Operation { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 재시도 가능 여부
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { code, .. } => code.is_retryable(),
            Self::Operation { status, .. } => status.is_retryable(),
            Self::NoEndpoints | Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// 비멱등 호출에서도 재시도해도 안전한지 여부
    ///
    /// 요청이 실행되지 않았음이 확실한 에러만 해당합니다: 연결 자체가
    /// 없었거나, 서버가 실행 전에 거부한 경우입니다.
    pub fn is_retryable_non_idempotent(&self) -> bool {
        matches!(self, Self::NoEndpoints)
            || matches!(
                self,
                Self::Operation {
                    status: StatusCode::Overloaded | StatusCode::SessionExpired,
                    ..
                }
            )
    }

    /// 클라이언트 에러 여부
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::TypeConversion(_) | Self::Protocol(_)
        ) || matches!(
            self,
            Self::Operation {
                status: StatusCode::BadRequest | StatusCode::Unauthorized | StatusCode::SchemeError,
                ..
            }
        )
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// 드라이버 결과 타입
pub type DriverResult<T> = Result<T, DriverError>;

// ============================================================================
// Tests
// ============================================================================
