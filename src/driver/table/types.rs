//! Table Value Types
//!
//! 테이블 값 타입 정의

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Value - 테이블 값
// ============================================================================

/// 테이블 값
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Bool
    Bool(bool),
    /// Int32
    Int32(i32),
    /// Uint32
    Uint32(u32),
    /// Int64
    Int64(i64),
    /// Uint64
    Uint64(u64),
    /// Float (f32)
    Float(f32),
    /// Double (f64)
    Double(f64),
    /// UTF-8 문자열
    Utf8(String),
    /// 바이트열
    Bytes(Vec<u8>),
    /// 날짜
    Date(NaiveDate),
    /// 옵셔널 값
    Optional(Option<Box<Value>>),
    /// 리스트
    List(Vec<Value>),
    /// 구조체 (필드 순서 유지)
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// 옵셔널 값 생성
    pub fn optional(value: Option<Value>) -> Self {
        Self::Optional(value.map(Box::new))
    }

    /// 리스트 값 생성
    pub fn list(values: Vec<Value>) -> Self {
        Self::List(values)
    }

    /// 구조체 값 생성
    pub fn struct_value<S: Into<String>>(fields: Vec<(S, Value)>) -> Self {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Bool로 변환
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Uint32로 변환
    pub fn as_uint32(&self) -> Option<u32> {
        match self {
            Value::Uint32(v) => Some(*v),
            _ => None,
        }
    }

    /// Int64로 변환
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Uint64로 변환
    pub fn as_uint64(&self) -> Option<u64> {
        match self {
            Value::Uint32(v) => Some(*v as u64),
            Value::Uint64(v) => Some(*v),
            _ => None,
        }
    }

    /// Double로 변환
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// 문자열로 변환
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// 바이트열로 변환
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// 날짜로 변환
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// 옵셔널 내부 값으로 변환
    ///
    /// 옵셔널이 아닌 값은 그대로 `Some`으로 취급합니다.
    pub fn as_optional(&self) -> Option<&Value> {
        match self {
            Value::Optional(inner) => inner.as_deref(),
            other => Some(other),
        }
    }

    /// 리스트로 변환
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// 구조체 필드 조회
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

// ============================================================================
// ValueType - 값 타입
// ============================================================================

/// 컬럼/파라미터 타입
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Bool
    Bool,
    /// Int32
    Int32,
    /// Uint32
    Uint32,
    /// Int64
    Int64,
    /// Uint64
    Uint64,
    /// Float
    Float,
    /// Double
    Double,
    /// UTF-8 문자열
    Utf8,
    /// 바이트열
    Bytes,
    /// 날짜
    Date,
    /// 옵셔널
    Optional(Box<ValueType>),
    /// 리스트
    List(Box<ValueType>),
}

impl ValueType {
    /// 옵셔널 타입 생성
    pub fn optional(inner: ValueType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// 리스트 타입 생성
    pub fn list(inner: ValueType) -> Self {
        Self::List(Box::new(inner))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("Bool"),
            Self::Int32 => f.write_str("Int32"),
            Self::Uint32 => f.write_str("Uint32"),
            Self::Int64 => f.write_str("Int64"),
            Self::Uint64 => f.write_str("Uint64"),
            Self::Float => f.write_str("Float"),
            Self::Double => f.write_str("Double"),
            Self::Utf8 => f.write_str("Utf8"),
            Self::Bytes => f.write_str("Bytes"),
            Self::Date => f.write_str("Date"),
            Self::Optional(inner) => write!(f, "Optional<{}>", inner),
            Self::List(inner) => write!(f, "List<{}>", inner),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
