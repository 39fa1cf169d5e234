//! Retry Policy
//!
//! 재시도 정책
//!
//! 일시적 에러에 대한 재시도 루프입니다. 비멱등 호출은 요청이
//! 실행되지 않았음이 확실한 경우에만 재시도합니다.

use std::future::Future;
use std::time::{Duration, Instant};

use super::error::{DriverError, DriverResult};

// ============================================================================
// RetryPolicy - 재시도 정책
// ============================================================================

/// 재시도 정책
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 전체 재시도 허용 시간
    pub max_retry_time: Duration,
    /// 시도당 지연 단위
    pub delay_step: Duration,
    /// 지연 상한
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retry_time: Duration::from_secs(30),
            delay_step: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// 재시도 없는 정책
    pub fn no_retry() -> Self {
        Self {
            max_retry_time: Duration::ZERO,
            ..Self::default()
        }
    }

    /// 시도 횟수에 따른 대기 시간
    fn delay(&self, attempts: u32) -> Duration {
        std::cmp::min(self.delay_step * attempts, self.max_delay)
    }

    /// 작업을 재시도 포함 실행
    ///
    /// `idempotent`가 false이면 요청이 실행되지 않았음이 확실한 에러만
    /// 재시도합니다.
    pub async fn retry<F, Fut, T>(&self, idempotent: bool, mut work: F) -> DriverResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DriverResult<T>>,
    {
        let start = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            match work().await {
                Ok(result) => return Ok(result),
                Err(e) if self.should_retry(&e, idempotent) && start.elapsed() < self.max_retry_time => {
                    let delay = self.delay(attempts);
                    tracing::warn!(attempts, error = %e, "retrying after transient error");
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn should_retry(&self, error: &DriverError, idempotent: bool) -> bool {
        if idempotent {
            error.is_retryable()
        } else {
            error.is_retryable_non_idempotent()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
