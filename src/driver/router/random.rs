//! Random Source
//!
//! 동시성 안전 난수 소스
//!
//! 셀렉터는 모든 아웃바운드 요청의 핫 패스에 있으므로, 호출별 상태
//! 할당 없이 재진입 가능해야 합니다.

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// RandomSource - 난수 소스
// ============================================================================

/// 뮤텍스로 감싼 균등 난수 생성기
///
/// 스냅샷 하나를 다수의 동시 호출자가 읽으므로 내부적으로 동기화됩니다.
pub struct RandomSource {
    rng: Mutex<SmallRng>,
}

impl RandomSource {
    /// 비결정적 시드로 생성
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// 고정 시드로 생성 (테스트용)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// `[0, n)` 범위의 균등 정수
    ///
    /// `n > 0` 이어야 합니다.
    pub fn int(&self, n: usize) -> usize {
        debug_assert!(n > 0);
        self.rng.lock().gen_range(0..n)
    }

    /// `[0, n)` 인덱스의 비편향 무작위 순열 (Fisher-Yates)
    ///
    /// 교환은 호출자가 제공하는 `swap(i, j)`로 수행됩니다.
    pub fn shuffle<F>(&self, n: usize, mut swap: F)
    where
        F: FnMut(usize, usize),
    {
        let mut rng = self.rng.lock();
        for i in (1..n).rev() {
            let j = rng.gen_range(0..=i);
            swap(i, j);
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource").finish()
    }
}
