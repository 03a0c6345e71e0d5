//! 呼び出し頻度の制御
//!
//! コールバックを包み、呼び出しを遅延・間引きするラッパー群。
//! 状態（保留中のタイマー、最終実行時刻）はラッパーのインスタンスごとに持つ。
//! 遅延実行は`tokio`のタイマーで行うため、`debounce`・`throttle`・
//! `debounce_immediate`はTokioランタイム上で呼び出す必要がある。
//!
//! | ラッパー              | 先頭で実行 | 末尾で実行 | 間引いた呼び出し           |
//! |-----------------------|------------|------------|----------------------------|
//! | [`debounce`]          | しない     | する       | 最後の引数で1回だけ実行    |
//! | [`throttle`]          | する       | する       | 最新の引数を末尾で1回実行  |
//! | [`debounce_immediate`]| する       | する       | 最後の引数で1回だけ実行    |
//! | [`simple_throttle`]   | する       | しない     | 破棄                       |

mod debounce;
mod throttle;

pub use debounce::{debounce, debounce_immediate, Debounced, ImmediateDebounced};
pub use throttle::{simple_throttle, throttle, SimpleThrottled, Throttled};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

pub(crate) type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// ラッパー1つにつき高々1つの保留タイマー
///
/// 世代番号で古いタイマーの発火を無効化する。中断済みのタスクが
/// 既に起床していても、世代が一致しなければ何もしない。
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    /// 保留中のタイマーを破棄する
    pub(crate) fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// 保留中のタイマーを破棄し、次に登録するタイマーの世代番号を返す
    pub(crate) fn reset(&mut self) -> u64 {
        self.cancel();
        self.generation
    }

    pub(crate) fn arm(&mut self, handle: JoinHandle<()>) {
        self.handle = Some(handle);
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// 発火したタイマーが現行世代なら保留を解除して`true`を返す
    pub(crate) fn settle(&mut self, generation: u64) -> bool {
        if self.generation == generation && self.handle.is_some() {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::{sleep_until, Instant};

    pub(crate) type Log = Arc<Mutex<Vec<(u64, u32)>>>;

    /// 呼び出し時刻（開始からのミリ秒）と引数を記録するコールバック
    pub(crate) fn recorder(start: Instant) -> (Log, impl Fn(u32) + Send + Sync + 'static) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let callback = move |arg: u32| {
            let at = start.elapsed().as_millis() as u64;
            sink.lock().unwrap().push((at, arg));
        };
        (log, callback)
    }

    pub(crate) fn args_of(log: &Log) -> Vec<u32> {
        log.lock().unwrap().iter().map(|(_, arg)| *arg).collect()
    }

    /// 実行時刻と引数を確認する（タイマーの丸めで1ms遅れるのは許容）
    pub(crate) fn assert_fired_at(log: &Log, expected: &[(u64, u32)]) {
        let fired = log.lock().unwrap().clone();
        assert_eq!(fired.len(), expected.len(), "実行回数が異なる: {:?}", fired);
        for ((at, arg), (want_at, want_arg)) in fired.iter().zip(expected) {
            assert_eq!(arg, want_arg, "引数が異なる: {:?}", fired);
            assert!(
                *at >= *want_at && *at <= want_at + 1,
                "実行時刻が異なる: {:?}",
                fired
            );
        }
    }

    pub(crate) async fn at(start: Instant, millis: u64) {
        sleep_until(start + Duration::from_millis(millis)).await;
    }
}
