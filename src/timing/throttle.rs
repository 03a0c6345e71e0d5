use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::{lock, Callback, TimerSlot};

/// 前回の実行から`delay`以上経っていれば即座に実行し、そうでなければ
/// 残り時間の後に最新の引数で1回だけ実行するラッパー
///
/// 末尾の実行が保留されている間の呼び出しは、その1回にまとめられる。
pub struct Throttled<A> {
    shared: Arc<ThrottleShared<A>>,
}

struct ThrottleShared<A> {
    callback: Callback<A>,
    delay: Duration,
    state: Mutex<ThrottleState<A>>,
}

struct ThrottleState<A> {
    last_run: Option<Instant>,
    trailing: Option<A>,
    timer: TimerSlot,
}

/// `callback`を[`Throttled`]で包む
pub fn throttle<A, F>(callback: F, delay: Duration) -> Throttled<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Throttled {
        shared: Arc::new(ThrottleShared {
            callback: Arc::new(callback),
            delay,
            state: Mutex::new(ThrottleState {
                last_run: None,
                trailing: None,
                timer: TimerSlot::default(),
            }),
        }),
    }
}

impl<A: Send + 'static> Throttled<A> {
    pub fn call(&self, args: A) {
        let now = Instant::now();
        let mut state = lock(&self.shared.state);

        let remaining = match state.last_run {
            Some(last) => self.shared.delay.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        };

        if remaining.is_zero() {
            // 古い末尾実行は今回の実行で置き換わる
            state.timer.cancel();
            state.trailing = None;
            state.last_run = Some(now);
            drop(state);
            (self.shared.callback)(args);
            return;
        }

        state.trailing = Some(args);
        if state.timer.is_pending() {
            tracing::trace!("保留中の末尾実行にまとめる");
            return;
        }

        let generation = state.timer.reset();
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let args = {
                let mut state = lock(&shared.state);
                if !state.timer.settle(generation) {
                    return;
                }
                state.last_run = Some(Instant::now());
                state.trailing.take()
            };
            if let Some(args) = args {
                (shared.callback)(args);
            }
        });
        state.timer.arm(handle);
    }

    /// 保留中の末尾実行を取り消す
    pub fn cancel(&self) {
        let mut state = lock(&self.shared.state);
        state.timer.cancel();
        state.trailing = None;
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.shared.state).timer.is_pending()
    }
}

impl<A> Clone for Throttled<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// 前回の実行から`delay`以上経っていれば即座に実行し、そうでなければ破棄するラッパー
///
/// 末尾の実行は行わないので、タイマーもランタイムも必要としない。
pub struct SimpleThrottled<A> {
    shared: Arc<SimpleShared<A>>,
}

struct SimpleShared<A> {
    callback: Callback<A>,
    delay: Duration,
    last_run: Mutex<Option<Instant>>,
}

/// `callback`を[`SimpleThrottled`]で包む
pub fn simple_throttle<A, F>(callback: F, delay: Duration) -> SimpleThrottled<A>
where
    F: Fn(A) + Send + Sync + 'static,
{
    SimpleThrottled {
        shared: Arc::new(SimpleShared {
            callback: Arc::new(callback),
            delay,
            last_run: Mutex::new(None),
        }),
    }
}

impl<A> SimpleThrottled<A> {
    pub fn call(&self, args: A) {
        let now = Instant::now();
        {
            let mut last_run = lock(&self.shared.last_run);
            if let Some(last) = *last_run {
                if now.duration_since(last) < self.shared.delay {
                    tracing::trace!("間隔内の呼び出しを破棄");
                    return;
                }
            }
            *last_run = Some(now);
        }
        (self.shared.callback)(args);
    }
}

impl<A> Clone for SimpleThrottled<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
