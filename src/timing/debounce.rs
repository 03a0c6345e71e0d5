use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{lock, Callback, TimerSlot};

/// 最後の呼び出しから`delay`経過後に1回だけ実行するラッパー
///
/// 新しい呼び出しは保留中の実行を引数ごと破棄し、タイマーを張り直す。
pub struct Debounced<A> {
    shared: Arc<DebounceShared<A>>,
}

struct DebounceShared<A> {
    callback: Callback<A>,
    delay: Duration,
    timer: Mutex<TimerSlot>,
}

/// `callback`を[`Debounced`]で包む
pub fn debounce<A, F>(callback: F, delay: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        shared: Arc::new(DebounceShared {
            callback: Arc::new(callback),
            delay,
            timer: Mutex::new(TimerSlot::default()),
        }),
    }
}

impl<A: Send + 'static> Debounced<A> {
    pub fn call(&self, args: A) {
        let mut timer = lock(&self.shared.timer);
        if timer.is_pending() {
            tracing::trace!("保留中の呼び出しを置き換え");
        }
        let generation = timer.reset();
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(shared.delay).await;
            let fire = lock(&shared.timer).settle(generation);
            if fire {
                (shared.callback)(args);
            }
        });
        timer.arm(handle);
    }

    /// 保留中の実行を取り消す
    pub fn cancel(&self) {
        lock(&self.shared.timer).cancel();
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.shared.timer).is_pending()
    }
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// 先頭の呼び出しを即座に実行し、続く呼び出しを末尾の1回にまとめるラッパー
///
/// 先頭実行から`delay`の間に呼び出しが無いか、末尾実行が終わると
/// 落ち着いた状態に戻り、次の呼び出しは再び即座に実行される。
pub struct ImmediateDebounced<A> {
    shared: Arc<ImmediateShared<A>>,
}

struct ImmediateShared<A> {
    callback: Callback<A>,
    delay: Duration,
    state: Mutex<ImmediateState>,
}

#[derive(Debug)]
struct ImmediateState {
    settled: bool,
    timer: TimerSlot,
}

/// `callback`を[`ImmediateDebounced`]で包む
pub fn debounce_immediate<A, F>(callback: F, delay: Duration) -> ImmediateDebounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    ImmediateDebounced {
        shared: Arc::new(ImmediateShared {
            callback: Arc::new(callback),
            delay,
            state: Mutex::new(ImmediateState {
                settled: true,
                timer: TimerSlot::default(),
            }),
        }),
    }
}

impl<A: Send + 'static> ImmediateDebounced<A> {
    pub fn call(&self, args: A) {
        let mut state = lock(&self.shared.state);
        if state.settled {
            state.settled = false;
            // 追加の呼び出しが無ければ`delay`後に落ち着く
            self.schedule(&mut state, None);
            drop(state);
            (self.shared.callback)(args);
            return;
        }
        tracing::trace!("末尾の実行にまとめる");
        self.schedule(&mut state, Some(args));
    }

    fn schedule(&self, state: &mut ImmediateState, trailing: Option<A>) {
        let generation = state.timer.reset();
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(shared.delay).await;
            let fire = {
                let mut state = lock(&shared.state);
                let current = state.timer.settle(generation);
                if current {
                    state.settled = true;
                }
                current
            };
            if let (true, Some(args)) = (fire, trailing) {
                (shared.callback)(args);
            }
        });
        state.timer.arm(handle);
    }

    /// 保留中の末尾実行を取り消し、落ち着いた状態に戻す
    pub fn cancel(&self) {
        let mut state = lock(&self.shared.state);
        state.timer.cancel();
        state.settled = true;
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.shared.state).timer.is_pending()
    }
}

impl<A> Clone for ImmediateDebounced<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
