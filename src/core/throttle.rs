//! Leading and trailing edge throttle for event-driven triggers.
//!
//! The first call in a quiet period runs immediately. Calls inside the interval
//! arm a single trailing timer that runs once with the latest argument when the
//! interval has elapsed.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Immediate,
    /// Deferred to the trailing edge; a later call may replace the argument
    Trailing,
}

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

enum Step<T> {
    Run(T),
    Arm(Duration),
}

struct State<T> {
    last_run: Option<Instant>,
    latest: Option<T>,
    timer_armed: bool,
}

struct Inner<T> {
    interval: Duration,
    action: Action<T>,
    state: Mutex<State<T>>,
}

pub struct Throttle<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Throttle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> Throttle<T> {
    pub fn new(interval: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                interval,
                action: Arc::new(action),
                state: Mutex::new(State {
                    last_run: None,
                    latest: None,
                    timer_armed: false,
                }),
            }),
        }
    }

    pub fn call(&self, arg: T) -> Invocation {
        let now = Instant::now();
        let step = {
            let mut state = self.inner.state.lock();
            let elapsed = state.last_run.map(|last| now.duration_since(last));
            let quiet = elapsed.map_or(true, |elapsed| elapsed > self.inner.interval);

            if quiet && !state.timer_armed {
                state.last_run = Some(now);
                Step::Run(arg)
            } else {
                state.latest = Some(arg);
                if state.timer_armed {
                    return Invocation::Trailing;
                }
                state.timer_armed = true;
                Step::Arm(self.inner.interval.saturating_sub(elapsed.unwrap_or_default()))
            }
        };

        let wait = match step {
            Step::Run(arg) => {
                (self.inner.action)(arg);
                return Invocation::Immediate;
            }
            Step::Arm(wait) => wait,
        };

        let inner = Arc::clone(&self.inner);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(wait).await;
                    inner.fire_trailing();
                });
            }
            Err(_) => {
                log::debug!("No async runtime for the throttle timer; running trailing call now");
                inner.fire_trailing();
            }
        }
        Invocation::Trailing
    }
}

impl<T> Inner<T> {
    fn fire_trailing(&self) {
        let latest = {
            let mut state = self.state.lock();
            state.timer_armed = false;
            state.last_run = Some(Instant::now());
            state.latest.take()
        };
        if let Some(arg) = latest {
            (self.action)(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_throttle(interval_ms: u64) -> (Throttle<char>, Arc<Mutex<Vec<(char, Instant)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let throttle = Throttle::new(Duration::from_millis(interval_ms), move |letter| {
            recorded.lock().push((letter, Instant::now()));
        });
        (throttle, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_leading_and_trailing_once() {
        let (throttle, calls) = recording_throttle(200);
        let start = Instant::now();

        assert_eq!(throttle.call('A'), Invocation::Immediate);
        for letter in ['B', 'C', 'D'] {
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(throttle.call(letter), Invocation::Trailing);
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        let calls = calls.lock();
        let letters: Vec<char> = calls.iter().map(|(l, _)| *l).collect();
        assert_eq!(letters, vec!['A', 'D']);
        assert_eq!(calls[1].1.duration_since(start), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_all_run_immediately() {
        let (throttle, calls) = recording_throttle(200);

        for letter in ['A', 'B', 'C'] {
            assert_eq!(throttle.call(letter), Invocation::Immediate);
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        assert_eq!(calls.lock().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_most_one_run_per_interval() {
        let (throttle, calls) = recording_throttle(200);

        for i in 0..50u32 {
            throttle.call(char::from(b'A' + (i % 26) as u8));
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        let calls = calls.lock();
        // 500ms of events: one leading run plus one trailing run per elapsed interval
        assert!(calls.len() <= 4, "ran {} times", calls.len());
        for pair in calls.windows(2) {
            assert!(pair[1].1.duration_since(pair[0].1) >= Duration::from_millis(200));
        }
    }
}
