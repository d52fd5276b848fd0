/// One-shot delayed events driven by engine time
///
/// Timers never call back directly. `advance` returns the handles that
/// came due and the caller routes each one to whoever scheduled it.
use std::time::Duration;

/// Identifies a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can schedule and cancel one-shot timers
pub trait TimerService {
    /// Schedule a timer that fires once `delay` of engine time has passed
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    due: Duration,
}

/// Timer service backed by an elapsed-time clock
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Engine time elapsed since creation
    now: Duration,
    next_id: u64,
    /// Pending timers in schedule order
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance engine time and return the timers that came due, in schedule order
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        self.now += dt;

        let now = self.now;
        let mut fired = Vec::new();
        self.pending.retain(|timer| {
            if timer.due <= now {
                fired.push(timer.handle);
                false
            } else {
                true
            }
        });

        for handle in &fired {
            log::trace!("Timer {} fired at {:?}", handle.id(), now);
        }
        fired
    }
}

impl TimerService for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            due: self.now + delay,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        before != self.pending.len()
    }
}
