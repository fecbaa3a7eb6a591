//! Fixed-cadence tick scheduling with at most one registration and one tick in flight

use log::debug;
use std::time::{Duration, Instant};

/// Opaque reference to the active periodic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Registration {
    handle: PollHandle,
    next_due: Instant,
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct Scheduler {
    interval: Duration,
    active: Option<Registration>,
    next_handle: u64,
    tick_in_flight: bool,
    cancellations: u32,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            active: None,
            next_handle: 1,
            tick_in_flight: false,
            cancellations: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_handle(&self) -> Option<PollHandle> {
        self.active.map(|r| r.handle)
    }

    /// Number of registrations actually cancelled so far.
    pub fn cancellations(&self) -> u32 {
        self.cancellations
    }

    pub fn tick_in_flight(&self) -> bool {
        self.tick_in_flight
    }

    /// Registers a fresh periodic tick, replacing any existing registration.
    pub fn start(&mut self, now: Instant) -> PollHandle {
        self.stop();

        let handle = PollHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(Registration {
            handle,
            next_due: now + self.interval,
        });

        debug!("Tick loop started ({:?}, every {:?})", handle, self.interval);
        handle
    }

    /// Cancels the registration if there is one. Returns whether anything was cancelled.
    ///
    /// A tick already in flight is not cancelled; its response still arrives.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(registration) => {
                self.cancellations += 1;
                debug!("Tick loop stopped ({:?})", registration.handle);
                true
            }
            None => false,
        }
    }

    /// Returns true when a tick should be issued now.
    ///
    /// A due tick is skipped while the previous one is still in flight, and the
    /// cadence stays anchored to the registration rather than to responses.
    pub fn poll(&mut self, now: Instant) -> bool {
        let interval = self.interval;
        let in_flight = self.tick_in_flight;
        let Some(registration) = self.active.as_mut() else {
            return false;
        };

        if now < registration.next_due {
            return false;
        }

        while registration.next_due <= now {
            registration.next_due += interval;
        }

        if in_flight {
            return false;
        }

        self.tick_in_flight = true;
        true
    }

    pub fn tick_finished(&mut self) {
        self.tick_in_flight = false;
    }
}
