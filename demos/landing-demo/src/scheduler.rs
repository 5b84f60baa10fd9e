//! Tokio-backed timer scheduler

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use eve_core::SimTime;
use eve_time::{Scheduler, TimerToken, WallClock};

use crate::PageEvent;

/// Arms one sleeping task per timer. Expiry is posted to the page's event
/// queue, so the controller only ever runs on the event loop.
pub struct TokioScheduler {
    clock: WallClock,
    events: UnboundedSender<PageEvent>,
    tasks: HashMap<TimerToken, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(clock: WallClock, events: UnboundedSender<PageEvent>) -> Self {
        TokioScheduler {
            clock,
            events,
            tasks: HashMap::new(),
        }
    }

    /// Forget a timer whose expiry was delivered
    pub fn fired(&mut self, token: TimerToken) {
        self.tasks.remove(&token);
    }

    pub fn armed(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> SimTime {
        self.clock.now()
    }

    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.cancel(token);
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(PageEvent::Timer(token));
        });
        self.tasks.insert(token, handle);
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(handle) = self.tasks.remove(&token) {
            handle.abort();
        }
    }
}
