//! Continuous run on a background thread.
//!
//! The runner sleeps `delay` between steps and checks for a stop request
//! before each one, so a stop never lands in the middle of a step.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{info, warn};

use crate::world::{Repaint, World};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// How often [`Runner::follow`] checks whether the thread is still alive.
const FOLLOW_POLL: Duration = Duration::from_millis(50);

/// Handle to a running repeat timer. Dropping it stops the thread.
pub struct Runner {
    stop_tx: Sender<()>,
    handle: Option<thread::JoinHandle<u64>>,
}

impl Runner {
    /// Step `world` every `delay` until stopped or until `max_steps` steps
    /// have run.
    pub fn start(world: Arc<Mutex<World>>, delay: Duration, max_steps: Option<u64>) -> Self {
        let (stop_tx, stop_rx) = bounded(1);
        let handle = thread::spawn(move || Self::run(world, stop_rx, delay, max_steps));
        info!("runner started, {:?} between steps", delay);
        Runner {
            stop_tx,
            handle: Some(handle),
        }
    }

    fn run(world: Arc<Mutex<World>>, stop_rx: Receiver<()>, delay: Duration, max_steps: Option<u64>) -> u64 {
        let mut steps = 0;
        while max_steps.map_or(true, |max| steps < max) {
            match stop_rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
            let Ok(mut world) = world.lock() else {
                warn!("world lock poisoned, runner giving up");
                break;
            };
            world.step();
            steps += 1;
        }
        steps
    }

    /// Whether the thread has already exited on its own.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Hand every generation number reported on `repaints` to `on_step`
    /// until the thread exits, whether it reached its limit or gave up.
    pub fn follow(&self, repaints: &Receiver<Repaint>, mut on_step: impl FnMut(u64)) {
        loop {
            match repaints.recv_timeout(FOLLOW_POLL) {
                Ok(Repaint::Stepped { generation }) => on_step(generation),
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) if self.is_finished() => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    /// Ask the thread to stop after the step in flight and wait for it.
    /// Returns the number of steps it ran.
    pub fn stop(mut self) -> u64 {
        let _ = self.stop_tx.try_send(());
        self.join_thread()
    }

    /// Wait for the step limit to be reached. Never returns for an unlimited
    /// runner unless another handle stops it.
    pub fn join(mut self) -> u64 {
        self.join_thread()
    }

    fn join_thread(&mut self) -> u64 {
        let steps = match self.handle.take().map(thread::JoinHandle::join) {
            Some(Ok(steps)) => steps,
            Some(Err(_)) => {
                warn!("runner thread panicked");
                0
            }
            None => 0,
        };
        info!("runner stopped after {} step(s)", steps);
        steps
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.stop_tx.try_send(());
            self.join_thread();
        }
    }
}
