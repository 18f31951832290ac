//! Background tick driver.
//!
//! Scheduling has to happen on a steady cadence whether or not the caller's
//! own loop is running, so a player that should keep sounding gets parked
//! behind a mutex and poked by this thread. The tick itself stays cheap:
//! one lock, one scheduling pass, sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::engine::player::Player;

/// Owns the thread that calls [`Player::tick`] on the configured interval.
///
/// The conductor keeps ticking while the player is paused or stopped; those
/// ticks are no-ops inside the player, and keeping the cadence running means
/// resume never waits a full interval for its first notes.
pub struct Conductor {
    player: Arc<Mutex<Player>>,
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Conductor {
    /// Wrap `player` and start ticking it.
    pub fn spawn(player: Player) -> Self {
        let tick = player.config().tick;
        let player = Arc::new(Mutex::new(player));
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_player = Arc::clone(&player);
        let thread_shutdown = Arc::clone(&shutdown);
        let thread = thread::spawn(move || {
            while !thread_shutdown.load(Ordering::Relaxed) {
                match thread_player.lock() {
                    Ok(mut player) => {
                        if let Err(err) = player.tick() {
                            log::error!("scheduling failed: {err}");
                        }
                    }
                    Err(_) => {
                        log::error!("player lock poisoned; conductor exiting");
                        break;
                    }
                }
                thread::sleep(tick);
            }
        });

        Self {
            player,
            shutdown,
            thread: Some(thread),
        }
    }

    /// Shared handle to the driven player, for transport and authoring
    /// calls from other threads.
    pub fn player(&self) -> Arc<Mutex<Player>> {
        Arc::clone(&self.player)
    }

    /// Stop the tick thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Conductor {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::player::EngineConfig;
    use crate::engine::testing::ManualContext;
    use std::time::{Duration, Instant};

    #[test]
    fn test_conductor_schedules_without_manual_ticks() {
        let (ctx, state) = ManualContext::new();
        let mut player = Player::new(ctx, EngineConfig::default());
        player.add_note("A", "q");
        player.play();

        let conductor = Conductor::spawn(player);

        // The first pass lands within a tick or two; poll rather than guess.
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut committed = false;
        while Instant::now() < deadline {
            let calls = state.lock().unwrap().banks[0].lock().unwrap().len();
            if calls > 0 {
                committed = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        conductor.shutdown();
        assert!(committed, "tick thread never scheduled the note");
    }

    #[test]
    fn test_shutdown_joins_and_stops_ticking() {
        let (ctx, _state) = ManualContext::new();
        let player = Player::new(ctx, EngineConfig::default());
        let conductor = Conductor::spawn(player);
        let handle = conductor.player();

        conductor.shutdown();

        // The thread is gone, so the lock is free and stays uncontended.
        assert!(handle.lock().is_ok());
    }
}
