//! Turns wall-clock time, key presses and termination signals into one
//! stream of events for the single-threaded game loop.

use std::collections::VecDeque;
use std::io;
use std::thread::sleep;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

use crate::input::{is_interrupt, KeySource};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keys read since the previous tick, oldest first. Never empty.
    Input(Vec<KeyEvent>),
    Tick(Instant),
    Terminate,
}

pub struct Scheduler<K: KeySource> {
    period: Duration,
    deadline: Instant,
    keys: K,
    queue: VecDeque<Event>,
    #[cfg(unix)]
    signals: Option<Signals>,
}

impl<K: KeySource> Scheduler<K> {
    /// A scheduler that ignores process signals.
    pub fn new(period: Duration, keys: K) -> Self {
        Scheduler {
            period,
            deadline: Instant::now() + period,
            keys,
            queue: VecDeque::new(),
            #[cfg(unix)]
            signals: None,
        }
    }

    /// Also reports SIGINT and SIGTERM as [`Event::Terminate`].
    ///
    /// The signals are only recorded by the handler and picked up here, so
    /// no game code ever runs in signal context.
    #[cfg(unix)]
    pub fn with_signals(mut self) -> io::Result<Self> {
        self.signals = Some(Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?);
        Ok(self)
    }

    #[cfg(not(unix))]
    pub fn with_signals(self) -> io::Result<Self> {
        Ok(self)
    }

    pub fn next_event(&mut self) -> io::Result<Event> {
        if let Some(ev) = self.queue.pop_front() {
            return Ok(ev);
        }

        if self.termination_pending() {
            return Ok(Event::Terminate);
        }

        let now = self.wait_for_deadline();

        if self.termination_pending() {
            return Ok(Event::Terminate);
        }

        let keys = self.keys.pending()?;

        if keys.iter().any(is_interrupt) {
            log::info!("Interrupt key received");
            return Ok(Event::Terminate);
        }

        if keys.is_empty() {
            Ok(Event::Tick(now))
        } else {
            self.queue.push_back(Event::Tick(now));
            Ok(Event::Input(keys))
        }
    }

    /// Sleeps until the next deadline and returns the instant the tick is
    /// stamped with: the deadline itself, so wake-up jitter never reaches the
    /// frame clock.
    fn wait_for_deadline(&mut self) -> Instant {
        let now = Instant::now();
        let fired = self.deadline;

        if fired > now {
            sleep(fired - now);
        } else if now - fired >= self.period {
            // A whole period behind: re-anchor instead of firing a burst of catch-up ticks
            self.deadline = now + self.period;
            return now;
        }

        self.deadline = fired + self.period;
        fired
    }

    #[cfg(unix)]
    fn termination_pending(&mut self) -> bool {
        let signals = match self.signals.as_mut() {
            Some(s) => s,
            None => return false,
        };

        let mut hit = false;
        for signal in signals.pending() {
            log::warn!("Termination signal {} received", signal);
            hit = true;
        }
        hit
    }

    #[cfg(not(unix))]
    fn termination_pending(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    /// Hands out one scripted batch per poll, then nothing.
    struct ScriptedKeys(VecDeque<Vec<KeyEvent>>);

    impl KeySource for ScriptedKeys {
        fn pending(&mut self) -> io::Result<Vec<KeyEvent>> {
            Ok(self.0.pop_front().unwrap_or_default())
        }
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn scheduler(batches: Vec<Vec<KeyEvent>>) -> Scheduler<ScriptedKeys> {
        Scheduler::new(Duration::from_millis(1), ScriptedKeys(batches.into()))
    }

    #[test]
    fn quiet_poll_yields_bare_tick() {
        let mut sched = scheduler(vec![]);
        assert!(matches!(sched.next_event().unwrap(), Event::Tick(_)));
    }

    #[test]
    fn input_comes_before_its_tick() {
        let mut sched = scheduler(vec![vec![key('w'), key('p')]]);
        assert_eq!(sched.next_event().unwrap(), Event::Input(vec![key('w'), key('p')]));
        assert!(matches!(sched.next_event().unwrap(), Event::Tick(_)));
        assert!(matches!(sched.next_event().unwrap(), Event::Tick(_)));
    }

    #[test]
    fn ctrl_c_terminates() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut sched = scheduler(vec![vec![key('a'), ctrl_c]]);
        assert_eq!(sched.next_event().unwrap(), Event::Terminate);
    }

    fn next_tick(sched: &mut Scheduler<ScriptedKeys>) -> Instant {
        match sched.next_event().unwrap() {
            Event::Tick(t) => t,
            other => panic!("expected tick, got {:?}", other),
        }
    }

    #[test]
    fn ticks_are_stamped_exactly_one_period_apart() {
        let period = Duration::from_millis(5);
        let mut sched = Scheduler::new(period, ScriptedKeys(VecDeque::new()));
        let t1 = next_tick(&mut sched);
        let t2 = next_tick(&mut sched);
        let t3 = next_tick(&mut sched);
        assert_eq!(t2 - t1, period);
        assert_eq!(t3 - t2, period);
    }

    #[test]
    fn a_late_tick_re_anchors() {
        let period = Duration::from_millis(5);
        let mut sched = Scheduler::new(period, ScriptedKeys(VecDeque::new()));
        let t1 = next_tick(&mut sched);
        sleep(period * 3);
        let t2 = next_tick(&mut sched);
        let t3 = next_tick(&mut sched);
        assert!(t2 - t1 >= period * 3);
        assert_eq!(t3 - t2, period);
    }
}
