use log::*;
use std::{cell::RefCell, rc::Rc, time::Duration};

/// Something that makes the simulated computer pay for moving bytes around.
/// Every store gets one of these when it's built.
pub trait Clock {
    fn wait(&mut self, seconds: f64);
}

/// Actually sleeps. This is what you get when you run the simulator for real.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealClock;

/// `None` for anything not worth sleeping for: zero, and the NaNs, infinities
/// and negatives that would make Duration::from_secs_f64 panic. A zero-speed
/// device will happily hand us an infinity.
fn sleep_duration(seconds: f64) -> Option<Duration> {
    if seconds == 0.0 {
        return None;
    }
    if !seconds.is_finite() || seconds < 0.0 {
        warn!("Refusing to sleep for {seconds} seconds");
        return None;
    }
    Some(Duration::from_secs_f64(seconds))
}

impl Clock for RealClock {
    fn wait(&mut self, seconds: f64) {
        if let Some(duration) = sleep_duration(seconds) {
            std::thread::sleep(duration);
        }
    }
}

/// Doesn't wait at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Clock for NoDelay {
    fn wait(&mut self, seconds: f64) {
        trace!("Skipping a {seconds} second wait");
    }
}

/// Doesn't wait either, but writes down every wait it was asked for. Clones
/// share the same log, so keep one handle and give the other to a store.
#[derive(Debug, Default, Clone)]
pub struct RecordingClock {
    waits: Rc<RefCell<Vec<f64>>>,
}

impl RecordingClock {
    pub fn new() -> RecordingClock {
        Default::default()
    }
    pub fn get_waits(&self) -> Vec<f64> {
        self.waits.borrow().clone()
    }
    pub fn total(&self) -> f64 {
        self.waits.borrow().iter().fold(0.0, |total, x| total + x)
    }
    pub fn clear(&self) {
        self.waits.borrow_mut().clear();
    }
}

impl Clock for RecordingClock {
    fn wait(&mut self, seconds: f64) {
        self.waits.borrow_mut().push(seconds);
    }
}

const NAMELESS: &str = "none";
#[allow(unused)]
const MIN_NAME_LENGTH: usize = 3;
#[allow(unused)]
const MAX_NAME_LENGTH: usize = 16;

/// Turns whatever the config gave us into the name a hardware component will
/// display. Names are taken verbatim unless the `validated-names` feature is
/// on.
pub fn component_name(raw: Option<&str>) -> String {
    match raw {
        None => NAMELESS.to_string(),
        Some(raw) => apply_name_policy(raw),
    }
}

#[cfg(not(feature = "validated-names"))]
fn apply_name_policy(raw: &str) -> String {
    raw.to_string()
}

#[cfg(feature = "validated-names")]
fn apply_name_policy(raw: &str) -> String {
    let word = match raw.split_whitespace().next() {
        Some(word) => word,
        None => return NAMELESS.to_string(),
    };
    if word.chars().count() < MIN_NAME_LENGTH {
        return NAMELESS.to_string();
    }
    word.chars().take(MAX_NAME_LENGTH).collect()
}
