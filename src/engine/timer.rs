/// A cancelable one-shot task, stored as a deadline in milliseconds
///
/// Scheduling again replaces the pending deadline (last one wins). Firing is
/// polled by the owner through `fire_if_due`, which hands out each deadline
/// at most once.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Timeout {
    deadline: Option<f64>,
}

impl Timeout {
    pub fn schedule(&mut self, now: f64, delay: f64) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Deadline if it has passed by `now`
    pub fn due(&self, now: f64) -> Option<f64> {
        self.deadline.filter(|deadline| *deadline <= now)
    }

    /// `true` exactly once per scheduled deadline, once `now` reached it
    pub fn fire_if_due(&mut self, now: f64) -> bool {
        if self.due(now).is_some() {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
