/// Per frame behaviour, `C` is whatever shared state the game hands around
pub trait Updatable<C> {
    fn update(&mut self, context: &mut C);

    /// Put back into the starting layout, e.g. on restart
    fn reset(&mut self, _context: &mut C) {}
}

/// Ordered list of updatables plus the start/stop switch of the frame clock
///
/// ┌──────────── tick() ────────────┐
/// │ started ? ──no──► nothing      │
/// │    │                           │
/// │   yes                          │
/// │    ▼                           │
/// │ updatables[0].update(context)  │
/// │ updatables[1].update(context)  │
/// │ ...  (registration order)      │
/// └────────────────────────────────┘
pub struct Ticker<C> {
    updatables: Vec<Box<dyn Updatable<C>>>,
    started: bool,
}

impl<C> Default for Ticker<C> {
    fn default() -> Self {
        Ticker {
            updatables: Vec::new(),
            started: true,
        }
    }
}

impl<C> Ticker<C> {
    /// A new ticker is already started
    pub fn new() -> Self {
        Ticker::default()
    }

    pub fn add(&mut self, updatable: impl Updatable<C> + 'static) {
        self.updatables.push(Box::new(updatable));
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn stop(&mut self) {
        self.started = false;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Stopping from inside an update does not cut the current frame short,
    /// the remaining updatables still run
    pub fn tick(&mut self, context: &mut C) {
        if !self.started {
            return;
        }
        for updatable in self.updatables.iter_mut() {
            updatable.update(context);
        }
    }

    pub fn reset_all(&mut self, context: &mut C) {
        for updatable in self.updatables.iter_mut() {
            updatable.reset(context);
        }
    }
}
