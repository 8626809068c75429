/// A fixed-timestep simulation driven one tick at a time by a host.
///
/// The host owns timing, input sampling and presentation; the simulation
/// only advances state and reports what happened as events.
pub trait Simulation {
    /// Per-tick input snapshot.
    type Input;
    /// Events emitted during a tick for presentation layers (particles,
    /// camera shake, sound).
    type Event;

    /// Advance exactly one tick. Returns the events emitted during it.
    fn update(&mut self, input: &Self::Input) -> Vec<Self::Event>;

    /// Number of ticks simulated since the current run started.
    fn tick_count(&self) -> u64;

    /// Tick rate in Hz the tuning values were authored for.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Snapshot the full simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Restore a snapshot produced by `serialize_state`. Malformed bytes
    /// leave the current state untouched.
    fn apply_state(&mut self, state: &[u8]);

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether the current run has reached a terminal status.
    fn is_finished(&self) -> bool;
}

/// Generates the snapshot and pause methods of [`Simulation`].
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields, and the crate to depend on `rmp-serde` and
/// `tracing`.
#[macro_export]
macro_rules! simulation_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("simulation state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Dropped malformed state snapshot"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}
