pub mod geometry;
pub mod input;
pub mod simulation;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::simulation::Simulation;

    /// Run `n` ticks with the same input, returning all accumulated events.
    pub fn run_ticks<S: Simulation>(sim: &mut S, n: usize, input: &S::Input) -> Vec<S::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.update(input));
        }
        all_events
    }

    /// Assert that the simulation's serialized state differs from `before`.
    pub fn assert_state_changed<S: Simulation>(sim: &S, before: &[u8]) {
        let after = sim.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Simulation state should have changed after operation"
        );
    }

    // ================================================================
    // Simulation Contract Tests
    // ================================================================
    // Generic checks every Simulation implementation must pass. Crates call
    // them from their own #[cfg(test)] modules with a freshly built instance.

    /// update() must advance the tick counter by exactly one.
    pub fn contract_update_advances_tick<S: Simulation>(sim: &mut S, input: &S::Input) {
        let before = sim.tick_count();
        sim.update(input);
        assert_eq!(
            sim.tick_count(),
            before + 1,
            "update() must advance the tick counter by one"
        );
    }

    /// serialize_state → apply_state must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves<S: Simulation>(sim: &mut S) {
        let state_a = sim.serialize_state();
        sim.apply_state(&state_a);
        let state_b = sim.serialize_state();
        sim.apply_state(&state_b);
        let state_c = sim.serialize_state();
        assert_eq!(
            state_b, state_c,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates<S: Simulation>(sim: &mut S, input: &S::Input) {
        sim.pause();
        assert!(sim.is_paused());
        let before = sim.serialize_state();
        sim.update(input);
        let during_pause = sim.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        sim.resume();
        sim.update(input);
        let after_resume = sim.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// apply_state() with garbage must leave the state untouched.
    pub fn contract_garbage_state_ignored<S: Simulation>(sim: &mut S) {
        let before = sim.serialize_state();
        sim.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        sim.apply_state(&before[..before.len() / 2]);
        let after = sim.serialize_state();
        assert_eq!(before, after, "Malformed snapshots must be ignored");
    }
}
