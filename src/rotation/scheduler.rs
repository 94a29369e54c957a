//! Per-tick rotation driver.

use super::buffer::{LoadCommand, Slot};
use super::crossfade::{blend_control, BlendStep};
use super::deferred::DeferredAction;
use super::gate::{ConsistencyGate, Fingerprint};
use super::output::{
    output_channel, OutputFrame, OutputPublisher, OutputReader,
};
use super::state::RotationState;
use crate::camera::CameraFraming;
use crate::host::Host;
use crate::options::{Options, RotationOptions};
use crate::scene::SceneCatalog;
use crate::util::easing::clamp01;

/// External signals for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Session time in seconds. Drives the blend clock and the orbit.
    pub time: f64,
    /// Normalized position in the rotation cycle, `None` when no timer is
    /// connected.
    pub cycle_position: Option<f32>,
}

impl TickInput {
    /// Tick with a connected timer.
    #[must_use]
    pub fn new(time: f64, cycle_position: f32) -> Self {
        Self {
            time,
            cycle_position: Some(cycle_position),
        }
    }

    /// Tick without a timer.
    #[must_use]
    pub fn disconnected(time: f64) -> Self {
        Self {
            time,
            cycle_position: None,
        }
    }

    /// Usable cycle position: finite and clamped to `[0, 1]`.
    fn position(&self) -> Option<f32> {
        self.cycle_position.filter(|p| p.is_finite()).map(clamp01)
    }
}

/// Owns the rotation state and publishes one [`OutputFrame`] per tick.
///
/// The scheduler is the only writer of its state. A [`Host`] is borrowed per
/// call; nothing the host reports can make a tick fail.
pub struct RotationScheduler {
    catalog: SceneCatalog,
    options: RotationOptions,
    framing: CameraFraming,
    state: RotationState,
    publisher: OutputPublisher,
    last_frame: OutputFrame,
}

impl RotationScheduler {
    /// Start a fresh session over `catalog`.
    pub fn new<H: Host + ?Sized>(
        catalog: SceneCatalog,
        options: &Options,
        host: &mut H,
    ) -> (Self, OutputReader) {
        Self::resume(catalog, options, None, host)
    }

    /// Start a session, continuing from `snapshot` when it still matches
    /// the catalog.
    ///
    /// A matching snapshot reorders the catalog to its persisted order and
    /// reloads its slots into `host`. Anything else (no snapshot, another
    /// version, a different scene set) starts fresh with the catalog's own
    /// order.
    pub fn resume<H: Host + ?Sized>(
        mut catalog: SceneCatalog,
        options: &Options,
        snapshot: Option<RotationState>,
        host: &mut H,
    ) -> (Self, OutputReader) {
        let framing =
            CameraFraming::from_lens(host.camera_lens(), &options.camera);
        log::info!("vertical FOV {:.2}°", framing.vertical_fov);

        let len = catalog.len();
        let restored = snapshot.filter(|snapshot| {
            let fits = snapshot.fits(len)
                && catalog.apply_order(&snapshot.scene_order);
            if !fits {
                log::info!(
                    "rotation state does not match the gallery, starting fresh"
                );
            }
            fits
        });

        let state = match restored {
            Some(mut state) => {
                state.crossfade.interrupt();
                state.vertical_fov = framing.vertical_fov;
                log::info!(
                    "resuming at scene {} of {} on {}",
                    state.current_scene,
                    len,
                    state.buffer.active()
                );
                if catalog.can_rotate() {
                    reload_slots(&mut state, &catalog, host);
                }
                state
            }
            None => {
                let mut state =
                    RotationState::fresh(&catalog, framing.vertical_fov);
                if catalog.can_rotate() {
                    load_initial_slots(&mut state, &catalog, host);
                }
                state
            }
        };
        if !catalog.can_rotate() {
            log::warn!(
                "gallery has {len} scene(s), rotation needs at least 2"
            );
        }

        let initial = initial_frame(&state, &catalog, &framing);
        let (publisher, reader) = output_channel(initial);
        let scheduler = Self {
            catalog,
            options: options.rotation.clone(),
            framing,
            state,
            publisher,
            last_frame: initial,
        };
        (scheduler, reader)
    }

    /// Advance one tick and publish its frame.
    pub fn tick<H: Host + ?Sized>(
        &mut self,
        input: TickInput,
        host: &mut H,
    ) -> OutputFrame {
        self.dispatch_deferred(host);

        let frame = match input.position() {
            Some(position) if self.catalog.can_rotate() => {
                self.advance(input.time, position, host)
            }
            _ => OutputFrame::disabled(&self.framing, input.time),
        };

        self.publisher.publish(frame);
        self.last_frame = frame;
        frame
    }

    /// Current persisted state.
    #[must_use]
    pub fn state(&self) -> &RotationState {
        &self.state
    }

    /// Scenes in rotation order.
    #[must_use]
    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// Camera framing for this session.
    #[must_use]
    pub fn framing(&self) -> &CameraFraming {
        &self.framing
    }

    /// Frame published by the last tick.
    #[must_use]
    pub fn last_output(&self) -> OutputFrame {
        self.last_frame
    }

    /// Number of frames published so far.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.publisher.published()
    }

    fn dispatch_deferred<H: Host + ?Sized>(&mut self, host: &mut H) {
        for action in self.state.deferred.take_due() {
            match action {
                DeferredAction::RegenerateRestPositions => {
                    if let Err(e) = host.request_rest_positions() {
                        log::warn!("rest position regeneration failed: {e}");
                        let _ = self.state.deferred.push(action);
                    } else {
                        log::debug!("rest positions regenerated");
                    }
                }
            }
        }
    }

    fn advance<H: Host + ?Sized>(
        &mut self,
        now: f64,
        position: f32,
        host: &mut H,
    ) -> OutputFrame {
        let options = &self.options;
        let state = &mut self.state;

        if state.gate.is_waiting()
            && state.gate.poll(Fingerprint::capture(&*host))
        {
            log::debug!("downstream data changed, queueing rest positions");
            let _ =
                state.deferred.push(DeferredAction::RegenerateRestPositions);
        }

        let blending = state.crossfade.is_blending();
        if state.buffer.on_cycle_reset(
            position,
            state.prev_cycle_position,
            blending,
            options.jitter_tolerance,
        ) {
            log::debug!(
                "cycle restarted ({:.3} -> {position:.3})",
                state.prev_cycle_position
            );
        }
        state.prev_cycle_position = position;
        state.crossfade.observe_cycle(position, options.arm_threshold);

        if state.buffer.loaded(state.buffer.active())
            != self
                .catalog
                .get(state.current_scene)
                .map(|scene| scene.id.as_str())
        {
            retry_active_load(state, &self.catalog, host);
        }

        if let Some(command) = state.buffer.maybe_preload(
            position,
            blending,
            state.gate.is_waiting(),
            &self.catalog,
            state.current_scene,
            options.preload_threshold,
        ) {
            preload(state, &self.catalog, &command, host);
        }

        if state.crossfade.try_start(
            position,
            state.buffer.is_preloaded(),
            now,
            options.blend_start,
        ) {
            log::info!(
                "crossfade {} -> {} (scene {} -> {})",
                state.buffer.active(),
                state.buffer.inactive(),
                state.current_scene,
                self.catalog.next_index(state.current_scene)
            );
        }

        let active = state.buffer.active();
        let step = state.crossfade.step(now, options.blend_duration);
        let (blend, sphere) = match step {
            BlendStep::Steady => (active.as_f32(), state.active_sphere),
            BlendStep::InProgress { fraction, eased } => (
                blend_control(active, eased),
                state.active_sphere.lerp(&state.target_sphere, fraction),
            ),
            BlendStep::Complete => {
                complete_swap(state, &self.catalog, host);
                (state.buffer.active().as_f32(), state.active_sphere)
            }
        };

        OutputFrame::compose(
            blend,
            state.current_scene,
            self.catalog.next_index(state.current_scene),
            &sphere,
            &self.framing,
            now,
        )
    }
}

/// What readers see before the first tick: the restored slot settled on
/// screen, or the disabled frame for a gallery that cannot rotate.
fn initial_frame(
    state: &RotationState,
    catalog: &SceneCatalog,
    framing: &CameraFraming,
) -> OutputFrame {
    if !catalog.can_rotate() {
        return OutputFrame::disabled(framing, 0.0);
    }
    OutputFrame::compose(
        state.buffer.active().as_f32(),
        state.current_scene,
        catalog.next_index(state.current_scene),
        &state.active_sphere,
        framing,
        0.0,
    )
}

/// Session start: scene 0 on screen in slot A, scene 1 waiting in slot B.
fn load_initial_slots<H: Host + ?Sized>(
    state: &mut RotationState,
    catalog: &SceneCatalog,
    host: &mut H,
) {
    if load_into(state, catalog, Slot::A, 0, host) {
        let _ = state.deferred.push(DeferredAction::RegenerateRestPositions);
    } else {
        log::warn!("nothing on screen yet, retrying scene 0 every tick");
    }
    let preloaded = load_into(state, catalog, Slot::B, 1, host);
    state.buffer.set_preloaded(preloaded);
}

/// Resume: the previous host's slots are gone, so load them again.
///
/// A host that has not seen a frame shows slot A. When the restored active
/// slot is B, rest positions wait until the live data moves off whatever
/// slot A holds now.
fn reload_slots<H: Host + ?Sized>(
    state: &mut RotationState,
    catalog: &SceneCatalog,
    host: &mut H,
) {
    state.buffer.clear_loads();
    let active = state.buffer.active();
    let current = state.current_scene;
    if !load_into(state, catalog, active, current, host) {
        log::warn!("resumed without scene {current} on screen");
    }
    if state.buffer.is_preloaded() {
        let next = catalog.next_index(current);
        let inactive = state.buffer.inactive();
        let loaded = load_into(state, catalog, inactive, next, host);
        state.buffer.set_preloaded(loaded);
    }

    state.gate = ConsistencyGate::Clear;
    let _ = state.deferred.take_due();
    if active == Slot::A {
        if state.buffer.loaded(active).is_some() {
            let _ =
                state.deferred.push(DeferredAction::RegenerateRestPositions);
        }
    } else {
        state.gate.arm(Fingerprint::capture(&*host));
    }
}

/// The active slot lost its scene (failed initial or resumed load).
fn retry_active_load<H: Host + ?Sized>(
    state: &mut RotationState,
    catalog: &SceneCatalog,
    host: &mut H,
) {
    let slot = state.buffer.active();
    let Some(scene) = catalog.get(state.current_scene) else {
        return;
    };
    match host.load_scene(slot, scene) {
        Ok(()) => {
            state.buffer.record_load(slot, &scene.id);
            log::info!("{} now on screen in {slot}", scene.id);
            // A waiting gate queues regeneration once the data moves.
            if !state.gate.is_waiting() {
                let _ = state
                    .deferred
                    .push(DeferredAction::RegenerateRestPositions);
            }
        }
        Err(e) => log::debug!("{} still unavailable: {e}", scene.id),
    }
}

fn load_into<H: Host + ?Sized>(
    state: &mut RotationState,
    catalog: &SceneCatalog,
    slot: Slot,
    index: usize,
    host: &mut H,
) -> bool {
    let Some(scene) = catalog.get(index) else {
        return false;
    };
    match host.load_scene(slot, scene) {
        Ok(()) => {
            state.buffer.record_load(slot, &scene.id);
            true
        }
        Err(e) => {
            log::warn!("failed to load {} into {slot}: {e}", scene.id);
            false
        }
    }
}

fn preload<H: Host + ?Sized>(
    state: &mut RotationState,
    catalog: &SceneCatalog,
    command: &LoadCommand,
    host: &mut H,
) {
    let Some(scene) = catalog.get(command.scene_index) else {
        return;
    };
    match host.load_scene(command.slot, scene) {
        Ok(()) => {
            state.buffer.commit(command);
            state.target_sphere = command.sphere;
            log::debug!("preloaded {} into {}", command.scene_id, command.slot);
        }
        Err(e) => {
            log::warn!(
                "preload of {} into {} failed: {e}",
                command.scene_id,
                command.slot
            );
        }
    }
}

fn complete_swap<H: Host + ?Sized>(
    state: &mut RotationState,
    catalog: &SceneCatalog,
    host: &mut H,
) {
    // Captured before the host sees this tick's frame, so this is still the
    // outgoing scene's data.
    let before = Fingerprint::capture(&*host);

    let active = state.buffer.swap();
    state.current_scene = catalog.next_index(state.current_scene);
    state.active_sphere = state.target_sphere;
    if let Err(e) = host.reset_feedback() {
        log::warn!("feedback reset failed: {e}");
    }
    state.gate.arm(before);
    log::info!(
        "now showing scene {} ({}) on {active}",
        state.current_scene,
        catalog.get(state.current_scene).map_or("?", |s| s.id.as_str())
    );
}
