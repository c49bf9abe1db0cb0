//! The atmosphere parameter updater.
//!
//! Each frame the updater samples the viewer, derives the sun and wind-phase
//! vectors, and writes all three parameters into both the cloud and sky
//! materials. Both materials always receive identical values within one
//! publish, and writes are unconditional.

use std::rc::Rc;

use glam::{Vec3, Vec4};

use crate::clock::{Clock, time_vector};
use crate::light::{LightSource, convert_light_to_sun_vector};
use crate::params::{ParameterId, ParameterResolver, ParameterState};
use crate::target::{AtmosphereUniform, SharedMaterial};
use crate::viewer::PoseProvider;

/// Lowest accepted cloud speed.
pub const CLOUD_SPEED_MIN: f32 = 0.0;
/// Highest accepted cloud speed.
pub const CLOUD_SPEED_MAX: f32 = 12.0;
/// Cloud speed used when none is configured.
pub const CLOUD_SPEED_DEFAULT: f32 = 1.0;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables for the updater.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereSettings {
    cloud_speed: f32,
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            cloud_speed: CLOUD_SPEED_DEFAULT,
        }
    }
}

impl AtmosphereSettings {
    /// Settings with `cloud_speed` clamped to `[0, 12]`. NaN falls back to the default.
    pub fn new(cloud_speed: f32) -> Self {
        let mut settings = Self::default();
        settings.set_cloud_speed(cloud_speed);
        settings
    }

    pub fn cloud_speed(&self) -> f32 {
        self.cloud_speed
    }

    pub fn set_cloud_speed(&mut self, cloud_speed: f32) {
        self.cloud_speed = if cloud_speed.is_nan() {
            CLOUD_SPEED_DEFAULT
        } else {
            cloud_speed.clamp(CLOUD_SPEED_MIN, CLOUD_SPEED_MAX)
        };
    }
}

// ---------------------------------------------------------------------------
// Host seams
// ---------------------------------------------------------------------------

/// The two materials the updater publishes into.
#[derive(Clone)]
pub struct AtmosphereTargets {
    pub clouds: SharedMaterial,
    pub sky: SharedMaterial,
}

/// Collaborators supplied by the host on every lifecycle callback.
pub trait HostEnvironment {
    fn clock(&self) -> &dyn Clock;
    fn viewer(&self) -> &dyn PoseProvider;
    fn resolver(&self) -> &dyn ParameterResolver;
    /// The scene's main directional light, if it has one.
    fn default_sun(&self) -> Option<Rc<dyn LightSource>>;
}

/// Lifecycle callbacks a host scheduler invokes.
pub trait FrameHooks {
    /// Called once before the first frame.
    fn on_start(&mut self, env: &dyn HostEnvironment);
    /// Called once per frame.
    fn on_frame(&mut self, env: &dyn HostEnvironment);
    /// Called by tooling after settings were edited, for live preview.
    fn on_config_changed(&mut self, env: &dyn HostEnvironment);
}

// ---------------------------------------------------------------------------
// AtmosphereUpdater
// ---------------------------------------------------------------------------

/// Derives and publishes the shared sky/cloud shader parameters.
pub struct AtmosphereUpdater {
    settings: AtmosphereSettings,
    sun: Option<Rc<dyn LightSource>>,
    targets: AtmosphereTargets,
    params: ParameterState,
    camera_position: Vec3,
    sun_vector: Vec4,
    time_vector: Vec4,
}

impl AtmosphereUpdater {
    pub fn new(targets: AtmosphereTargets, settings: AtmosphereSettings) -> Self {
        Self {
            settings,
            sun: None,
            targets,
            params: ParameterState::Uninitialized,
            camera_position: Vec3::ZERO,
            sun_vector: Vec4::ZERO,
            time_vector: Vec4::ZERO,
        }
    }

    /// Bind an override light before start.
    pub fn with_sun_override(mut self, light: Rc<dyn LightSource>) -> Self {
        self.sun = Some(light);
        self
    }

    pub fn set_sun(&mut self, light: Option<Rc<dyn LightSource>>) {
        self.sun = light;
    }

    pub fn has_sun(&self) -> bool {
        self.sun.is_some()
    }

    pub fn settings(&self) -> AtmosphereSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: AtmosphereSettings) {
        self.settings = settings;
    }

    pub fn parameter_state(&self) -> ParameterState {
        self.params
    }

    /// Last sampled viewer head position.
    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    /// Sun vector as of the last [`update_all`](Self::update_all).
    pub fn sun_vector(&self) -> Vec4 {
        self.sun_vector
    }

    /// Wind-phase vector as of the last [`update_all`](Self::update_all).
    pub fn time_vector(&self) -> Vec4 {
        self.time_vector
    }

    /// The values the next [`publish`](Self::publish) will write, packed for GPU upload.
    pub fn uniform(&self) -> AtmosphereUniform {
        AtmosphereUniform::new(self.camera_position.extend(1.0), self.sun_vector, self.time_vector)
    }

    /// Resolve the parameter ids if that has not happened yet.
    pub fn resolve_parameter_ids(&mut self, resolver: &dyn ParameterResolver) {
        self.params.ensure_resolved(resolver);
    }

    /// Encode the currently bound light as a sun vector.
    pub fn convert_sun(&self) -> Vec4 {
        convert_light_to_sun_vector(self.sun.as_deref())
    }

    /// Derive the wind phases from `clock` and the configured cloud speed.
    pub fn compute_time_vector(&self, clock: &dyn Clock) -> Vec4 {
        time_vector(self.settings.cloud_speed, clock.utc_seconds_of_day())
    }

    /// Refresh the cached head position. An untracked viewer leaves it unchanged.
    pub fn sample_viewer_position(&mut self, viewer: &dyn PoseProvider) {
        if viewer.is_valid() {
            self.camera_position = viewer.head_position();
        }
    }

    /// Write the cached camera, sun, and time vectors into both materials.
    pub fn publish(&mut self, resolver: &dyn ParameterResolver) {
        let ids = self.params.ensure_resolved(resolver);
        self.write(ids.camera_position_offset, self.camera_position.extend(1.0));
        self.write(ids.override_sun, self.sun_vector);
        self.write(ids.override_time, self.time_vector);
        tracing::trace!(
            camera = ?self.camera_position,
            sun = ?self.sun_vector,
            time = ?self.time_vector,
            "published atmosphere parameters"
        );
    }

    /// Recompute the sun and time vectors, then publish.
    pub fn update_all(&mut self, clock: &dyn Clock, resolver: &dyn ParameterResolver) {
        self.sun_vector = self.convert_sun();
        self.time_vector = self.compute_time_vector(clock);
        self.publish(resolver);
    }

    fn write(&self, id: Option<ParameterId>, value: Vec4) {
        let Some(id) = id else {
            return;
        };
        self.targets.clouds.borrow_mut().set_vector(id, value);
        self.targets.sky.borrow_mut().set_vector(id, value);
    }
}

impl FrameHooks for AtmosphereUpdater {
    fn on_start(&mut self, env: &dyn HostEnvironment) {
        if self.sun.is_none() {
            self.sun = env.default_sun();
            tracing::debug!(
                bound = self.sun.is_some(),
                "no sun override; using scene default light"
            );
        }
        self.update_all(env.clock(), env.resolver());
    }

    fn on_frame(&mut self, env: &dyn HostEnvironment) {
        self.sample_viewer_position(env.viewer());
        self.update_all(env.clock(), env.resolver());
    }

    fn on_config_changed(&mut self, env: &dyn HostEnvironment) {
        self.update_all(env.clock(), env.resolver());
    }
}
