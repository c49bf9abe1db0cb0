//! Per-frame atmosphere shader parameters for sky and cloud materials.
//!
//! [`AtmosphereUpdater`] derives a sun override vector from a directional
//! light, two wind phases from UTC time-of-day, and the viewer's head
//! position, then writes all three into a cloud material and a sky material
//! under fixed parameter names. The host drives it through [`FrameHooks`].

mod clock;
mod light;
mod params;
mod target;
mod updater;
mod viewer;

pub use clock::{
    Clock, FixedClock, PHASE_PERIOD, SECONDS_PER_DAY, SLOW_PHASE_DIVISOR, SystemClock,
    seconds_of_day, time_vector,
};
pub use light::{DirectionalLight, LightSource, convert_light_to_sun_vector, direction_from_angles};
pub use params::{
    ATMOSPHERE_PARAMETERS, AtmosphereParameterIds, CAMERA_POSITION_OFFSET, OVERRIDE_SUN,
    OVERRIDE_TIME, ParameterId, ParameterRegistry, ParameterResolver, ParameterState,
};
pub use target::{AtmosphereUniform, MaterialTarget, ParameterBlock, SharedMaterial};
pub use updater::{
    AtmosphereSettings, AtmosphereTargets, AtmosphereUpdater, CLOUD_SPEED_DEFAULT,
    CLOUD_SPEED_MAX, CLOUD_SPEED_MIN, FrameHooks, HostEnvironment,
};
pub use viewer::{PoseProvider, TrackedViewer};
