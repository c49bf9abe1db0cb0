//! Headless host: the scene collaborators the updater reads each frame.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use skycanvas_atmosphere::{
    Clock, DirectionalLight, HostEnvironment, LightSource, ParameterRegistry, ParameterResolver,
    PoseProvider, SystemClock, TrackedViewer,
};
use skycanvas_config::{EnvironmentConfig, SimulationConfig, SunAngles};

/// Angular speed of the simulated viewer's walk, radians per second.
const WALK_ANGULAR_SPEED: f32 = 0.25;

/// A viewer walking a circle around the origin.
#[derive(Clone, Debug)]
pub struct ViewerWalk {
    radius: f32,
    height: f32,
    angle: f32,
}

impl ViewerWalk {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            radius: config.viewer_orbit_radius.max(0.0),
            height: config.viewer_height,
            angle: 0.0,
        }
    }

    /// Advance by `dt` seconds and return the new head position.
    pub fn step(&mut self, dt: f32) -> Vec3 {
        self.angle = (self.angle + WALK_ANGULAR_SPEED * dt).rem_euclid(std::f32::consts::TAU);
        self.head_position()
    }

    pub fn head_position(&self) -> Vec3 {
        let (sin, cos) = self.angle.sin_cos();
        Vec3::new(self.radius * cos, self.height, self.radius * sin)
    }
}

/// Scene state shared between the simulation step and the frame callback.
pub struct SceneHost {
    clock: Box<dyn Clock>,
    registry: ParameterRegistry,
    viewer: RefCell<TrackedViewer>,
    default_sun: Option<Rc<RefCell<DirectionalLight>>>,
}

impl SceneHost {
    pub fn new(environment: &EnvironmentConfig) -> Self {
        Self::with_clock(environment, Box::new(SystemClock))
    }

    pub fn with_clock(environment: &EnvironmentConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            registry: ParameterRegistry::new(),
            viewer: RefCell::new(TrackedViewer::default()),
            default_sun: environment.default_sun.map(shared_light),
        }
    }

    /// Push a freshly tracked head position.
    pub fn track_viewer(&self, head: Vec3) {
        self.viewer.borrow_mut().set_head_position(head);
    }

    pub fn viewer_tracked(&self) -> bool {
        self.viewer.borrow().is_valid()
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }
}

impl HostEnvironment for SceneHost {
    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn viewer(&self) -> &dyn PoseProvider {
        &self.viewer
    }

    fn resolver(&self) -> &dyn ParameterResolver {
        &self.registry
    }

    fn default_sun(&self) -> Option<Rc<dyn LightSource>> {
        self.default_sun
            .clone()
            .map(|light| light as Rc<dyn LightSource>)
    }
}

/// Wrap sky angles as a light the host can keep moving.
pub fn shared_light(angles: SunAngles) -> Rc<RefCell<DirectionalLight>> {
    Rc::new(RefCell::new(angles.to_light()))
}

#[cfg(test)]
mod tests {
    use skycanvas_atmosphere::{FixedClock, convert_light_to_sun_vector};

    use super::*;

    #[test]
    fn test_walk_stays_on_circle() {
        let mut walk = ViewerWalk::new(&SimulationConfig::default());
        for _ in 0..500 {
            let head = walk.step(1.0 / 60.0);
            assert!((head.x.hypot(head.z) - 8.0).abs() < 1e-3);
            assert_eq!(head.y, 1.7);
        }
    }

    #[test]
    fn test_viewer_starts_untracked() {
        let host = SceneHost::new(&EnvironmentConfig::default());
        assert!(!host.viewer_tracked());
        host.track_viewer(Vec3::ONE);
        assert!(host.viewer_tracked());
        assert_eq!(host.viewer().head_position(), Vec3::ONE);
    }

    #[test]
    fn test_scene_without_sun() {
        let host = SceneHost::new(&EnvironmentConfig { default_sun: None });
        assert!(host.default_sun().is_none());
    }

    #[test]
    fn test_default_sun_faces_configured_sky_position() {
        let environment = EnvironmentConfig {
            default_sun: Some(SunAngles {
                elevation_deg: 90.0,
                azimuth_deg: 0.0,
            }),
        };
        let host = SceneHost::with_clock(&environment, Box::new(FixedClock::new(0.0)));
        let sun = host.default_sun();
        let v = convert_light_to_sun_vector(sun.as_deref());
        assert!((v.y - 1.0).abs() < 1e-5);
        assert_eq!(v.w, 1.0);
        assert_eq!(host.clock().utc_seconds_of_day(), 0.0);
    }
}
