//! Directional light sources and their conversion into the sun override vector.
//!
//! The sky and cloud shaders read the sun as a `vec4`: `xyz` points from the
//! scene toward the light, `w` is an override flag. A zero `w` tells the
//! shader to ignore the override and fall back to its own sun.

use std::cell::RefCell;

use glam::{Quat, Vec3, Vec4};

/// Anything that behaves like a directional light for sky shading.
pub trait LightSource {
    /// The axis the light shines along (from the light toward the scene).
    ///
    /// Need not be normalized.
    fn forward(&self) -> Vec3;
}

impl LightSource for Vec3 {
    fn forward(&self) -> Vec3 {
        *self
    }
}

// Lets the host keep moving a light while the updater holds a shared handle.
impl<T: LightSource + ?Sized> LightSource for RefCell<T> {
    fn forward(&self) -> Vec3 {
        self.borrow().forward()
    }
}

/// CPU-side directional light oriented by a rotation.
///
/// With the identity rotation the light shines along `+Z`.
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    /// World-space orientation of the light.
    pub rotation: Quat,
    /// Linear RGB color of the light (not premultiplied by intensity).
    pub color: Vec3,
    /// Scalar intensity multiplier.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            // Straight down: noon sun.
            rotation: Quat::from_rotation_arc(Vec3::Z, Vec3::NEG_Y),
            // Warm white, approximating D65 daylight.
            color: Vec3::new(1.0, 0.96, 0.90),
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    /// Build a light shining along `forward`.
    ///
    /// A zero-length `forward` keeps the identity rotation.
    pub fn facing(forward: Vec3) -> Self {
        let mut light = Self {
            rotation: Quat::IDENTITY,
            ..Self::default()
        };
        light.look_along(forward);
        light
    }

    /// Build a light from the sun's position in the sky.
    ///
    /// `elevation_deg` is the angle above the horizon, `azimuth_deg` is
    /// measured clockwise from `+Z` around `+Y`.
    pub fn from_sky_angles(elevation_deg: f32, azimuth_deg: f32) -> Self {
        Self::facing(-direction_from_angles(elevation_deg, azimuth_deg))
    }

    /// Re-aim the light along `forward`. Zero-length input is ignored.
    pub fn look_along(&mut self, forward: Vec3) {
        if let Some(dir) = forward.try_normalize() {
            self.rotation = Quat::from_rotation_arc(Vec3::Z, dir);
        }
    }
}

impl LightSource for DirectionalLight {
    fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Unit vector pointing toward a sky position given in degrees.
pub fn direction_from_angles(elevation_deg: f32, azimuth_deg: f32) -> Vec3 {
    let (el_sin, el_cos) = elevation_deg.to_radians().sin_cos();
    let (az_sin, az_cos) = azimuth_deg.to_radians().sin_cos();
    Vec3::new(el_cos * az_sin, el_sin, el_cos * az_cos)
}

/// Encode a light as the sun override vector.
///
/// Returns [`Vec4::ZERO`] when no light is bound, or when its forward axis is
/// degenerate. Otherwise `xyz` is the unit vector toward the light and `w`
/// is `1.0`.
pub fn convert_light_to_sun_vector(light: Option<&dyn LightSource>) -> Vec4 {
    let Some(light) = light else {
        return Vec4::ZERO;
    };
    match (-light.forward()).try_normalize() {
        Some(toward_sun) => toward_sun.extend(1.0),
        None => {
            tracing::debug!("bound light has a zero-length forward axis; sun override disabled");
            Vec4::ZERO
        }
    }
}
