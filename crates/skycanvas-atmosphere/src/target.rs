//! Material parameter targets: the containers the updater writes into.
//!
//! The updater never owns its targets. Hosts hand it [`SharedMaterial`]
//! handles and keep their own clones for rendering.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use crate::params::ParameterId;

/// A material that accepts named vector parameters.
pub trait MaterialTarget {
    /// Set the vector parameter `id` to `value`.
    fn set_vector(&mut self, id: ParameterId, value: Vec4);
}

/// Shared, externally-owned material handle.
pub type SharedMaterial = Rc<RefCell<dyn MaterialTarget>>;

// ---------------------------------------------------------------------------
// ParameterBlock
// ---------------------------------------------------------------------------

/// In-memory vector parameter storage for one material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterBlock {
    label: String,
    vectors: HashMap<ParameterId, Vec4>,
    writes: u64,
}

impl ParameterBlock {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Convenience for `Rc::new(RefCell::new(ParameterBlock::new(label)))`.
    pub fn shared(label: impl Into<String>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(label)))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current value of `id`, if it was ever written.
    pub fn get_vector(&self, id: ParameterId) -> Option<Vec4> {
        self.vectors.get(&id).copied()
    }

    /// Total number of `set_vector` calls received.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Number of distinct parameters holding a value.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl MaterialTarget for ParameterBlock {
    fn set_vector(&mut self, id: ParameterId, value: Vec4) {
        self.vectors.insert(id, value);
        self.writes += 1;
    }
}

// ---------------------------------------------------------------------------
// AtmosphereUniform
// ---------------------------------------------------------------------------

/// GPU-side packing of the published atmosphere parameters, 48 bytes,
/// std140-compatible (three `vec4<f32>`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct AtmosphereUniform {
    /// xyz = viewer head position, w = 1.
    pub camera_position_offset: [f32; 4],
    /// xyz = direction toward the sun, w = override flag.
    pub override_sun: [f32; 4],
    /// x = slow wind phase, y = fast wind phase, z = 0, w = 1.
    pub override_time: [f32; 4],
}

impl AtmosphereUniform {
    pub fn new(camera_position_offset: Vec4, override_sun: Vec4, override_time: Vec4) -> Self {
        Self {
            camera_position_offset: camera_position_offset.to_array(),
            override_sun: override_sun.to_array(),
            override_time: override_time.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_records_writes() {
        let mut block = ParameterBlock::new("clouds");
        assert!(block.is_empty());
        block.set_vector(ParameterId(3), Vec4::ONE);
        block.set_vector(ParameterId(3), Vec4::X);
        assert_eq!(block.get_vector(ParameterId(3)), Some(Vec4::X));
        assert_eq!(block.get_vector(ParameterId(4)), None);
        assert_eq!(block.len(), 1);
        assert_eq!(block.write_count(), 2);
        assert_eq!(block.label(), "clouds");
    }

    #[test]
    fn test_shared_block_coerces_to_material_handle() {
        let block = ParameterBlock::shared("sky");
        let handle: SharedMaterial = block.clone();
        handle.borrow_mut().set_vector(ParameterId(0), Vec4::W);
        assert_eq!(block.borrow().get_vector(ParameterId(0)), Some(Vec4::W));
    }

    #[test]
    fn test_uniform_buffer_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<AtmosphereUniform>(), 48);
        assert_eq!(std::mem::offset_of!(AtmosphereUniform, camera_position_offset), 0);
        assert_eq!(std::mem::offset_of!(AtmosphereUniform, override_sun), 16);
        assert_eq!(std::mem::offset_of!(AtmosphereUniform, override_time), 32);
    }

    #[test]
    fn test_uniform_packs_vectors() {
        let u = AtmosphereUniform::new(
            Vec4::new(1.0, 2.0, 3.0, 1.0),
            Vec4::new(0.0, 0.0, -1.0, 1.0),
            Vec4::new(1080.0, 21600.0, 0.0, 1.0),
        );
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&u));
        assert_eq!(floats.len(), 12);
        assert_eq!(floats[2], 3.0);
        assert_eq!(floats[6], -1.0);
        assert_eq!(floats[9], 21600.0);
    }
}
