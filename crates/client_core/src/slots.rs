//! Predefined spatial slots for the scene's resource figures.

/// Position, rotation, scale for one figure slot, in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotTransform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

/// The five figure slots around the floor. Resource `i` of the
/// selected project occupies slot `i`; anything beyond the list is
/// not shown.
pub const PREDEFINED_SLOTS: [SlotTransform; 5] = [
    SlotTransform {
        position: [-63.0, 5.0, -66.0],
        rotation: [0.0, 0.0, 0.0],
        scale: [20.0, 20.0, 20.0],
    },
    SlotTransform {
        position: [50.0, 5.0, -75.0],
        rotation: [0.0, -5.0, 0.0],
        scale: [20.0, 20.0, 20.0],
    },
    SlotTransform {
        position: [40.0, 5.0, 92.0],
        rotation: [0.0, -8.5, 0.0],
        scale: [20.0, 20.0, 20.0],
    },
    SlotTransform {
        position: [0.0, 5.0, -110.0],
        rotation: [0.0, 0.0, 0.0],
        scale: [20.0, 20.0, 20.0],
    },
    SlotTransform {
        position: [-75.0, 5.0, 80.0],
        rotation: [0.0, 5.0, 0.0],
        scale: [20.0, 20.0, 20.0],
    },
];

/// How far along x an entering figure starts below its slot and an
/// exiting figure travels past it.
pub const TRANSITION_OFFSET: f32 = 200.0;
