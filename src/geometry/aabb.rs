use super::{FloatType, Ray, WorldPoint};

/// Axis-aligned bounding box. Zero-thickness boxes are valid; flat
/// primitives pad the degenerate axis before handing their box to the BVH.
#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl Aabb {
    pub fn new(min: WorldPoint, max: WorldPoint) -> Aabb {
        Aabb { min, max }
    }

    /// The smallest box enclosing both input boxes.
    pub fn surrounding_box(a: &Aabb, b: &Aabb) -> Aabb {
        Aabb {
            min: a.min.coords.inf(&b.min.coords).into(),
            max: a.max.coords.sup(&b.max.coords).into(),
        }
    }

    /// Slab test: shrink the `[t_min, t_max]` window by the entry/exit
    /// distances on each axis, failing as soon as it becomes empty.
    ///
    /// Axis-parallel rays divide by zero here; IEEE rules turn that into
    /// ±infinity (or NaN when the origin lies exactly on a slab plane, which
    /// `max`/`min` then ignore), so no special casing is needed.
    pub fn hit(&self, ray: &Ray, mut t_min: FloatType, mut t_max: FloatType) -> bool {
        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max <= t_min {
                return false;
            }
        }
        true
    }
}
