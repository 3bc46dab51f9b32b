use std::sync::Arc;

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::geometry::{Aabb, FloatType, Ray};

use super::{HitRecord, Hittable, SceneError};

/// Binary bounding-volume hierarchy node. Built once per scene by median
/// split along a randomly chosen axis; read-only afterwards, so rendering
/// threads can traverse it concurrently.
pub struct BvhNode {
    left: Arc<Hittable>,
    right: Arc<Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Builds a tree over the given objects for the `[time0, time1]` shutter
    /// interval. The axis choice consumes the generator, so a seeded build
    /// is reproducible. Fails if any object cannot report a bounding box.
    pub fn new(
        objects: Vec<Arc<Hittable>>,
        time0: FloatType,
        time1: FloatType,
        rng: &mut impl Rng,
    ) -> Result<BvhNode, SceneError> {
        let mut entries = objects
            .into_iter()
            .map(|object| {
                let bbox = object.bounding_box(time0, time1)?;
                Ok((object, bbox))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        if entries.is_empty() {
            return Err(SceneError::EmptyBvh);
        }

        log::debug!("building a BVH over {} objects", entries.len());
        Ok(Self::build(&mut entries, rng))
    }

    fn build(entries: &mut [(Arc<Hittable>, Aabb)], rng: &mut impl Rng) -> BvhNode {
        let axis = rng.random_range(0..3usize);

        match entries {
            [] => unreachable!("build is never called with an empty range"),
            [(object, bbox)] => BvhNode {
                // Duplicating the single object avoids a one-child node type
                left: Arc::clone(object),
                right: Arc::clone(object),
                bbox: bbox.clone(),
            },
            [(first, first_box), (second, second_box)] => {
                let bbox = Aabb::surrounding_box(first_box, second_box);
                let (left, right) = if first_box.min[axis] <= second_box.min[axis] {
                    (Arc::clone(first), Arc::clone(second))
                } else {
                    (Arc::clone(second), Arc::clone(first))
                };
                BvhNode { left, right, bbox }
            }
            _ => {
                entries.sort_unstable_by_key(|(_, bbox)| OrderedFloat(bbox.min[axis]));

                let mid = entries.len() / 2;
                let (lower, upper) = entries.split_at_mut(mid);
                let left = Self::build(lower, rng);
                let right = Self::build(upper, rng);
                let bbox = Aabb::surrounding_box(&left.bbox, &right.bbox);

                BvhNode {
                    left: Arc::new(Hittable::Bvh(left)),
                    right: Arc::new(Hittable::Bvh(right)),
                    bbox,
                }
            }
        }
    }

    pub fn hit(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        rng: &mut impl Rng,
    ) -> Option<HitRecord> {
        if !self.bbox.hit(ray, t_min, t_max) {
            return None;
        }

        let left_hit = self.left.hit(ray, t_min, t_max, rng);
        // Anything the right subtree reports must beat the left hit
        let right_window = left_hit.as_ref().map_or(t_max, |hit| hit.t);
        let right_hit = self.right.hit(ray, t_min, right_window, rng);

        right_hit.or(left_hit)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox.clone()
    }
}
