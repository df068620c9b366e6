//! Collision world containing all static geometry.
//!
//! The collision world stores collidable brushes and answers the
//! [`CollisionQuery`] calls movement makes, using parry3d for the geometry.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, PointQuery, ShapeCastOptions, ShapeCastStatus};
use parry3d::shape::{Shape, SharedShape};

use crate::error::PhysicsError;

use super::layers::CollisionLayers;
use super::query::{
    CastHit, CollisionQuery, Penetration, QueryFilter, QueryShape, SurfaceId, SurfaceMaterial,
};

/// A piece of collision geometry in the world.
#[derive(Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: SurfaceId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Layer the brush sits on.
    pub layers: CollisionLayers,
    /// Surface material, if any. Surfaces without one apply no ground friction.
    pub material: Option<SurfaceMaterial>,
}

impl std::fmt::Debug for CollisionBrush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionBrush")
            .field("id", &self.id)
            .field("shape", &self.shape.shape_type())
            .field("transform", &self.transform)
            .field("layers", &self.layers)
            .field("material", &self.material)
            .finish()
    }
}

/// The collision world containing all geometry.
///
/// Supports:
/// - Box brushes (axis-aligned and oriented)
/// - Convex hull brushes
/// - Triangle mesh brushes
///
/// Queries take `&self`; the world is never mutated while movement runs, so
/// one world can serve every entity in a tick.
#[derive(Debug, Default, Clone)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `layers` - Layer the box sits on
    pub fn add_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        layers: CollisionLayers,
    ) -> SurfaceId {
        self.add_oriented_box(center, Quat::IDENTITY, half_extents, layers)
    }

    /// Add a rotated box to the world. Used for ramps and tilted walls.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        layers: CollisionLayers,
    ) -> SurfaceId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.push(shape, isometry(center, rotation), layers)
    }

    /// Add a convex hull to the world.
    ///
    /// Returns `None` if the hull couldn't be computed (fewer than four
    /// non-coplanar points).
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec3],
        layers: CollisionLayers,
    ) -> Option<SurfaceId> {
        if points.len() < 4 {
            return None;
        }
        let parry_points: Vec<Point<Real>> = points.iter().map(|p| point(*p)).collect();
        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push(shape, Isometry::identity(), layers))
    }

    /// Add a triangle mesh to the world.
    ///
    /// Returns `None` for an empty or malformed mesh.
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        layers: CollisionLayers,
    ) -> Option<SurfaceId> {
        if vertices.is_empty() || indices.is_empty() {
            return None;
        }
        let vertex_count = vertices.len() as u32;
        if indices.iter().flatten().any(|&i| i >= vertex_count) {
            return None;
        }

        let parry_vertices: Vec<Point<Real>> = vertices.iter().map(|v| point(*v)).collect();
        let shape = SharedShape::trimesh(parry_vertices, indices.to_vec());
        Some(self.push(shape, Isometry::identity(), layers))
    }

    /// Give a surface a material. Returns `false` for an unknown id.
    pub fn set_material(&mut self, id: SurfaceId, material: SurfaceMaterial) -> bool {
        match self.brush_mut(id) {
            Some(brush) => {
                brush.material = Some(material);
                true
            }
            None => false,
        }
    }

    /// Move a surface to another layer. Returns `false` for an unknown id.
    pub fn set_layers(&mut self, id: SurfaceId, layers: CollisionLayers) -> bool {
        match self.brush_mut(id) {
            Some(brush) => {
                brush.layers = layers;
                true
            }
            None => false,
        }
    }

    /// Remove a brush. Returns it if it existed.
    pub fn remove(&mut self, id: SurfaceId) -> Option<CollisionBrush> {
        let index = self.brushes.iter().position(|b| b.id == id)?;
        Some(self.brushes.remove(index))
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Look up a brush by id.
    pub fn brush(&self, id: SurfaceId) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|b| b.id == id)
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        layers: CollisionLayers,
    ) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            layers,
            material: None,
        });

        id
    }

    fn brush_mut(&mut self, id: SurfaceId) -> Option<&mut CollisionBrush> {
        self.brushes.iter_mut().find(|b| b.id == id)
    }

    fn candidates<'a>(
        &'a self,
        filter: &'a QueryFilter,
    ) -> impl Iterator<Item = &'a CollisionBrush> + 'a {
        self.brushes
            .iter()
            .filter(move |brush| filter.accepts(brush.id, brush.layers))
    }
}

impl CollisionQuery for CollisionWorld {
    fn cast(
        &self,
        shape: &QueryShape,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &QueryFilter,
    ) -> Result<Option<CastHit>, PhysicsError> {
        let (test_shape, test_transform) = parry_shape(shape, origin);
        let velocity = vector(direction);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            target_distance: 0.0,
            stop_at_penetration: false,
            compute_impact_geometry_on_penetration: false,
        };

        let mut closest: Option<CastHit> = None;

        for brush in self.candidates(filter) {
            let hit = query::cast_shapes(
                &test_transform,
                &velocity,
                test_shape.as_ref(),
                &brush.transform,
                &Vector::zeros(),
                brush.shape.as_ref(),
                options,
            )
            .map_err(|_| PhysicsError::UnsupportedPair { operation: "cast" })?;

            let Some(hit) = hit else {
                continue;
            };

            // Brushes overlapping at the start are not obstacles for this sweep.
            if matches!(
                hit.status,
                ShapeCastStatus::PenetratingOrWithinTargetDist | ShapeCastStatus::Failed
            ) {
                continue;
            }

            let is_closer = closest
                .as_ref()
                .map_or(true, |c| hit.time_of_impact < c.distance);
            if !is_closer {
                continue;
            }

            let local_normal = surface_normal(brush.shape.as_ref(), &hit.witness2)
                .unwrap_or(*hit.normal2);
            let normal = brush.transform.rotation * local_normal;
            let contact = brush.transform * hit.witness2;

            closest = Some(CastHit {
                distance: hit.time_of_impact,
                point: Vec3::new(contact.x, contact.y, contact.z),
                normal: Vec3::new(normal.x, normal.y, normal.z).normalize_or_zero(),
                surface: brush.id,
            });
        }

        Ok(closest)
    }

    fn overlap(
        &self,
        shape: &QueryShape,
        origin: Vec3,
        filter: &QueryFilter,
        out: &mut [SurfaceId],
    ) -> Result<usize, PhysicsError> {
        let (test_shape, test_transform) = parry_shape(shape, origin);
        let mut count = 0;

        for brush in self.candidates(filter) {
            if count == out.len() {
                break;
            }

            let intersects = query::intersection_test(
                &test_transform,
                test_shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
            )
            .map_err(|_| PhysicsError::UnsupportedPair { operation: "overlap" })?;

            if intersects {
                out[count] = brush.id;
                count += 1;
            }
        }

        Ok(count)
    }

    fn penetration(
        &self,
        shape: &QueryShape,
        origin: Vec3,
        other: SurfaceId,
    ) -> Result<Option<Penetration>, PhysicsError> {
        let Some(brush) = self.brush(other) else {
            return Ok(None);
        };
        let (test_shape, test_transform) = parry_shape(shape, origin);

        let contact = query::contact(
            &test_transform,
            test_shape.as_ref(),
            &brush.transform,
            brush.shape.as_ref(),
            0.0,
        )
        .map_err(|_| PhysicsError::UnsupportedPair {
            operation: "compute penetration for",
        })?;

        // Negative dist means penetration. normal1 points from us into the
        // brush, so we leave along its opposite.
        Ok(contact.and_then(|c| {
            let depth = -c.dist;
            (depth > 0.0).then(|| Penetration {
                direction: -Vec3::new(c.normal1.x, c.normal1.y, c.normal1.z),
                distance: depth,
            })
        }))
    }

    fn material(&self, surface: SurfaceId) -> Option<SurfaceMaterial> {
        self.brush(surface).and_then(|b| b.material)
    }
}

/// Outward normal of the feature of `shape` nearest to `local_point`.
///
/// Cast hits carry an approximate normal. Face normals from here are exact:
/// a vertical wall has no vertical component.
fn surface_normal(shape: &dyn Shape, local_point: &Point<Real>) -> Option<Vector<Real>> {
    let (projection, feature) = shape.project_local_point_and_get_feature(local_point);
    shape
        .feature_normal_at_point(feature, &projection.point)
        .map(|normal| *normal)
}

/// Build the parry shape and world transform for a query shape at `origin`.
fn parry_shape(shape: &QueryShape, origin: Vec3) -> (SharedShape, Isometry<Real>) {
    match *shape {
        QueryShape::Cuboid { half_extents } => (
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            isometry(origin, Quat::IDENTITY),
        ),
        QueryShape::Capsule { a, b, radius } => (
            SharedShape::capsule(point(a), point(b), radius),
            isometry(origin, Quat::IDENTITY),
        ),
        QueryShape::Ball { center, radius } => (
            SharedShape::ball(radius),
            isometry(origin + center, Quat::IDENTITY),
        ),
    }
}

#[inline]
fn point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
fn vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn isometry(translation: Vec3, rotation: Quat) -> Isometry<Real> {
    let (axis, angle) = rotation.to_axis_angle();
    Isometry::new(vector(translation), vector(axis * angle))
}

// ============================================================================
// Tests
// ============================================================================
