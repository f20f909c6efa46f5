use {
    genmesh::{
        generators::{Cylinder, IndexedPolygon, SharedVertex, SphereUv},
        EmitTriangles, Vertex,
    },
    nalgebra as na,
    ordered_float::OrderedFloat,
    palette::Srgb,
    std::{collections::HashMap, convert::TryFrom as _, sync::Arc},
};

/// Shape of a visual primitive, in its local space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Sphere {
        radius: OrderedFloat<f32>,
    },

    /// Cylinder centered at the origin, extending along the Z axis.
    Cylinder {
        radius: OrderedFloat<f32>,
        height: OrderedFloat<f32>,
    },
}

impl Shape {
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere {
            radius: OrderedFloat(radius),
        }
    }

    pub fn cylinder(radius: f32, height: f32) -> Self {
        Shape::Cylinder {
            radius: OrderedFloat(radius),
            height: OrderedFloat(height),
        }
    }
}

/// CPU-side triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<na::Point3<f32>>,
    pub normals: Vec<na::Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Tessellates the shape with `detail` segments around its axis.
    pub fn from_shape(shape: Shape, detail: usize) -> Self {
        let detail = detail.max(3);

        match shape {
            Shape::Sphere { radius } => {
                let radius = radius.into_inner();
                Self::from_generator(
                    &SphereUv::new(detail, (detail / 2).max(2)),
                    na::Vector3::new(radius, radius, radius),
                )
            }
            Shape::Cylinder { radius, height } => {
                let radius = radius.into_inner();
                // Generator spans `-1..1` along Z.
                Self::from_generator(
                    &Cylinder::new(detail),
                    na::Vector3::new(radius, radius, height.into_inner() / 2.0),
                )
            }
        }
    }

    fn from_generator<G, P>(generator: &G, scale: na::Vector3<f32>) -> Self
    where
        G: SharedVertex<Vertex> + IndexedPolygon<P>,
        P: EmitTriangles<Vertex = usize>,
    {
        let (positions, normals) = generator
            .shared_vertex_iter()
            .map(|v| {
                let position = na::Point3::new(
                    v.pos.x * scale.x,
                    v.pos.y * scale.y,
                    v.pos.z * scale.z,
                );
                let normal =
                    na::Vector3::new(v.normal.x, v.normal.y, v.normal.z);
                (position, normal)
            })
            .unzip();

        let indices = generator
            .indexed_polygon_iter()
            .flat_map(|polygon| {
                let mut indices = Vec::new();
                polygon.emit_triangles(|triangle| {
                    indices.push(triangle.x);
                    indices.push(triangle.y);
                    indices.push(triangle.z);
                });
                indices
            })
            .map(|index| u32::try_from(index).unwrap_or(u32::MAX))
            .collect();

        MeshData {
            positions,
            normals,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Meshes generated so far, shared by every primitive of the same shape.
#[derive(Debug)]
pub struct MeshCache {
    meshes: HashMap<Shape, Arc<MeshData>>,
    detail: usize,
}

impl MeshCache {
    pub fn new(detail: usize) -> Self {
        MeshCache {
            meshes: HashMap::new(),
            detail,
        }
    }

    pub fn get(&mut self, shape: Shape) -> Arc<MeshData> {
        let detail = self.detail;
        self.meshes
            .entry(shape)
            .or_insert_with(|| Arc::new(MeshData::from_shape(shape, detail)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub albedo: Srgb,
    pub roughness: f32,
    pub metallic: bool,
}

impl Material {
    pub fn new(albedo: Srgb, roughness: f32, metallic: bool) -> Self {
        Material {
            albedo,
            roughness,
            metallic,
        }
    }
}

/// Visual primitive attached to the scene.
#[derive(Clone, Debug)]
pub struct Renderable {
    pub shape: Shape,
    pub mesh: Arc<MeshData>,
    pub material: Material,
    pub visible: bool,
}
