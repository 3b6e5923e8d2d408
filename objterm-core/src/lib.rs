/// objterm core library - software rasterization pipeline
///
/// Linear algebra, the indexed mesh model, texture sampling and the
/// depth-buffered renderer, plus OBJ/MTL loading that feeds them.

pub mod error;
pub mod geometry;
pub mod mtl;
pub mod obj;
pub mod projection;
pub mod renderer;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use error::{LoadError, LoadResult};
pub use geometry::{Mesh, TexCoord, Triangle};
pub use obj::{load_obj, parse_obj};
pub use projection::{Camera, Orbit};
pub use renderer::{Pixel, RenderStats, Renderer, BACKGROUND_DEPTH};
pub use texture::{Rgb, Texture};
pub use transform::{transform_point, Mat4, Transform, Vec3, VectorExt};
