/// Material library (MTL) parsing and diffuse texture lookup
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::obj::keyword;
use crate::texture::Texture;

/// A named material and its diffuse map, if it has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub name: String,
    pub diffuse_map: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialLibrary {
    pub materials: Vec<Material>,
    last_diffuse_map: Option<String>,
}

impl MaterialLibrary {
    /// The diffuse map used for the whole mesh: the last `map_Kd` in the file
    pub fn diffuse_map(&self) -> Option<&str> {
        self.last_diffuse_map.as_deref()
    }
}

/// Parse MTL text. Only material names and `map_Kd` are read.
pub fn parse_mtl(source: &str) -> MaterialLibrary {
    let mut library = MaterialLibrary::default();

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Ok((rest, kw)) = keyword(line) else {
            continue;
        };
        match kw {
            "newmtl" => library.materials.push(Material {
                name: rest.trim().to_string(),
                diffuse_map: None,
            }),
            "map_Kd" => {
                // options such as `-s 1 1 1` precede the file name
                let Some(file) = rest.split_whitespace().last() else {
                    continue;
                };
                if let Some(material) = library.materials.last_mut() {
                    material.diffuse_map = Some(file.to_string());
                }
                library.last_diffuse_map = Some(file.to_string());
            }
            other => trace!("mtl: skipping `{}`", other),
        }
    }

    library
}

/// Path of the material library for `obj_path`: the `mtllib` entry relative
/// to the OBJ directory, or `<stem>.mtl` beside it.
pub fn material_lib_path(obj_path: &Path, material_lib: Option<&str>) -> PathBuf {
    let dir = obj_path.parent().unwrap_or_else(|| Path::new(""));
    match material_lib {
        Some(name) => dir.join(name),
        None => {
            let stem = obj_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            dir.join(format!("{}.mtl", stem))
        }
    }
}

/// Places to look for a diffuse map, most specific first
pub fn texture_candidates(obj_path: &Path, map: &str) -> Vec<PathBuf> {
    let dir = obj_path.parent().unwrap_or_else(|| Path::new(""));
    let mut candidates = vec![PathBuf::from(map), dir.join(map)];
    // exporters often write absolute or foreign paths; fall back to the bare name
    if let Some(name) = Path::new(&map.replace('\\', "/")).file_name() {
        candidates.push(dir.join(name));
    }
    candidates.dedup();
    candidates
}

/// Resolve and decode the diffuse texture for an OBJ file.
///
/// Every failure is logged and yields an empty texture.
pub fn find_diffuse_texture(obj_path: &Path, material_lib: Option<&str>) -> Texture {
    let mtl_path = material_lib_path(obj_path, material_lib);
    let source = match fs::read_to_string(&mtl_path) {
        Ok(source) => source,
        Err(e) => {
            debug!("no material library at {}: {}", mtl_path.display(), e);
            return Texture::empty();
        }
    };

    let library = parse_mtl(&source);
    let Some(map) = library.diffuse_map() else {
        debug!("{} has no diffuse map", mtl_path.display());
        return Texture::empty();
    };

    for candidate in texture_candidates(obj_path, map) {
        match Texture::open(&candidate) {
            Ok(texture) if texture.is_loaded() => return texture,
            Ok(_) => debug!("{} decoded to an empty image", candidate.display()),
            Err(e) => debug!("{}", e),
        }
    }

    warn!("texture `{}` could not be loaded, rendering untextured", map);
    Texture::empty()
}
