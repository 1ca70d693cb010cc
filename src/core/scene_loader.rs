// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::background::Background;
use crate::core::material::Material;
use crate::core::scene::{Scene, DEFAULT_SEED};
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::materials::absorber::Absorber;
use crate::materials::dielectric::Dielectric;
use crate::materials::diffuse_light::DiffuseLight;
use crate::materials::lambertian_diffuse::LambertianDiffuse;
use crate::materials::metal::Metal;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::group::ShapeGroup;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    Parse(String),
    MissingField(&'static str),
    UnknownReference(String),
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<quick_xml::Error> for SceneLoadError {
    fn from(err: quick_xml::Error) -> Self {
        SceneLoadError::Xml(err)
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(err) => write!(f, "io error: {}", err),
            SceneLoadError::Xml(err) => write!(f, "xml error: {}", err),
            SceneLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
            SceneLoadError::UnknownReference(id) => write!(f, "unknown reference: {}", id),
        }
    }
}

impl std::error::Error for SceneLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneLoadError::Io(err) => Some(err),
            SceneLoadError::Xml(err) => Some(err),
            _ => None,
        }
    }
}

/// Reads and parses a scene description file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneLoadError> {
    let path = path.as_ref();
    info!("Loading scene from \"{}\"...", path.display());
    let xml = fs::read_to_string(path)?;
    parse_scene(&xml)
}

/// Builds a scene from XML text. The text itself is kept as the scene's
/// description so it can be embedded in the rendered image.
pub fn parse_scene(xml: &str) -> Result<Scene, SceneLoadError> {
    let root = parse_tree(xml)?;
    if root.name != "scene" {
        return Err(SceneLoadError::Parse(format!("expected <scene> root, found <{}>", root.name)));
    }

    let sensor = root.child("sensor").ok_or(SceneLoadError::MissingField("sensor"))?;
    let camera = build_camera(sensor)?;

    let (samples_per_pixel, seed) = match sensor.child("sampler") {
        Some(sampler) => (
            sampler.integer("sample_count")?.map(to_sample_count).transpose()?.unwrap_or(1),
            sampler.integer("seed")?.unwrap_or(DEFAULT_SEED),
        ),
        None => (1, DEFAULT_SEED),
    };

    let background = match root.child("background") {
        Some(element) => build_background(element)?,
        None => Background::default(),
    };

    let mut materials: HashMap<String, Arc<dyn Material>> = HashMap::new();
    for element in root.children_named("bsdf") {
        let id = element.attr("id").ok_or(SceneLoadError::MissingField("bsdf.id"))?;
        materials.insert(id.to_string(), build_material(element)?);
    }

    let mut shapes = ShapeGroup::new();
    for element in root.children_named("shape") {
        shapes.add(build_shape(element, &materials)?);
    }
    debug!("Scene has {} shapes and {} named materials", shapes.len(), materials.len());
    debug!("{}", camera.describe());
    debug!("{}", shapes.describe());

    Ok(Scene::new(Box::new(camera), shapes)
        .with_background(background)
        .with_samples_per_pixel(samples_per_pixel)
        .with_seed(seed)
        .with_description(xml.to_string()))
}

/// Element tree with `$name` defaults already substituted.
#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    fn from_start(e: &BytesStart<'_>, defaults: &HashMap<String, String>) -> Result<Self, SceneLoadError> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| SceneLoadError::Parse(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = resolve_value(&attr.unescape_value()?, defaults);
            attributes.push((key, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Value of `<tag name="name" value=".."/>` among the direct children.
    fn property(&self, tags: &[&str], name: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|c| tags.contains(&c.name.as_str()) && c.attr("name") == Some(name))
            .and_then(|c| c.attr("value"))
    }

    fn float(&self, name: &str) -> Result<Option<Float>, SceneLoadError> {
        self.property(&["float"], name).map(parse_float).transpose()
    }

    fn integer(&self, name: &str) -> Result<Option<u64>, SceneLoadError> {
        self.property(&["integer"], name).map(parse_integer).transpose()
    }

    fn vector(&self, name: &str) -> Result<Option<Vector3f>, SceneLoadError> {
        self.property(&["point", "vector"], name).map(parse_vec3).transpose()
    }

    fn spectrum(&self, name: &str) -> Result<Option<RGBSpectrum>, SceneLoadError> {
        self.property(&["rgb", "spectrum", "float"], name).map(parse_spectrum).transpose()
    }
}

fn parse_tree(xml: &str) -> Result<Element, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let finished = match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                stack.push(Element::from_start(&e, &defaults)?);
                None
            }
            Event::Empty(e) => Some(Element::from_start(&e, &defaults)?),
            Event::End(_) => stack.pop(),
            _ => None,
        };

        if let Some(element) = finished {
            if element.name == "default" {
                if let (Some(name), Some(value)) = (element.attr("name"), element.attr("value")) {
                    defaults.insert(name.to_string(), value.to_string());
                }
            }
            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None if root.is_none() => root = Some(element),
                None => return Err(SceneLoadError::Parse(String::from("multiple root elements"))),
            }
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(SceneLoadError::Parse(String::from("unexpected end of document")));
    }
    root.ok_or_else(|| SceneLoadError::Parse(String::from("empty document")))
}

fn build_camera(sensor: &Element) -> Result<PerspectiveCamera, SceneLoadError> {
    match sensor.attr("type") {
        Some("perspective") | None => {}
        Some(other) => return Err(SceneLoadError::Parse(format!("unsupported sensor: {}", other))),
    }

    let film = sensor.child("film").ok_or(SceneLoadError::MissingField("film"))?;
    let width = film.integer("width")?.ok_or(SceneLoadError::MissingField("film.width"))? as usize;
    let height = film.integer("height")?.ok_or(SceneLoadError::MissingField("film.height"))? as usize;

    let fov = sensor.float("fov")?.ok_or(SceneLoadError::MissingField("sensor.fov"))?;
    let lookat = sensor
        .children_named("transform")
        .filter(|t| t.attr("name").map_or(true, |n| n == "to_world"))
        .find_map(|t| t.child("lookat"))
        .ok_or(SceneLoadError::MissingField("sensor.lookat"))?;
    let origin = parse_vec3(lookat.attr("origin").ok_or(SceneLoadError::MissingField("lookat.origin"))?)?;
    let target = parse_vec3(lookat.attr("target").ok_or(SceneLoadError::MissingField("lookat.target"))?)?;
    let up = match lookat.attr("up") {
        Some(up) => parse_vec3(up)?,
        None => Vector3f::new(0.0, 1.0, 0.0),
    };
    if (target - origin).norm() == 0.0 {
        return Err(SceneLoadError::Parse(String::from("camera origin and target coincide")));
    }
    if !(fov > 0.0 && fov < 180.0) {
        return Err(SceneLoadError::Parse(format!("sensor fov must lie in (0, 180) degrees, got {}", fov)));
    }
    // An up vector along the view direction leaves the camera frame undefined.
    let forward = (target - origin).normalize();
    if !(forward.cross(&up).norm() > 1e-6 * up.norm()) {
        return Err(SceneLoadError::Parse(String::from("camera up vector is parallel to the view direction")));
    }

    let mut camera = PerspectiveCamera::new(origin, target, up, fov, width, height);
    if let Some(aperture) = sensor.float("aperture")? {
        let focus_distance = sensor.float("focus_distance")?.unwrap_or((target - origin).norm());
        camera = camera.with_lens(aperture, focus_distance);
    }
    Ok(camera)
}

fn build_background(element: &Element) -> Result<Background, SceneLoadError> {
    match element.attr("type").unwrap_or("constant") {
        "constant" => {
            let radiance = element.spectrum("radiance")?
                .ok_or(SceneLoadError::MissingField("background.radiance"))?;
            Ok(Background::Constant(radiance))
        }
        "gradient" => {
            let horizon = element.spectrum("horizon")?
                .ok_or(SceneLoadError::MissingField("background.horizon"))?;
            let zenith = element.spectrum("zenith")?
                .ok_or(SceneLoadError::MissingField("background.zenith"))?;
            Ok(Background::Gradient { horizon, zenith })
        }
        other => Err(SceneLoadError::Parse(format!("unsupported background: {}", other))),
    }
}

fn build_material(element: &Element) -> Result<Arc<dyn Material>, SceneLoadError> {
    let material: Arc<dyn Material> = match element.attr("type") {
        Some("diffuse") => {
            let reflectance = element.spectrum("reflectance")?.unwrap_or(RGBSpectrum::splat(0.5));
            Arc::new(LambertianDiffuse::new(reflectance))
        }
        Some("conductor") => {
            let reflectance = element.spectrum("reflectance")?.unwrap_or(RGBSpectrum::splat(1.0));
            let roughness = element.float("roughness")?.unwrap_or(0.0);
            Arc::new(Metal::new(reflectance, roughness))
        }
        Some("dielectric") => {
            let ior = element.float("int_ior")?.unwrap_or(1.5);
            Arc::new(Dielectric::new(ior))
        }
        Some("absorber") => Arc::new(Absorber::new()),
        Some(other) => return Err(SceneLoadError::Parse(format!("unsupported bsdf: {}", other))),
        None => return Err(SceneLoadError::MissingField("bsdf.type")),
    };
    Ok(material)
}

fn shape_material(element: &Element,
                  materials: &HashMap<String, Arc<dyn Material>>) -> Result<Arc<dyn Material>, SceneLoadError> {
    if let Some(emitter) = element.child("emitter") {
        match emitter.attr("type") {
            Some("area") | None => {}
            Some(other) => return Err(SceneLoadError::Parse(format!("unsupported emitter: {}", other))),
        }
        let radiance = emitter.spectrum("radiance")?.unwrap_or(RGBSpectrum::splat(1.0));
        return Ok(Arc::new(DiffuseLight::new(radiance)));
    }
    if let Some(inline) = element.child("bsdf") {
        return build_material(inline);
    }
    let reference = element.child("ref").ok_or(SceneLoadError::MissingField("shape.bsdf"))?;
    let id = reference.attr("id").ok_or(SceneLoadError::MissingField("ref.id"))?;
    materials
        .get(id)
        .cloned()
        .ok_or_else(|| SceneLoadError::UnknownReference(id.to_string()))
}

fn build_shape(element: &Element,
               materials: &HashMap<String, Arc<dyn Material>>) -> Result<Box<dyn Shape>, SceneLoadError> {
    let shape: Box<dyn Shape> = match element.attr("type") {
        Some("sphere") => {
            let center = element.vector("center")?.unwrap_or_else(Vector3f::zeros);
            let radius = element.float("radius")?.unwrap_or(1.0);
            if radius <= 0.0 {
                return Err(SceneLoadError::Parse(format!("sphere radius must be positive, got {}", radius)));
            }
            Box::new(Sphere::new(center, radius, shape_material(element, materials)?))
        }
        Some("rectangle") => {
            let corner = element.vector("corner")?.ok_or(SceneLoadError::MissingField("rectangle.corner"))?;
            let edge_u = element.vector("edge_u")?.ok_or(SceneLoadError::MissingField("rectangle.edge_u"))?;
            let edge_v = element.vector("edge_v")?.ok_or(SceneLoadError::MissingField("rectangle.edge_v"))?;
            if edge_u.cross(&edge_v).norm() == 0.0 {
                return Err(SceneLoadError::Parse(String::from("rectangle edges are parallel")));
            }
            Box::new(Rectangle::new(corner, edge_u, edge_v, shape_material(element, materials)?))
        }
        Some(other) => return Err(SceneLoadError::Parse(format!("unsupported shape: {}", other))),
        None => return Err(SceneLoadError::MissingField("shape.type")),
    };
    Ok(shape)
}

/// Substitutes `$name` references. Longer names go first so `$spp2` is
/// not clobbered by `$spp`.
fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    if !raw.contains('$') {
        return raw.to_string();
    }
    let mut keys: Vec<&String> = defaults.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let mut out = raw.to_string();
    for k in keys {
        out = out.replace(&format!("${}", k), &defaults[k]);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_integer(value: &str) -> Result<u64, SceneLoadError> {
    value.trim().parse::<u64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn to_sample_count(value: u64) -> Result<u32, SceneLoadError> {
    u32::try_from(value).map_err(|_| SceneLoadError::Parse(format!("sample count out of range: {}", value)))
}

fn split_components(value: &str) -> Vec<&str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    match split_components(value).as_slice() {
        [x, y, z] => Ok(Vector3f::new(parse_float(x)?, parse_float(y)?, parse_float(z)?)),
        _ => Err(SceneLoadError::Parse(format!("invalid vec3: {}", value))),
    }
}

/// Either three components or a single grey value.
fn parse_spectrum(value: &str) -> Result<RGBSpectrum, SceneLoadError> {
    match split_components(value).as_slice() {
        [v] => Ok(RGBSpectrum::splat(parse_float(v)?)),
        [r, g, b] => Ok(RGBSpectrum::new(parse_float(r)?, parse_float(g)?, parse_float(b)?)),
        _ => Err(SceneLoadError::Parse(format!("invalid rgb: {}", value))),
    }
}
