//! Outline extraction from SVG markup.

use std::f64::consts::PI;

use fashionsynth_math::{Outline, Point2};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Result, SvgError};
use crate::path_data::{parse_path_data, parse_points};

/// Fewest coordinate pairs a shape must yield in the document-order pass.
pub const MIN_SHAPE_POINTS: usize = 3;

/// Number of vertices used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 12;

/// Substrings of a polygon `id`/`class` that mark it as page decoration.
const DECORATIVE_MARKERS: [&str; 3] = ["border", "frame", "viewbox"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Polygon,
    Polyline,
    Path,
    Rect,
    Circle,
}

impl ShapeKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "polygon" => Some(Self::Polygon),
            "polyline" => Some(Self::Polyline),
            "path" => Some(Self::Path),
            "rect" => Some(Self::Rect),
            "circle" => Some(Self::Circle),
            _ => None,
        }
    }
}

/// A drawable element with its attributes, namespace prefixes stripped.
#[derive(Debug, Clone)]
struct ShapeElement {
    kind: ShapeKind,
    attrs: Vec<(String, String)>,
}

impl ShapeElement {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn number(&self, name: &str) -> Result<f64> {
        match self.attr(name) {
            None => Ok(0.0),
            Some(raw) => raw.trim().parse().map_err(|_| SvgError::InvalidAttribute {
                name: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    fn is_decorative(&self) -> bool {
        ["id", "class"].iter().any(|key| {
            self.attr(key).is_some_and(|v| {
                let v = v.to_ascii_lowercase();
                DECORATIVE_MARKERS.iter().any(|m| v.contains(m))
            })
        })
    }

    fn point_list(&self) -> Vec<Point2> {
        match self.kind {
            ShapeKind::Polygon | ShapeKind::Polyline => {
                self.attr("points").map(parse_points).unwrap_or_default()
            }
            ShapeKind::Path => self.attr("d").map(parse_path_data).unwrap_or_default(),
            ShapeKind::Rect | ShapeKind::Circle => Vec::new(),
        }
    }

    fn rect_corners(&self) -> Result<Vec<Point2>> {
        let x = self.number("x")?;
        let y = self.number("y")?;
        let w = self.number("width")?;
        let h = self.number("height")?;
        if w <= 0.0 || h <= 0.0 {
            return Ok(Vec::new());
        }
        Ok(vec![
            Point2::new(x, y),
            Point2::new(x + w, y),
            Point2::new(x + w, y + h),
            Point2::new(x, y + h),
        ])
    }

    fn circle_points(&self) -> Result<Vec<Point2>> {
        let cx = self.number("cx")?;
        let cy = self.number("cy")?;
        let r = self.number("r")?;
        if r <= 0.0 {
            return Ok(Vec::new());
        }
        Ok((0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = i as f64 * 2.0 * PI / CIRCLE_SEGMENTS as f64;
                Point2::new(cx + r * angle.cos(), cy + r * angle.sin())
            })
            .collect())
    }
}

fn local_tag(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn read_shape(e: &BytesStart<'_>) -> Result<Option<ShapeElement>> {
    let Some(kind) = ShapeKind::from_tag(&local_tag(e)) else {
        return Ok(None);
    };
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| SvgError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| SvgError::Xml(err.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(Some(ShapeElement { kind, attrs }))
}

/// Collect drawable descendants of the root element in document order.
fn collect_shapes(svg: &str) -> Result<Vec<ShapeElement>> {
    let mut reader = Reader::from_str(svg);
    let mut shapes = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SvgError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(e) => {
                if depth > 0 {
                    if let Some(shape) = read_shape(&e)? {
                        shapes.push(shape);
                    }
                } else if saw_root {
                    return Err(SvgError::Xml("multiple root elements".into()));
                }
                saw_root = true;
                depth += 1;
            }
            Event::Empty(e) => {
                if depth > 0 {
                    if let Some(shape) = read_shape(&e)? {
                        shapes.push(shape);
                    }
                } else if saw_root {
                    return Err(SvgError::Xml("multiple root elements".into()));
                }
                saw_root = true;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(SvgError::Xml("no root element".into()));
    }
    if depth != 0 {
        return Err(SvgError::Xml(format!("{depth} unclosed element(s)")));
    }
    Ok(shapes)
}

/// First shape in document order yielding a usable outline.
fn document_order_pass(shapes: &[ShapeElement]) -> Result<Option<Vec<Point2>>> {
    for shape in shapes {
        let points = match shape.kind {
            ShapeKind::Polygon if shape.is_decorative() => continue,
            ShapeKind::Polygon | ShapeKind::Polyline | ShapeKind::Path => shape.point_list(),
            ShapeKind::Rect => shape.rect_corners()?,
            ShapeKind::Circle => shape.circle_points()?,
        };
        if points.len() >= MIN_SHAPE_POINTS {
            log::debug!("extracted {} points from {:?}", points.len(), shape.kind);
            return Ok(Some(points));
        }
    }
    Ok(None)
}

/// Retry pass by shape type with the decoration filter and size floor lifted.
fn shape_type_pass(shapes: &[ShapeElement]) -> Option<Vec<Point2>> {
    for kind in [ShapeKind::Polygon, ShapeKind::Polyline, ShapeKind::Path] {
        for shape in shapes.iter().filter(|s| s.kind == kind) {
            let points = shape.point_list();
            if !points.is_empty() {
                log::debug!("retry pass took {} points from {:?}", points.len(), kind);
                return Some(points);
            }
        }
    }
    None
}

/// Extract one outline from SVG markup, reporting why extraction failed.
///
/// # Errors
///
/// Returns [`SvgError::Empty`] for blank input, [`SvgError::Xml`] for
/// malformed markup, [`SvgError::InvalidAttribute`] for a non-numeric
/// rect/circle attribute, and [`SvgError::NoShape`] when no element
/// produced coordinates.
pub fn try_extract_outline(svg: &str) -> Result<Outline> {
    if svg.trim().is_empty() {
        return Err(SvgError::Empty);
    }
    let shapes = collect_shapes(svg)?;
    if let Some(points) = document_order_pass(&shapes)? {
        return Ok(Outline::new(points));
    }
    shape_type_pass(&shapes)
        .map(Outline::new)
        .ok_or(SvgError::NoShape)
}

/// Extract one outline from SVG markup.
///
/// Any failure yields an empty outline; the caller decides whether to
/// substitute a placeholder.
pub fn extract_outline(svg: &str) -> Outline {
    match try_extract_outline(svg) {
        Ok(outline) => outline,
        Err(err) => {
            log::warn!("svg extraction failed: {err}");
            Outline::default()
        }
    }
}
