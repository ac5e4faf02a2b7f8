//! Editor objects - the items placed on the layout.
//!
//! Every object shares a common base (identity, placement, layering and
//! visibility) and carries a [`ObjectKind`] with the attributes only its
//! variant understands. Partial edits arrive as an [`ObjectPatch`] and are
//! merged with [`EditorObject::apply_patch`], which is also how creation-time
//! overrides are applied.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::geometry::{bounds_from_points, clamp, Point};

/// Unique identifier for an object within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The variant tag of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// A polygon on the backdrop layer.
    Region,
    /// A text box.
    Text,
    /// A placed image.
    Image,
    /// A rectangle.
    Rect,
    /// A circle.
    Circle,
}

impl ObjectType {
    /// Human-readable label used for default object names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Rect => "Rectangle",
            Self::Circle => "Circle",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Region => "region",
            Self::Text => "text",
            Self::Image => "image",
            Self::Rect => "rect",
            Self::Circle => "circle",
        };
        f.write_str(tag)
    }
}

/// Outline color and width. Carried opaquely for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stroke color (any CSS color string).
    pub color: String,
    /// Stroke width in document units.
    #[serde(default = "Stroke::default_width")]
    pub width: f64,
}

impl Stroke {
    /// Create a stroke.
    #[must_use]
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }

    const fn default_width() -> f64 {
        1.0
    }
}

/// Horizontal alignment of text content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Variant-specific attributes of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ObjectKind {
    /// A polygon whose points carry absolute document positions.
    Region {
        /// Flat `[x0, y0, x1, y1, ...]` sequence.
        #[serde(default)]
        points: Vec<f64>,
        /// Fill color.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Outline.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<Stroke>,
        /// Pattern reference used instead of a flat fill.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },

    /// A text box.
    Text {
        /// Text content.
        #[serde(default)]
        text: String,
        /// Font size in document units.
        #[serde(default = "defaults::font_size")]
        font_size: f64,
        /// Font family name.
        #[serde(default = "defaults::font_family")]
        font_family: String,
        /// Horizontal alignment.
        #[serde(default)]
        align: TextAlign,
        /// Text color.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
    },

    /// A placed image.
    Image {
        /// Image source reference (URI or data URL).
        #[serde(default)]
        src: String,
    },

    /// A rectangle.
    Rect {
        /// Fill color.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Outline.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<Stroke>,
        /// Corner radius.
        #[serde(default)]
        corner_radius: f64,
    },

    /// A circle inscribed in the object's box.
    Circle {
        /// Fill color.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        /// Outline.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<Stroke>,
    },
}

impl ObjectKind {
    /// The variant tag.
    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        match self {
            Self::Region { .. } => ObjectType::Region,
            Self::Text { .. } => ObjectType::Text,
            Self::Image { .. } => ObjectType::Image,
            Self::Rect { .. } => ObjectType::Rect,
            Self::Circle { .. } => ObjectType::Circle,
        }
    }

    /// Default attributes for a variant.
    #[must_use]
    pub fn default_for(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::Region => EditorObject::region(ObjectId::new(""), Vec::new()).kind,
            ObjectType::Text => Self::Text {
                text: defaults::TEXT_CONTENT.to_string(),
                font_size: defaults::font_size(),
                font_family: defaults::font_family(),
                align: TextAlign::Left,
                fill: Some(defaults::TEXT_FILL.to_string()),
            },
            ObjectType::Image => Self::Image {
                src: defaults::IMAGE_SRC.to_string(),
            },
            ObjectType::Rect => Self::Rect {
                fill: Some(defaults::RECT_FILL.to_string()),
                stroke: None,
                corner_radius: 0.0,
            },
            ObjectType::Circle => Self::Circle {
                fill: Some(defaults::CIRCLE_FILL.to_string()),
                stroke: None,
            },
        }
    }
}

/// Variant defaults used by [`EditorObject::with_defaults`].
pub mod defaults {
    /// Default text copy for new text boxes.
    pub const TEXT_CONTENT: &str = "Double-click to edit";
    /// Placeholder source for new images.
    pub const IMAGE_SRC: &str = "placeholder.png";
    /// Default text color.
    pub const TEXT_FILL: &str = "#222222";
    /// Default rectangle fill.
    pub const RECT_FILL: &str = "#4f8ef7";
    /// Default circle fill.
    pub const CIRCLE_FILL: &str = "#f7b84f";
    /// Default region fill.
    pub const REGION_FILL: &str = "rgba(79, 142, 247, 0.25)";
    /// Default region outline color.
    pub const REGION_STROKE: &str = "#4f8ef7";

    pub(crate) const fn font_size() -> f64 {
        24.0
    }

    pub(crate) fn font_family() -> String {
        "sans-serif".to_string()
    }

    /// Default `(width, height)` of a freshly created object.
    #[must_use]
    pub const fn size(object_type: super::ObjectType) -> (f64, f64) {
        match object_type {
            super::ObjectType::Region => (0.0, 0.0),
            super::ObjectType::Text => (180.0, 60.0),
            super::ObjectType::Image => (200.0, 150.0),
            super::ObjectType::Rect => (120.0, 80.0),
            super::ObjectType::Circle => (100.0, 100.0),
        }
    }
}

/// A partial set of attribute changes.
///
/// Absent fields leave the object untouched. Variant-specific fields that do
/// not apply to the target's variant are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl ObjectPatch {
    /// A patch that moves an object.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A patch that resizes an object.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

/// A placed item in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorObject {
    /// Unique identifier, fixed for the object's lifetime.
    pub id: ObjectId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// X position.
    #[serde(default)]
    pub x: f64,
    /// Y position.
    #[serde(default)]
    pub y: f64,
    /// Width. Derived from the points for regions.
    #[serde(default)]
    pub width: f64,
    /// Height. Derived from the points for regions.
    #[serde(default)]
    pub height: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Paint order; equals the object's position after normalization.
    ///
    /// Any JSON number is accepted on input since the value is re-derived
    /// from array position anyway.
    #[serde(default, deserialize_with = "lenient_index")]
    pub z_index: usize,
    /// Horizontal scale factor.
    #[serde(default = "EditorObject::default_scale")]
    pub scale_x: f64,
    /// Vertical scale factor.
    #[serde(default = "EditorObject::default_scale")]
    pub scale_y: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "EditorObject::default_opacity")]
    pub opacity: f64,
    /// Whether the object is drawn.
    #[serde(default = "EditorObject::default_visible")]
    pub visible: bool,
    /// Whether the object ignores direct manipulation.
    #[serde(default)]
    pub locked: bool,
    /// Variant-specific attributes.
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl EditorObject {
    const fn default_scale() -> f64 {
        1.0
    }

    const fn default_opacity() -> f64 {
        1.0
    }

    const fn default_visible() -> bool {
        true
    }

    /// Build an object with the defaults of its variant, anchored at `anchor`.
    ///
    /// Regions ignore the anchor and stay at the origin; use
    /// [`EditorObject::region`] to give them a shape.
    #[must_use]
    pub fn with_defaults(id: ObjectId, object_type: ObjectType, anchor: Point) -> Self {
        if object_type == ObjectType::Region {
            return Self::region(id, Vec::new());
        }
        let (width, height) = defaults::size(object_type);
        let mut object = Self {
            id,
            name: object_type.label().to_string(),
            x: anchor.x,
            y: anchor.y,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            visible: true,
            locked: false,
            kind: ObjectKind::default_for(object_type),
        };
        object.repair();
        object
    }

    /// Build a region from a flat point sequence.
    ///
    /// The size is the extent of the points' bounding box; the position stays
    /// at the origin because the points are already absolute. An empty
    /// sequence yields a zero-sized region and non-finite coordinates become 0.
    #[must_use]
    pub fn region(id: ObjectId, points: Vec<f64>) -> Self {
        let mut object = Self {
            id,
            name: ObjectType::Region.label().to_string(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            z_index: 0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            visible: true,
            locked: false,
            kind: ObjectKind::Region {
                points,
                fill: Some(defaults::REGION_FILL.to_string()),
                stroke: Some(Stroke::new(defaults::REGION_STROKE, 1.0)),
                pattern: None,
            },
        };
        object.repair();
        object
    }

    /// The variant tag.
    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    /// Whether this object belongs to the protected backdrop layer.
    #[must_use]
    pub const fn is_region(&self) -> bool {
        matches!(self.kind, ObjectKind::Region { .. })
    }

    /// Return a copy with `patch` merged in.
    #[must_use]
    pub fn with_patch(mut self, patch: &ObjectPatch) -> Self {
        self.apply_patch(patch);
        self
    }

    /// Shallow-merge `patch` onto this object.
    ///
    /// Opacity is clamped to `[0, 1]`, sizes to non-negative values, and
    /// non-finite numbers are dropped. A region's size only follows its
    /// points.
    pub fn apply_patch(&mut self, patch: &ObjectPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        set_finite(&mut self.x, patch.x);
        set_finite(&mut self.y, patch.y);
        set_finite(&mut self.rotation, patch.rotation);
        set_finite(&mut self.scale_x, patch.scale_x);
        set_finite(&mut self.scale_y, patch.scale_y);
        set_clamped(&mut self.opacity, patch.opacity, 1.0);
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }

        if self.is_region() {
            if patch.width.is_some() || patch.height.is_some() {
                tracing::debug!("Ignoring size change on region {}", self.id);
            }
        } else {
            set_clamped(&mut self.width, patch.width, f64::MAX);
            set_clamped(&mut self.height, patch.height, f64::MAX);
        }

        match &mut self.kind {
            ObjectKind::Region {
                points,
                fill,
                stroke,
                pattern,
            } => {
                if let Some(new_points) = &patch.points {
                    points.clone_from(new_points);
                }
                merge_opt(fill, patch.fill.as_ref());
                merge_opt(stroke, patch.stroke.as_ref());
                merge_opt(pattern, patch.pattern.as_ref());
            }
            ObjectKind::Text {
                text,
                font_size,
                font_family,
                align,
                fill,
            } => {
                if let Some(new_text) = &patch.text {
                    text.clone_from(new_text);
                }
                set_clamped(font_size, patch.font_size, f64::MAX);
                if let Some(family) = &patch.font_family {
                    font_family.clone_from(family);
                }
                if let Some(new_align) = patch.align {
                    *align = new_align;
                }
                merge_opt(fill, patch.fill.as_ref());
            }
            ObjectKind::Image { src } => {
                if let Some(new_src) = &patch.src {
                    src.clone_from(new_src);
                }
            }
            ObjectKind::Rect {
                fill,
                stroke,
                corner_radius,
            } => {
                merge_opt(fill, patch.fill.as_ref());
                merge_opt(stroke, patch.stroke.as_ref());
                set_clamped(corner_radius, patch.corner_radius, f64::MAX);
            }
            ObjectKind::Circle { fill, stroke } => {
                merge_opt(fill, patch.fill.as_ref());
                merge_opt(stroke, patch.stroke.as_ref());
            }
        }

        self.repair();
    }

    /// Check the per-object invariants: finite numbers, non-negative sizes,
    /// opacity in `[0, 1]`, and a region size matching its points.
    #[must_use]
    pub fn is_sound(&self) -> bool {
        let placed = [self.x, self.y, self.rotation, self.scale_x, self.scale_y]
            .iter()
            .all(|v| v.is_finite());
        let sized = is_extent(self.width) && is_extent(self.height);
        let shaped = match &self.kind {
            ObjectKind::Region { points, stroke, .. } => {
                let (width, height) = region_size(points);
                points.iter().all(|v| v.is_finite())
                    && width.to_bits() == self.width.to_bits()
                    && height.to_bits() == self.height.to_bits()
                    && is_sound_stroke(stroke.as_ref())
            }
            ObjectKind::Text { font_size, .. } => is_extent(*font_size),
            ObjectKind::Image { .. } => true,
            ObjectKind::Rect {
                stroke,
                corner_radius,
                ..
            } => is_extent(*corner_radius) && is_sound_stroke(stroke.as_ref()),
            ObjectKind::Circle { stroke, .. } => is_sound_stroke(stroke.as_ref()),
        };
        placed && sized && shaped && (0.0..=1.0).contains(&self.opacity)
    }

    /// Restore the per-object invariants in place.
    ///
    /// Non-finite coordinates and rotation become 0, non-finite scales 1.
    /// Sizes are clamped to non-negative finite values, opacity into
    /// `[0, 1]` (NaN becomes fully opaque), and a region's size is re-derived
    /// from its points. Sound objects are left untouched.
    pub fn repair(&mut self) {
        self.x = finite_or(self.x, 0.0);
        self.y = finite_or(self.y, 0.0);
        self.rotation = finite_or(self.rotation, 0.0);
        self.scale_x = finite_or(self.scale_x, 1.0);
        self.scale_y = finite_or(self.scale_y, 1.0);
        self.width = extent(self.width, 0.0);
        self.height = extent(self.height, 0.0);
        self.opacity = if self.opacity.is_nan() {
            1.0
        } else {
            clamp(self.opacity, 0.0, 1.0)
        };

        match &mut self.kind {
            ObjectKind::Region { points, stroke, .. } => {
                for value in points.iter_mut() {
                    *value = finite_or(*value, 0.0);
                }
                (self.width, self.height) = region_size(points);
                repair_stroke(stroke.as_mut());
            }
            ObjectKind::Text { font_size, .. } => {
                *font_size = extent(*font_size, defaults::font_size());
            }
            ObjectKind::Image { .. } => {}
            ObjectKind::Rect {
                stroke,
                corner_radius,
                ..
            } => {
                *corner_radius = extent(*corner_radius, 0.0);
                repair_stroke(stroke.as_mut());
            }
            ObjectKind::Circle { stroke, .. } => repair_stroke(stroke.as_mut()),
        }
    }
}

/// Bounding-box size of a region's points, kept finite.
fn region_size(points: &[f64]) -> (f64, f64) {
    let bounds = bounds_from_points(points);
    (bounds.width.min(f64::MAX), bounds.height.min(f64::MAX))
}

fn is_extent(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// A non-negative finite size; NaN falls back to `fallback`.
fn extent(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        clamp(value, 0.0, f64::MAX)
    }
}

fn is_sound_stroke(stroke: Option<&Stroke>) -> bool {
    match stroke {
        Some(stroke) => is_extent(stroke.width),
        None => true,
    }
}

fn repair_stroke(stroke: Option<&mut Stroke>) {
    if let Some(stroke) = stroke {
        stroke.width = extent(stroke.width, 1.0);
    }
}

fn lenient_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireIndex {
        Index(usize),
        Number(f64),
    }

    Ok(match Option::<WireIndex>::deserialize(deserializer)? {
        Some(WireIndex::Index(index)) => index,
        Some(WireIndex::Number(value)) => {
            tracing::debug!("Replacing out-of-range zIndex {value}");
            0
        }
        None => 0,
    })
}

fn set_finite(target: &mut f64, value: Option<f64>) {
    if let Some(value) = value.filter(|v| v.is_finite()) {
        *target = value;
    }
}

/// Store a finite value clamped into `[0, max]`.
fn set_clamped(target: &mut f64, value: Option<f64>, max: f64) {
    if let Some(value) = value.filter(|v| v.is_finite()) {
        *target = clamp(value, 0.0, max);
    }
}

fn merge_opt<T: Clone>(target: &mut Option<T>, value: Option<&T>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

/// Hands out session-unique object identifiers.
///
/// Identifiers combine the creation time with a strictly increasing counter,
/// so objects created within the same millisecond never collide.
#[derive(Debug, Clone, Default)]
pub struct ObjectFactory {
    counter: u64,
}

impl ObjectFactory {
    /// Create a factory with a fresh counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identifiers handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.counter
    }

    /// Allocate the next identifier.
    pub fn next_id(&mut self) -> ObjectId {
        self.counter += 1;
        ObjectId(format!("obj-{}-{}", current_timestamp_ms(), self.counter))
    }

    /// Create an object of `object_type` at `anchor`, with `overrides`
    /// applied over the variant defaults.
    pub fn create(
        &mut self,
        object_type: ObjectType,
        anchor: Point,
        overrides: Option<&ObjectPatch>,
    ) -> EditorObject {
        let mut object = EditorObject::with_defaults(self.next_id(), object_type, anchor);
        object.name = format!("{} {}", object_type.label(), self.counter);
        if let Some(patch) = overrides {
            object.apply_patch(patch);
        }
        object
    }

    /// Create a region from a flat point sequence.
    pub fn create_region(
        &mut self,
        points: Vec<f64>,
        overrides: Option<&ObjectPatch>,
    ) -> EditorObject {
        let mut object = EditorObject::region(self.next_id(), points);
        object.name = format!("{} {}", ObjectType::Region.label(), self.counter);
        if let Some(patch) = overrides {
            object.apply_patch(patch);
        }
        object
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
