//! SVG geometry renderers.
//!
//! `svg` opens a drawing; the shapes are meant to be its children:
//!
//! ```text
//! svg: width=120px height=120px
//!   circle: r=20
//!   square: side=30 x=10 y=10 fill=yellow
//! ```
//!
//! Every shape carries `fill`, `stroke-width` and `stroke` (defaults `none`,
//! `0.1`, `black`). Missing or empty attributes fall back to defaults laid
//! out for the default `0 0 100 100` view box.

use std::fmt;

use quizmd::expr::format_number;
use quizmd::{
    Attributes, CompileError, RenderContext, Renderer, RendererPlugin, RendererRegistry, Result,
};

use crate::poly::{Poly, PolyKind};
use crate::{boxed, text_or};

const VIEW_BOX: &str = "0 0 100 100";
const CENTER: &str = "50";
const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Contributes the geometry renderers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryPlugin;

impl RendererPlugin for GeometryPlugin {
    fn register(&self, registry: &mut RendererRegistry) {
        registry
            .register("svg", |config: &Attributes| boxed(Svg::new(config)))
            .register("circle", |config: &Attributes| boxed(Circle::new(config)))
            .register("ellipse", |config: &Attributes| boxed(Ellipse::new(config)))
            .register("rect", |config: &Attributes| boxed(Rect::new(config)))
            .register("square", |config: &Attributes| boxed(Rect::square(config)))
            .register("rhombus", |config: &Attributes| boxed(Rhombus::new(config)?))
            .register("polygon", |config: &Attributes| {
                boxed(Poly::new(PolyKind::Polygon, config)?)
            })
            .register("polyline", |config: &Attributes| {
                boxed(Poly::new(PolyKind::Polyline, config)?)
            });
    }
}

// ============================================================================
// Shared attribute groups
// ============================================================================

/// Paint attributes, rendered with a leading space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Paint {
    pub(crate) fill: String,
    stroke_width: String,
    stroke: String,
}

impl Paint {
    pub(crate) fn new(config: &Attributes) -> Self {
        Self {
            fill: text_or(config, "fill", "none").to_string(),
            stroke_width: text_or(config, "stroke-width", "0.1").to_string(),
            stroke: text_or(config, "stroke", "black").to_string(),
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#" fill="{}" stroke-width="{}" stroke="{}""#,
            self.fill, self.stroke_width, self.stroke
        )
    }
}

/// `cx`/`cy` of shapes drawn around a center.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Center {
    cx: String,
    cy: String,
}

impl Center {
    fn new(config: &Attributes) -> Self {
        Self {
            cx: text_or(config, "cx", CENTER).to_string(),
            cy: text_or(config, "cy", CENTER).to_string(),
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#" cx="{}" cy="{}""#, self.cx, self.cy)
    }
}

/// Reads a numeric attribute.
pub(crate) fn number(config: &Attributes, renderer: &str, key: &str, default: &str) -> Result<f64> {
    let raw = text_or(config, key, default);
    raw.trim().parse::<f64>().map_err(|_| {
        CompileError::invalid_attribute(renderer, key, format!("'{raw}' is not a number"))
    })
}

// ============================================================================
// Renderers
// ============================================================================

/// `<svg>` wrapper around its children.
#[derive(Debug, Clone)]
pub struct Svg {
    width: String,
    height: String,
    view_box: String,
}

impl Svg {
    pub fn new(config: &Attributes) -> Self {
        Self {
            width: text_or(config, "width", "50px").to_string(),
            height: text_or(config, "height", "50px").to_string(),
            view_box: text_or(config, "viewBox", VIEW_BOX).to_string(),
        }
    }
}

impl Renderer for Svg {
    fn render_opening(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            r#"<svg width="{}" height="{}" viewBox="{}" xmlns="{SVG_NS}">"#,
            self.width, self.height, self.view_box
        ))
    }

    fn render_closing(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok("</svg>".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Circle {
    r: String,
    center: Center,
    paint: Paint,
}

impl Circle {
    pub fn new(config: &Attributes) -> Self {
        Self {
            r: text_or(config, "r", "100").to_string(),
            center: Center::new(config),
            paint: Paint::new(config),
        }
    }
}

impl Renderer for Circle {
    fn render_opening(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok(format!(r#"<circle r="{}"{}{}/>"#, self.r, self.center, self.paint))
    }
}

#[derive(Debug, Clone)]
pub struct Ellipse {
    rx: String,
    ry: String,
    center: Center,
    paint: Paint,
}

impl Ellipse {
    pub fn new(config: &Attributes) -> Self {
        Self {
            rx: text_or(config, "rx", CENTER).to_string(),
            ry: text_or(config, "ry", CENTER).to_string(),
            center: Center::new(config),
            paint: Paint::new(config),
        }
    }
}

impl Renderer for Ellipse {
    fn render_opening(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            r#"<ellipse rx="{}" ry="{}"{}{}/>"#,
            self.rx, self.ry, self.center, self.paint
        ))
    }
}

/// `<rect>` anchored at its `x`/`y` corner. Backs both `rect` and `square`.
#[derive(Debug, Clone)]
pub struct Rect {
    width: String,
    height: String,
    x: String,
    y: String,
    paint: Paint,
}

impl Rect {
    pub fn new(config: &Attributes) -> Self {
        Self::sized(
            config,
            text_or(config, "width", "100"),
            text_or(config, "height", "50"),
        )
    }

    /// A rect whose width and height are both `side`.
    pub fn square(config: &Attributes) -> Self {
        let side = text_or(config, "side", "100");
        Self::sized(config, side, side)
    }

    fn sized(config: &Attributes, width: &str, height: &str) -> Self {
        Self {
            width: width.to_string(),
            height: height.to_string(),
            x: text_or(config, "x", "0").to_string(),
            y: text_or(config, "y", "0").to_string(),
            paint: Paint::new(config),
        }
    }
}

impl Renderer for Rect {
    fn render_opening(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            r#"<rect width="{}" height="{}" x="{}" y="{}"{}/>"#,
            self.width, self.height, self.x, self.y, self.paint
        ))
    }
}

/// Rhombus with diagonals `p` (horizontal) and `q` (vertical), drawn as a
/// `<polygon>` around `cx`/`cy`.
#[derive(Debug, Clone)]
pub struct Rhombus {
    points: String,
    paint: Paint,
}

impl Rhombus {
    /// # Errors
    ///
    /// [`CompileError::InvalidAttribute`] when `cx`, `cy`, `p` or `q` is not
    /// a number.
    pub fn new(config: &Attributes) -> Result<Self> {
        let x = number(config, "rhombus", "cx", CENTER)?;
        let y = number(config, "rhombus", "cy", CENTER)?;
        let p = number(config, "rhombus", "p", CENTER)?;
        let q = number(config, "rhombus", "q", CENTER)?;

        let points = [
            (x, y + q / 2.0),
            (x + p / 2.0, y),
            (x, y - q / 2.0),
            (x - p / 2.0, y),
        ]
        .iter()
        .map(|(px, py)| format!("{},{}", format_number(*px), format_number(*py)))
        .collect::<Vec<_>>()
        .join(" ");

        Ok(Self {
            points,
            paint: Paint::new(config),
        })
    }
}

impl Renderer for Rhombus {
    fn render_opening(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok(format!(r#"<polygon points="{}"{}/>"#, self.points, self.paint))
    }
}
