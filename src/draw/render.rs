//! Cairo-based painting of a retained [`Scene`].

use super::color::{BLACK, Color};
use super::primitive::{Attrs, PathCommand, Primitive};
use super::scene::{DEFAULT_FONT_SIZE, Scene};
use crate::util::BBox;

/// Renders every visible graphic of the scene in paint order.
///
/// Clip rects referenced by groups are honoured; hidden graphics (or graphics
/// with a hidden ancestor) are skipped.
pub fn render_scene(ctx: &cairo::Context, scene: &Scene) {
    for id in scene.paint_order() {
        let (Some(primitive), Some(attrs)) = (scene.primitive(id), scene.attrs(id)) else {
            continue;
        };
        if primitive.is_container() || !scene.is_visible(id) {
            continue;
        }

        ctx.save().ok();
        if let Some(clip) = scene.effective_clip(id) {
            ctx.rectangle(clip.x, clip.y, clip.width, clip.height);
            ctx.clip();
        }

        match primitive {
            Primitive::Rect => render_rect(ctx, attrs),
            Primitive::Circle => render_circle(ctx, attrs),
            Primitive::Path => render_path(ctx, attrs),
            Primitive::Image { src } => render_image(ctx, src, attrs),
            Primitive::Symbol { symbol } => render_symbol(ctx, symbol, attrs),
            Primitive::Label { shape } => {
                if let Some(bbox) = scene.bbox(id) {
                    render_label(ctx, shape, bbox, attrs);
                }
            }
            Primitive::Group { .. } | Primitive::ClipRect => {}
        }

        ctx.restore().ok();
    }
}

fn set_color(ctx: &cairo::Context, color: Color) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
}

/// Fills then strokes the current path using the graphic's paint attributes.
fn fill_and_stroke(ctx: &cairo::Context, attrs: &Attrs) {
    if let Some(fill) = attrs.fill.filter(|c| c.a > 0.0) {
        set_color(ctx, fill);
        let _ = ctx.fill_preserve();
    }
    let width = attrs.stroke_width.unwrap_or(0.0);
    match attrs.stroke.filter(|c| c.a > 0.0) {
        Some(stroke) if width > 0.0 => {
            set_color(ctx, stroke);
            ctx.set_line_width(width);
            apply_dash(ctx, attrs.dash_style.as_deref(), width);
            let _ = ctx.stroke();
        }
        _ => ctx.new_path(),
    }
}

fn apply_dash(ctx: &cairo::Context, dash_style: Option<&str>, width: f64) {
    let pattern: &[f64] = match dash_style.map(str::to_lowercase).as_deref() {
        Some("dash") => &[4.0, 3.0],
        Some("dot") => &[1.0, 3.0],
        Some("dashdot") => &[4.0, 3.0, 1.0, 3.0],
        Some("longdash") => &[8.0, 3.0],
        _ => &[],
    };
    let scaled: Vec<f64> = pattern.iter().map(|v| v * width).collect();
    ctx.set_dash(&scaled, 0.0);
}

fn rounded_rect(ctx: &cairo::Context, bbox: BBox, r: f64) {
    let r = r.min(bbox.width / 2.0).min(bbox.height / 2.0).max(0.0);
    if r == 0.0 {
        ctx.rectangle(bbox.x, bbox.y, bbox.width, bbox.height);
        return;
    }
    let pi = std::f64::consts::PI;
    ctx.new_sub_path();
    ctx.arc(bbox.right() - r, bbox.y + r, r, -pi / 2.0, 0.0);
    ctx.arc(bbox.right() - r, bbox.bottom() - r, r, 0.0, pi / 2.0);
    ctx.arc(bbox.x + r, bbox.bottom() - r, r, pi / 2.0, pi);
    ctx.arc(bbox.x + r, bbox.y + r, r, pi, 3.0 * pi / 2.0);
    ctx.close_path();
}

/// Render a rectangle (fill and outline)
fn render_rect(ctx: &cairo::Context, attrs: &Attrs) {
    let w = attrs.width.unwrap_or(0.0);
    let h = attrs.height.unwrap_or(0.0);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let bbox = BBox::new(attrs.x.unwrap_or(0.0), attrs.y.unwrap_or(0.0), w, h);
    ctx.set_line_join(cairo::LineJoin::Miter);
    rounded_rect(ctx, bbox, attrs.r.unwrap_or(0.0));
    fill_and_stroke(ctx, attrs);
}

fn render_circle(ctx: &cairo::Context, attrs: &Attrs) {
    let r = attrs.r.unwrap_or(0.0);
    if r <= 0.0 {
        return;
    }
    ctx.arc(
        attrs.x.unwrap_or(0.0),
        attrs.y.unwrap_or(0.0),
        r,
        0.0,
        2.0 * std::f64::consts::PI,
    );
    fill_and_stroke(ctx, attrs);
}

fn render_path(ctx: &cairo::Context, attrs: &Attrs) {
    let Some(d) = attrs.d.as_deref().filter(|d| !d.is_empty()) else {
        return;
    };
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
    for command in d {
        match *command {
            PathCommand::MoveTo(x, y) => ctx.move_to(x, y),
            PathCommand::LineTo(x, y) => ctx.line_to(x, y),
            PathCommand::Close => ctx.close_path(),
        }
    }
    fill_and_stroke(ctx, attrs);
}

fn render_image(ctx: &cairo::Context, src: &str, attrs: &Attrs) {
    let x = attrs.x.unwrap_or(0.0);
    let y = attrs.y.unwrap_or(0.0);
    let w = attrs.width.unwrap_or(0.0);
    let h = attrs.height.unwrap_or(0.0);

    let surface = std::fs::File::open(src)
        .ok()
        .and_then(|mut file| cairo::ImageSurface::create_from_png(&mut file).ok());

    match surface {
        Some(surface) if surface.width() > 0 && surface.height() > 0 => {
            ctx.translate(x, y);
            if w > 0.0 && h > 0.0 {
                ctx.scale(w / surface.width() as f64, h / surface.height() as f64);
            }
            let _ = ctx.set_source_surface(&surface, 0.0, 0.0);
            let _ = ctx.paint();
        }
        _ => {
            // Missing image: draw its frame so layout stays visible
            ctx.rectangle(x, y, w, h);
            set_color(ctx, Color::new(0.5, 0.5, 0.5, 0.6));
            ctx.set_line_width(1.0);
            let _ = ctx.stroke();
        }
    }
}

fn render_symbol(ctx: &cairo::Context, symbol: &str, attrs: &Attrs) {
    let x = attrs.x.unwrap_or(0.0);
    let y = attrs.y.unwrap_or(0.0);
    let w = attrs.width.unwrap_or(0.0);
    let h = attrs.height.unwrap_or(0.0);
    match symbol {
        "square" => ctx.rectangle(x, y, w, h),
        _ => {
            ctx.save().ok();
            ctx.translate(x + w / 2.0, y + h / 2.0);
            ctx.scale((w / 2.0).max(0.5), (h / 2.0).max(0.5));
            ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
            ctx.restore().ok();
        }
    }
    fill_and_stroke(ctx, attrs);
}

/// Renders a label box (with a callout pointing at its anchor) and its text using Pango.
fn render_label(ctx: &cairo::Context, shape: &str, bbox: BBox, attrs: &Attrs) {
    match shape {
        "callout" => callout_path(ctx, bbox, attrs),
        "circle" => {
            let r = bbox.width.max(bbox.height) / 2.0;
            ctx.arc(
                bbox.x + bbox.width / 2.0,
                bbox.y + bbox.height / 2.0,
                r,
                0.0,
                2.0 * std::f64::consts::PI,
            );
        }
        "connector" => {
            if let (Some(ax), Some(ay)) = (attrs.anchor_x, attrs.anchor_y) {
                ctx.move_to(bbox.x + bbox.width / 2.0, bbox.y + bbox.height / 2.0);
                ctx.line_to(ax, ay);
            }
        }
        _ => rounded_rect(ctx, bbox, attrs.r.unwrap_or(0.0)),
    }
    fill_and_stroke(ctx, attrs);

    let Some(text) = attrs.text.as_deref().filter(|t| !t.is_empty()) else {
        return;
    };

    ctx.set_antialias(cairo::Antialias::Best);
    let layout = pangocairo::functions::create_layout(ctx);
    let size = attrs.font_size.unwrap_or(DEFAULT_FONT_SIZE);
    let weight = attrs.font_weight.as_deref().unwrap_or("normal");
    let desc = if weight.eq_ignore_ascii_case("normal") {
        format!("Sans {}px", size.round() as i32)
    } else {
        format!("Sans {} {}px", weight, size.round() as i32)
    };
    layout.set_font_description(Some(&pango::FontDescription::from_string(&desc)));
    layout.set_text(text);

    let padding = attrs.padding.unwrap_or(0.0);
    ctx.move_to(bbox.x + padding, bbox.y + padding);
    set_color(ctx, attrs.color.unwrap_or(BLACK));
    pangocairo::functions::show_layout(ctx, &layout);
}

/// Box with a small triangular pointer towards the anchor when the anchor lies
/// outside the box.
fn callout_path(ctx: &cairo::Context, bbox: BBox, attrs: &Attrs) {
    rounded_rect(ctx, bbox, attrs.r.unwrap_or(0.0));
    let (Some(ax), Some(ay)) = (attrs.anchor_x, attrs.anchor_y) else {
        return;
    };
    if bbox.contains(ax, ay) {
        return;
    }
    let half = 6.0_f64.min(bbox.width / 2.0);
    let cx = ax.clamp(bbox.x + half, bbox.right() - half);
    let edge = if ay > bbox.bottom() { bbox.bottom() } else { bbox.y };
    ctx.move_to(cx - half, edge);
    ctx.line_to(ax, ay);
    ctx.line_to(cx + half, edge);
    ctx.close_path();
}

/// Renders a scene into a new ARGB surface of the given size.
pub fn render_to_surface(
    scene: &Scene,
    width: i32,
    height: i32,
) -> Result<cairo::ImageSurface, cairo::Error> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    {
        let ctx = cairo::Context::new(&surface)?;
        render_scene(&ctx, scene);
    }
    Ok(surface)
}
