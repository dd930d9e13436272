use std::{borrow::Cow, str::FromStr};

use crate::{
    color::Color,
    font::Font,
    foundation::core::{Affine, Point},
    foundation::error::{EditError, EditResult},
    render::{DrawContext, affine_to_cpu},
};

/// Horizontal anchor of a text run. The vertical anchor is always the top of the ascender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" | "middle" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(EditError::validation(format!("unknown text align \"{other}\""))),
        }
    }
}

/// One styled segment of a multicolor line.
#[derive(Clone, Debug)]
pub struct Text {
    pub text: String,
    pub font: Font,
    pub color: Color,
    pub stroke_width: Option<f32>,
    pub stroke_color: Option<Color>,
}

impl Text {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
            color: Color::BLACK,
            stroke_width: None,
            stroke_color: None,
        }
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn stroke_color(mut self, color: impl Into<Color>) -> Self {
        self.stroke_color = Some(color.into());
        self
    }
}

/// Styling of [`crate::Editor::text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub align: Align,
    pub stroke_width: f32,
    /// Defaults to `color`.
    pub stroke_color: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            align: Align::Left,
            stroke_width: 0.0,
            stroke_color: None,
        }
    }
}

impl TextStyle {
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn stroke_color(mut self, color: impl Into<Color>) -> Self {
        self.stroke_color = Some(color.into());
        self
    }
}

/// Styling of [`crate::Editor::multicolor_text`]. Segment values win over these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MulticolorStyle {
    pub space_separated: bool,
    pub align: Align,
    pub stroke_width: f32,
    pub stroke_color: Option<Color>,
}

impl Default for MulticolorStyle {
    fn default() -> Self {
        Self {
            space_separated: true,
            align: Align::Left,
            stroke_width: 0.0,
            stroke_color: None,
        }
    }
}

impl MulticolorStyle {
    pub fn space_separated(mut self, yes: bool) -> Self {
        self.space_separated = yes;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn stroke_color(mut self, color: impl Into<Color>) -> Self {
        self.stroke_color = Some(color.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Stateful helper for building Parley layouts from a single font face at a time.
///
/// The collection holds only the current face: faces registered under one family name (regular
/// and bold, say) would resolve to whichever the matcher prefers. Switching faces starts a fresh
/// font context; repeated calls with the same face reuse it.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    face: Option<(u64, u32)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            face: None,
        }
    }

    fn select_face(&mut self, font: &Font) {
        let key = (font.layout_blob().id(), font.index());
        if self.face == Some(key) {
            return;
        }
        if self.face.is_some() {
            self.font_ctx = parley::FontContext::default();
        }
        self.font_ctx
            .collection
            .register_fonts(font.layout_blob().clone(), None);
        self.face = Some(key);
    }

    /// Shape and lay out `text` on a single unbounded line per paragraph.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        font: &Font,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        self.select_face(font);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(font.family_name().to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size() as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Advance width of `text` in `font`, trailing whitespace included.
    pub(crate) fn measure(&mut self, text: &str, font: &Font) -> f32 {
        self.layout_plain(text, font, TextBrushRgba8::default()).full_width()
    }
}

/// Advance width of `text` in `font`, trailing whitespace included.
pub fn measure(text: &str, font: &Font) -> EditResult<f32> {
    Ok(TextLayoutEngine::new().measure(text, font))
}

/// Start x of a block `total_width` wide anchored at `anchor_x`.
pub fn multicolor_origin(anchor_x: f64, total_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => anchor_x,
        Align::Center => anchor_x - total_width / 2.0,
        Align::Right => anchor_x - total_width,
    }
}

/// A fully resolved run ready for the rasterizer.
pub(crate) struct TextRun<'a> {
    pub(crate) text: &'a str,
    pub(crate) font: &'a Font,
    pub(crate) color: Color,
    pub(crate) stroke_width: f32,
    pub(crate) stroke_color: Color,
}

/// Draw `run` with the top-left of its first line at `origin`. Returns the advance width.
pub(crate) fn draw_run(
    engine: &mut TextLayoutEngine,
    ctx: &mut DrawContext,
    origin: Point,
    run: &TextRun<'_>,
) -> EditResult<f32> {
    if !run.stroke_width.is_finite() || run.stroke_width < 0.0 {
        return Err(EditError::validation("text stroke width must be finite and >= 0"));
    }
    let layout = engine.layout_plain(run.text, run.font, TextBrushRgba8::from(run.color));

    // Glyph y values are baselines; shift so the first line's ascender sits on `origin.y`.
    let top = layout
        .lines()
        .next()
        .map(|line| {
            let m = line.metrics();
            m.baseline - m.ascent
        })
        .unwrap_or(0.0);

    let mut runs: Vec<(f32, Vec<(u32, f32, f32)>)> = Vec::new();
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                continue;
            };
            let glyphs = glyph_run
                .positioned_glyphs()
                .map(|g| (g.id, g.x, g.y))
                .collect();
            runs.push((glyph_run.run().font_size(), glyphs));
        }
    }

    let font = run.font.glyph_font();
    ctx.set_transform(affine_to_cpu(Affine::translate((
        origin.x,
        origin.y - f64::from(top),
    ))));

    if run.stroke_width > 0.0 {
        ctx.set_paint(run.stroke_color.to_paint());
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(run.stroke_width) * 2.0));
        for (size, glyphs) in &runs {
            ctx.glyph_run(font)
                .font_size(*size)
                .stroke_glyphs(glyphs.iter().map(|&(id, x, y)| vello_cpu::Glyph { id, x, y }));
        }
    }

    ctx.set_paint(run.color.to_paint());
    for (size, glyphs) in &runs {
        ctx.glyph_run(font)
            .font_size(*size)
            .fill_glyphs(glyphs.iter().map(|&(id, x, y)| vello_cpu::Glyph { id, x, y }));
    }

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(layout.full_width())
}

/// Draw a single run anchored at `position` per `style.align`.
pub(crate) fn draw_text(
    ctx: &mut DrawContext,
    position: Point,
    text: &str,
    font: &Font,
    style: &TextStyle,
) -> EditResult<()> {
    let mut engine = TextLayoutEngine::new();
    let width = engine.measure(text, font);
    let x = multicolor_origin(position.x, f64::from(width), style.align);
    draw_run(
        &mut engine,
        ctx,
        Point::new(x, position.y),
        &TextRun {
            text,
            font,
            color: style.color,
            stroke_width: style.stroke_width,
            stroke_color: style.stroke_color.unwrap_or(style.color),
        },
    )?;
    Ok(())
}

/// Horizontal placement of each segment of a multicolor line.
pub(crate) fn multicolor_layout(
    engine: &mut TextLayoutEngine,
    anchor_x: f64,
    texts: &[Text],
    style: &MulticolorStyle,
) -> Vec<f64> {
    let widths: Vec<(f64, f64)> = texts
        .iter()
        .map(|t| {
            let width = f64::from(engine.measure(&t.text, &t.font));
            let gap = if style.space_separated {
                f64::from(engine.measure(" ", &t.font))
            } else {
                0.0
            };
            (width, gap)
        })
        .collect();

    let total: f64 = widths.iter().map(|(w, _)| w).sum();
    let mut cursor = multicolor_origin(anchor_x, total, style.align);
    let mut xs = Vec::with_capacity(texts.len());
    for (width, gap) in widths {
        xs.push(cursor);
        cursor += width + gap;
    }
    xs
}

pub(crate) fn draw_multicolor(
    ctx: &mut DrawContext,
    position: Point,
    texts: &[Text],
    style: &MulticolorStyle,
) -> EditResult<()> {
    let mut engine = TextLayoutEngine::new();
    let xs = multicolor_layout(&mut engine, position.x, texts, style);
    for (t, x) in texts.iter().zip(xs) {
        let run = TextRun {
            text: &t.text,
            font: &t.font,
            color: t.color,
            stroke_width: t.stroke_width.unwrap_or(style.stroke_width),
            stroke_color: t.stroke_color.or(style.stroke_color).unwrap_or(t.color),
        };
        draw_run(&mut engine, ctx, Point::new(x, position.y), &run)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/text.rs"]
mod tests;
