use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use wash_registry::boundary::Bounds;
use wash_registry::{Boundaries, Facility, FunctionalityBand};

// Keeps outlines off the block border.
const PADDING: f64 = 0.1;

pub fn band_color(band: FunctionalityBand) -> Color {
    let (r, g, b) = band.rgb();
    Color::Rgb(r, g, b)
}

fn draw_ring(ctx: &mut Context<'_>, ring: &[(f64, f64)], color: Color) {
    for pair in ring.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
            color,
        });
    }
}

fn padded(bounds: Bounds) -> ([f64; 2], [f64; 2]) {
    (
        [bounds.min.0 - PADDING, bounds.max.0 + PADDING],
        [bounds.min.1 - PADDING, bounds.max.1 + PADDING],
    )
}

fn render_empty(f: &mut Frame<'_>, area: Rect, block: Block<'_>, message: &str) {
    let paragraph = Paragraph::new(message)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// District outlines coloured by functionality band. Districts outside the
/// highlighted county are dimmed.
pub fn render_choropleth(
    boundaries: &Boundaries,
    highlight_county: Option<&str>,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let block = Block::default()
        .title(" District Functionality ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(bounds) = boundaries.bounds() else {
        render_empty(f, area, block, "Boundary data not loaded");
        return;
    };
    let (x_bounds, y_bounds) = padded(bounds);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .paint(|ctx| {
            for feature in &boundaries.features {
                let dimmed = highlight_county
                    .is_some_and(|county| !feature.county.eq_ignore_ascii_case(county));
                let color = if dimmed {
                    Color::DarkGray
                } else {
                    band_color(feature.band())
                };
                for ring in &feature.rings {
                    draw_ring(ctx, ring, color);
                }
            }
        })
        .x_bounds(x_bounds)
        .y_bounds(y_bounds);

    f.render_widget(canvas, area);
}

/// Facility locations over the district outlines. Functional assets are green.
pub fn render_facility_points(
    boundaries: &Boundaries,
    facilities: &[Facility],
    f: &mut Frame<'_>,
    area: Rect,
) {
    let located: Vec<&Facility> = facilities
        .iter()
        .filter(|facility| facility.coordinates.is_some())
        .collect();

    let block = Block::default()
        .title(format!(" Facility Map ({} located) ", located.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let functional: Vec<(f64, f64)> = located
        .iter()
        .filter(|facility| facility.functionality.is_functional())
        .filter_map(|facility| facility.coordinates.as_ref())
        .map(|c| (c.longitude, c.latitude))
        .collect();
    let broken: Vec<(f64, f64)> = located
        .iter()
        .filter(|facility| !facility.functionality.is_functional())
        .filter_map(|facility| facility.coordinates.as_ref())
        .map(|c| (c.longitude, c.latitude))
        .collect();

    let bounds = boundaries.bounds().or_else(|| {
        let mut points = functional.iter().chain(broken.iter());
        let first = *points.next()?;
        Some(points.fold(
            Bounds {
                min: first,
                max: first,
            },
            |acc, &(x, y)| Bounds {
                min: (acc.min.0.min(x), acc.min.1.min(y)),
                max: (acc.max.0.max(x), acc.max.1.max(y)),
            },
        ))
    });
    let Some(bounds) = bounds else {
        render_empty(f, area, block, "No facility coordinates available");
        return;
    };
    let (x_bounds, y_bounds) = padded(bounds);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .paint(|ctx| {
            for feature in &boundaries.features {
                for ring in &feature.rings {
                    draw_ring(ctx, ring, Color::DarkGray);
                }
            }
            ctx.layer();
            ctx.draw(&Points {
                coords: &functional,
                color: Color::Green,
            });
            ctx.draw(&Points {
                coords: &broken,
                color: Color::Red,
            });
        })
        .x_bounds(x_bounds)
        .y_bounds(y_bounds);

    f.render_widget(canvas, area);
}

pub fn legend_line() -> TextLine<'static> {
    let mut spans = vec![Span::styled("Functionality: ", Style::default().fg(Color::Gray))];
    for band in FunctionalityBand::ALL {
        spans.push(Span::styled("■ ", Style::default().fg(band_color(band))));
        spans.push(Span::raw(format!("{}   ", band.legend())));
    }
    TextLine::from(spans)
}
