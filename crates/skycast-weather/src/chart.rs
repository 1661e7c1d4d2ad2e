//! SVG line chart for the daily forecast.
//!
//! Pure rendering: a time x-axis over the forecast dates, a linear y-axis
//! padded 5 degrees above and below the data, a line through the points
//! and a dot on each.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::report::ForecastPoint;

const MARGIN_TOP: f64 = 20.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARGIN_LEFT: f64 = 50.0;
const DOMAIN_PADDING: f64 = 5.0;
const Y_TICK_TARGET: usize = 10;
const LINE_COLOR: &str = "#ffcc00";

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    /// Outer width of the SVG, margins included.
    pub width: u32,
    /// Outer height of the SVG, margins included.
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 600,
            height: 300,
        }
    }
}

struct Scales {
    first: NaiveDate,
    span_days: f64,
    y_min: f64,
    y_max: f64,
    width: f64,
    height: f64,
}

impl Scales {
    fn x(&self, date: NaiveDate) -> f64 {
        if self.span_days == 0.0 {
            return self.width / 2.0;
        }
        let days = (date - self.first).num_days() as f64;
        days / self.span_days * self.width
    }

    fn y(&self, value: f64) -> f64 {
        self.height - (value - self.y_min) / (self.y_max - self.y_min) * self.height
    }
}

/// Render `points` as an SVG document. Returns `None` when there is nothing to plot.
pub fn render_chart(points: &[ForecastPoint], options: ChartOptions) -> Option<String> {
    let first = points.iter().map(|p| p.date).min()?;
    let last = points.iter().map(|p| p.date).max()?;
    let min = points.iter().map(|p| p.avg_temp_c).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.avg_temp_c)
        .fold(f64::NEG_INFINITY, f64::max);

    let scales = Scales {
        first,
        span_days: (last - first).num_days() as f64,
        y_min: min - DOMAIN_PADDING,
        y_max: max + DOMAIN_PADDING,
        width: (f64::from(options.width) - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        height: (f64::from(options.height) - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    };

    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.date);

    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write_svg(&mut svg, &sorted, &scales, options);
    Some(svg)
}

fn write_svg(
    out: &mut String,
    points: &[ForecastPoint],
    scales: &Scales,
    options: ChartOptions,
) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        options.width, options.height, options.width, options.height
    )?;
    writeln!(
        out,
        r#"<g transform="translate({},{})">"#,
        MARGIN_LEFT, MARGIN_TOP
    )?;

    // Bottom axis: one tick per day, month name on the last
    writeln!(
        out,
        r#"<g class="x-axis" transform="translate(0,{:.2})">"#,
        scales.height
    )?;
    writeln!(
        out,
        r#"<line x1="0" y1="0" x2="{:.2}" y2="0" stroke="currentColor"/>"#,
        scales.width
    )?;
    for (i, point) in points.iter().enumerate() {
        let x = scales.x(point.date);
        let label = if i + 1 == points.len() {
            point.date.format("%b").to_string()
        } else {
            point.date.format("%d").to_string()
        };
        writeln!(
            out,
            r#"<g class="tick" transform="translate({:.2},0)"><line y2="6" stroke="currentColor"/><text y="9" dy="0.71em" text-anchor="middle">{}</text></g>"#,
            x, label
        )?;
    }
    writeln!(out, "</g>")?;

    // Left axis
    writeln!(out, r#"<g class="y-axis">"#)?;
    writeln!(
        out,
        r#"<line x1="0" y1="0" x2="0" y2="{:.2}" stroke="currentColor"/>"#,
        scales.height
    )?;
    for tick in y_ticks(scales.y_min, scales.y_max, Y_TICK_TARGET) {
        writeln!(
            out,
            r#"<g class="tick" transform="translate(0,{:.2})"><line x2="-6" stroke="currentColor"/><text x="-9" dy="0.32em" text-anchor="end">{}</text></g>"#,
            scales.y(tick),
            format_tick(tick)
        )?;
    }
    writeln!(out, "</g>")?;

    let path = points
        .iter()
        .map(|p| format!("{:.2},{:.2}", scales.x(p.date), scales.y(p.avg_temp_c)))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        out,
        r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
        LINE_COLOR, path
    )?;

    for p in points {
        writeln!(
            out,
            r#"<circle class="dot" cx="{:.2}" cy="{:.2}" r="5" fill="{}"/>"#,
            scales.x(p.date),
            scales.y(p.avg_temp_c),
            LINE_COLOR
        )?;
    }

    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")
}

/// Round tick values (steps of 1, 2 or 5 times a power of ten) inside `[min, max]`.
fn y_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let span = max - min;
    if span <= 0.0 || target == 0 {
        return vec![min];
    }

    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        r if r <= 1.0 => magnitude,
        r if r <= 2.0 => 2.0 * magnitude,
        r if r <= 5.0 => 5.0 * magnitude,
        _ => 10.0 * magnitude,
    };

    let start = (min / step).ceil() as i64;
    let end = (max / step).floor() as i64;
    (start..=end).map(|i| i as f64 * step).collect()
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn week() -> Vec<ForecastPoint> {
        (0..7)
            .map(|i| ForecastPoint {
                date: NaiveDate::from_ymd_opt(2026, 10, 18 + i).unwrap(),
                avg_temp_c: 20.0 + f64::from(i),
            })
            .collect()
    }

    #[test]
    fn test_empty_series_renders_nothing() {
        assert!(render_chart(&[], ChartOptions::default()).is_none());
    }

    #[test]
    fn test_one_dot_per_point() {
        let svg = render_chart(&week(), ChartOptions::default()).unwrap();
        assert_eq!(svg.matches(r#"class="dot""#).count(), 7);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r##"stroke="#ffcc00""##));
    }

    #[test]
    fn test_last_tick_shows_month() {
        let svg = render_chart(&week(), ChartOptions::default()).unwrap();
        assert!(svg.contains(r#"text-anchor="middle">18</text>"#));
        assert!(svg.contains(r#"text-anchor="middle">23</text>"#));
        assert!(svg.contains(r#"text-anchor="middle">Oct</text>"#));
        assert!(!svg.contains(r#"text-anchor="middle">24</text>"#));
    }

    #[test]
    fn test_y_domain_is_padded() {
        let scales = Scales {
            first: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            span_days: 6.0,
            y_min: 20.0 - DOMAIN_PADDING,
            y_max: 26.0 + DOMAIN_PADDING,
            width: 520.0,
            height: 240.0,
        };
        assert_eq!(scales.y(15.0), 240.0);
        assert_eq!(scales.y(31.0), 0.0);
        assert_eq!(scales.x(NaiveDate::from_ymd_opt(2026, 10, 24).unwrap()), 520.0);
    }

    #[test]
    fn test_single_point_is_centered() {
        let point = ForecastPoint {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            avg_temp_c: 22.0,
        };
        let svg = render_chart(&[point], ChartOptions::default()).unwrap();
        // Inner width 600 - 50 - 30 = 520, centered at 260; y at the middle of 240
        assert!(svg.contains(r#"cx="260.00" cy="120.00""#));
    }

    #[test]
    fn test_y_ticks_are_round() {
        assert_eq!(
            y_ticks(15.0, 31.0, 10),
            vec![16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0, 30.0]
        );
        assert_eq!(y_ticks(0.0, 10.0, 10).len(), 11);
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(20.0), "20");
    }
}
