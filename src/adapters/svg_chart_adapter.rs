//! SVG chart adapter implementing ChartPort.
//!
//! Historical prices are drawn solid black, simulated paths dashed blue.
//! A `None` value ends the current polyline, so the two regions are never
//! joined.

use crate::domain::chart_data::ChartData;
use crate::domain::error::StocksimError;
use crate::ports::chart_port::{ChartLabels, ChartPort};
use std::fs;
use std::path::Path;

const PADDING: f64 = 50.0;
const HISTORICAL_STROKE: &str = "black";
const SIMULATED_STROKE: &str = "blue";

pub struct SvgChartAdapter {
    width: u32,
    height: u32,
}

impl SvgChartAdapter {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new(800, 400)
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(
        &self,
        data: &ChartData,
        labels: &ChartLabels,
        output_path: &str,
    ) -> Result<(), StocksimError> {
        if data.is_empty() {
            return Err(StocksimError::Render {
                reason: "no data to chart".to_string(),
            });
        }

        let svg = generate_chart_svg(data, labels, self.width as f64, self.height as f64);

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, svg)?;

        tracing::info!(path = output_path, points = data.len(), "chart written");
        Ok(())
    }
}

pub fn generate_chart_svg(data: &ChartData, labels: &ChartLabels, width: f64, height: f64) -> String {
    let Some((min_price, max_price)) = data.price_range() else {
        return String::new();
    };

    let plot_width = width - 2.0 * PADDING;
    let plot_height = height - 2.0 * PADDING;

    let range = max_price - min_price;
    let scale_y = if range > 0.0 {
        plot_height / range
    } else {
        1.0
    };
    let scale_x = if data.len() > 1 {
        plot_width / (data.len() - 1) as f64
    } else {
        0.0
    };

    let to_xy = |i: usize, price: f64| {
        let x = PADDING + i as f64 * scale_x;
        let y = height - PADDING - (price - min_price) * scale_y;
        (x, y)
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
<rect width="100%" height="100%" fill="white"/>
<text x="{cx:.1}" y="24" text-anchor="middle" font-family="sans-serif" font-size="16">{title}</text>
<line x1="{p:.1}" y1="{p:.1}" x2="{p:.1}" y2="{b:.1}" stroke="gray"/>
<line x1="{p:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="gray"/>
"#,
        w = width,
        h = height,
        cx = width / 2.0,
        title = escape(&labels.title),
        p = PADDING,
        b = height - PADDING,
        r = width - PADDING,
    );

    // axis labels
    svg.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" font-family="sans-serif" font-size="10">{v:.2}</text>
<text x="{x:.1}" y="{y2:.1}" text-anchor="end" font-family="sans-serif" font-size="10">{v2:.2}</text>
"#,
        x = PADDING - 4.0,
        y = height - PADDING,
        v = min_price,
        y2 = PADDING + 4.0,
        v2 = max_price,
    ));
    if let (Some(first), Some(last)) = (data.dates.first(), data.dates.last()) {
        svg.push_str(&format!(
            r#"<text x="{x1:.1}" y="{y:.1}" font-family="sans-serif" font-size="10">{first}</text>
<text x="{x2:.1}" y="{y:.1}" text-anchor="end" font-family="sans-serif" font-size="10">{last}</text>
"#,
            x1 = PADDING,
            x2 = width - PADDING,
            y = height - PADDING + 16.0,
        ));
    }

    for segment in segments(&data.historical) {
        svg.push_str(&polyline(&segment, &to_xy, HISTORICAL_STROKE, 2.0, None));
    }
    for series in &data.simulated {
        for segment in segments(series) {
            svg.push_str(&polyline(&segment, &to_xy, SIMULATED_STROKE, 1.0, Some("5,5")));
        }
    }

    // legend
    svg.push_str(&format!(
        r#"<line x1="{x:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y1:.1}" stroke="{hs}" stroke-width="2"/>
<text x="{tx:.1}" y="{ty1:.1}" font-family="sans-serif" font-size="11">{hl}</text>
<line x1="{x:.1}" y1="{y2:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{ss}" stroke-dasharray="5,5"/>
<text x="{tx:.1}" y="{ty2:.1}" font-family="sans-serif" font-size="11">{sl}</text>
</svg>
"#,
        x = PADDING + 10.0,
        x2 = PADDING + 30.0,
        y1 = PADDING + 10.0,
        y2 = PADDING + 26.0,
        tx = PADDING + 36.0,
        ty1 = PADDING + 14.0,
        ty2 = PADDING + 30.0,
        hs = HISTORICAL_STROKE,
        ss = SIMULATED_STROKE,
        hl = escape(&labels.historical),
        sl = escape(&labels.simulated),
    ));

    svg
}

/// Runs of consecutive present values as (axis index, price) pairs.
fn segments(values: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push((i, *v)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn polyline(
    segment: &[(usize, f64)],
    to_xy: &impl Fn(usize, f64) -> (f64, f64),
    stroke: &str,
    stroke_width: f64,
    dash: Option<&str>,
) -> String {
    let points: Vec<String> = segment
        .iter()
        .map(|&(i, price)| {
            let (x, y) = to_xy(i, price);
            format!("{:.1},{:.1}", x, y)
        })
        .collect();
    let dash_attr = dash
        .map(|d| format!(r#" stroke-dasharray="{}""#, d))
        .unwrap_or_default();
    format!(
        "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{} points=\"{}\"/>\n",
        stroke,
        stroke_width,
        dash_attr,
        points.join(" ")
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_data() -> ChartData {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ChartData {
            dates: (0..4).map(|i| start + chrono::Duration::days(i)).collect(),
            historical: vec![Some(100.0), Some(102.0), None, None],
            simulated: vec![vec![None, None, Some(103.0), Some(101.0)]],
        }
    }

    fn labels() -> ChartLabels {
        ChartLabels::for_symbol("AAPL", "normal")
    }

    #[test]
    fn svg_has_dimensions_and_title() {
        let svg = generate_chart_svg(&sample_data(), &labels(), 800.0, 400.0);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="800""#));
        assert!(svg.contains(r#"height="400""#));
        assert!(svg.contains("AAPL simulated prices (normal)"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn historical_solid_and_simulated_dashed() {
        let svg = generate_chart_svg(&sample_data(), &labels(), 800.0, 400.0);

        let lines: Vec<&str> = svg.lines().filter(|l| l.starts_with("<polyline")).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("stroke=\"black\""));
        assert!(!lines[0].contains("stroke-dasharray"));
        assert!(lines[1].contains("stroke=\"blue\""));
        assert!(lines[1].contains("stroke-dasharray=\"5,5\""));
    }

    #[test]
    fn none_breaks_segments() {
        let segs = segments(&[Some(1.0), None, Some(2.0), Some(3.0), None]);
        assert_eq!(segs, vec![vec![(0, 1.0)], vec![(2, 2.0), (3, 3.0)]]);
        assert!(segments(&[None, None]).is_empty());
    }

    #[test]
    fn empty_data_produces_nothing() {
        let data = ChartData {
            dates: vec![],
            historical: vec![],
            simulated: vec![],
        };
        assert_eq!(generate_chart_svg(&data, &labels(), 800.0, 400.0), "");
    }

    #[test]
    fn title_is_escaped() {
        let mut l = labels();
        l.title = "A&B <test>".into();
        let svg = generate_chart_svg(&sample_data(), &l, 800.0, 400.0);
        assert!(svg.contains("A&amp;B &lt;test&gt;"));
    }

    #[test]
    fn render_writes_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("charts").join("aapl.svg");
        let adapter = SvgChartAdapter::default();

        adapter
            .render(&sample_data(), &labels(), out.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&out).unwrap();
        assert!(content.contains("<polyline"));
    }

    #[test]
    fn render_rejects_empty_data() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("empty.svg");
        let data = ChartData {
            dates: vec![],
            historical: vec![],
            simulated: vec![],
        };
        let err = SvgChartAdapter::default()
            .render(&data, &labels(), out.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, StocksimError::Render { .. }));
        assert!(!out.exists());
    }
}
