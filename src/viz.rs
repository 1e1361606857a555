//! Chart rendering with Plotters.
//!
//! Renders the declarative chart descriptions from `chart` to PNG files in
//! a scratch output directory. These images are a convenience for the CLI;
//! the chart descriptions themselves are the contract.

use std::path::Path;

use plotters::element::Pie;
use plotters::prelude::*;

use crate::chart::{BarChart, ChartSet, LineChart, PieChart, Scatter3d};
use crate::frm::Segment;

/// Parse a "#rrggbb" color, falling back to black.
fn color_from_hex(hex: &str) -> RGBColor {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return BLACK;
    }
    let channel = |r: std::ops::Range<usize>| u8::from_str_radix(&hex[r], 16).unwrap_or(0);
    RGBColor(channel(0..2), channel(2..4), channel(4..6))
}

/// Render a categorical bar chart.
pub fn render_bar_chart(chart: &BarChart, output_path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = chart.bars.len();
    let max_value = chart
        .bars
        .iter()
        .map(|b| b.value)
        .fold(0.0f64, f64::max);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max_value * 1.1).max(1.0))?;

    let bars = &chart.bars;
    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(n)
        .x_label_formatter(&|x| {
            let i = x.round();
            if i < 0.0 || (x - i).abs() > 1e-6 {
                return String::new();
            }
            bars.get(i as usize)
                .map(|b| b.label.clone())
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, bar) in chart.bars.iter().enumerate() {
        let color = color_from_hex(&bar.color);
        ctx.draw_series(std::iter::once(Rectangle::new(
            [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, bar.value)],
            color.filled(),
        )))?;
    }

    root.present()?;
    println!("Chart saved to: {}", output_path.display());

    Ok(())
}

/// Render a pie chart. A pie with no mass gets its title and nothing else.
pub fn render_pie_chart(chart: &PieChart, output_path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(chart.title.as_str(), ("sans-serif", 28))?;

    let total: f64 = chart.slices.iter().map(|s| s.value).sum();
    if total > 0.0 {
        let sizes: Vec<f64> = chart.slices.iter().map(|s| s.value).collect();
        let colors: Vec<RGBColor> = chart
            .slices
            .iter()
            .map(|s| color_from_hex(&s.color))
            .collect();
        let labels: Vec<String> = chart.slices.iter().map(|s| s.label.clone()).collect();

        let center = (320, 240);
        let radius = 150.0;
        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 13).into_font().color(&BLACK));
        area.draw(&pie)?;
    }

    root.present()?;
    println!("Chart saved to: {}", output_path.display());

    Ok(())
}

/// Render a line chart with point markers.
pub fn render_line_chart(chart: &LineChart, output_path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = chart.points.len();
    let max_value = chart
        .points
        .iter()
        .map(|p| p.value)
        .fold(0.0f64, f64::max);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(n as f64 + 1.0), 0f64..(max_value * 1.1).max(1.0))?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    ctx.draw_series(LineSeries::new(
        chart.points.iter().map(|p| (p.rank as f64, p.value)),
        &BLUE,
    ))?;
    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|p| Circle::new((p.rank as f64, p.value), 3, BLUE.filled())),
    )?;

    root.present()?;
    println!("Chart saved to: {}", output_path.display());

    Ok(())
}

/// Render the customer value scatter on three axes, one series per segment.
pub fn render_value_scatter(chart: &Scatter3d, output_path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (900, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let axis_max = |f: fn(&crate::chart::ScatterPoint) -> f64| {
        (chart.points.iter().map(f).fold(0.0f64, f64::max) * 1.1).max(1.0)
    };
    let x_max = axis_max(|p| p.recency_days);
    let y_max = axis_max(|p| p.frequency);
    let z_max = axis_max(|p| p.monetary);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 30))
        .margin(20)
        .build_cartesian_3d(0f64..x_max, 0f64..y_max, 0f64..z_max)?;

    ctx.with_projection(|mut pb| {
        pb.pitch = 0.3;
        pb.yaw = 0.5;
        pb.scale = 0.85;
        pb.into_matrix()
    });

    ctx.configure_axes().draw()?;

    for &segment in Segment::ALL.iter() {
        let points: Vec<_> = chart
            .points
            .iter()
            .filter(|p| p.segment == segment)
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = color_from_hex(crate::chart::segment_color(segment));
        ctx.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.recency_days, p.frequency, p.monetary), 4, color.filled())),
        )?
        .label(segment.to_string())
        .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
    }

    ctx.configure_series_labels().draw()?;

    root.present()?;
    println!("Chart saved to: {}", output_path.display());

    Ok(())
}

/// Render the full chart inventory as PNGs under `out_dir`.
pub fn generate_chart_report(charts: &ChartSet, out_dir: &Path) -> crate::Result<()> {
    std::fs::create_dir_all(out_dir)?;

    render_bar_chart(&charts.tier_revenue, &out_dir.join("abc_chart.png"))?;
    render_bar_chart(&charts.segment_counts, &out_dir.join("frm_chart.png"))?;
    render_pie_chart(&charts.tier_products_pie, &out_dir.join("abc_category_pie.png"))?;
    render_line_chart(&charts.cumulative_revenue, &out_dir.join("cumulative_revenue.png"))?;
    render_line_chart(&charts.monthly_revenue, &out_dir.join("monthly_sales.png"))?;
    render_value_scatter(&charts.value_scatter, &out_dir.join("frm_3d_scatter.png"))?;

    Ok(())
}
