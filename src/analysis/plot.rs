// analysis/plot.rs

use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::prelude::*;
use std::fs;
use std::path::Path;

use crate::analysis::aggregation::{BerPoint, BerTable};
use crate::analysis::experiment::{PlotStyle, Scale};
use crate::error::{Error, Result};

type Series = (String, Vec<(f64, f64, Option<(f64, f64)>)>);

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Drawable coordinates of a series: points with a positive error rate
/// (and a positive x on log-log charts), with the per-run spread when it
/// can be shown on a log axis.
fn drawable(points: &[BerPoint], scale: Scale) -> Vec<(f64, f64, Option<(f64, f64)>)> {
    points
        .iter()
        .filter(|p| p.ber > 0.0 && (scale == Scale::SemiLogY || p.x > 0))
        .map(|p| {
            let spread = (p.runs > 1 && p.min_ber > 0.0).then_some((p.min_ber, p.max_ber));
            (p.x as f64, p.ber, spread)
        })
        .collect()
}

/// Axis ranges covering every drawable point with some padding.
pub fn axis_ranges(series: &[Series], scale: Scale) -> Option<((f64, f64), (f64, f64))> {
    let xs = series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0));
    let ys = series
        .iter()
        .flat_map(|(_, pts)| pts.iter().flat_map(|p| [Some(p.1), p.2.map(|s| s.0), p.2.map(|s| s.1)]))
        .flatten();

    let (x_min, x_max) = min_max(xs)?;
    let (y_min, y_max) = min_max(ys)?;

    let x_range = match scale {
        Scale::LogLog => (x_min / 1.5, x_max * 1.5),
        Scale::SemiLogY => (x_min - 0.5, x_max + 0.5),
    };
    Some((x_range, (y_min / 2.0, y_max * 2.0)))
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Render one line per series of `table` into a PNG file.
pub fn render_ber_plot(
    table: &BerTable,
    style: &PlotStyle,
    path: &Path,
    size: (u32, u32),
    with_legend: bool,
) -> Result<()> {
    let series: Vec<Series> = table
        .labels()
        .into_iter()
        .map(|label| (label.to_string(), drawable(&table.points(label), style.scale)))
        .filter(|(_, pts)| !pts.is_empty())
        .collect();

    let Some(((x0, x1), (y0, y1))) = axis_ranges(&series, style.scale) else {
        return Err(Error::Plot(format!(
            "no positive error rates to draw for {}",
            path.display()
        )));
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(40).x_label_area_size(60).y_label_area_size(90);
    if let Some(title) = style.title {
        builder.caption(title, ("sans-serif", 30));
    }

    match style.scale {
        Scale::LogLog => {
            let mut chart = builder
                .build_cartesian_2d((x0..x1).log_scale(), (y0..y1).log_scale())
                .map_err(plot_err)?;
            draw_series(&mut chart, style, &series, with_legend)?;
        }
        Scale::SemiLogY => {
            let mut chart = builder
                .build_cartesian_2d(x0..x1, (y0..y1).log_scale())
                .map_err(plot_err)?;
            draw_series(&mut chart, style, &series, with_legend)?;
        }
    }

    root.present().map_err(plot_err)?;
    log::info!("Saved figure {}", path.display());
    Ok(())
}

fn draw_series<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    style: &PlotStyle,
    series: &[Series],
    with_legend: bool,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .x_desc(style.x_label)
        .y_desc(style.y_label)
        .draw()
        .map_err(plot_err)?;

    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.0, p.1)).collect();

        chart
            .draw_series(LineSeries::new(coords.clone(), color.stroke_width(2)))
            .map_err(plot_err)?
            .label(label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(coords.iter().map(|&c| Circle::new(c, 5, color.filled())))
            .map_err(plot_err)?;

        chart
            .draw_series(points.iter().filter_map(|&(x, y, spread)| {
                spread.map(|(lo, hi)| ErrorBar::new_vertical(x, lo, y, hi, color.stroke_width(1), 8))
            }))
            .map_err(plot_err)?;
    }

    if with_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
    }
    Ok(())
}
