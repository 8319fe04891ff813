//! plotters sinks for the data produced by the ODE, calculus and model helpers.
//! Every function writes one file (PNG, GIF for the cobweb animation) and returns
//! `PlotError` instead of panicking on a drawing failure.
use crate::numerical::models::Cobweb;
use crate::ode::visualization::{PhasePortrait, SlopeField};
use log::info;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    #[error("nothing to plot: {0}")]
    EmptyData(String),
    #[error("drawing failed: {0}")]
    Drawing(String),
}

fn drawing_error<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}

/// min..max of the finite values, widened by 5% (and to a unit range for flat data)
fn padded_range<I: Iterator<Item = f64>>(values: I) -> Option<Range<f64>> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        return None;
    }
    let pad = if max - min > 0.0 { 0.05 * (max - min) } else { 0.5 };
    Some(min - pad..max + pad)
}

fn ranges(points: &[(f64, f64)], what: &str) -> Result<(Range<f64>, Range<f64>), PlotError> {
    let empty = || PlotError::EmptyData(what.to_string());
    let x = padded_range(points.iter().map(|p| p.0)).ok_or_else(empty)?;
    let y = padded_range(points.iter().map(|p| p.1)).ok_or_else(empty)?;
    Ok((x, y))
}

fn finite(points: impl IntoIterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    points
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect()
}

/// One curve `(x(t), y(t))` per initial condition, labelled with `x(0), y(0)`.
pub fn plot_phase_portrait(
    portrait: &PhasePortrait,
    path: &Path,
    size: (u32, u32),
) -> Result<(), PlotError> {
    let all: Vec<(f64, f64)> = portrait
        .trajectories
        .iter()
        .flat_map(|tr| finite(tr.x.iter().copied().zip(tr.y.iter().copied())))
        .collect();
    let (x_range, y_range) = ranges(&all, "phase portrait has no finite points")?;

    let root_area = BitMapBackend::new(path, size).into_drawing_area();
    root_area.fill(&WHITE).map_err(drawing_error)?;
    let mut chart = ChartBuilder::on(&root_area)
        .caption("Phase portrait", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()
        .map_err(drawing_error)?;

    for (i, trajectory) in portrait.trajectories.iter().enumerate() {
        let series = finite(trajectory.x.iter().copied().zip(trajectory.y.iter().copied()));
        let (x0, y0) = trajectory.initial;
        chart
            .draw_series(LineSeries::new(series, &Palette99::pick(i)))
            .map_err(drawing_error)?
            .label(format!("x(0)={}, y(0)={}", x0, y0))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], Palette99::pick(i)));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing_error)?;
    root_area.present().map_err(drawing_error)?;
    info!("phase portrait saved to {}", path.display());
    Ok(())
}

/// Short segments along the direction `(1, f(x, y))` at every grid node.
pub fn plot_slope_field(field: &SlopeField, path: &Path, size: (u32, u32)) -> Result<(), PlotError> {
    let nodes: Vec<(f64, f64)> = field.arrows.iter().map(|a| (a.x, a.y)).collect();
    let (x_range, y_range) = ranges(&nodes, "slope field has no arrows")?;
    // segment length relative to the grid spacing
    let length = 0.4 * (x_range.end - x_range.start) / (field.resolution.max(1) as f64);

    let root_area = BitMapBackend::new(path, size).into_drawing_area();
    root_area.fill(&WHITE).map_err(drawing_error)?;
    let mut chart = ChartBuilder::on(&root_area)
        .caption(format!("y' = {}", field.equation), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing_error)?;
    chart.configure_mesh().draw().map_err(drawing_error)?;
    chart
        .draw_series(field.arrows.iter().filter(|a| a.dx.is_finite() && a.dy.is_finite()).map(
            |a| {
                PathElement::new(
                    vec![(a.x, a.y), (a.x + length * a.dx, a.y + length * a.dy)],
                    BLUE,
                )
            },
        ))
        .map_err(drawing_error)?;
    root_area.present().map_err(drawing_error)?;
    info!("slope field saved to {}", path.display());
    Ok(())
}

/// `f` and `f'` on one chart.
pub fn plot_function_and_derivative(
    xs: &[f64],
    f: &[f64],
    df: &[f64],
    title: &str,
    path: &Path,
    size: (u32, u32),
) -> Result<(), PlotError> {
    let f_points = finite(xs.iter().copied().zip(f.iter().copied()));
    let df_points = finite(xs.iter().copied().zip(df.iter().copied()));
    let all: Vec<(f64, f64)> = f_points.iter().chain(df_points.iter()).copied().collect();
    let (x_range, y_range) = ranges(&all, "function has no finite values")?;

    let root_area = BitMapBackend::new(path, size).into_drawing_area();
    root_area.fill(&WHITE).map_err(drawing_error)?;
    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .x_desc("x")
        .draw()
        .map_err(drawing_error)?;
    for (col, (label, series)) in [("f(x)", f_points), ("f'(x)", df_points)]
        .into_iter()
        .enumerate()
    {
        chart
            .draw_series(LineSeries::new(series, &Palette99::pick(col)))
            .map_err(drawing_error)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], Palette99::pick(col)));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing_error)?;
    root_area.present().map_err(drawing_error)?;
    Ok(())
}

/// Animated GIF, one frame per iteration of the map.
pub fn plot_cobweb(
    cobweb: &Cobweb,
    path: &Path,
    size: (u32, u32),
    frame_delay_ms: u32,
) -> Result<(), PlotError> {
    if cobweb.frames.is_empty() {
        return Err(PlotError::EmptyData("cobweb has no frames".to_string()));
    }
    let mut all = cobweb.curve.clone();
    if let Some(last) = cobweb.frames.last() {
        all.extend(last.points.iter().copied());
    }
    let (x_range, y_range) = ranges(&finite(all), "cobweb has no finite points")?;

    let root_area = BitMapBackend::gif(path, size, frame_delay_ms)
        .map_err(drawing_error)?
        .into_drawing_area();
    for frame in &cobweb.frames {
        root_area.fill(&WHITE).map_err(drawing_error)?;
        let mut chart = ChartBuilder::on(&root_area)
            .caption(format!("x -> {} x (1 - x)", cobweb.parameter), ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(30)
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(drawing_error)?;
        chart.configure_mesh().draw().map_err(drawing_error)?;
        chart
            .draw_series(LineSeries::new(cobweb.curve.iter().copied(), &BLUE))
            .map_err(drawing_error)?;
        chart
            .draw_series(LineSeries::new(cobweb.curve.iter().map(|&(x, _)| (x, x)), &BLACK))
            .map_err(drawing_error)?;
        chart
            .draw_series(LineSeries::new(frame.points.iter().copied(), &RED))
            .map_err(drawing_error)?;
        root_area.present().map_err(drawing_error)?;
    }
    info!("cobweb animation with {} frames saved to {}", cobweb.frames.len(), path.display());
    Ok(())
}

/// Scatter of `(r, x)` pairs of a bifurcation diagram.
pub fn plot_bifurcation(points: &[(f64, f64)], path: &Path, size: (u32, u32)) -> Result<(), PlotError> {
    let points = finite(points.iter().copied());
    let (x_range, y_range) = ranges(&points, "bifurcation diagram is empty")?;

    let root_area = BitMapBackend::new(path, size).into_drawing_area();
    root_area.fill(&WHITE).map_err(drawing_error)?;
    let mut chart = ChartBuilder::on(&root_area)
        .caption("Bifurcation diagram", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .x_desc("r")
        .y_desc("x")
        .draw()
        .map_err(drawing_error)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 1, BLACK.filled())))
        .map_err(drawing_error)?;
    root_area.present().map_err(drawing_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        let range = padded_range([1.0, 3.0, f64::NAN].into_iter()).unwrap();
        assert!((range.start - 0.9).abs() < 1e-12 && (range.end - 3.1).abs() < 1e-12);
        let flat = padded_range([2.0, 2.0].into_iter()).unwrap();
        assert_eq!(flat, 1.5..2.5);
        assert!(padded_range([f64::INFINITY].into_iter()).is_none());
    }

    #[test]
    fn test_empty_data_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let err = plot_bifurcation(&[], &path, (200, 200)).unwrap_err();
        assert!(matches!(err, PlotError::EmptyData(_)));
        let portrait = PhasePortrait { trajectories: vec![] };
        let err = plot_phase_portrait(&portrait, &path, (200, 200)).unwrap_err();
        assert!(matches!(err, PlotError::EmptyData(_)));
        assert!(!path.exists());
    }

    // rendering needs a system font for captions and tick labels
    #[test]
    #[ignore]
    fn test_bifurcation_png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bifurcation.png");
        let points = vec![(2.8, 0.64), (3.2, 0.51), (3.2, 0.80)];
        plot_bifurcation(&points, &path, (320, 240)).unwrap();
        assert!(path.exists());
    }
}
