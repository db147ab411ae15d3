use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (800, 480);

/// Renders the per-iteration training cost as an SVG line chart.
pub fn plot_cost_history(cost_history: &[f64], path: &Path) -> Result<(), Box<dyn Error>> {
    if cost_history.is_empty() {
        return Err("cost history is empty, nothing to plot".into());
    }

    let max_cost = cost_history.iter().copied().fold(f64::MIN, f64::max);
    let min_cost = cost_history.iter().copied().fold(f64::MAX, f64::min);
    let margin = ((max_cost - min_cost) * 0.05).max(1e-9);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Training cost", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            1..cost_history.len().max(2),
            (min_cost - margin)..(max_cost + margin),
        )?;

    chart
        .configure_mesh()
        .x_desc("iteration")
        .y_desc("cross-entropy")
        .draw()?;

    chart.draw_series(LineSeries::new(
        cost_history
            .iter()
            .enumerate()
            .map(|(index, &cost)| (index + 1, cost)),
        &BLUE,
    ))?;

    root.present()?;
    tracing::info!(path = %path.display(), points = cost_history.len(), "cost curve written");

    Ok(())
}
