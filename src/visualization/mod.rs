//! Predicted-vs-actual scatter plot

use ndarray::Array1;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::error::{KeibaError, Result};

/// Render a scatter plot of predictions against actual label values.
///
/// Title is the label name; axes are `Predicted <label>` / `Actual <label>`.
/// The chart is written as a PNG to `path`. Purely observational output;
/// nothing downstream consumes it.
pub fn scatter_plot(
    predictions: &Array1<f64>,
    actual: &Array1<f64>,
    label_name: &str,
    path: impl AsRef<Path>,
) -> Result<()> {
    if predictions.len() != actual.len() {
        return Err(KeibaError::ShapeError {
            expected: format!("{} predictions", actual.len()),
            actual: format!("{} predictions", predictions.len()),
        });
    }
    if predictions.is_empty() {
        return Err(KeibaError::ValidationError(
            "nothing to plot: empty prediction vector".to_string(),
        ));
    }

    let path = path.as_ref();

    let (x_min, x_max) = value_range(predictions);
    let (y_min, y_max) = value_range(actual);

    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| KeibaError::PlotError(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(label_name, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| KeibaError::PlotError(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(format!("Predicted {}", label_name))
        .y_desc(format!("Actual {}", label_name))
        .draw()
        .map_err(|e| KeibaError::PlotError(e.to_string()))?;

    chart
        .draw_series(
            predictions
                .iter()
                .zip(actual.iter())
                .map(|(&p, &a)| Circle::new((p, a), 2, BLUE.mix(0.4).filled())),
        )
        .map_err(|e| KeibaError::PlotError(e.to_string()))?;

    root.present()
        .map_err(|e| KeibaError::PlotError(e.to_string()))?;

    info!("wrote scatter plot to {}", path.display());
    Ok(())
}

// Pads degenerate ranges so the chart never collapses to zero width
fn value_range(values: &Array1<f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values.iter() {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scatter_plot_writes_file() {
        let predictions = array![1.2, 2.8, 3.1, 4.5];
        let actual = array![1.0, 3.0, 3.0, 4.0];

        let path = std::env::temp_dir().join(format!("keiba_plot_{}.png", std::process::id()));
        scatter_plot(&predictions, &actual, "Final Position", &path).unwrap();

        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_length_mismatch_errors() {
        let predictions = array![1.0, 2.0];
        let actual = array![1.0];
        let path = std::env::temp_dir().join("keiba_plot_mismatch.png");
        assert!(scatter_plot(&predictions, &actual, "Final Position", &path).is_err());
    }

    #[test]
    fn test_empty_input_errors() {
        let empty = Array1::<f64>::zeros(0);
        let path = std::env::temp_dir().join("keiba_plot_empty.png");
        assert!(scatter_plot(&empty, &empty, "Final Position", &path).is_err());
    }

    #[test]
    fn test_constant_values_still_plot() {
        let predictions = array![2.0, 2.0, 2.0];
        let actual = array![2.0, 2.0, 2.0];
        let path =
            std::env::temp_dir().join(format!("keiba_plot_const_{}.png", std::process::id()));
        scatter_plot(&predictions, &actual, "Final Position", &path).unwrap();
        std::fs::remove_file(&path).ok();
    }
}
