//! @ai:module:intent Bar chart rendering for comparisons and rankings
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::{Comparison, RankedRow};
use crate::report::{ChartData, ChartJob, ChartSpec};
use anyhow::Result;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Width of one key's slot on the x axis. Bars sit in `[3i, 3i + 2]`.
const SLOT: i32 = 3;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Render one chart job to its output path
    fn render(&self, job: &ChartJob) -> Result<PathBuf>;
}

/// @ai:intent Renders PNG bar charts from ordered rows
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Draw two bars per key, one per dataset
    /// @ai:effects fs:write
    fn generate_comparison_chart(
        &self,
        spec: &ChartSpec,
        comparison: &Comparison,
        output_path: &Path,
    ) -> Result<()> {
        let root =
            BitMapBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let keys: Vec<&str> = comparison.rows.iter().map(|r| r.key.as_str()).collect();
        let upper = y_upper(
            comparison
                .rows
                .iter()
                .flat_map(|r| [r.value_a, r.value_b]),
        );

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range(keys.len()), 0f64..upper)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(label_capacity(keys.len()))
            .x_label_formatter(&|x| slot_label(&keys, *x))
            .y_desc(spec.y_desc.clone().unwrap_or_default())
            .x_desc(spec.x_desc.clone().unwrap_or_default())
            .draw()?;

        let first_label = spec.labels.first().cloned().unwrap_or_default();
        let second_label = spec.labels.get(1).cloned().unwrap_or_default();

        chart
            .draw_series(comparison.rows.iter().enumerate().map(|(i, row)| {
                let left = i as i32 * SLOT;
                Rectangle::new(
                    [(left, 0.0), (left + 1, bar_height(row.value_a))],
                    BLUE.mix(0.7).filled(),
                )
            }))?
            .label(first_label)
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.mix(0.7).filled())
            });

        chart
            .draw_series(comparison.rows.iter().enumerate().map(|(i, row)| {
                let left = i as i32 * SLOT + 1;
                Rectangle::new(
                    [(left, 0.0), (left + 1, bar_height(row.value_b))],
                    GREEN.mix(0.7).filled(),
                )
            }))?
            .label(second_label)
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], GREEN.mix(0.7).filled())
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Draw one bar per key with its value printed above
    /// @ai:effects fs:write
    fn generate_ranking_chart(
        &self,
        spec: &ChartSpec,
        rows: &[RankedRow],
        output_path: &Path,
    ) -> Result<()> {
        let root =
            BitMapBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        let upper = y_upper(rows.iter().map(|r| r.value));

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range(keys.len()), 0f64..upper)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(label_capacity(keys.len()))
            .x_label_formatter(&|x| slot_label(&keys, *x))
            .y_desc(spec.y_desc.clone().unwrap_or_default())
            .x_desc(spec.x_desc.clone().unwrap_or_default())
            .draw()?;

        chart.draw_series(rows.iter().enumerate().map(|(i, row)| {
            let left = i as i32 * SLOT;
            Rectangle::new(
                [(left, 0.0), (left + 2, bar_height(row.value))],
                BLUE.mix(0.7).filled(),
            )
        }))?;

        chart.draw_series(rows.iter().enumerate().map(|(i, row)| {
            Text::new(
                format!("{:.2}", row.value),
                (i as i32 * SLOT, bar_height(row.value)),
                ("sans-serif", 12).into_font(),
            )
        }))?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent X coordinate range with one slot per key and a unit margin on each side
/// @ai:effects pure
fn x_range(keys: usize) -> Range<i32> {
    -1..(keys as i32 * SLOT).max(1)
}

/// @ai:intent Enough label points that every integer x coordinate is a candidate
/// @ai:effects pure
fn label_capacity(keys: usize) -> usize {
    keys * SLOT as usize + 2
}

/// @ai:intent Key shown at the centre of its slot, blank elsewhere
/// @ai:effects pure
fn slot_label(keys: &[&str], x: i32) -> String {
    if x < 1 || (x - 1) % SLOT != 0 {
        return String::new();
    }

    keys.get(((x - 1) / SLOT) as usize)
        .map(|key| key.to_string())
        .unwrap_or_default()
}

/// @ai:intent Drawn height of a value; NaN and infinities draw as an empty bar
/// @ai:effects pure
fn bar_height(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// @ai:intent Upper y bound leaving headroom above the tallest bar
/// @ai:effects pure
fn y_upper<I: Iterator<Item = f64>>(values: I) -> f64 {
    let max = values.map(bar_height).fold(0.0f64, f64::max);

    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Render a chart, creating its parent directory first
    /// @ai:effects fs:write
    fn render(&self, job: &ChartJob) -> Result<PathBuf> {
        let output_path = job.spec.output_path.clone();

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match &job.data {
            ChartData::Comparison(comparison) => {
                self.generate_comparison_chart(&job.spec, comparison, &output_path)?
            }
            ChartData::Ranking(rows) => {
                self.generate_ranking_chart(&job.spec, rows, &output_path)?
            }
        }

        Ok(output_path)
    }
}
