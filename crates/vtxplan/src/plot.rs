//! SVG chart of ranked combinations.
//!
//! One row per combination, best at the top. Each channel is drawn as a
//! rectangle spanning its occupied bandwidth, coloured by band and labelled
//! with frequency and band/channel. Optionally overlays the significant
//! in-range IMD products of the best combination as dashed lines.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use vtxplan_core::catalog::{Catalog, FrequencyLabels};
use vtxplan_core::imd::ImdOrder;
use vtxplan_core::ranking::Ranked;
use vtxplan_core::scoring::{EnhancedRating, ImdBreakdown};
use vtxplan_core::Mhz;

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const GOLD: RGBColor = RGBColor(230, 200, 0);

fn band_color(band: Option<&str>) -> RGBColor {
    match band {
        Some("R") => RED,
        Some("F") => BLUE,
        Some("A") => GREEN,
        Some("B") => ORANGE,
        Some("E") => PURPLE,
        _ => RGBColor(128, 128, 128),
    }
}

fn imd_color(order: ImdOrder) -> RGBColor {
    match order {
        ImdOrder::Second => RED,
        ImdOrder::ThirdTwoFreq => ORANGE,
        ImdOrder::ThirdThreeFreq => GOLD,
    }
}

/// What to draw besides the combinations themselves.
pub struct PlotContext<'a> {
    pub catalog: &'a Catalog,
    pub labels: &'a FrequencyLabels,
    pub channel_width: Mhz,
    pub min_freq: Mhz,
    pub max_freq: Mhz,
    /// IMD overlay for the first (best) row.
    pub imd: Option<&'a ImdBreakdown>,
}

pub fn draw(
    path: &Path,
    entries: &[Ranked<EnhancedRating>],
    ctx: &PlotContext<'_>,
) -> anyhow::Result<()> {
    let root = SVGBackend::new(path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    let rows = entries.len() as f64;
    let x_min = f64::from(ctx.min_freq - 60);
    let x_max = f64::from(ctx.max_freq + 10);
    let half_width = f64::from(ctx.channel_width) / 2.0;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Top FPV Frequency Combinations - {}MHz Channel Bandwidth (Range: {}-{} MHz)",
                ctx.channel_width, ctx.min_freq, ctx.max_freq
            ),
            ("sans-serif", 22).into_font(),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, -1.0..rows)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (MHz)")
        .y_desc("Combination Rank")
        .draw()?;

    // Catalog channels in range, faint.
    for band in ctx.catalog.bands() {
        let color = band_color(Some(band.name.as_str()));
        let lines = band
            .channels
            .iter()
            .filter(|c| ctx.min_freq <= c.freq_mhz && c.freq_mhz <= ctx.max_freq)
            .map(|c| {
                let x = f64::from(c.freq_mhz);
                PathElement::new(vec![(x, -1.0), (x, rows)], color.mix(0.2))
            });
        chart.draw_series(lines)?;
    }

    // Search range limits.
    for edge in [ctx.min_freq, ctx.max_freq] {
        let x = f64::from(edge);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, -1.0), (x, rows)],
            BLACK.mix(0.5),
        )))?;
    }

    let centered = Pos::new(HPos::Center, VPos::Center);
    for (i, entry) in entries.iter().enumerate() {
        // Best combination on the top row.
        let y = rows - 1.0 - i as f64;

        for &freq in &entry.frequencies {
            let color = band_color(ctx.labels.primary_band(freq));
            let x = f64::from(freq);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - half_width, y - 0.4), (x + half_width, y + 0.4)],
                color.mix(0.3).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - half_width, y - 0.4), (x + half_width, y + 0.4)],
                color.stroke_width(2),
            )))?;
            chart.draw_series([
                Text::new(
                    freq.to_string(),
                    (x, y - 0.05),
                    ("sans-serif", 11).into_font().color(&BLACK).pos(centered),
                ),
                Text::new(
                    ctx.labels.describe(freq),
                    (x, y + 0.25),
                    ("sans-serif", 11).into_font().color(&color).pos(centered),
                ),
            ])?;
        }

        chart.draw_series(std::iter::once(Text::new(
            format!("Rating: {}", entry.rating),
            (f64::from(ctx.min_freq - 8), y),
            ("sans-serif", 13)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        )))?;

        let marks = match ctx.imd {
            Some(breakdown) if i == 0 => imd_marks(breakdown, ctx),
            _ => Vec::new(),
        };
        for (x, color) in marks {
            // Dashed: four 0.1-row segments across the row.
            let dashes = (0..4).map(|k| {
                let y0 = y - 0.4 + 0.2 * f64::from(k);
                PathElement::new(vec![(x, y0), (x, y0 + 0.1)], color.stroke_width(2))
            });
            chart.draw_series(dashes)?;
            chart.draw_series(std::iter::once(Text::new(
                "IMD",
                (x, y - 0.55),
                ("sans-serif", 9)
                    .into_font()
                    .color(&color)
                    .pos(Pos::new(HPos::Center, VPos::Top)),
            )))?;
        }
    }

    if ctx.imd.is_some() {
        for order in ImdOrder::ALL {
            let color = imd_color(order);
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
                .label(format!("{order} IMD"))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    tracing::info!(path = %path.display(), rows = entries.len(), "plot written");
    Ok(())
}

/// Significant in-range IMD products as `(frequency, colour)`.
fn imd_marks(breakdown: &ImdBreakdown, ctx: &PlotContext<'_>) -> Vec<(f64, RGBColor)> {
    breakdown
        .iter()
        .filter(|(_, d)| d.is_significant())
        .filter(|(_, d)| ctx.min_freq <= d.imd_freq && d.imd_freq <= ctx.max_freq)
        .map(|(order, d)| (f64::from(d.imd_freq), imd_color(order)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtxplan_core::scoring::ImdDetail;

    fn detail(imd_freq: Mhz, interference_score: f64) -> ImdDetail {
        ImdDetail {
            imd_freq,
            source_freqs: vec![5800, 5840],
            formula: String::new(),
            nearest_freq: 5760,
            separation: 0,
            interference_score,
            weight: 1.0,
        }
    }

    fn context<'a>(
        catalog: &'a Catalog,
        labels: &'a FrequencyLabels,
        imd: Option<&'a ImdBreakdown>,
    ) -> PlotContext<'a> {
        PlotContext {
            catalog,
            labels,
            channel_width: 17,
            min_freq: 5640,
            max_freq: 5830,
            imd,
        }
    }

    #[test]
    fn imd_marks_keep_significant_in_range_products() {
        let catalog = Catalog::analog();
        let labels = catalog.labels();
        let breakdown = ImdBreakdown {
            second_order: vec![detail(5760, 1225.0), detail(5720, 0.0), detail(5900, 100.0)],
            third_order_2freq: Vec::new(),
            third_order_3freq: vec![detail(5700, 5.0)],
        };
        let ctx = context(&catalog, &labels, Some(&breakdown));

        let marks: Vec<_> = imd_marks(&breakdown, &ctx)
            .into_iter()
            .map(|(x, c)| (x, (c.0, c.1, c.2)))
            .collect();
        assert_eq!(
            marks,
            vec![
                (5760.0, (RED.0, RED.1, RED.2)),
                (5700.0, (GOLD.0, GOLD.1, GOLD.2)),
            ]
        );
    }

    #[test]
    fn draw_writes_svg_with_ratings() {
        let catalog = Catalog::analog();
        let labels = catalog.labels();
        let breakdown = ImdBreakdown {
            second_order: vec![detail(5760, 1225.0)],
            ..ImdBreakdown::default()
        };
        let entries = vec![
            Ranked {
                rating: EnhancedRating(100),
                frequencies: vec![5658, 5695, 5765, 5800],
            },
            Ranked {
                rating: EnhancedRating(97),
                frequencies: vec![5658, 5695, 5769, 5805],
            },
        ];
        let path = std::env::temp_dir().join(format!("vtxplan-plot-{}.svg", std::process::id()));

        draw(&path, &entries, &context(&catalog, &labels, Some(&breakdown))).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Rating: 100"));
        assert!(svg.contains("Rating: 97"));
        assert!(svg.contains("2nd order IMD"));
    }

    #[test]
    fn draw_handles_empty_ranking() {
        let catalog = Catalog::hdzero();
        let labels = catalog.labels();
        let path =
            std::env::temp_dir().join(format!("vtxplan-empty-{}.svg", std::process::id()));

        draw(&path, &[], &context(&catalog, &labels, None)).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(!svg.contains("Rating:"));
        assert!(!svg.contains("IMD"));
    }
}
