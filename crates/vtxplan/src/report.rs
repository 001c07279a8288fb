//! Console rendering of a [`PlanReport`].

use std::io::{self, Write};

use vtxplan_core::catalog::FrequencyLabels;
use vtxplan_core::planner::{CombinationReport, PlanReport, Planner};
use vtxplan_core::Mhz;

/// Worst interference cases listed for the best combination.
const WORST_CASES: usize = 5;

pub struct ConsoleReport<'a> {
    pub report: &'a PlanReport,
    pub planner: &'a Planner,
    pub labels: &'a FrequencyLabels,
    pub top: usize,
}

impl ConsoleReport<'_> {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_summary(out)?;
        if !self.report.is_feasible() {
            writeln!(
                out,
                "\nNo feasible plan: fewer than {} non-overlapping channels fit in {}-{} MHz.",
                self.report.segments_needed, self.report.min_freq, self.report.max_freq
            )?;
            return Ok(());
        }
        self.write_listing(out)?;
        self.write_table(out)?;
        if let Some(best) = &self.report.best {
            self.write_best(out, best)?;
        }
        Ok(())
    }

    fn channel(&self, freq: Mhz) -> String {
        format!("{freq}({})", self.labels.describe(freq))
    }

    fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let r = self.report;
        writeln!(
            out,
            "Using {} mode with {} MHz bandwidth",
            r.mode, r.channel_width
        )?;
        writeln!(out, "Total FPV frequencies: {}", r.catalog_frequencies)?;
        writeln!(
            out,
            "Frequencies that fit entirely in range {}-{} MHz: {}",
            r.min_freq,
            r.max_freq,
            r.candidates.len()
        )?;
        writeln!(out, "Available frequencies: {:?}", r.candidates)?;
        writeln!(
            out,
            "Channel edges: {:.1} to {:.1} MHz",
            r.edges.low, r.edges.high
        )?;
        writeln!(out, "Total combinations: {}", r.total_combinations)
    }

    fn write_listing<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "\nTop {} FPV frequency combinations (Enhanced IMD Analysis):",
            self.top
        )?;
        writeln!(
            out,
            "Note: Enhanced and Legacy ratings use different calculation methods and cannot be directly compared."
        )?;
        for (i, entry) in self.report.ranking.top(self.top).iter().enumerate() {
            let channels: Vec<String> = entry
                .frequencies
                .iter()
                .map(|&f| format!("{f}MHz({})", self.labels.describe(f)))
                .collect();
            writeln!(
                out,
                "{}. Rating: {} (Legacy: {}) - {}",
                i + 1,
                entry.rating,
                self.planner.legacy_rating(&entry.frequencies),
                channels.join(", ")
            )?;
        }
        Ok(())
    }

    fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let segments = self.report.segments_needed;
        let rule_width = 16 + 13 * segments;

        writeln!(out, "\n{}", "=".repeat(rule_width))?;
        write!(out, "Rank | Rating ")?;
        for ch in 1..=segments {
            write!(out, "| {:<10} ", format!("Ch{ch}"))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", "-".repeat(rule_width))?;
        for (i, entry) in self.report.ranking.top(self.top).iter().enumerate() {
            write!(out, "{:4} | {:6} ", i + 1, entry.rating.value())?;
            for &f in &entry.frequencies {
                write!(out, "| {:<10} ", self.channel(f))?;
            }
            writeln!(out)?;
        }
        writeln!(out, "{}", "=".repeat(rule_width))
    }

    fn write_best<W: Write>(&self, out: &mut W, best: &CombinationReport) -> io::Result<()> {
        writeln!(out, "\nDetailed IMD Analysis for Best Combination:")?;
        writeln!(out, "Frequencies: {:?}", best.frequencies)?;
        writeln!(
            out,
            "Enhanced Rating: {}, Legacy Rating: {}",
            best.enhanced, best.legacy
        )?;

        writeln!(out, "\nSignificant IMD products:")?;
        writeln!(out, "  2nd order: {}", best.significant.second_order)?;
        writeln!(
            out,
            "  3rd order (2-freq): {}",
            best.significant.third_order_2freq
        )?;
        writeln!(
            out,
            "  3rd order (3-freq): {}",
            best.significant.third_order_3freq
        )?;

        writeln!(out, "\nWorst {WORST_CASES} interference cases:")?;
        let worst = best.breakdown.worst(WORST_CASES);
        if worst.is_empty() {
            writeln!(out, "  none")?;
        }
        for (order, detail) in worst {
            writeln!(out, "  {} = {} MHz", detail.formula, detail.imd_freq)?;
            writeln!(out, "    Type: {order}")?;
            writeln!(
                out,
                "    Separation: {} MHz, Score: {:.2}",
                detail.separation, detail.interference_score
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtxplan_core::catalog::{BandwidthMode, Catalog};
    use vtxplan_core::config::PlannerConfig;

    fn render(config: PlannerConfig, top: usize) -> String {
        let catalog = config.catalog();
        let planner = Planner::new(config).unwrap();
        let report = planner.run(&catalog);
        let labels = catalog.labels();
        let console = ConsoleReport {
            report: &report,
            planner: &planner,
            labels: &labels,
            top,
        };
        let mut buf = Vec::new();
        console.write_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn hdzero_report_lists_top_and_best() {
        let text = render(PlannerConfig::for_mode(BandwidthMode::Hdzero), 3);

        assert!(text.contains("Using hdzero mode with 27 MHz bandwidth"));
        assert!(text.contains("Total FPV frequencies: 11"));
        assert!(text.contains("Channel edges: 5653.5 to 5816.5 MHz"));
        assert!(text.contains("Total combinations: 23"));
        assert!(text.contains("cannot be directly compared"));
        assert!(text.contains(
            "1. Rating: 100 (Legacy: 100) - 5658MHz(R1), 5695MHz(R2), 5769MHz(R4), 5806MHz(R5)"
        ));
        assert!(text.contains("   1 |    100 | 5658(R1)"));
        assert!(!text.contains("\n4. Rating"));
        assert!(text.contains("Enhanced Rating: 100, Legacy Rating: 100"));
    }

    #[test]
    fn shared_frequencies_show_all_labels() {
        let mut config = PlannerConfig::default();
        config.search.max_freq = 5900;
        let catalog = Catalog::analog();
        let planner = Planner::new(config).unwrap();
        let labels = catalog.labels();
        let console = ConsoleReport {
            report: &planner.run(&catalog),
            planner: &planner,
            labels: &labels,
            top: 1,
        };
        assert_eq!(console.channel(5880), "5880(R7/F8)");
    }

    #[test]
    fn infeasible_plan_is_reported() {
        let mut config = PlannerConfig::default();
        config.search.segments_needed = 12;
        let text = render(config, 10);
        assert!(text.contains("Total combinations: 0"));
        assert!(text.contains("No feasible plan"));
        assert!(!text.contains("Detailed IMD Analysis"));
    }
}
