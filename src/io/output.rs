use crate::formatting::{
    format_currency, format_multiple, format_optional, format_percent_change, format_rate,
    format_unit_price, format_volume,
};
use crate::funnel::{
    scale_cac, Assumptions, CalculatorState, CompanyScale, ConversionRates, FunnelModel,
    Industry, ReverseFunnel, Transition,
};
use crate::insight::{Direction, Insight};
use crate::scoring::LeadScore;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Terminal,
}

impl FromStr for OutputFormat {
    type Err = crate::core::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "terminal" | "text" => Ok(Self::Terminal),
            other => Err(crate::core::errors::Error::Validation(format!(
                "unknown output format '{other}'"
            ))),
        }
    }
}

/// One row of the industry benchmark table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryRates {
    pub industry: Industry,
    #[serde(flatten)]
    pub rates: ConversionRates,
    pub visitor_to_close: f64,
}

/// One row of the company-scale CAC table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleCac {
    pub scale: CompanyScale,
    pub cac: f64,
}

/// Everything a command can hand to a writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", rename_all = "kebab-case")]
pub enum Report {
    Forward {
        assumptions: Assumptions,
        funnel: FunnelModel,
    },
    Reverse {
        inputs: CalculatorState,
        rates: ConversionRates,
        result: ReverseFunnel,
    },
    Compare {
        baseline: FunnelModel,
        current: FunnelModel,
        insight: Option<Insight>,
    },
    Score {
        score: LeadScore,
    },
    Rates {
        industries: Vec<IndustryRates>,
        scales: Vec<ScaleCac>,
    },
}

impl Report {
    /// Snapshot of both benchmark tables.
    pub fn rate_tables() -> Self {
        Report::Rates {
            industries: Industry::ALL
                .iter()
                .map(|&industry| {
                    let rates = industry.rates();
                    IndustryRates {
                        industry,
                        rates,
                        visitor_to_close: rates.visitor_to_close(),
                    }
                })
                .collect(),
            scales: CompanyScale::ALL
                .iter()
                .map(|&scale| ScaleCac {
                    scale,
                    cac: scale_cac(scale),
                })
                .collect(),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Report::Forward { .. } => "Funnel Projection",
            Report::Reverse { .. } => "Revenue Goal Plan",
            Report::Compare { .. } => "Scenario Comparison",
            Report::Score { .. } => "Lead Score",
            Report::Rates { .. } => "Benchmark Rates",
        }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "# {}", report.title())?;
        writeln!(self.writer)?;
        match report {
            Report::Forward {
                assumptions,
                funnel,
            } => self.write_forward(assumptions, funnel),
            Report::Reverse { result, .. } => self.write_reverse(result),
            Report::Compare {
                baseline,
                current,
                insight,
            } => self.write_compare(baseline, current, insight.as_ref()),
            Report::Score { score } => self.write_score(score),
            Report::Rates { industries, scales } => self.write_rates(industries, scales),
        }
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_forward(&mut self, assumptions: &Assumptions, funnel: &FunnelModel) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "Spend {} at {} CPM, {} CTR.",
            format_currency(assumptions.spend),
            format_unit_price(assumptions.cpm),
            format_rate(assumptions.ctr)
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Stage | Volume |")?;
        writeln!(self.writer, "|-------|--------|")?;
        for (stage, volume) in funnel.stages() {
            writeln!(self.writer, "| {} | {} |", stage.label(), format_volume(volume))?;
        }
        writeln!(self.writer)?;
        self.write_metrics_table(funnel)
    }

    fn write_metrics_table(&mut self, funnel: &FunnelModel) -> anyhow::Result<()> {
        let metrics = &funnel.metrics;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        for (name, value) in [
            ("Revenue", format_currency(funnel.revenue)),
            ("ROI", format_optional(metrics.roi, format_rate)),
            ("ROAS", format_multiple(metrics.roas)),
            ("CAC", format_optional(metrics.cac, format_currency)),
            ("Cost per lead", format_optional(metrics.cost_per_lead, format_currency)),
            ("Cost per MQL", format_optional(metrics.cost_per_mql, format_currency)),
        ] {
            writeln!(self.writer, "| {name} | {value} |")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_reverse(&mut self, result: &ReverseFunnel) -> anyhow::Result<()> {
        match result {
            ReverseFunnel::Infeasible(infeasible) => {
                writeln!(
                    self.writer,
                    "> **Unreachable:** {} cannot be reached because {}.",
                    format_currency(infeasible.revenue_goal),
                    infeasible.blocker
                )?;
            }
            ReverseFunnel::Feasible(required) => {
                writeln!(self.writer, "| Stage | Required |")?;
                writeln!(self.writer, "|-------|----------|")?;
                for (stage, volume) in required.stages() {
                    writeln!(
                        self.writer,
                        "| {} | {} |",
                        stage.reverse_label(),
                        format_volume(volume)
                    )?;
                }
                writeln!(self.writer)?;
                writeln!(
                    self.writer,
                    "- **CAC:** {}",
                    format_optional(required.cac, format_currency)
                )?;
                writeln!(
                    self.writer,
                    "- **Required budget:** {}",
                    format_optional(required.required_budget, format_currency)
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_compare(
        &mut self,
        baseline: &FunnelModel,
        current: &FunnelModel,
        insight: Option<&Insight>,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "| Stage | Baseline | Current |")?;
        writeln!(self.writer, "|-------|----------|---------|")?;
        for ((stage, before), (_, after)) in baseline.stages().zip(current.stages()) {
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                stage.label(),
                format_volume(before),
                format_volume(after)
            )?;
        }
        writeln!(self.writer)?;

        match insight {
            Some(insight) => {
                writeln!(self.writer, "## Insight")?;
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", insight.headline())?;
            }
            None => writeln!(self.writer, "_No material change in closed-won._")?,
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_score(&mut self, score: &LeadScore) -> anyhow::Result<()> {
        writeln!(self.writer, "**State:** {}", score.state.label())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Component | Points |")?;
        writeln!(self.writer, "|-----------|--------|")?;
        writeln!(self.writer, "| Fit | {} |", score.fit)?;
        writeln!(self.writer, "| Engagement | {} |", score.engagement)?;
        writeln!(self.writer, "| Total | {} |", score.total)?;
        writeln!(self.writer)?;

        if !score.engagement_breakdown.is_empty() {
            writeln!(self.writer, "## Engagement")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Action | Logged | Counted | Points |")?;
            writeln!(self.writer, "|--------|--------|---------|--------|")?;
            for c in &score.engagement_breakdown {
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {} |",
                    c.action.label(),
                    c.logged,
                    c.counted,
                    c.points
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_rates(&mut self, industries: &[IndustryRates], scales: &[ScaleCac]) -> anyhow::Result<()> {
        writeln!(self.writer, "## Conversion rates by industry")?;
        writeln!(self.writer)?;
        write!(self.writer, "| Industry |")?;
        for transition in Transition::ALL {
            write!(self.writer, " {} |", transition.label())?;
        }
        writeln!(self.writer, " visitor → close |")?;
        writeln!(self.writer, "|---{}|---|", "|---".repeat(Transition::ALL.len()))?;
        for row in industries {
            write!(self.writer, "| {} |", row.industry.label())?;
            for (_, rate) in row.rates.iter() {
                write!(self.writer, " {} |", format_rate(rate))?;
            }
            writeln!(self.writer, " {:.3}% |", row.visitor_to_close * 100.0)?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## CAC by company scale")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Scale | CAC |")?;
        writeln!(self.writer, "|-------|-----|")?;
        for row in scales {
            writeln!(self.writer, "| {} | {} |", row.scale.label(), format_currency(row.cac))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Human-readable output; color follows `colored`'s global override.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let title = report.title();
        writeln!(self.writer, "{}", title.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(title.len()).blue())?;
        writeln!(self.writer)?;
        match report {
            Report::Forward { funnel, .. } => self.print_forward(funnel),
            Report::Reverse { inputs, result, .. } => self.print_reverse(inputs, result),
            Report::Compare {
                baseline,
                current,
                insight,
            } => self.print_compare(baseline, current, insight.as_ref()),
            Report::Score { score } => self.print_score(score),
            Report::Rates { industries, scales } => self.print_rates(industries, scales),
        }
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_forward(&mut self, funnel: &FunnelModel) -> anyhow::Result<()> {
        let mut table = stage_table(&["Stage", "Volume"]);
        for (stage, volume) in funnel.stages() {
            table.add_row(vec![stage.label().to_string(), format_volume(volume)]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        let metrics = &funnel.metrics;
        let roi = match metrics.roi {
            Some(roi) if roi >= 0.0 => format_rate(roi).green(),
            Some(roi) => format_rate(roi).red(),
            None => "n/a".dimmed(),
        };
        writeln!(self.writer, "  Spend:   {}", format_currency(funnel.spend))?;
        writeln!(self.writer, "  Revenue: {}", format_currency(funnel.revenue))?;
        writeln!(self.writer, "  ROI:     {roi}")?;
        writeln!(self.writer, "  ROAS:    {}", format_multiple(metrics.roas))?;
        writeln!(
            self.writer,
            "  CAC:     {}",
            format_optional(metrics.cac, format_currency)
        )?;
        writeln!(
            self.writer,
            "  Cost per click / lead / MQL: {} / {} / {}",
            format_optional(metrics.cost_per_click, format_unit_price),
            format_optional(metrics.cost_per_lead, format_currency),
            format_optional(metrics.cost_per_mql, format_currency)
        )?;
        Ok(())
    }

    fn print_reverse(&mut self, inputs: &CalculatorState, result: &ReverseFunnel) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "  Goal: {} at {} per deal ({})",
            format_currency(inputs.revenue_goal),
            format_currency(inputs.avg_deal_size),
            inputs.industry.label()
        )?;
        writeln!(self.writer)?;

        let required = match result {
            ReverseFunnel::Infeasible(infeasible) => {
                writeln!(
                    self.writer,
                    "{} goal is unreachable: {}",
                    "✗".red(),
                    infeasible.blocker.to_string().red()
                )?;
                return Ok(());
            }
            ReverseFunnel::Feasible(required) => required,
        };

        let mut table = stage_table(&["Stage", "Required"]);
        for (stage, volume) in required.stages() {
            table.add_row(vec![stage.reverse_label().to_string(), format_volume(volume)]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "  CAC:             {}",
            format_optional(required.cac, format_currency)
        )?;
        writeln!(
            self.writer,
            "  Required budget: {}",
            format_optional(required.required_budget, format_currency).bold()
        )?;
        Ok(())
    }

    fn print_compare(
        &mut self,
        baseline: &FunnelModel,
        current: &FunnelModel,
        insight: Option<&Insight>,
    ) -> anyhow::Result<()> {
        let mut table = stage_table(&["Stage", "Baseline", "Current"]);
        for ((stage, before), (_, after)) in baseline.stages().zip(current.stages()) {
            table.add_row(vec![
                stage.label().to_string(),
                format_volume(before),
                format_volume(after),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        let Some(insight) = insight else {
            writeln!(self.writer, "{}", "No material change in closed-won.".dimmed())?;
            return Ok(());
        };

        let headline = match insight.closed_won.direction() {
            Direction::Up => insight.headline().green(),
            Direction::Down => insight.headline().red(),
            Direction::Flat => insight.headline().normal(),
        };
        writeln!(self.writer, "{headline}")?;
        writeln!(self.writer)?;

        for d in insight.deltas.iter().filter(|d| d.delta.changed()) {
            writeln!(
                self.writer,
                "  {:<16} {}",
                d.parameter.label(),
                format_optional(d.delta.percent, format_percent_change)
            )?;
        }
        if insight.bottleneck.flagged {
            writeln!(
                self.writer,
                "  {} {} converts at {}",
                "bottleneck:".yellow(),
                insight.bottleneck.transition.label(),
                format_rate(insight.bottleneck.rate)
            )?;
        }
        Ok(())
    }

    fn print_score(&mut self, score: &LeadScore) -> anyhow::Result<()> {
        writeln!(self.writer, "  State:      {}", score.state.label().bold())?;
        writeln!(self.writer, "  Fit:        {}", score.fit)?;
        writeln!(self.writer, "  Engagement: {}", score.engagement)?;
        writeln!(self.writer, "  Total:      {}", score.total)?;
        if let Some(at) = score.last_engaged_at {
            writeln!(
                self.writer,
                "  Last seen:  {}",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }

        if !score.engagement_breakdown.is_empty() {
            writeln!(self.writer)?;
            let mut table = stage_table(&["Action", "Logged", "Counted", "Points"]);
            for c in &score.engagement_breakdown {
                table.add_row(vec![
                    c.action.label().to_string(),
                    c.logged.to_string(),
                    c.counted.to_string(),
                    c.points.to_string(),
                ]);
            }
            writeln!(self.writer, "{table}")?;
        }
        Ok(())
    }

    fn print_rates(&mut self, industries: &[IndustryRates], scales: &[ScaleCac]) -> anyhow::Result<()> {
        let mut header = vec!["Industry"];
        header.extend(Transition::ALL.iter().map(|t| t.label()));
        header.push("visitor → close");

        let mut table = stage_table(&header);
        for row in industries {
            let mut cells = vec![row.industry.label().to_string()];
            cells.extend(row.rates.iter().map(|(_, rate)| format_rate(rate)));
            cells.push(format!("{:.3}%", row.visitor_to_close * 100.0));
            table.add_row(cells);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        let mut table = stage_table(&["Company scale", "CAC"]);
        for row in scales {
            table.add_row(vec![row.scale.label().to_string(), format_currency(row.cac)]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

fn stage_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

pub fn create_writer<'a>(format: OutputFormat, writer: Box<dyn Write + 'a>) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}
