use crate::core::{ComplexityResult, ResultOrigin, Severity};
use crate::orchestrator::AnalysisReport;
use colored::*;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, document: &str, report: &AnalysisReport) -> anyhow::Result<()>;
}

/// Serialized shape of a report.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportView<'a> {
    document: &'a str,
    key: &'a str,
    severity: Severity,
    origin: ResultOrigin,
    #[serde(flatten)]
    result: &'a ComplexityResult,
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
    fn write_report(&mut self, document: &str, report: &AnalysisReport) -> anyhow::Result<()> {
        let view = ReportView {
            document,
            key: &report.key,
            severity: report.severity,
            origin: report.origin,
            result: &report.result,
        };
        serde_json::to_writer_pretty(&mut self.writer, &view)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, document: &str, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_header(document)?;
        self.write_metrics(report)?;
        self.write_issues(&report.result)?;
        self.write_recommendations(&report.result)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_header(&mut self, document: &str) -> anyhow::Result<()> {
        let title = format!("Complexity Analysis: {document}");
        writeln!(self.writer, "{}", title.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(title.chars().count()).blue())?;
        Ok(())
    }

    fn write_metrics(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let result = &report.result;
        writeln!(
            self.writer,
            "  Overall score:    {}/100 ({})",
            result.overall_score,
            colorize_severity(report.severity)
        )?;
        writeln!(
            self.writer,
            "  Cyclomatic:       {}",
            result.cyclomatic_complexity
        )?;
        writeln!(
            self.writer,
            "  Cognitive:        {}",
            result.cognitive_complexity
        )?;
        writeln!(
            self.writer,
            "  Maintainability:  {}/100",
            result.maintainability_index
        )?;
        writeln!(self.writer, "  Lines of code:    {}", result.lines_of_code)?;
        writeln!(
            self.writer,
            "  Source:           {}",
            report.origin.to_string().dimmed()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_issues(&mut self, result: &ComplexityResult) -> anyhow::Result<()> {
        if !result.has_issues() {
            return Ok(());
        }

        writeln!(self.writer, "{} ({}):", "Issues".bold(), result.issues.len())?;
        for issue in &result.issues {
            writeln!(
                self.writer,
                "  line {:<5} [{}] {:<15} {}",
                issue.line,
                colorize_severity(issue.severity),
                issue.kind,
                issue.message
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_recommendations(&mut self, result: &ComplexityResult) -> anyhow::Result<()> {
        if result.recommendations.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}:", "Recommendations".bold())?;
        for recommendation in &result.recommendations {
            writeln!(self.writer, "  - {recommendation}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

fn colorize_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Low => severity.as_str().green(),
        Severity::Medium => severity.as_str().yellow(),
        Severity::High => severity.as_str().red().bold(),
    }
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}
