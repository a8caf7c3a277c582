//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use caevo_closure::ClosureConflict;
use caevo_domain::{LinkRecord, Relation, RelationMode, TLink};
use caevo_sieve::{EvaluationReport, OriginScore, PipelineMetrics};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format links output.
    pub fn format_links(&self, links: &[TLink]) -> Result<String> {
        match self.format {
            CliFormat::Json => {
                let records: Vec<LinkRecord> = links.iter().map(TLink::to_record).collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
            CliFormat::Table => Ok(self.format_links_table(links)),
            CliFormat::Quiet => Ok(links
                .iter()
                .map(|l| format!("{} {} {}", l.id1, l.relation, l.id2))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_links_table(&self, links: &[TLink]) -> String {
        if links.is_empty() {
            return self.colorize("No links found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Id1", "Relation", "Id2", "Kind", "Origin", "Confidence", "Closed"]);

        for link in links {
            let confidence = format!("{:.2}", link.confidence);
            builder.push_record([
                link.id1.as_str(),
                link.relation.as_str(),
                link.id2.as_str(),
                link.kind.code(),
                link.origin.as_deref().unwrap_or("-"),
                confidence.as_str(),
                if link.closed { "yes" } else { "no" },
            ]);
        }

        self.render(builder)
    }

    /// Format the relation vocabulary with inverses and reductions.
    pub fn format_relations(&self) -> Result<String> {
        let reductions = &RelationMode::ALL[1..];
        match self.format {
            CliFormat::Json => {
                let rows: Vec<serde_json::Value> = Relation::ALL
                    .iter()
                    .map(|r| {
                        let mut row = serde_json::json!({
                            "relation": r.as_str(),
                            "inverse": r.invert().as_str(),
                        });
                        for mode in reductions {
                            row[mode.as_str()] = serde_json::Value::from(mode.apply(*r).as_str());
                        }
                        row
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            CliFormat::Table => {
                let mut builder = Builder::default();
                let mut header = vec!["Relation".to_string(), "Inverse".to_string()];
                header.extend(reductions.iter().map(|m| m.as_str().to_string()));
                builder.push_record(header);

                for relation in Relation::ALL {
                    let mut row = vec![relation.as_str().to_string(), relation.invert().as_str().to_string()];
                    row.extend(reductions.iter().map(|m| m.apply(relation).as_str().to_string()));
                    builder.push_record(row);
                }
                Ok(self.render(builder))
            }
            CliFormat::Quiet => Ok(Relation::ALL
                .iter()
                .map(Relation::as_str)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format per-sieve pipeline metrics.
    pub fn format_metrics(&self, metrics: &PipelineMetrics) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(metrics)?),
            CliFormat::Quiet => Ok(metrics.summary()),
            CliFormat::Table => {
                if metrics.sieves.is_empty() {
                    return Ok(self.colorize("No sieves ran.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record([
                    "Sieve", "Proposed", "Added", "Duplicates", "Conflicts", "Invalid", "Closure", "Failures",
                ]);
                for stats in &metrics.sieves {
                    builder.push_record([
                        stats.name.clone(),
                        stats.proposed.to_string(),
                        stats.added.to_string(),
                        stats.duplicates.to_string(),
                        stats.conflicts.to_string(),
                        stats.invalid.to_string(),
                        format!("+{} / !{}", stats.closure_added, stats.closure_conflicts),
                        stats.failures.to_string(),
                    ]);
                }

                let mut out = self.render(builder);
                out.push('\n');
                out.push_str(&self.info(&format!(
                    "{} document(s), {} failed, {} link(s) added",
                    metrics.documents,
                    metrics.failed_documents,
                    metrics.total_added()
                )));
                Ok(out)
            }
        }
    }

    /// Format an evaluation report.
    pub fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            CliFormat::Quiet => Ok(report.summary()),
            CliFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Origin", "Correct", "Incorrect", "Non-vague wrong", "No gold", "Precision"]);

                let overall = report.overall();
                let rows = report
                    .by_origin
                    .iter()
                    .map(|(origin, score)| (origin.as_str(), score))
                    .chain(std::iter::once(("Overall", &overall)));
                for (origin, score) in rows {
                    builder.push_record(score_row(origin, score));
                }

                let mut out = self.render(builder);
                out.push('\n');
                out.push_str(&self.info(&format!(
                    "Recall {:.2} of {} gold link(s)",
                    report.recall(),
                    report.gold_total
                )));
                Ok(out)
            }
        }
    }

    /// Format closure conflicts.
    pub fn format_conflicts(&self, conflicts: &[ClosureConflict]) -> Result<String> {
        match self.format {
            CliFormat::Json => {
                let rows: Vec<serde_json::Value> = conflicts
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "id1": c.id1.as_str(),
                            "id2": c.id2.as_str(),
                            "existing": c.existing.as_str(),
                            "inferred": c.inferred.as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            CliFormat::Quiet => Ok(conflicts
                .iter()
                .map(|c| format!("{} {}/{} {}", c.id1, c.existing, c.inferred, c.id2))
                .collect::<Vec<_>>()
                .join("\n")),
            CliFormat::Table => {
                if conflicts.is_empty() {
                    return Ok(self.success("No conflicts."));
                }

                let mut builder = Builder::default();
                builder.push_record(["Id1", "Id2", "Existing", "Inferred"]);
                for c in conflicts {
                    builder.push_record([
                        c.id1.as_str(),
                        c.id2.as_str(),
                        c.existing.as_str(),
                        c.inferred.as_str(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn score_row(origin: &str, score: &OriginScore) -> [String; 6] {
    [
        origin.to_string(),
        score.correct.to_string(),
        score.incorrect.to_string(),
        score.incorrect_non_vague.to_string(),
        score.no_gold.to_string(),
        format!("{:.2}", score.precision()),
    ]
}
