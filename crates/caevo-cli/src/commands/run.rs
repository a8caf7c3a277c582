//! Run command implementation.

use super::read_documents;
use crate::cli::RunArgs;
use crate::config::load_pipeline_config;
use crate::error::Result;
use crate::output::Formatter;
use caevo_sieve::{BatchRunner, EvaluationReport, SievePipeline, SieveRegistry};
use std::fs;

/// Execute the run command.
///
/// Annotated documents go to `--output` when given, otherwise to stdout.
/// Reports follow the documents on stdout, or go to stderr when stdout
/// already carries the documents.
pub async fn execute_run(args: RunArgs, formatter: &Formatter) -> Result<()> {
    let config = load_pipeline_config(args.config.as_deref(), args.preset)?;
    let docs = read_documents(&args.input)?;
    let gold = if args.evaluate { Some(docs.clone()) } else { None };

    let pipeline = SievePipeline::from_config(&config, &SieveRegistry::new())?;
    tracing::info!(sieves = ?pipeline.sieve_names(), documents = docs.len(), "Running pipeline");
    let runner = BatchRunner::new(pipeline, &config);
    let result = runner.run_until(docs, interrupted()).await?;

    let annotated = serde_json::to_string_pretty(&result.documents)?;
    let report = |text: String| {
        if args.output.is_some() {
            println!("{}", text);
        } else {
            eprintln!("{}", text);
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, annotated)?;
            report(formatter.success(&format!(
                "Wrote {} document(s) to {}",
                result.documents.len(),
                path.display()
            )));
        }
        None => println!("{}", annotated),
    }

    if result.cancelled {
        report(formatter.warning("Interrupted; output holds the documents finished so far"));
    }
    for failure in &result.failures {
        report(formatter.error(&format!("{}: {}", failure.document, failure.reason)));
    }
    report(formatter.format_metrics(&result.metrics)?);

    if let Some(gold) = gold {
        let mut evaluation = EvaluationReport::new();
        evaluation.add_corpus(&result.documents, &gold, config.mode);
        report(formatter.format_evaluation(&evaluation)?);
    }

    Ok(())
}

/// Completes on Ctrl-C; never completes when the signal cannot be watched.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CliFormat, PresetArg};
    use caevo_domain::{Aspect, Document, Event, EventClass, Relation, Tense, Timex, TimexType};
    use std::path::PathBuf;

    fn corpus() -> Vec<Document> {
        let mut doc = Document::new("wsj_0001", 2);
        doc.set_dct(Timex::new("t0", 0, 0, TimexType::Date, "1998-01-08"));
        doc.add_timex(Timex::new("t1", 0, 4, TimexType::Date, "1998-01-07"));
        doc.add_timex(Timex::new("t2", 1, 6, TimexType::Date, "1998-01-09"));
        doc.add_event(Event::new("e1", 1, 1).with_attributes(EventClass::Reporting, Tense::Past, Aspect::None));
        vec![doc]
    }

    fn args(input: PathBuf, output: Option<PathBuf>, evaluate: bool) -> RunArgs {
        RunArgs {
            input,
            config: None,
            preset: PresetArg::Default,
            output,
            evaluate,
        }
    }

    #[tokio::test]
    async fn test_run_writes_annotated_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus.json");
        let output = dir.path().join("annotated.json");
        fs::write(&input, serde_json::to_string(&corpus()).unwrap()).unwrap();

        let formatter = Formatter::new(CliFormat::Quiet, false);
        execute_run(args(input, Some(output.clone()), false), &formatter)
            .await
            .unwrap();

        let docs: Vec<Document> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(docs.len(), 1);
        let links = docs[0].tlinks();
        assert!(links.iter().any(|l| l.compare_to_tlink(&caevo_domain::TLink::new(
            "e1",
            "t0",
            Relation::IsIncluded
        ))));
        assert!(links.iter().any(|l| l.compare_to_tlink(&caevo_domain::TLink::new(
            "t1",
            "t2",
            Relation::Before
        ))));
    }

    #[tokio::test]
    async fn test_run_with_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("corpus.json");
        let output = dir.path().join("annotated.json");
        let mut gold = corpus();
        gold[0].insert_tlink(caevo_domain::TLink::new("e1", "t0", Relation::IsIncluded));
        fs::write(&input, serde_json::to_string(&gold).unwrap()).unwrap();

        let formatter = Formatter::new(CliFormat::Json, false);
        assert!(execute_run(args(input, Some(output), true), &formatter).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_missing_input() {
        let formatter = Formatter::new(CliFormat::Quiet, false);
        let result = execute_run(args(PathBuf::from("/nonexistent/corpus.json"), None, false), &formatter).await;
        assert!(matches!(result, Err(crate::CliError::Io(_))));
    }
}
