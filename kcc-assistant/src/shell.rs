//! Terminal presentation of pipeline results

use std::io::{self, BufRead, Write};

use kcc_rag::{AnswerSource, QueryConfig, QueryResult, SharedResources};

const EMPTY_QUERY: &str = "Please enter a question.";
const PROMPT: &str = "Enter your question (blank line to quit): ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Text,
    Json,
}

/// Answer one query and render it
///
/// Blank queries never reach the pipeline.
pub fn respond(
    shared: &SharedResources,
    query: &str,
    config: &QueryConfig,
    style: OutputStyle,
) -> anyhow::Result<String> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(EMPTY_QUERY.to_string());
    }

    let result = shared.answer_question(query, config)?;
    tracing::debug!("Answered from {}", result.source);

    match style {
        OutputStyle::Text => Ok(render_text(&result)),
        OutputStyle::Json => Ok(serde_json::to_string_pretty(&result)?),
    }
}

/// Read questions from stdin until EOF or a blank line
pub fn interactive(
    shared: &SharedResources,
    config: &QueryConfig,
    style: OutputStyle,
) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            break;
        }

        match respond(shared, &line, config, style) {
            Ok(output) => writeln!(stdout, "{}\n", output)?,
            Err(e) => writeln!(stdout, "An error occurred: {:#}\n", e)?,
        }
    }

    Ok(())
}

fn render_text(result: &QueryResult) -> String {
    format!(
        "Answer:\n{}\n\n[{}] {}",
        result.answer,
        result.source,
        banner(result.source)
    )
}

fn banner(source: AnswerSource) -> &'static str {
    match source {
        AnswerSource::KccDataset => "Based on the KCC Dataset.",
        AnswerSource::WebSearch => "Based on web search (DuckDuckGo).",
        AnswerSource::NoAnswer => "No clear answer found.",
    }
}
