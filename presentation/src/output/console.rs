//! Console output formatter for extraction results

use colored::Colorize;
use coverscan_application::ProcessCoverOutput;
use coverscan_domain::{BookMetadata, CatalogMatch, ExecutionResult, MetadataField, StrandResult};
use std::collections::BTreeMap;

/// Formats extraction results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a full orchestrator result
    pub fn format_execution(result: &ExecutionResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Cover Extraction Results"));
        output.push('\n');

        output.push_str(&Self::section_header("Metadata"));
        match &result.metadata {
            Some(metadata) => output.push_str(&Self::metadata_block(
                metadata,
                &result.field_confidence,
            )),
            None => output.push_str(&format!(
                "{}\n",
                result
                    .error
                    .as_deref()
                    .unwrap_or("No metadata extracted")
                    .red()
            )),
        }

        output.push_str(&Self::section_header("Strands"));
        output.push_str(&Self::strand_block(&result.strand_results));

        if let Some(enrichment) = &result.enrichment {
            output.push_str(&Self::section_header("Catalog"));
            output.push_str(&format!(
                "  matched by {}: {}\n",
                match enrichment.matched_by {
                    CatalogMatch::Isbn => "ISBN",
                    CatalogMatch::TitleAuthor => "title/author",
                },
                enrichment
                    .fields
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        output.push_str(&format!(
            "\n{} {}  {}\n",
            "Confidence:".cyan().bold(),
            Self::confidence(result.overall_confidence()),
            if result.meets_threshold {
                "meets threshold".green()
            } else {
                "below threshold".yellow()
            }
        ));
        if let Some(cost) = result.cost {
            output.push_str(&format!("{} {:.4}\n", "Cost:".cyan().bold(), cost));
        }
        output.push_str(&format!(
            "{} {}ms\n",
            "Time:".cyan().bold(),
            result.processing_time_ms
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format an orchestrator result as a short summary
    pub fn format_execution_summary(result: &ExecutionResult) -> String {
        let Some(metadata) = &result.metadata else {
            return format!(
                "{} {}\n",
                "x".red(),
                result.error.as_deref().unwrap_or("No metadata extracted")
            );
        };
        format!(
            "{}{} {}\n",
            Self::summary_lines(metadata),
            "Confidence:".dimmed(),
            Self::confidence(result.overall_confidence())
        )
    }

    /// Format a pipeline result with provenance
    pub fn format_pipeline(output: &ProcessCoverOutput) -> String {
        let advanced = &output.advanced_metadata;
        let mut text = String::new();

        text.push_str(&Self::header("Cover Pipeline Results"));
        text.push('\n');
        text.push_str(&format!(
            "{} {}\n",
            "Source:".cyan().bold(),
            advanced.source
        ));

        text.push_str(&Self::section_header("Metadata"));
        text.push_str(&Self::metadata_block(&advanced.metadata, &advanced.confidence));

        text.push_str(&Self::section_header("Provenance"));
        for (name, entry) in &advanced.provenance {
            text.push_str(&format!(
                "  {} ({}) {}\n",
                name.yellow().bold(),
                Self::confidence(entry.confidence),
                entry
                    .fields
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        if !output.strand_results.is_empty() {
            text.push_str(&Self::section_header("Strands"));
            text.push_str(&Self::strand_block(&output.strand_results));
        }

        text.push_str(&format!(
            "\n{} {}\n",
            "Confidence:".cyan().bold(),
            Self::confidence(advanced.overall_confidence)
        ));
        text.push_str(&format!(
            "{} {}\n",
            "Event:".cyan().bold(),
            coverscan_domain::METADATA_EXTRACTED_EVENT
        ));

        text.push_str(&Self::footer());
        text
    }

    /// Format a pipeline result as a short summary
    pub fn format_pipeline_summary(output: &ProcessCoverOutput) -> String {
        let advanced = &output.advanced_metadata;
        format!(
            "{}{} {}\n",
            Self::summary_lines(&advanced.metadata),
            "Confidence:".dimmed(),
            Self::confidence(advanced.overall_confidence)
        )
    }

    /// Format any serializable result as JSON
    pub fn format_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn metadata_block(metadata: &BookMetadata, confidence: &BTreeMap<MetadataField, f64>) -> String {
        let mut block = String::new();
        for field in metadata.populated_fields() {
            let value = match field {
                MetadataField::PageCount => metadata
                    .page_count
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                f if f.is_list() => metadata.list(f).join(", "),
                f => metadata.text(f).unwrap_or_default().to_string(),
            };
            let score = confidence
                .get(&field)
                .map(|c| format!(" {}", Self::confidence(*c).dimmed()))
                .unwrap_or_default();
            block.push_str(&format!(
                "  {:<16}{}{}\n",
                format!("{}:", field.as_str()).bold(),
                Self::truncate(&value, 72),
                score
            ));
        }
        block
    }

    fn strand_block(results: &[StrandResult]) -> String {
        results
            .iter()
            .map(|r| {
                if r.success {
                    format!(
                        "  {} {:<10} {}\n",
                        "v".green(),
                        r.strand.as_str(),
                        Self::confidence(r.overall_confidence())
                    )
                } else {
                    format!(
                        "  {} {:<10} {}\n",
                        "x".red(),
                        r.strand.as_str(),
                        r.error.as_deref().unwrap_or("failed").red()
                    )
                }
            })
            .collect()
    }

    fn summary_lines(metadata: &BookMetadata) -> String {
        let mut lines = String::new();
        if let Some(title) = &metadata.title {
            lines.push_str(&format!("{}\n", title.bold()));
        }
        if !metadata.authors.is_empty() {
            lines.push_str(&format!("{} {}\n", "by".dimmed(), metadata.authors.join(", ")));
        }
        if let Some(isbn) = &metadata.isbn {
            lines.push_str(&format!("{} {}\n", "ISBN".dimmed(), isbn));
        }
        lines
    }

    fn confidence(value: f64) -> String {
        format!("{:.0}%", value * 100.0)
    }

    fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverscan_domain::{
        AggregateConfidence, StrandAnalysis, StrandConfidence, StrandId, Workflow,
    };

    fn success_result() -> ExecutionResult {
        let metadata = BookMetadata::new()
            .with_title("Clean Code")
            .with_author("Robert C. Martin");
        let analysis = StrandAnalysis::new(metadata.clone(), StrandConfidence::new(0.9));
        ExecutionResult {
            success: true,
            metadata: Some(metadata),
            field_confidence: BTreeMap::from([(MetadataField::Title, 0.9)]),
            confidence: Some(AggregateConfidence {
                overall: 0.9,
                agreement: false,
                individual: vec![],
            }),
            meets_threshold: true,
            workflow: Workflow {
                completed_strands: vec![StrandId::VisionA],
                failed_strands: vec![],
            },
            strand_results: vec![
                StrandResult::failure(StrandId::VisionC, "timed out"),
                StrandResult::success(StrandId::VisionA, analysis),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_execution_lists_fields_and_strands() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_execution(&success_result());
        assert!(text.contains("Clean Code"));
        assert!(text.contains("Robert C. Martin"));
        assert!(text.contains("vision-a"));
        assert!(text.contains("timed out"));
        assert!(text.contains("90%"));
        assert!(text.contains("meets threshold"));
    }

    #[test]
    fn test_summary_of_failed_run() {
        colored::control::set_override(false);
        let result = ExecutionResult::all_failed(Workflow::default(), vec![], 5);
        let text = ConsoleFormatter::format_execution_summary(&result);
        assert!(text.contains("All vision analysis strands failed"));
    }

    #[test]
    fn test_format_json() {
        let json = ConsoleFormatter::format_json(&success_result());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["metadata"]["title"], "Clean Code");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ConsoleFormatter::truncate("short", 10), "short");
        assert_eq!(ConsoleFormatter::truncate("abcdefghijkl", 8), "abcde...");
    }
}
