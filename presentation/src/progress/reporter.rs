//! Progress reporting for strand execution

use colored::Colorize;
use coverscan_application::StrandProgressNotifier;
use coverscan_domain::{AgentId, StrandId};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports strand progress with an indicatif bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn strand_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn mode_name(parallel: bool) -> &'static str {
        if parallel { "parallel" } else { "sequential" }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StrandProgressNotifier for ProgressReporter {
    fn on_execution_start(&self, agent: &AgentId, strands: &[StrandId], parallel: bool) {
        let pb = ProgressBar::new(strands.len() as u64);
        pb.set_style(Self::strand_style());
        pb.set_prefix(format!("{} ({})", agent, Self::mode_name(parallel)));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_strand_complete(&self, strand: &StrandId, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), strand)
            } else {
                format!("{} {}", "x".red(), strand)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_execution_complete(&self, _agent: &AgentId, success: bool) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            if success {
                pb.finish_with_message(format!("{}", "done".green()));
            } else {
                pb.abandon_with_message(format!("{}", "failed".red()));
            }
        }
    }

    fn on_enrichment_start(&self) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message("Checking catalog...");
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl StrandProgressNotifier for SimpleProgress {
    fn on_execution_start(&self, agent: &AgentId, strands: &[StrandId], parallel: bool) {
        eprintln!(
            "{} {} ({} strands, {})",
            "->".cyan(),
            agent.as_str().bold(),
            strands.len(),
            ProgressReporter::mode_name(parallel)
        );
    }

    fn on_strand_complete(&self, strand: &StrandId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), strand);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), strand);
        }
    }

    fn on_execution_complete(&self, _agent: &AgentId, _success: bool) {
        eprintln!();
    }

    fn on_enrichment_start(&self) {
        eprintln!("  {} catalog", "->".cyan());
    }
}
