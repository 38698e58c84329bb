//! Analysis orchestration
//!
//! The engine's public entry point. Sequences scan -> graph build ->
//! cycle detection -> risk assessment -> change preview into one
//! `AnalysisReport`. Only a fatal graph-build failure (unreadable
//! project root) or cancellation short-circuits; a preview failure is
//! captured in the report so the caller always receives risk and cycle
//! data.

use crate::core::cancel::CancelToken;
use crate::core::cycles::find_cycles;
use crate::core::parallel::ProgressUpdate;
use crate::core::preview::PreviewEngine;
use crate::core::risk::assess;
use crate::core::scanner::Scanner;
use crate::error::{Result, RippleError};
use crate::models::config::Settings;
use crate::models::graph::DependencyGraph;
use crate::models::operation::RefactorOperation;
use crate::models::report::{AnalysisReport, Diagnostic};
use crate::parsers::graph_builder::GraphBuilder;
use std::time::Instant;

/// Sequences the analysis pipeline for one project root
pub struct Orchestrator {
    settings: Settings,
    cancel: CancelToken,
}

impl Orchestrator {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancel token (e.g. wired to Ctrl-C)
    pub fn with_cancel_token(settings: Settings, cancel: CancelToken) -> Self {
        Self { settings, cancel }
    }

    /// Handle for requesting cancellation from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scan the project and build its dependency graph.
    ///
    /// Exposed separately so several candidate operations can be
    /// previewed against one build; the graph is immutable and shares
    /// read-only.
    pub fn build_graph(&self) -> Result<(DependencyGraph, Vec<Diagnostic>)> {
        self.build_graph_with_progress(None::<fn(ProgressUpdate)>)
    }

    /// Scan and build, reporting parse progress between batches
    pub fn build_graph_with_progress<P>(
        &self,
        progress: Option<P>,
    ) -> Result<(DependencyGraph, Vec<Diagnostic>)>
    where
        P: Fn(ProgressUpdate),
    {
        let scan = Scanner::new(&self.settings).scan()?;
        let mut diagnostics = scan.diagnostics;

        let builder = GraphBuilder::new(&self.settings, self.cancel.clone());
        let outcome = builder.build_with_progress(scan.files, progress)?;
        diagnostics.extend(outcome.diagnostics);

        Ok((outcome.graph, diagnostics))
    }

    /// Run the full pipeline for one operation
    pub fn analyze(&self, operation: &RefactorOperation) -> Result<AnalysisReport> {
        self.analyze_with_progress(operation, None::<fn(ProgressUpdate)>)
    }

    /// Run the full pipeline, reporting parse progress
    pub fn analyze_with_progress<P>(
        &self,
        operation: &RefactorOperation,
        progress: Option<P>,
    ) -> Result<AnalysisReport>
    where
        P: Fn(ProgressUpdate),
    {
        let start_time = Instant::now();
        let (graph, diagnostics) = self.build_graph_with_progress(progress)?;

        let mut report = self.analyze_with_graph(&graph, diagnostics, operation)?;
        report.set_duration(start_time.elapsed());
        Ok(report)
    }

    /// Run the graph-global stages against an already built graph
    pub fn analyze_with_graph(
        &self,
        graph: &DependencyGraph,
        diagnostics: Vec<Diagnostic>,
        operation: &RefactorOperation,
    ) -> Result<AnalysisReport> {
        // Cycles are project-wide and independent of the operation
        self.cancel.check()?;
        let cycles = find_cycles(graph);

        self.cancel.check()?;
        let risk = assess(graph, operation, &cycles);

        self.cancel.check()?;
        let engine = PreviewEngine::new(graph);
        let (changes, preview_error) = match engine.preview(operation) {
            Ok(changes) => (Some(changes), None),
            Err(err @ RippleError::Interrupted { .. }) => return Err(err),
            // Preview failures degrade to a report field; partial
            // results beat no results
            Err(err) => (None, Some(err.user_message())),
        };

        let cycle_names = cycles
            .iter()
            .map(|cycle| {
                cycle
                    .iter()
                    .map(|&id| graph.module(id).name.clone())
                    .collect()
            })
            .collect();

        Ok(AnalysisReport {
            project_root: self.settings.project_root.clone(),
            generated_at: chrono::Utc::now(),
            operation: operation.clone(),
            graph: graph.summary(),
            diagnostics,
            cycles: cycle_names,
            risk,
            changes,
            preview_error,
            duration_ms: 0,
        })
    }
}
