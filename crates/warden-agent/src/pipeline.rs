//! Pre-check, model call, post-check orchestration

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use warden_audit::AuditLog;
use warden_compliance::ComplianceEngine;
use warden_rules::RuleEngine;
use warden_types::canonical::canonical_json;
use warden_types::{Action, AuditEntry, Decision, Facts};

use crate::adapter::LmAdapter;
use crate::cancel::CancelToken;
use crate::error::{AgentError, Result};

/// Tuning for one pipeline instance
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Total deadline for a run; exceeding it behaves exactly like
    /// cancellation
    pub deadline: Option<Duration>,
}

impl PipelineConfig {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Completion record of one `run` or `run_stream` call
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Model output, the block message, or the partial text of a
    /// cancelled stream; never empty of meaning
    pub output: String,
    /// Pre decision, and the post decision when one was produced
    pub decisions: Vec<Decision>,
    /// Audit entries in append order
    pub audit_trail: Vec<AuditEntry>,
    pub cancelled: bool,
}

impl RunOutcome {
    /// Whether the pre-check blocked the model call
    pub fn blocked(&self) -> bool {
        self.output.starts_with("Blocked by rule: ")
    }
}

/// The governed pipeline: rule engine, audit journal, compliance engine,
/// and a model adapter composed into one value
pub struct GovernedPipeline {
    engine: Arc<RuleEngine>,
    audit: Arc<AuditLog>,
    compliance: Arc<ComplianceEngine>,
    adapter: Arc<dyn LmAdapter>,
    config: PipelineConfig,
}

impl GovernedPipeline {
    pub fn new(
        engine: Arc<RuleEngine>,
        audit: Arc<AuditLog>,
        compliance: Arc<ComplianceEngine>,
        adapter: Arc<dyn LmAdapter>,
    ) -> Self {
        Self {
            engine,
            audit,
            compliance,
            adapter,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared audit journal
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// Run the full pre-check, model call, post-check sequence
    pub async fn run(&self, facts: &Facts) -> Result<RunOutcome> {
        self.run_cancellable(facts, CancelToken::never()).await
    }

    /// `run` with an external cancellation signal
    pub async fn run_cancellable(
        &self,
        facts: &Facts,
        mut token: CancelToken,
    ) -> Result<RunOutcome> {
        let (pre, pre_entry) = self.pre_check(facts).await?;
        if pre.result == Action::Rejected {
            return Ok(Self::blocked_outcome(pre, pre_entry));
        }
        if token.is_cancelled() {
            return self.finish_cancelled(pre, pre_entry, facts, None).await;
        }

        let prompt = canonical_json(facts)?;
        let deadline_at = self.deadline_instant();
        let output = tokio::select! {
            result = self.adapter.complete(&prompt) => result.map_err(log_adapter_failure)?,
            _ = token.cancelled() => {
                return self.finish_cancelled(pre, pre_entry, facts, None).await;
            }
            _ = wait_until(deadline_at) => {
                return self.finish_cancelled(pre, pre_entry, facts, None).await;
            }
        };

        self.finish(pre, pre_entry, facts, output).await
    }

    /// Streaming variant: chunks are delivered to `on_chunk` in order,
    /// and the returned record is the completion event
    ///
    /// With a streaming adapter the chunks are the adapter's own; without
    /// one the full completion is split on whitespace and each token is
    /// emitted followed by a space. For a single call the `on_chunk`
    /// invocations form a prefix-stable total order, and the function only
    /// returns after the last chunk callback has.
    pub async fn run_stream<F>(
        &self,
        facts: &Facts,
        mut on_chunk: F,
        mut token: CancelToken,
    ) -> Result<RunOutcome>
    where
        F: FnMut(&str) + Send,
    {
        let (pre, pre_entry) = self.pre_check(facts).await?;
        if pre.result == Action::Rejected {
            let outcome = Self::blocked_outcome(pre, pre_entry);
            on_chunk(&outcome.output);
            return Ok(outcome);
        }
        if token.is_cancelled() {
            return self.finish_cancelled(pre, pre_entry, facts, None).await;
        }

        let prompt = canonical_json(facts)?;
        let deadline_at = self.deadline_instant();

        if self.adapter.supports_streaming() {
            let (tx, mut rx) = mpsc::channel::<String>(32);
            let adapter = self.adapter.clone();
            let task_prompt = prompt.clone();
            let producer =
                tokio::spawn(async move { adapter.complete_stream(&task_prompt, tx).await });

            let mut accumulated = String::new();
            let mut was_cancelled = false;
            loop {
                tokio::select! {
                    maybe_chunk = rx.recv() => match maybe_chunk {
                        Some(chunk) => {
                            on_chunk(&chunk);
                            accumulated.push_str(&chunk);
                        }
                        None => break,
                    },
                    _ = token.cancelled() => {
                        was_cancelled = true;
                        break;
                    }
                    _ = wait_until(deadline_at) => {
                        was_cancelled = true;
                        break;
                    }
                }
            }

            if was_cancelled {
                producer.abort();
                return self
                    .finish_cancelled(pre, pre_entry, facts, Some(accumulated))
                    .await;
            }

            let output = match producer.await {
                Ok(result) => result.map_err(log_adapter_failure)?,
                Err(join_err) => {
                    return Err(log_adapter_failure(AgentError::Lm(join_err.to_string())))
                }
            };
            self.finish(pre, pre_entry, facts, output).await
        } else {
            let output = tokio::select! {
                result = self.adapter.complete(&prompt) => result.map_err(log_adapter_failure)?,
                _ = token.cancelled() => {
                    return self.finish_cancelled(pre, pre_entry, facts, None).await;
                }
                _ = wait_until(deadline_at) => {
                    return self.finish_cancelled(pre, pre_entry, facts, None).await;
                }
            };
            // Simulated streaming: whitespace tokens, each followed by a
            // space, order and content preserved
            for word in output.split_whitespace() {
                let chunk = format!("{word} ");
                on_chunk(&chunk);
            }
            self.finish(pre, pre_entry, facts, output).await
        }
    }

    async fn pre_check(&self, facts: &Facts) -> Result<(Decision, AuditEntry)> {
        let mut pre = self.engine.evaluate(facts);
        let mut pre_entry = self.audit.append(&pre, facts).await?;
        self.attach_report(&mut pre, &mut pre_entry, facts);
        debug!(result = %pre.result, audit_id = %pre.audit_id, "pre-check complete");
        Ok((pre, pre_entry))
    }

    async fn finish(
        &self,
        pre: Decision,
        pre_entry: AuditEntry,
        facts: &Facts,
        output: String,
    ) -> Result<RunOutcome> {
        let post_facts = facts.merged("llmOutput", Value::String(output.clone()));
        let mut post = self.engine.evaluate(&post_facts);
        let mut post_entry = self.audit.append(&post, &post_facts).await?;
        self.attach_report(&mut post, &mut post_entry, &post_facts);
        info!(pre = %pre.result, post = %post.result, "pipeline run complete");

        Ok(RunOutcome {
            output,
            decisions: vec![pre, post],
            audit_trail: vec![pre_entry, post_entry],
            cancelled: false,
        })
    }

    /// Record the cancellation and return what was produced so far
    ///
    /// The pre-check entry is never reverted. Before the model call the
    /// post decision is a synthetic REVIEW annotated "cancelled"; once a
    /// stream has produced text, the partial output goes through the
    /// normal post evaluation.
    async fn finish_cancelled(
        &self,
        pre: Decision,
        pre_entry: AuditEntry,
        facts: &Facts,
        accumulated: Option<String>,
    ) -> Result<RunOutcome> {
        let (mut post, post_facts, output) = match accumulated {
            Some(partial) if !partial.is_empty() => {
                let post_facts = facts.merged("llmOutput", Value::String(partial.clone()));
                (self.engine.evaluate(&post_facts), post_facts, partial)
            }
            _ => (
                Decision::cancelled_review(),
                facts.clone(),
                "Cancelled before model invocation".to_string(),
            ),
        };
        let mut post_entry = self.audit.append(&post, &post_facts).await?;
        self.attach_report(&mut post, &mut post_entry, &post_facts);
        info!(audit_id = %post.audit_id, "pipeline run cancelled");

        Ok(RunOutcome {
            output,
            decisions: vec![pre, post],
            audit_trail: vec![pre_entry, post_entry],
            cancelled: true,
        })
    }

    fn blocked_outcome(pre: Decision, pre_entry: AuditEntry) -> RunOutcome {
        RunOutcome {
            output: format!("Blocked by rule: {}", pre.reason),
            decisions: vec![pre],
            audit_trail: vec![pre_entry],
            cancelled: false,
        }
    }

    fn attach_report(&self, decision: &mut Decision, entry: &mut AuditEntry, facts: &Facts) {
        let report = self.compliance.evaluate(facts, decision, Some(entry));
        decision.compliance_report = Some(report.clone());
        entry.compliance = Some(report);
    }

    fn deadline_instant(&self) -> Option<tokio::time::Instant> {
        self.config
            .deadline
            .map(|d| tokio::time::Instant::now() + d)
    }
}

/// The pre-check is already persisted by the time the adapter fails, so
/// the error is logged here and then propagated as-is
fn log_adapter_failure(err: AgentError) -> AgentError {
    error!(error = %err, "adapter call failed");
    err
}

/// Sleeps to the instant when given, otherwise stays pending forever
async fn wait_until(at: Option<tokio::time::Instant>) {
    match at {
        Some(instant) => tokio::time::sleep_until(instant).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ChunkedAdapter, SpyAdapter};
    use async_trait::async_trait;
    use serde_json::json;
    use warden_compliance::ComplianceConfig;
    use warden_types::Rule;

    fn rule(id: &str, condition: &str, action: Action, reason: &str) -> Rule {
        Rule {
            id: id.into(),
            name: id.into(),
            condition: condition.into(),
            action,
            reason: reason.into(),
            priority: 1,
            score: None,
        }
    }

    async fn pipeline_with(
        rules: Vec<Rule>,
        adapter: Arc<dyn LmAdapter>,
        dir: &tempfile::TempDir,
    ) -> GovernedPipeline {
        let engine = Arc::new(RuleEngine::with_rules(rules).unwrap());
        let audit = Arc::new(
            AuditLog::open(dir.path().join("audit.jsonl"), false)
                .await
                .unwrap(),
        );
        let compliance = Arc::new(ComplianceEngine::new(ComplianceConfig::default()));
        GovernedPipeline::new(engine, audit, compliance, adapter)
    }

    #[tokio::test]
    async fn rejected_pre_check_short_circuits_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(SpyAdapter::new("should never appear"));
        let pipeline = pipeline_with(
            vec![rule("risk", "risk > 0.8", Action::Rejected, "Too risky")],
            adapter.clone(),
            &dir,
        )
        .await;

        let outcome = pipeline
            .run(&Facts::from_value(json!({ "risk": 0.9 })))
            .await
            .unwrap();

        assert!(outcome.output.starts_with("Blocked by rule: Too risky"));
        assert!(outcome.blocked());
        assert_eq!(outcome.decisions.len(), 1);
        assert_eq!(outcome.audit_trail.len(), 1);
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn approved_run_produces_pre_and_post_records() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(SpyAdapter::new("model says yes"));
        let pipeline = pipeline_with(
            vec![rule("ok", "risk < 0.5", Action::Approved, "Low risk")],
            adapter.clone(),
            &dir,
        )
        .await;

        let outcome = pipeline
            .run(&Facts::from_value(json!({ "risk": 0.1 })))
            .await
            .unwrap();

        assert_eq!(outcome.output, "model says yes");
        assert_eq!(outcome.decisions.len(), 2);
        assert_eq!(outcome.audit_trail.len(), 2);
        assert_eq!(adapter.calls(), 1);
        assert!(!outcome.cancelled);

        // Post facts carry the model output
        let post_entry = &outcome.audit_trail[1];
        assert_eq!(
            post_entry.input.lookup("llmOutput"),
            Some(&json!("model says yes"))
        );
        // Chain is intact and both entries carry compliance reports
        assert!(pipeline.audit().verify());
        assert!(outcome.decisions[0].compliance_report.is_some());
        assert!(outcome.audit_trail[1].compliance.is_some());
    }

    #[tokio::test]
    async fn llm_output_overrides_an_existing_fact() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(SpyAdapter::new("fresh"));
        let pipeline = pipeline_with(vec![], adapter, &dir).await;

        let facts = Facts::from_value(json!({ "llmOutput": "stale" }));
        let outcome = pipeline.run(&facts).await.unwrap();
        assert_eq!(
            outcome.audit_trail[1].input.lookup("llmOutput"),
            Some(&json!("fresh"))
        );
    }

    #[tokio::test]
    async fn post_check_can_reject_the_model_output() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(SpyAdapter::new("the secret word"));
        let pipeline = pipeline_with(
            vec![rule(
                "leak",
                "llmOutput === \"the secret word\"",
                Action::Rejected,
                "Output leaked",
            )],
            adapter,
            &dir,
        )
        .await;

        let outcome = pipeline.run(&Facts::new()).await.unwrap();
        // The model ran (pre-check found no match), the post-check fired
        assert_eq!(outcome.decisions[0].result, Action::Review);
        assert_eq!(outcome.decisions[1].result, Action::Rejected);
    }

    #[tokio::test]
    async fn adapter_failure_propagates_after_pre_persisted() {
        struct FailingAdapter;
        #[async_trait]
        impl LmAdapter for FailingAdapter {
            async fn complete(&self, _prompt: &str) -> Result<String> {
                Err(AgentError::Lm("upstream unavailable".into()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(vec![], Arc::new(FailingAdapter), &dir).await;

        let err = pipeline.run(&Facts::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::Lm(_)));
        // The pre-check entry made it into the journal before the failure
        assert_eq!(pipeline.audit().size(), 1);
    }

    #[tokio::test]
    async fn stream_with_native_chunks_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(ChunkedAdapter::new(vec![
            "alpha ".into(),
            "beta ".into(),
            "gamma".into(),
        ]));
        let pipeline = pipeline_with(vec![], adapter, &dir).await;

        let mut chunks = Vec::new();
        let outcome = pipeline
            .run_stream(&Facts::new(), |chunk| chunks.push(chunk.to_string()), CancelToken::never())
            .await
            .unwrap();

        assert_eq!(chunks, vec!["alpha ", "beta ", "gamma"]);
        assert_eq!(outcome.output, "alpha beta gamma");
        assert_eq!(outcome.decisions.len(), 2);
        assert!(!outcome.cancelled);
    }

    #[tokio::test]
    async fn stream_without_native_support_tokenises_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(SpyAdapter::new("one two three"));
        let pipeline = pipeline_with(vec![], adapter, &dir).await;

        let mut chunks = Vec::new();
        let outcome = pipeline
            .run_stream(&Facts::new(), |chunk| chunks.push(chunk.to_string()), CancelToken::never())
            .await
            .unwrap();

        assert_eq!(chunks, vec!["one ", "two ", "three "]);
        assert_eq!(outcome.output, "one two three");
    }

    #[tokio::test]
    async fn stream_of_a_blocked_run_emits_the_block_message() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(SpyAdapter::new("unused"));
        let pipeline = pipeline_with(
            vec![rule("no", "risk > 0.8", Action::Rejected, "Too risky")],
            adapter.clone(),
            &dir,
        )
        .await;

        let mut chunks = Vec::new();
        let outcome = pipeline
            .run_stream(
                &Facts::from_value(json!({ "risk": 1.0 })),
                |chunk| chunks.push(chunk.to_string()),
                CancelToken::never(),
            )
            .await
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("Blocked by rule: Too risky"));
        assert!(outcome.blocked());
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn cancellation_before_the_model_call_yields_synthetic_review() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = Arc::new(SpyAdapter::new("unused"));
        let pipeline = pipeline_with(vec![], adapter.clone(), &dir).await;

        let (handle, token) = CancelToken::new();
        handle.cancel();
        let outcome = pipeline
            .run_cancellable(&Facts::new(), token)
            .await
            .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.decisions.len(), 2);
        assert_eq!(outcome.decisions[1].result, Action::Review);
        assert_eq!(outcome.decisions[1].reason, "cancelled");
        assert_eq!(adapter.calls(), 0);
        // Both entries are permanent
        assert_eq!(pipeline.audit().size(), 2);
    }

    #[tokio::test]
    async fn slow_adapter_hits_the_deadline() {
        struct SlowAdapter;
        #[async_trait]
        impl LmAdapter for SlowAdapter {
            async fn complete(&self, _prompt: &str) -> Result<String> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".into())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let adapter: Arc<dyn LmAdapter> = Arc::new(SlowAdapter);
        let pipeline = pipeline_with(vec![], adapter, &dir)
            .await
            .with_config(PipelineConfig::default().with_deadline(Duration::from_millis(20)));

        let outcome = pipeline.run(&Facts::new()).await.unwrap();
        assert!(outcome.cancelled);
        assert_eq!(outcome.decisions[1].reason, "cancelled");
    }

    #[tokio::test]
    async fn mid_stream_cancellation_keeps_the_accumulated_output() {
        struct DrippingAdapter;
        #[async_trait]
        impl LmAdapter for DrippingAdapter {
            async fn complete(&self, _prompt: &str) -> Result<String> {
                Ok("partial then more".into())
            }
            fn supports_streaming(&self) -> bool {
                true
            }
            async fn complete_stream(
                &self,
                _prompt: &str,
                chunks: mpsc::Sender<String>,
            ) -> Result<String> {
                let _ = chunks.send("partial ".to_string()).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
                let _ = chunks.send("then more".to_string()).await;
                Ok("partial then more".into())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(vec![], Arc::new(DrippingAdapter), &dir).await;

        let (handle, token) = CancelToken::new();
        let mut chunks = Vec::new();
        let outcome = pipeline
            .run_stream(
                &Facts::new(),
                |chunk| {
                    chunks.push(chunk.to_string());
                    handle.cancel();
                },
                token,
            )
            .await
            .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(chunks, vec!["partial "]);
        assert_eq!(outcome.output, "partial ");
        // The post entry records the partial output
        assert_eq!(
            outcome.audit_trail[1].input.lookup("llmOutput"),
            Some(&json!("partial "))
        );
    }
}
