//! Shared test doubles for pipeline integration tests
//!
//! `ScriptedProvider` answers each stage's prompt with a canned reply and
//! records which stages were called, in order.

#![allow(dead_code)]

use async_trait::async_trait;
use blogflow_engine::llm::{Generation, GenerationOptions, LLMError, LLMProvider, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Which stage a prompt belongs to, recognized by its opening line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Research,
    ResearchFallback,
    Draft,
    Revision,
    Keywords,
    Rewrite,
    Review,
    Meta,
    Unknown,
}

impl Call {
    fn of(prompt: &str) -> Self {
        let markers = [
            ("You are a Research Agent", Call::Research),
            ("Based on your training data", Call::ResearchFallback),
            ("You are a Writer Agent creating", Call::Draft),
            ("You are a Writer Agent revising", Call::Revision),
            ("You are an SEO expert", Call::Keywords),
            ("You are an SEO Strategist", Call::Rewrite),
            ("You are an Editor Agent", Call::Review),
            ("Generate SEO meta tags", Call::Meta),
        ];

        markers
            .iter()
            .find(|(marker, _)| prompt.starts_with(marker))
            .map(|(_, call)| *call)
            .unwrap_or(Call::Unknown)
    }
}

/// Canned replies per stage. `None` makes that call fail.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub research: Option<String>,
    pub sources: Vec<String>,
    pub draft: Option<String>,
    pub revision: Option<String>,
    pub keywords: Option<String>,
    pub rewrite: Option<String>,
    pub meta: Option<String>,
    /// Consumed one per review; the last entry repeats once the queue is drained
    pub reviews: Vec<Option<String>>,
}

impl Script {
    /// A script where every stage succeeds with plausible output
    pub fn happy() -> Self {
        Self {
            research: Some(research_text()),
            sources: vec!["https://example.com/remote-work-study".to_string()],
            draft: Some(short_article("Remote Work")),
            revision: Some(rich_article("Remote Work")),
            keywords: Some("remote work, productivity, work from home".to_string()),
            rewrite: Some(short_article("Remote Work")),
            meta: Some(
                "TITLE: Remote Work Wins\nDESCRIPTION: Why distributed teams thrive.".to_string(),
            ),
            reviews: vec![Some(review(8.0))],
        }
    }

    /// A script where every call fails
    pub fn failing() -> Self {
        Self::default()
    }
}

pub struct ScriptedProvider {
    script: Script,
    reviews: Mutex<VecDeque<Option<String>>>,
    last_review: Mutex<Option<String>>,
    calls: Mutex<Vec<(Call, String)>>,
    grounding: bool,
    delay: Option<Duration>,
    reject_credentials: bool,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        let reviews = script.reviews.iter().cloned().collect();
        Self {
            script,
            reviews: Mutex::new(reviews),
            last_review: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            grounding: true,
            delay: None,
            reject_credentials: false,
        }
    }

    /// Behave like a provider without search grounding
    pub fn without_grounding(mut self) -> Self {
        self.grounding = false;
        self
    }

    /// Sleep before answering every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the pre-flight credential check
    pub fn rejecting_credentials(mut self) -> Self {
        self.reject_credentials = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(call, _)| *call).collect()
    }

    /// Prompts sent for one stage, in order
    pub fn prompts(&self, call: Call) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == call)
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn next_review(&self) -> Option<String> {
        let mut queue = self.reviews.lock().unwrap();
        let mut last = self.last_review.lock().unwrap();
        if let Some(reply) = queue.pop_front() {
            *last = reply.clone();
            reply
        } else {
            last.clone()
        }
    }
}

fn reply(text: &Option<String>, call: Call) -> Result<Generation> {
    text.clone()
        .map(Generation::text)
        .ok_or_else(|| LLMError::ProviderUnavailable(format!("scripted {:?} failure", call)))
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_local(&self) -> bool {
        true
    }

    fn supports_grounding(&self) -> bool {
        self.grounding
    }

    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<Generation> {
        let call = Call::of(prompt);
        self.calls.lock().unwrap().push((call, prompt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match call {
            Call::Research => reply(&self.script.research, call).map(|g| Generation {
                sources: self.script.sources.clone(),
                ..g
            }),
            Call::ResearchFallback => reply(&self.script.research, call),
            Call::Draft => reply(&self.script.draft, call),
            Call::Revision => reply(&self.script.revision, call),
            Call::Keywords => reply(&self.script.keywords, call),
            Call::Rewrite => reply(&self.script.rewrite, call),
            Call::Review => reply(&self.next_review(), call),
            Call::Meta => reply(&self.script.meta, call),
            Call::Unknown => Err(LLMError::InvalidRequest("unrecognized prompt".to_string())),
        }
    }

    async fn verify_credentials(&self) -> Result<()> {
        if self.reject_credentials {
            Err(LLMError::AuthenticationFailed("API key not valid".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn research_text() -> String {
    "Remote work has become mainstream since 2020.\n\
     - Productivity holds steady or improves for most teams\n\
     - Commute time savings average 50 minutes a day\n\
     - Hiring pools widen beyond one city\n\
     Some managers still worry about collaboration."
        .to_string()
}

/// Editorial review with the given model score
pub fn review(score: f64) -> String {
    format!(
        "SCORE: {:.1}/10\n\
         ISSUES:\n\
         - Needs more depth\n\
         SUGGESTIONS:\n\
         - Add concrete examples\n\
         STRENGTHS:\n\
         - Clear opening",
        score
    )
}

/// A thin draft that scores well under the default threshold
pub fn short_article(topic: &str) -> String {
    format!("# {}\n\nA short note on the subject.", topic)
}

/// A structured draft that scores 10.0 on the quality heuristic
pub fn rich_article(topic: &str) -> String {
    let prose = vec!["insight"; 120].join(" ");
    let mut text = format!("# {}\n\n", topic);
    for i in 1..=5 {
        text.push_str(&format!("## Section {}\n\n{}\n\n{}\n\n", i, prose, prose));
    }
    text.push_str("## Conclusion\n\n- Start small\n- Measure outcomes\n\n");
    text.push_str(&vec!["closing"; 60].join(" "));
    text
}
