mod common;

use blogflow_engine::config::Config;
use blogflow_engine::llm::{Generation, GenerationOptions, Generator, LLMError, LLMProvider};
use blogflow_engine::pipeline::{
    FeedbackParser, PipelineController, PipelineSettings, QualityScorer, DEFAULT_STYLE_GUIDE,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// The parser is total, and the last numeric SCORE line sets the score
proptest! {
    #[test]
    fn test_feedback_parser_never_panics(text in "(?s).{0,400}") {
        let review = FeedbackParser::parse(&text);
        prop_assert!(review.score.is_finite());
        if !review.score_extracted {
            prop_assert_eq!(review.score, 5.0);
        }
    }

    #[test]
    fn test_feedback_parser_reads_last_score(
        first in 0.0..10.0f64,
        last in 0.0..10.0f64,
        issues in prop::collection::vec("[a-z]{1,12}( [a-z]{1,12}){0,3}", 0..5),
    ) {
        let mut text = format!("SCORE: {:.1}/10\nISSUES:\n", first);
        for issue in &issues {
            text.push_str(&format!("- {}\n", issue));
        }
        text.push_str(&format!("SCORE: {:.1}\n", last));

        let review = FeedbackParser::parse(&text);
        prop_assert!(review.score_extracted);
        let expected_last = format!("{:.1}", last).parse::<f64>().unwrap();
        prop_assert!((review.score - expected_last).abs() < 1e-9);
        prop_assert_eq!(review.issues, issues);
    }
}

// Scores stay in range, and stripping every header never raises the score
proptest! {
    #[test]
    fn test_quality_score_bounds(text in "(?s).{0,2000}") {
        let score = QualityScorer::score(&text);
        prop_assert!(score.is_finite());
        prop_assert!((0.0..=10.0).contains(&score));
    }

    #[test]
    fn test_quality_score_header_stripping_monotonic(
        sections in prop::collection::vec(("[A-Za-z ]{1,20}", 1usize..200, any::<bool>()), 1..8),
    ) {
        let mut text = String::new();
        for (title, words, bullets) in &sections {
            text.push_str(&format!("## {}\n\n{}\n\n", title, vec!["word"; *words].join(" ")));
            if *bullets {
                text.push_str("- point\n- another\n\n");
            }
        }

        let stripped = text
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");

        prop_assert!(QualityScorer::score(&stripped) <= QualityScorer::score(&text) + 1e-9);
    }
}

/// Writes a well-structured draft, reviews it with a fixed score and counts reviews
struct ConstantReviewer {
    model_score: f64,
    reviews: AtomicUsize,
}

#[async_trait::async_trait]
impl LLMProvider for ConstantReviewer {
    fn name(&self) -> &str {
        "constant"
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<Generation, LLMError> {
        if prompt.starts_with("You are an Editor Agent") {
            self.reviews.fetch_add(1, Ordering::SeqCst);
            Ok(Generation::text(format!("SCORE: {}", self.model_score)))
        } else {
            Ok(Generation::text(common::rich_article("Property Topic")))
        }
    }
}

// For any bound K the run makes at most K reviews and ends approved
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_review_loop_terminates(max_iterations in 1u32..6, model_score in 0.0..10.0f64) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        let provider = Arc::new(ConstantReviewer {
            model_score,
            reviews: AtomicUsize::new(0),
        });
        let settings = PipelineSettings {
            max_iterations,
            ..PipelineSettings::default()
        };
        let controller = PipelineController::new(
            Generator::new(provider.clone(), Duration::from_secs(5)),
            settings,
        );

        let run = runtime.block_on(controller.run("Property Topic", DEFAULT_STYLE_GUIDE));
        let feedback = run.memory.feedback_history();

        prop_assert!(!feedback.is_empty());
        prop_assert!(feedback.len() <= max_iterations as usize);
        prop_assert_eq!(provider.reviews.load(Ordering::SeqCst), feedback.len());

        let last = feedback.last().unwrap();
        prop_assert!(last.approved);
        prop_assert_eq!(last.forced_approval, !last.meets_threshold(7.0));
        for record in &feedback[..feedback.len() - 1] {
            prop_assert!(!record.approved);
        }
        // initial + optimize + one per revision
        prop_assert_eq!(run.memory.drafts().len(), 2 + feedback.len() - 1);
    }
}

// Configuration survives a TOML round-trip
proptest! {
    #[test]
    fn test_config_parsing_round_trip(
        log_level in "error|warn|info|debug|trace",
        default_provider in "gemini|ollama",
        threshold in 0.0..=10.0f64,
        max_iterations in 1..=10u32,
        timeout in 1..=600u64,
    ) {
        let mut config = Config::default();
        config.core.log_level = log_level;
        config.llm.default_provider = default_provider;
        config.pipeline.quality_threshold = threshold;
        config.pipeline.max_iterations = max_iterations;
        config.llm.request_timeout_secs = timeout;

        let toml_string = config.to_toml().expect("Failed to serialize Config to string");
        let parsed: Config = toml::from_str(&toml_string).expect("Failed to deserialize TOML to Config");

        prop_assert_eq!(config.core.log_level, parsed.core.log_level);
        prop_assert_eq!(config.llm.default_provider, parsed.llm.default_provider);
        prop_assert_eq!(config.pipeline.quality_threshold, parsed.pipeline.quality_threshold);
        prop_assert_eq!(config.pipeline.max_iterations, parsed.pipeline.max_iterations);
        prop_assert_eq!(config.llm.request_timeout_secs, parsed.llm.request_timeout_secs);
        prop_assert_eq!(config.llm.gemini.model, parsed.llm.gemini.model);
    }
}
