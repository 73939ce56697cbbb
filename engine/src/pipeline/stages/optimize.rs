//! Optimize Stage
//!
//! Keyword identification, SEO rewrite of the latest draft, and meta tag
//! generation for the published article.

use crate::llm::{GenerationOptions, Generator};
use sdk::types::{truncate_chars, DraftText, MetaTags, SeoRecord};

const MAX_KEYWORDS: usize = 10;
const KEYWORD_CONTEXT_CHARS: usize = 500;
const META_CONTEXT_CHARS: usize = 300;
const META_DESCRIPTION_CHARS: usize = 155;

/// Result of one optimize pass
#[derive(Debug, Clone)]
pub struct OptimizeOutput {
    pub seo: SeoRecord,
    /// Rewritten draft, or the input draft unchanged when the rewrite failed
    pub draft: DraftText,
}

pub struct OptimizeStage {
    generator: Generator,
}

impl OptimizeStage {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    /// Identify keywords and rewrite `draft` around them. Never fails.
    pub async fn run(&self, draft: &DraftText, topic: &str) -> OptimizeOutput {
        let keywords = self.identify_keywords(draft, topic).await;

        let (draft, optimized) = match self.rewrite(draft, &keywords).await {
            Some(rewritten) => (rewritten, true),
            None => (draft.clone(), false),
        };

        tracing::info!(
            "SEO optimization complete: keywords=[{}], rewritten={}",
            keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", "),
            optimized
        );

        OptimizeOutput {
            seo: SeoRecord {
                keywords,
                topic: topic.to_string(),
                optimized,
            },
            draft,
        }
    }

    async fn identify_keywords(&self, draft: &DraftText, topic: &str) -> Vec<String> {
        let prompt = format!(
            "You are an SEO expert. Analyze this topic and draft to identify the most important keywords.

TOPIC: {topic}

DRAFT (first 500 chars):
{excerpt}

Identify:
1. Primary keyword (the main focus)
2. 5-8 secondary keywords (related terms)
3. 3-5 long-tail keywords (specific phrases users might search)

Return ONLY a comma-separated list of keywords, starting with the primary keyword.
Example: \"AI agents, artificial intelligence, automation, agent systems, multi-agent architecture\"",
            excerpt = truncate_chars(draft.as_str(), KEYWORD_CONTEXT_CHARS)
        );

        let keywords = match self
            .generator
            .generate(&prompt, &GenerationOptions::new(0.3, 200))
            .await
        {
            Ok(generation) => parse_keywords(&generation.text),
            Err(e) => {
                tracing::warn!("Keyword identification failed: {}", e);
                Vec::new()
            }
        };

        if keywords.is_empty() {
            fallback_keywords(topic)
        } else {
            keywords
        }
    }

    async fn rewrite(&self, draft: &DraftText, keywords: &[String]) -> Option<DraftText> {
        let numbered = keywords
            .iter()
            .enumerate()
            .map(|(i, kw)| format!("{}. {}", i + 1, kw))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "You are an SEO Strategist optimizing a blog article.

DRAFT:
{draft}

TARGET KEYWORDS (in priority order):
{numbered}

Your task:
1. Ensure the primary keyword appears in:
   - The first paragraph (H1 or opening)
   - At least one H2 header
   - The conclusion
2. Naturally incorporate secondary keywords throughout
3. Optimize headers for search intent (make them descriptive)
4. Ensure meta-friendly structure (clear hierarchy)
5. Keep the content natural and readable - NO keyword stuffing
6. Maintain the original tone and quality

CRITICAL: The content must read naturally. Only make changes that improve both SEO AND readability.

Return the optimized draft."
        );

        match self
            .generator
            .generate(&prompt, &GenerationOptions::new(0.5, 3500))
            .await
        {
            Ok(generation) => Some(DraftText::new(generation.text)),
            Err(e) => {
                tracing::warn!("SEO rewrite failed, keeping draft unchanged: {}", e);
                None
            }
        }
    }

    /// Generate a meta title and description for the final draft.
    ///
    /// Missing or failed fields fall back to the topic and a plain-text
    /// excerpt of the draft.
    pub async fn meta_tags(&self, draft: &DraftText, keywords: &[String], topic: &str) -> MetaTags {
        let primary = keywords.first().map(String::as_str).unwrap_or(topic);
        let prompt = format!(
            "Generate SEO meta tags for this article.

TOPIC: {topic}
PRIMARY KEYWORD: {primary}

ARTICLE (first 300 chars):
{excerpt}

Generate:
1. Meta Title (50-60 characters, include primary keyword)
2. Meta Description (150-160 characters, compelling, include primary keyword)

Return in format:
TITLE: [your title]
DESCRIPTION: [your description]",
            excerpt = truncate_chars(draft.as_str(), META_CONTEXT_CHARS)
        );

        let (title, description) = match self
            .generator
            .generate(&prompt, &GenerationOptions::new(0.5, 200))
            .await
        {
            Ok(generation) => parse_meta(&generation.text),
            Err(e) => {
                tracing::warn!("Meta tag generation failed: {}", e);
                (None, None)
            }
        };

        MetaTags {
            title: title.unwrap_or_else(|| topic.to_string()),
            description: description.unwrap_or_else(|| fallback_description(draft, topic)),
        }
    }
}

/// Comma-separated keywords, quotes and list markers stripped, at most ten
pub(crate) fn parse_keywords(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(|kw| {
            kw.trim()
                .trim_start_matches(['-', '*'])
                .trim()
                .trim_matches(['"', '\'', '`'])
                .trim()
                .to_string()
        })
        .filter(|kw| !kw.is_empty())
        .take(MAX_KEYWORDS)
        .collect()
}

/// Lowercased topic plus generic blog terms
pub(crate) fn fallback_keywords(topic: &str) -> Vec<String> {
    vec![
        topic.to_lowercase(),
        "blog".to_string(),
        "guide".to_string(),
        "tutorial".to_string(),
    ]
}

fn parse_meta(text: &str) -> (Option<String>, Option<String>) {
    let mut title = None;
    let mut description = None;

    for line in text.lines() {
        let line = line.trim().replace("**", "");
        if let Some(rest) = line.strip_prefix("TITLE:") {
            let value = rest.trim();
            if !value.is_empty() {
                title = Some(value.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("DESCRIPTION:") {
            let value = rest.trim();
            if !value.is_empty() {
                description = Some(value.to_string());
            }
        }
    }

    (title, description)
}

/// Plain-text excerpt of the draft, or a generic sentence for an empty draft
pub(crate) fn fallback_description(draft: &DraftText, topic: &str) -> String {
    let plain = draft
        .as_str()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.trim_start_matches(['-', '*', '>'])
                .replace("**", "")
                .replace('`', "")
        })
        .collect::<Vec<_>>()
        .join(" ");
    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");

    if plain.is_empty() {
        format!("Learn about {} in this comprehensive guide.", topic)
    } else {
        truncate_chars(&plain, META_DESCRIPTION_CHARS).trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        let keywords = parse_keywords("\"remote work, productivity,  , work from home\"");
        assert_eq!(keywords, vec!["remote work", "productivity", "work from home"]);
    }

    #[test]
    fn test_parse_keywords_caps_at_ten() {
        let text = (0..15).map(|i| format!("kw{}", i)).collect::<Vec<_>>().join(", ");
        assert_eq!(parse_keywords(&text).len(), 10);
    }

    #[test]
    fn test_fallback_keywords() {
        assert_eq!(
            fallback_keywords("Remote Work"),
            vec!["remote work", "blog", "guide", "tutorial"]
        );
    }

    #[test]
    fn test_parse_meta() {
        let (title, description) =
            parse_meta("TITLE: Remote Work Wins\n**DESCRIPTION:** Why teams thrive remotely.");
        assert_eq!(title.as_deref(), Some("Remote Work Wins"));
        assert_eq!(description.as_deref(), Some("Why teams thrive remotely."));

        let (title, description) = parse_meta("nothing useful");
        assert!(title.is_none());
        assert!(description.is_none());
    }

    #[test]
    fn test_fallback_description() {
        let draft = DraftText::from("# Title\n\n**Remote** work is here.\n\n- It saves time");
        assert_eq!(
            fallback_description(&draft, "Remote Work"),
            "Remote work is here. It saves time"
        );

        let long = DraftText::new("word ".repeat(100));
        assert!(fallback_description(&long, "x").chars().count() <= 155);

        assert_eq!(
            fallback_description(&DraftText::from(""), "Remote Work"),
            "Learn about Remote Work in this comprehensive guide."
        );
    }
}
