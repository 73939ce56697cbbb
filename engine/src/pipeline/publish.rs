//! Published Artifact
//!
//! Final article assembly: a `---` front-matter block followed by the body,
//! plus the editorial report printed at the end of a run.

use sdk::errors::EngineError;
use sdk::types::DraftText;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_FILENAME_CHARS: usize = 100;

/// Style guide used when none is supplied
pub const DEFAULT_STYLE_GUIDE: &str = "Writing Style Guidelines:
- Tone: Professional yet conversational
- Target Audience: Tech-savvy professionals and content creators
- Length: 1200-1800 words
- Structure: Introduction, 3-5 main sections, Conclusion
- Use headers (H2, H3) for organization
- Include bullet points for key takeaways
- Cite sources when mentioning statistics or research
";

/// Front-matter fields of a published article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub title: String,
    pub description: String,
    /// Publication date, YYYY-MM-DD
    pub date: String,
    pub keywords: Vec<String>,
    pub sources: Vec<String>,
}

impl ArtifactMetadata {
    /// Render as a front-matter block, values JSON encoded
    pub fn to_front_matter(&self) -> String {
        format!(
            "---\ntitle: {}\ndescription: {}\ndate: {}\nkeywords: {}\nsources: {}\n---\n",
            encode(&self.title),
            encode(&self.description),
            self.date,
            encode(&self.keywords),
            encode(&self.sources)
        )
    }

    /// Parse a document produced by [`PublishedArtifact::render`].
    ///
    /// Returns the metadata and the body that follows the block.
    pub fn parse_front_matter(document: &str) -> Result<(Self, &str), EngineError> {
        let malformed = |detail: &str| EngineError::Output(format!("Malformed front matter: {}", detail));

        let rest = document
            .strip_prefix("---\n")
            .ok_or_else(|| malformed("missing opening delimiter"))?;
        let end = rest
            .find("\n---\n")
            .ok_or_else(|| malformed("missing closing delimiter"))?;
        let block = &rest[..end];
        let body = rest[end + "\n---\n".len()..].trim_start_matches('\n');

        let mut title = None;
        let mut description = String::new();
        let mut date = None;
        let mut keywords = Vec::new();
        let mut sources = Vec::new();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            let decode_err = |e: serde_json::Error| malformed(&format!("{}: {}", key, e));
            match key.trim() {
                "title" => title = Some(serde_json::from_str(value).map_err(decode_err)?),
                "description" => description = serde_json::from_str(value).map_err(decode_err)?,
                "date" => date = Some(value.to_string()),
                "keywords" => keywords = serde_json::from_str(value).map_err(decode_err)?,
                "sources" => sources = serde_json::from_str(value).map_err(decode_err)?,
                _ => {}
            }
        }

        Ok((
            Self {
                title: title.ok_or_else(|| malformed("missing title"))?,
                description,
                date: date.ok_or_else(|| malformed("missing date"))?,
                keywords,
                sources,
            },
            body,
        ))
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Summary of the editorial process for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorialReport {
    pub iterations: usize,
    pub final_score: f64,
    pub quality_threshold: f64,
    pub forced_approval: bool,
    pub strengths: Vec<String>,
    pub word_count: usize,
    pub has_structure: bool,
    pub seo_optimized: bool,
}

impl EditorialReport {
    /// "APPROVED" when the final score clears the threshold, else "NEEDS WORK"
    pub fn status_label(&self) -> &'static str {
        if self.final_score >= self.quality_threshold {
            "APPROVED"
        } else {
            "NEEDS WORK"
        }
    }
}

fn check(flag: bool) -> &'static str {
    if flag {
        "✓"
    } else {
        "✗"
    }
}

impl fmt::Display for EditorialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EDITORIAL REVIEW REPORT ===")?;
        writeln!(f)?;
        writeln!(f, "Total Iterations: {}", self.iterations)?;
        writeln!(f, "Final Quality Score: {:.1}/10", self.final_score)?;
        write!(f, "Status: {}", self.status_label())?;
        if self.forced_approval {
            write!(f, " (accepted after reaching the iteration limit)")?;
        }
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "Strengths:")?;
        if self.strengths.is_empty() {
            writeln!(f, "  ✓ N/A")?;
        }
        for strength in &self.strengths {
            writeln!(f, "  ✓ {}", strength)?;
        }
        writeln!(f)?;
        writeln!(f, "Final State:")?;
        writeln!(f, "  • Word Count: ~{} words", self.word_count)?;
        writeln!(f, "  • Structure: {}", check(self.has_structure))?;
        writeln!(f, "  • SEO Optimized: {}", check(self.seo_optimized))?;
        writeln!(f)?;
        write!(f, "==================================")
    }
}

/// The finished article
#[derive(Debug, Clone, Serialize)]
pub struct PublishedArtifact {
    pub metadata: ArtifactMetadata,
    pub body: DraftText,
    pub report: EditorialReport,
}

impl PublishedArtifact {
    /// Front matter followed by the body
    pub fn render(&self) -> String {
        let mut out = self.metadata.to_front_matter();
        out.push('\n');
        out.push_str(self.body.as_str().trim_end());
        out.push('\n');
        out
    }
}

/// File stem for a topic: alphanumerics, spaces and hyphens kept, spaces
/// turned into hyphens, lowercased, at most 100 characters.
pub fn sanitize_filename(topic: &str) -> String {
    let kept: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect();
    let slug: String = kept
        .trim()
        .replace(' ', "-")
        .to_lowercase()
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect();

    if slug.is_empty() {
        "article".to_string()
    } else {
        slug
    }
}

/// Write the rendered artifact to `{dir}/{sanitize_filename(topic)}.md`.
///
/// Creates `dir` if needed and returns the written path.
pub fn write_artifact(
    dir: &Path,
    topic: &str,
    artifact: &PublishedArtifact,
) -> Result<PathBuf, EngineError> {
    fs::create_dir_all(dir).map_err(|e| {
        EngineError::Output(format!("Failed to create output directory {:?}: {}", dir, e))
    })?;

    let path = dir.join(format!("{}.md", sanitize_filename(topic)));
    fs::write(&path, artifact.render())
        .map_err(|e| EngineError::Output(format!("Failed to write {:?}: {}", path, e)))?;

    tracing::info!("Article written to {:?}", path);
    Ok(path)
}
