//! Quality Heuristics
//!
//! Deterministic structural score for a draft, on a 0-10 scale. The review
//! stage blends it with the model's own score.
//!
//! | Signal             | Max | Rule                                          |
//! |--------------------|-----|-----------------------------------------------|
//! | Length             | 4.0 | linear up to 1200 words, capped at 3.0 > 2500 |
//! | Headers            | 2.5 | 1.0 + 0.3 per header, up to 5                 |
//! | Conclusion header  | 0.5 | any header mentioning "conclusion"            |
//! | Paragraphs         | 2.0 | linear up to 8 prose paragraphs               |
//! | Bullet list        | 1.0 | any `- `, `* ` or `N. ` line                  |

const TARGET_WORDS: usize = 1200;
const VERBOSE_WORDS: usize = 2500;
const TARGET_PARAGRAPHS: usize = 8;
const COUNTED_HEADERS: usize = 5;

pub struct QualityScorer;

impl QualityScorer {
    /// Score `text` in `[0, 10]`. Never fails and always returns a finite value.
    pub fn score(text: &str) -> f64 {
        let words = text.split_whitespace().count();
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        let headers: Vec<&&str> = lines.iter().filter(|l| is_header(l)).collect();
        let paragraphs = count_paragraphs(&lines);
        let has_list = lines.iter().any(|l| is_list_item(l));
        let has_conclusion = headers
            .iter()
            .any(|h| h.to_lowercase().contains("conclusion"));

        let mut length = 4.0 * words.min(TARGET_WORDS) as f64 / TARGET_WORDS as f64;
        if words > VERBOSE_WORDS {
            length = length.min(3.0);
        }

        let header_score = if headers.is_empty() {
            0.0
        } else {
            1.0 + 0.3 * headers.len().min(COUNTED_HEADERS) as f64
        };

        let conclusion = if has_conclusion { 0.5 } else { 0.0 };
        let paragraph_score =
            2.0 * paragraphs.min(TARGET_PARAGRAPHS) as f64 / TARGET_PARAGRAPHS as f64;
        let list = if has_list { 1.0 } else { 0.0 };

        (length + header_score + conclusion + paragraph_score + list).clamp(0.0, 10.0)
    }
}

fn is_header(line: &str) -> bool {
    line.starts_with('#')
}

pub(crate) fn is_list_item(line: &str) -> bool {
    if line.starts_with("- ") || line.starts_with("* ") {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with(". ")
}

/// Blank-line separated blocks with at least one prose line
fn count_paragraphs(lines: &[&str]) -> usize {
    let mut count = 0;
    let mut in_block = false;
    let mut block_has_prose = false;

    for line in lines {
        if line.is_empty() {
            if in_block && block_has_prose {
                count += 1;
            }
            in_block = false;
            block_has_prose = false;
            continue;
        }
        in_block = true;
        if !is_header(line) && !is_list_item(line) {
            block_has_prose = true;
        }
    }

    if in_block && block_has_prose {
        count += 1;
    }
    count
}
