//! Offline rule-based income parser.

use once_cell::sync::Lazy;
use strsim::levenshtein;

use super::{IncomeParser, ParseError, ParsedIncome};

/// Conventional category vocabulary. Categories stay open strings in the
/// domain; this table only drives extraction from free text.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "work",
        &["salary", "wage", "wages", "paycheck", "payroll", "overtime", "工资", "加班"],
    ),
    (
        "side income",
        &["freelance", "side", "gig", "tutoring", "commission", "副业", "兼职"],
    ),
    (
        "investment",
        &["investment", "dividend", "dividends", "stocks", "interest", "fund", "理财", "股票", "基金"],
    ),
    (
        "bonus",
        &["bonus", "award", "prize", "red packet", "奖金", "红包", "年终奖"],
    ),
];

static KEYWORD_INDEX: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .flat_map(|(category, keywords)| {
            keywords
                .iter()
                .map(move |keyword| (keyword.to_lowercase(), *category))
        })
        .collect()
});

/// Parses income text with digit scanning and keyword matching. Entirely
/// local, so it never returns [`ParseError`].
#[derive(Debug, Default)]
pub struct HeuristicParser;

impl HeuristicParser {
    pub fn new() -> Self {
        Self
    }
}

impl IncomeParser for HeuristicParser {
    fn parse(&self, text: &str) -> Result<Option<ParsedIncome>, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let Some(amount) = extract_amount(trimmed) else {
            return Ok(None);
        };
        let category = categorize(trimmed).unwrap_or("other");
        Ok(Some(ParsedIncome {
            amount,
            source: trimmed.to_string(),
            category: category.to_string(),
        }))
    }
}

/// Scans for the first numeric run, honoring `k` (thousand) and `w`/`万`
/// (ten-thousand) suffixes. Comma separators are stripped.
fn extract_amount(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut j = i;
        let mut digits = String::new();
        while j < chars.len() && (chars[j].is_ascii_digit() || chars[j] == ',' || chars[j] == '.') {
            if chars[j] != ',' {
                digits.push(chars[j]);
            }
            j += 1;
        }
        let multiplier = match chars.get(j) {
            Some('k') | Some('K') => 1_000.0,
            Some('w') | Some('W') | Some('万') => 10_000.0,
            _ => 1.0,
        };
        match digits.trim_end_matches('.').parse::<f64>() {
            Ok(value) if value > 0.0 => return Some(value * multiplier),
            _ => {
                i = j + 1;
                continue;
            }
        }
    }
    None
}

/// Maps text onto the conventional category set, first by containment and
/// then by a one-edit fuzzy pass over longer words.
fn categorize(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    for (keyword, category) in KEYWORD_INDEX.iter() {
        if lowered.contains(keyword.as_str()) {
            return Some(category);
        }
    }
    for word in lowered.split_whitespace().filter(|w| w.len() >= 4) {
        for (keyword, category) in KEYWORD_INDEX.iter() {
            if keyword.len() >= 4 && levenshtein(word, keyword) <= 1 {
                return Some(category);
            }
        }
    }
    None
}
