use crate::models::region::Region;
use serde::{Deserialize, Serialize};

/// How template hits are ranked when several match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Score,
}

/// What a single recognition pass looks for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionQuery {
    TemplateMatch {
        templates: Vec<String>,
        order_by: OrderBy,
    },
    /// `expected` entries are regex patterns, any of which may match
    Ocr { expected: Vec<String> },
}

/// One pass of the vision backend: a sub-query node name, an optional
/// region of interest (whole screen when absent) and the query itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecognitionRequest {
    pub node: String,
    pub roi: Option<Region>,
    pub query: RecognitionQuery,
}

impl RecognitionRequest {
    pub fn ocr(node: impl Into<String>, roi: Option<Region>, expected: Vec<String>) -> Self {
        Self {
            node: node.into(),
            roi,
            query: RecognitionQuery::Ocr { expected },
        }
    }

    pub fn template(node: impl Into<String>, roi: Option<Region>, templates: Vec<String>) -> Self {
        Self {
            node: node.into(),
            roi,
            query: RecognitionQuery::TemplateMatch {
                templates,
                order_by: OrderBy::Score,
            },
        }
    }

    pub fn is_ocr(&self) -> bool {
        matches!(self.query, RecognitionQuery::Ocr { .. })
    }
}

/// OCR text box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextHit {
    pub text: String,
    pub region: Region,
    pub score: f64,
}

/// Template match box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateHit {
    pub template: String,
    pub region: Region,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutcome {
    /// Every box that matched one of the expected patterns, in screen order
    pub filtered: Vec<TextHit>,
    pub best: Option<TextHit>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateMatchOutcome {
    pub filtered: Vec<TemplateHit>,
    pub best: Option<TemplateHit>,
}

/// Result of one recognition pass.
///
/// The variant tells which kind of query ran; `best` tells whether it hit.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    Template(TemplateMatchOutcome),
    Ocr(OcrOutcome),
}

impl RecognitionOutcome {
    /// Empty outcome of the same kind as the request
    pub fn miss_for(request: &RecognitionRequest) -> Self {
        if request.is_ocr() {
            Self::Ocr(OcrOutcome::default())
        } else {
            Self::Template(TemplateMatchOutcome::default())
        }
    }

    pub fn ocr(filtered: Vec<TextHit>) -> Self {
        let best = filtered
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
            .cloned();
        Self::Ocr(OcrOutcome { filtered, best })
    }

    pub fn template(filtered: Vec<TemplateHit>) -> Self {
        let best = filtered
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
            .cloned();
        Self::Template(TemplateMatchOutcome { filtered, best })
    }

    pub fn is_hit(&self) -> bool {
        self.region().is_some()
    }

    /// Region of the best hit
    pub fn region(&self) -> Option<Region> {
        match self {
            Self::Template(outcome) => outcome.best.as_ref().map(|hit| hit.region),
            Self::Ocr(outcome) => outcome.best.as_ref().map(|hit| hit.region),
        }
    }

    /// Best OCR hit; always `None` for template outcomes
    pub fn best_text(&self) -> Option<&TextHit> {
        match self {
            Self::Ocr(outcome) => outcome.best.as_ref(),
            Self::Template(_) => None,
        }
    }

    /// All OCR hits; empty for template outcomes
    pub fn text_hits(&self) -> &[TextHit] {
        match self {
            Self::Ocr(outcome) => &outcome.filtered,
            Self::Template(_) => &[],
        }
    }

    pub fn hit_count(&self) -> usize {
        match self {
            Self::Template(outcome) => outcome.filtered.len(),
            Self::Ocr(outcome) => outcome.filtered.len(),
        }
    }
}

/// What a custom recognition hands back to the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResult {
    #[serde(rename = "box")]
    pub region: Option<Region>,
    pub detail: String,
}

impl AnalyzeResult {
    pub fn hit(region: Region, detail: impl Into<String>) -> Self {
        Self {
            region: Some(region),
            detail: detail.into(),
        }
    }

    pub fn miss(detail: impl Into<String>) -> Self {
        Self {
            region: None,
            detail: detail.into(),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.region.is_some()
    }
}

/// What a custom action hands back to the pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(text: &str, x: i32, score: f64) -> TextHit {
        TextHit {
            text: text.to_string(),
            region: Region::new(x, 0, 10, 10),
            score,
        }
    }

    #[test]
    fn test_ocr_outcome_best_is_highest_score() {
        let outcome = RecognitionOutcome::ocr(vec![hit("a", 0, 0.7), hit("b", 20, 0.95), hit("c", 40, 0.8)]);
        assert_eq!(outcome.best_text().unwrap().text, "b");
        assert_eq!(outcome.region(), Some(Region::new(20, 0, 10, 10)));
        assert_eq!(outcome.hit_count(), 3);
    }

    #[test]
    fn test_empty_outcome_is_miss() {
        let outcome = RecognitionOutcome::ocr(Vec::new());
        assert!(!outcome.is_hit());
        assert!(outcome.best_text().is_none());
    }

    #[test]
    fn test_miss_for_matches_request_kind() {
        let ocr = RecognitionRequest::ocr("Node", None, vec!["Floor".to_string()]);
        let template = RecognitionRequest::template("Node", None, vec!["a.png".to_string()]);

        assert!(matches!(RecognitionOutcome::miss_for(&ocr), RecognitionOutcome::Ocr(_)));
        assert!(matches!(
            RecognitionOutcome::miss_for(&template),
            RecognitionOutcome::Template(_)
        ));
    }

    #[test]
    fn test_template_outcome_has_no_text() {
        let outcome = RecognitionOutcome::template(vec![TemplateHit {
            template: "stage/bounty-floor-iv.png".to_string(),
            region: Region::new(5, 5, 20, 20),
            score: 0.9,
        }]);
        assert!(outcome.is_hit());
        assert!(outcome.best_text().is_none());
        assert!(outcome.text_hits().is_empty());
    }

    #[test]
    fn test_analyze_result_serializes_box_key() {
        let result = AnalyzeResult::hit(Region::new(1, 2, 3, 4), "Boss selected");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["box"]["x"], 1);
        assert_eq!(json["detail"], "Boss selected");

        let miss = serde_json::to_value(AnalyzeResult::miss("Floor not found")).unwrap();
        assert!(miss["box"].is_null());
    }

    #[test]
    fn test_query_serialization_is_tagged() {
        let request = RecognitionRequest::ocr("Shop_Potion", None, vec!["Potion".to_string()]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"]["type"], "ocr");
        assert_eq!(json["query"]["expected"][0], "Potion");
    }
}
