use super::backend::{Screenshot, VisionBackend};
use crate::error::AgentError;
use crate::models::config::BackendConfig;
use crate::models::recognition::{
    RecognitionOutcome, RecognitionQuery, RecognitionRequest, TemplateHit, TextHit,
};
use crate::models::region::Region;
use base64::{engine::general_purpose, Engine as _};
use image::GenericImageView;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Boxes overlapping more than this are the same detection
const IOU_THRESHOLD: f64 = 0.3;

/// Vision backend that talks to the local OCR / template-match server
#[derive(Clone)]
pub struct HttpVisionBackend {
    client: reqwest::blocking::Client,
    base_url: String,
    template_threshold: f64,
}

#[derive(Serialize)]
struct OcrRequest {
    image_base64: String,
}

#[derive(Serialize)]
struct TemplateRequest<'a> {
    image_base64: String,
    templates: &'a [String],
}

/// Single detection with its 4 corner points [[x1,y1], [x2,y2], [x3,y3], [x4,y4]]
#[derive(Deserialize, Clone, Debug)]
struct RawBox {
    #[serde(rename = "box")]
    bbox: Vec<Vec<f64>>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    template: String,
    score: f64,
}

#[derive(Deserialize)]
struct BoxesResponse {
    boxes: Vec<RawBox>,
}

impl RawBox {
    /// Get bounding box as (x_min, y_min, x_max, y_max)
    fn get_bbox_rect(&self) -> (f64, f64, f64, f64) {
        let xs = self.bbox.iter().filter_map(|p| p.first().copied());
        let ys = self.bbox.iter().filter_map(|p| p.get(1).copied());

        let (x_min, x_max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let (y_min, y_max) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        (x_min, y_min, x_max, y_max)
    }

    fn area(&self) -> f64 {
        let (x_min, y_min, x_max, y_max) = self.get_bbox_rect();
        (x_max - x_min).max(0.0) * (y_max - y_min).max(0.0)
    }

    /// Compute IoU (Intersection over Union) with another box
    fn iou(&self, other: &RawBox) -> f64 {
        let (x1_min, y1_min, x1_max, y1_max) = self.get_bbox_rect();
        let (x2_min, y2_min, x2_max, y2_max) = other.get_bbox_rect();

        let inter_x_min = x1_min.max(x2_min);
        let inter_y_min = y1_min.max(y2_min);
        let inter_x_max = x1_max.min(x2_max);
        let inter_y_max = y1_max.min(y2_max);

        if inter_x_max <= inter_x_min || inter_y_max <= inter_y_min {
            return 0.0;
        }

        let inter_area = (inter_x_max - inter_x_min) * (inter_y_max - inter_y_min);
        let union_area = self.area() + other.area() - inter_area;

        if union_area <= 0.0 {
            return 0.0;
        }

        inter_area / union_area
    }

    /// Screen region, shifted back from crop space by the roi origin
    fn to_region(&self, origin: (i32, i32)) -> Option<Region> {
        if self.bbox.len() < 2 {
            return None;
        }
        let (x_min, y_min, x_max, y_max) = self.get_bbox_rect();
        // Points without coordinates leave the fold at +/-infinity
        if !(x_min.is_finite() && y_min.is_finite() && x_max.is_finite() && y_max.is_finite()) {
            return None;
        }
        let region = Region::new(
            x_min.round() as i32 + origin.0,
            y_min.round() as i32 + origin.1,
            (x_max - x_min).round().max(0.0) as u32,
            (y_max - y_min).round().max(0.0) as u32,
        );
        region.is_valid().then_some(region)
    }
}

impl HttpVisionBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, AgentError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            template_threshold: config.template_threshold,
        })
    }

    /// Check if server is healthy
    pub fn health_check(&self) -> Result<(), AgentError> {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .send()
            .map_err(|e| AgentError::Backend(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Encode image to base64 PNG
    fn encode_image(image: &Screenshot) -> Result<String, AgentError> {
        let mut buffer = Vec::new();
        image.write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)?;
        Ok(general_purpose::STANDARD.encode(&buffer))
    }

    /// Cut the roi out of the frame, clamped to the frame bounds
    /// Returns the crop and its origin in screen coordinates
    fn crop(image: &Screenshot, roi: Option<&Region>) -> (Screenshot, (i32, i32)) {
        let Some(roi) = roi else {
            return (image.clone(), (0, 0));
        };

        let (width, height) = image.dimensions();
        let x = (roi.x.max(0) as u32).min(width);
        let y = (roi.y.max(0) as u32).min(height);
        // Part of the roi above/left of the frame is cut off
        let w = (roi.x2().max(0) as u32).min(width).saturating_sub(x);
        let h = (roi.y2().max(0) as u32).min(height).saturating_sub(y);

        (image.crop_imm(x, y, w, h), (x as i32, y as i32))
    }

    fn post_boxes<T: Serialize>(&self, path: &str, body: &T) -> Result<Vec<RawBox>, AgentError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| AgentError::Backend(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Backend(format!(
                "Vision server error: {}",
                error_text
            )));
        }

        let data: BoxesResponse = response
            .json()
            .map_err(|e| AgentError::Backend(format!("Failed to parse response: {}", e)))?;

        Ok(data.boxes)
    }

    /// Remove overlapping duplicates, keeping the larger box
    fn filter_overlapping_boxes(boxes: Vec<RawBox>, iou_threshold: f64) -> Vec<RawBox> {
        let mut filtered: Vec<RawBox> = Vec::with_capacity(boxes.len());
        let mut remaining = boxes;

        // Largest first
        remaining.sort_by(|a, b| {
            b.area()
                .partial_cmp(&a.area())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for candidate in remaining {
            if filtered.iter().all(|kept| kept.iou(&candidate) <= iou_threshold) {
                filtered.push(candidate);
            }
        }

        filtered
    }

    /// OCR boxes → hits matching any expected pattern, in reading order
    fn ocr_hits(
        boxes: Vec<RawBox>,
        expected: &[String],
        origin: (i32, i32),
    ) -> Result<Vec<TextHit>, AgentError> {
        let patterns = expected
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| AgentError::Config(format!("invalid expected pattern '{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut hits: Vec<TextHit> = Self::filter_overlapping_boxes(boxes, IOU_THRESHOLD)
            .into_iter()
            .filter(|b| patterns.is_empty() || patterns.iter().any(|re| re.is_match(&b.text)))
            .filter_map(|b| {
                b.to_region(origin).map(|region| TextHit {
                    text: b.text.trim().to_string(),
                    region,
                    score: b.score,
                })
            })
            .collect();

        hits.sort_by_key(|hit| (hit.region.y, hit.region.x));
        Ok(hits)
    }

    /// Template boxes → hits above threshold, best score first
    fn template_hits(boxes: Vec<RawBox>, threshold: f64, origin: (i32, i32)) -> Vec<TemplateHit> {
        let mut hits: Vec<TemplateHit> = Self::filter_overlapping_boxes(boxes, IOU_THRESHOLD)
            .into_iter()
            .filter(|b| b.score >= threshold)
            .filter_map(|b| {
                b.to_region(origin).map(|region| TemplateHit {
                    template: b.template.clone(),
                    region,
                    score: b.score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }
}

impl VisionBackend for HttpVisionBackend {
    fn recognize(
        &self,
        request: &RecognitionRequest,
        image: &Screenshot,
    ) -> Result<RecognitionOutcome, AgentError> {
        let (cropped, origin) = Self::crop(image, request.roi.as_ref());
        if cropped.width() == 0 || cropped.height() == 0 {
            debug!(node = %request.node, "roi outside the frame");
            return Ok(RecognitionOutcome::miss_for(request));
        }
        let image_base64 = Self::encode_image(&cropped)?;

        let outcome = match &request.query {
            RecognitionQuery::Ocr { expected } => {
                let boxes = self.post_boxes("ocr", &OcrRequest { image_base64 })?;
                RecognitionOutcome::ocr(Self::ocr_hits(boxes, expected, origin)?)
            }
            RecognitionQuery::TemplateMatch { templates, .. } => {
                let boxes = self.post_boxes(
                    "template",
                    &TemplateRequest {
                        image_base64,
                        templates,
                    },
                )?;
                RecognitionOutcome::template(Self::template_hits(
                    boxes,
                    self.template_threshold,
                    origin,
                ))
            }
        };

        debug!(
            node = %request.node,
            hits = outcome.hit_count(),
            best = ?outcome.region(),
            "recognition pass"
        );
        Ok(outcome)
    }
}
