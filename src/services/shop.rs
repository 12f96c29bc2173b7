use crate::error::AgentError;
use crate::models::config::ShopConfig;
use crate::models::recognition::{AnalyzeResult, RecognitionRequest};
use crate::models::region::Region;
use crate::services::vision::parser::{sub_node, unquote};
use crate::services::vision::{PipelineOverride, Screenshot, VisionBackend};
use tracing::info;

pub const ITEM_NOT_AVAILABLE: &str = "Item not available";
pub const ITEM_SOLD_OUT: &str = "Item sold out";
pub const ITEM_AVAILABLE: &str = "Item available";

/// Shop item availability: present on screen and not stamped sold out
pub struct ShopChecker<'a> {
    vision: &'a dyn VisionBackend,
    pipeline: &'a dyn PipelineOverride,
    config: &'a ShopConfig,
}

impl<'a> ShopChecker<'a> {
    pub fn new(
        vision: &'a dyn VisionBackend,
        pipeline: &'a dyn PipelineOverride,
        config: &'a ShopConfig,
    ) -> Self {
        Self {
            vision,
            pipeline,
            config,
        }
    }

    /// Check one item. The sold-out stamp is looked for in `sold_out_roi`
    /// when given, otherwise in a box grown from the item's own box.
    /// A sold-out item switches the `prefix` node off.
    pub fn check(
        &self,
        prefix: &str,
        param: &str,
        sold_out_roi: Option<Region>,
        image: &Screenshot,
    ) -> Result<AnalyzeResult, AgentError> {
        let item = unquote(param.trim());
        if item.is_empty() {
            return Err(AgentError::MalformedParam("shop item name is empty".to_string()));
        }

        let item_node = sub_node(prefix, item);
        let request = RecognitionRequest::ocr(item_node.clone(), None, vec![item.to_string()]);
        let Some(item_box) = self.vision.recognize(&request, image)?.region() else {
            info!(item, "item not found");
            return Ok(AnalyzeResult::miss(ITEM_NOT_AVAILABLE));
        };

        let roi = sold_out_roi.unwrap_or_else(|| self.config.sold_out_roi(&item_box));
        let stamp = RecognitionRequest::ocr(
            sub_node(&item_node, "SoldOut"),
            Some(roi),
            self.config.sold_out_tokens.clone(),
        );
        if self.vision.recognize(&stamp, image)?.is_hit() {
            info!(item, "item is sold out, disabling {}", prefix);
            self.pipeline.override_node(prefix, false)?;
            return Ok(AnalyzeResult::miss(ITEM_SOLD_OUT));
        }

        info!(item, region = %item_box, "item available for purchase");
        Ok(AnalyzeResult::hit(item_box, ITEM_AVAILABLE))
    }
}
