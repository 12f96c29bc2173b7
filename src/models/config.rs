use crate::models::catalog::BountyEntry;
use crate::models::region::Region;
use serde::{Deserialize, Serialize};

/// Swipe gesture used to scroll a list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwipeConfig {
    pub from: (i32, i32),
    pub to: (i32, i32),
    pub duration_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            from: (1100, 400),
            to: (350, 400),
            duration_ms: 1000,
        }
    }
}

/// Scan-and-scroll loop timing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub timeout_ms: u64,
    pub interval_ms: u64,
    pub swipe: SwipeConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            interval_ms: 1_000,
            swipe: SwipeConfig::default(),
        }
    }
}

/// Bounty floor lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BountyConfig {
    pub floor_roi: Region,
    /// `{floor}` is replaced by the floor suffix (i, ii, iii, iv)
    pub floor_template: String,
}

impl Default for BountyConfig {
    fn default() -> Self {
        Self {
            floor_roi: Region::new(0, 185, 214, 483),
            floor_template: "stage/bounty-floor-{floor}.png".to_string(),
        }
    }
}

impl BountyConfig {
    pub fn template_for(&self, floor_value: &str) -> String {
        self.floor_template.replace("{floor}", floor_value)
    }
}

/// Wish dungeon board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WishConfig {
    pub ticket_roi: Region,
    pub board_roi: Region,
    pub level_pattern: String,
    /// (dx, dy, dw, dh) applied to the wish-type box to find its level label
    pub level_offset: (i32, i32, i32, i32),
    /// (dx, dy, dw, dh) applied to the wish-type box to find its fulfilled stamp
    pub fulfilled_offset: (i32, i32, i32, i32),
    pub fulfilled_tokens: Vec<String>,
}

impl Default for WishConfig {
    fn default() -> Self {
        Self {
            ticket_roi: Region::new(1131, 116, 67, 41),
            board_roi: Region::new(141, 90, 1101, 598),
            level_pattern: "^.+[0-9]+$".to_string(),
            level_offset: (0, -30, 10, 40),
            fulfilled_offset: (60, -30, 60, 30),
            fulfilled_tokens: vec![
                "Wish".to_string(),
                "Fulfilled".to_string(),
                "filled".to_string(),
            ],
        }
    }
}

/// Shop sold-out check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShopConfig {
    pub sold_out_tokens: Vec<String>,
    /// The sold-out stamp sits above the item name
    pub margin_top: i32,
    pub padding: i32,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            sold_out_tokens: vec![
                "Sold Out".to_string(),
                "sold out".to_string(),
                "sold".to_string(),
                "Sold".to_string(),
            ],
            margin_top: 50,
            padding: 50,
            min_width: 150,
            min_height: 70,
        }
    }
}

impl ShopConfig {
    /// Region searched for the sold-out stamp of an item
    pub fn sold_out_roi(&self, item: &Region) -> Region {
        item.offset(0, -self.margin_top, self.padding, self.padding)
            .with_min_size(self.min_width, self.min_height)
    }
}

/// Rift progress markers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiftConfig {
    pub best_floor_token: String,
    pub claimed_token: String,
    /// Rifts on one board; all claimed means fully cleared
    pub expected_cleared: usize,
}

impl Default for RiftConfig {
    fn default() -> Self {
        Self {
            best_floor_token: "Floor".to_string(),
            claimed_token: "Claimed".to_string(),
            expected_cleared: 5,
        }
    }
}

/// Vision server connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Template hits scoring below this are dropped
    pub template_threshold: f64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:39835".to_string(),
            timeout_secs: 5,
            template_threshold: 0.7,
        }
    }
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console level: trace, debug, info, warn, error
    pub level: String,
    pub json: bool,
    /// Daily DEBUG log files go here when set
    pub log_dir: Option<String>,
    /// Daily log files older than this are removed at startup
    pub retention_days: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_dir: Some("debug/custom".to_string()),
            retention_days: 14,
        }
    }
}

/// Complete agent configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AgentConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub bounty: BountyConfig,
    #[serde(default)]
    pub wish: WishConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub rift: RiftConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Extra or replacement bounty catalog entries
    #[serde(default)]
    pub bounties: Vec<BountyEntry>,
}
