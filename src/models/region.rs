use serde::{Deserialize, Serialize};

/// Axis-aligned screen rectangle, in screenshot pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a region from the `[x, y, w, h]` array form used by pipeline params
    pub fn from_array(values: &[i64]) -> Result<Self, String> {
        let [x, y, width, height] = values else {
            return Err(format!("roi needs 4 values, got {}", values.len()));
        };
        if *width < 0 || *height < 0 {
            return Err(format!("roi size must be non-negative: {:?}", values));
        }
        let out_of_range = || format!("roi out of range: {:?}", values);

        Ok(Self {
            x: i32::try_from(*x).map_err(|_| out_of_range())?,
            y: i32::try_from(*y).map_err(|_| out_of_range())?,
            width: u32::try_from(*width).map_err(|_| out_of_range())?,
            height: u32::try_from(*height).map_err(|_| out_of_range())?,
        })
    }

    /// A zero-sized region never came from a real match
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn x2(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn y2(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Click target for this region
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Shift the origin and grow (or shrink) the size; size never goes below zero
    pub fn offset(&self, dx: i32, dy: i32, dw: i32, dh: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width as i64 + dw as i64).max(0) as u32,
            height: (self.height as i64 + dh as i64).max(0) as u32,
        }
    }

    pub fn with_min_size(&self, min_width: u32, min_height: u32) -> Self {
        Self {
            width: self.width.max(min_width),
            height: self.height.max(min_height),
            ..*self
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_array() {
        let region = Region::from_array(&[0, 185, 214, 483]).unwrap();
        assert_eq!(region, Region::new(0, 185, 214, 483));
    }

    #[test]
    fn test_region_from_array_invalid() {
        assert!(Region::from_array(&[1, 2, 3]).is_err());
        assert!(Region::from_array(&[1, 2, -3, 4]).is_err());
    }

    #[test]
    fn test_region_from_array_out_of_range() {
        let too_wide = Region::from_array(&[0, 0, u32::MAX as i64 + 1, 10]).unwrap_err();
        assert!(too_wide.starts_with("roi out of range"));
        assert!(Region::from_array(&[i32::MAX as i64 + 1, 0, 10, 10]).is_err());
        assert!(Region::from_array(&[0, i32::MIN as i64 - 1, 10, 10]).is_err());

        let edge = Region::from_array(&[i32::MIN as i64, 0, u32::MAX as i64, 1]).unwrap();
        assert_eq!(edge.width, u32::MAX);
    }

    #[test]
    fn test_region_center() {
        let region = Region::new(100, 200, 50, 21);
        assert_eq!(region.center(), (125, 210));
    }

    #[test]
    fn test_region_offset_expands_above_and_sideways() {
        // Level label sits above the wish-type text
        let anchor = Region::new(400, 300, 80, 20);
        let level_roi = anchor.offset(0, -30, 10, 40);
        assert_eq!(level_roi, Region::new(400, 270, 90, 60));
    }

    #[test]
    fn test_region_offset_never_negative_size() {
        let region = Region::new(10, 10, 5, 5);
        let shrunk = region.offset(0, 0, -20, -20);
        assert_eq!(shrunk.width, 0);
        assert_eq!(shrunk.height, 0);
        assert!(!shrunk.is_valid());
    }

    #[test]
    fn test_region_with_min_size() {
        let small = Region::new(10, 10, 40, 20).with_min_size(150, 70);
        assert_eq!(small, Region::new(10, 10, 150, 70));

        let large = Region::new(10, 10, 300, 90).with_min_size(150, 70);
        assert_eq!(large, Region::new(10, 10, 300, 90));
    }

    #[test]
    fn test_region_serialization() {
        let region = Region::new(100, 200, 300, 400);
        let json = serde_json::to_string(&region).unwrap();
        let deserialized: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(region, deserialized);
    }
}
