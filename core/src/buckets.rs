//! Landing classification: maps a ball's x-position to a bucket multiplier.

/// One scoring slot at the bottom of the board, covering `[min_x, max_x)`.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketZone {
    pub min_x: f32,
    pub max_x: f32,
    pub multiplier: u32,
}

impl BucketZone {
    pub const fn new(min_x: f32, max_x: f32, multiplier: u32) -> Self {
        Self {
            min_x,
            max_x,
            multiplier,
        }
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x < self.max_x
    }
}

/// Validated set of disjoint bucket zones.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketZones {
    zones: Vec<BucketZone>,
}

impl BucketZones {
    pub fn new(zones: Vec<BucketZone>) -> Result<Self, String> {
        for (i, zone) in zones.iter().enumerate() {
            if !zone.min_x.is_finite() || !zone.max_x.is_finite() || zone.min_x >= zone.max_x {
                return Err(format!("bucket zone {} must have finite min < max", i));
            }
            if !(1..=5).contains(&zone.multiplier) {
                return Err(format!("bucket zone {} multiplier must be in 1..=5", i));
            }
            for (j, other) in zones.iter().enumerate().skip(i + 1) {
                if zone.min_x < other.max_x && other.min_x < zone.max_x {
                    return Err(format!("bucket zones {} and {} overlap", i, j));
                }
            }
        }
        Ok(Self { zones })
    }

    /// Zone index and multiplier for a landing position, if any zone covers it.
    pub fn classify(&self, x: f32) -> Option<(usize, u32)> {
        self.zones
            .iter()
            .enumerate()
            .find(|(_, zone)| zone.contains(x))
            .map(|(i, zone)| (i, zone.multiplier))
    }

    /// Multiplier for a landing position, 0 outside every zone.
    pub fn multiplier_at(&self, x: f32) -> u32 {
        self.classify(x).map_or(0, |(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
