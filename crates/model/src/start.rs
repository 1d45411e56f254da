use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An area in which members of an allyteam may choose their start positions.
///
/// Values are on a fixed 0-200 axis regardless of map size: on a 1000x500
/// map, `x = 100` is map x 500 and `y = 100` is map y 250.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StartBox {
    /// Upper-left x.
    pub x: i32,
    /// Upper-left y.
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl StartBox {
    /// Full extent of the start-box axis.
    pub const SCALE: i32 = 200;

    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        StartBox {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Inside the `0..=SCALE` square with non-negative extent.
    pub fn is_within_scale(&self) -> bool {
        let axis = 0..=Self::SCALE;
        self.width >= 0
            && self.height >= 0
            && axis.contains(&self.x)
            && axis.contains(&self.y)
            && axis.contains(&self.right())
            && axis.contains(&self.bottom())
    }
}

/// A position in map units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub z: i32,
}

impl Coordinate {
    pub fn new(x: i32, z: i32) -> Self {
        Coordinate { x, z }
    }
}

/// How teams are assigned start positions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartConfig {
    /// Map-defined start points, in the order teams are given to the map.
    Fixed,
    /// Map-defined start points, shuffled.
    Random,
    /// Players pick a location in-game within their allyteam's box, keyed by
    /// allyteam script ID. An allyteam without a box may start anywhere.
    ChooseInGame {
        #[serde(with = "by_script_id")]
        start_boxes: BTreeMap<usize, StartBox>,
    },
    /// Positions fixed before the game, keyed by team script ID.
    ChooseBeforeGame {
        #[serde(with = "by_script_id")]
        start_positions: BTreeMap<usize, Coordinate>,
    },
    /// The script did not say.
    #[default]
    Unspecified,
}

impl StartConfig {
    /// The engine's `startpostype` value, if any.
    pub fn start_pos_type(&self) -> Option<i64> {
        match self {
            StartConfig::Fixed => Some(0),
            StartConfig::Random => Some(1),
            StartConfig::ChooseInGame { .. } => Some(2),
            StartConfig::ChooseBeforeGame { .. } => Some(3),
            StartConfig::Unspecified => None,
        }
    }
}

/// Maps keyed by script ID travel as `[[id, value], ...]`. Inside an
/// internally tagged enum, string object keys cannot be read back as numbers.
mod by_script_id {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<V, S>(map: &BTreeMap<usize, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map)
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<BTreeMap<usize, V>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(usize, V)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_box_edges() {
        let b = StartBox::new(50, 20, 30, 100);
        assert_eq!(b.right(), 80);
        assert_eq!(b.bottom(), 120);
        assert!(b.is_within_scale());
    }

    #[test]
    fn extreme_edges_saturate_and_fall_outside_the_axis() {
        let b = StartBox::new(i32::MAX, 0, 10, 10);
        assert_eq!(b.right(), i32::MAX);
        assert!(!b.is_within_scale());
        assert_eq!(StartBox::new(0, i32::MIN, 0, -10).bottom(), i32::MIN);
        assert!(!StartBox::new(150, 0, 60, 10).is_within_scale());
        assert!(!StartBox::new(10, 10, -5, 10).is_within_scale());
        assert!(StartBox::new(0, 0, 200, 200).is_within_scale());
    }

    #[test]
    fn keyed_maps_survive_json_inside_tagged_enum() {
        let config = StartConfig::ChooseInGame {
            start_boxes: [(0, StartBox::new(0, 0, 200, 50)), (3, StartBox::new(0, 150, 200, 50))]
                .into(),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["kind"], "choose_in_game");
        assert_eq!(json["start_boxes"][1][0], 3);
        let back: StartConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);

        let config = StartConfig::ChooseBeforeGame {
            start_positions: [(1, Coordinate::new(100, 200))].into(),
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<StartConfig>(&text).unwrap(), config);
    }

    #[test]
    fn start_pos_type_values() {
        assert_eq!(StartConfig::Fixed.start_pos_type(), Some(0));
        assert_eq!(StartConfig::Random.start_pos_type(), Some(1));
        assert_eq!(
            StartConfig::ChooseInGame {
                start_boxes: BTreeMap::new()
            }
            .start_pos_type(),
            Some(2)
        );
        assert_eq!(
            StartConfig::ChooseBeforeGame {
                start_positions: BTreeMap::new()
            }
            .start_pos_type(),
            Some(3)
        );
        assert_eq!(StartConfig::Unspecified.start_pos_type(), None);
    }
}
