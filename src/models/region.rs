//! Closed enumerations carried by records.

use serde::{Deserialize, Serialize};

/// Administrative district of the city, plus the online and "all regions" markers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Region {
    #[serde(rename = "ЦАО")]
    Central,
    #[serde(rename = "САО")]
    North,
    #[serde(rename = "СВАО")]
    NorthEast,
    #[serde(rename = "ВАО")]
    East,
    #[serde(rename = "ЮВАО")]
    SouthEast,
    #[serde(rename = "ЮАО")]
    South,
    #[serde(rename = "ЮЗАО")]
    SouthWest,
    #[serde(rename = "ЗАО")]
    West,
    #[serde(rename = "СЗАО")]
    NorthWest,
    #[serde(rename = "ЗелАО")]
    Zelenograd,
    #[serde(rename = "Онлайн")]
    Online,
    /// Sentinel meaning "available everywhere". Valid for help offers only.
    #[serde(rename = "Все районы")]
    AllRegions,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Central => "ЦАО",
            Region::North => "САО",
            Region::NorthEast => "СВАО",
            Region::East => "ВАО",
            Region::SouthEast => "ЮВАО",
            Region::South => "ЮАО",
            Region::SouthWest => "ЮЗАО",
            Region::West => "ЗАО",
            Region::NorthWest => "СЗАО",
            Region::Zelenograd => "ЗелАО",
            Region::Online => "Онлайн",
            Region::AllRegions => "Все районы",
        }
    }

    pub fn parse_wire(s: &str) -> Option<Self> {
        match s {
            "ЦАО" => Some(Region::Central),
            "САО" => Some(Region::North),
            "СВАО" => Some(Region::NorthEast),
            "ВАО" => Some(Region::East),
            "ЮВАО" => Some(Region::SouthEast),
            "ЮАО" => Some(Region::South),
            "ЮЗАО" => Some(Region::SouthWest),
            "ЗАО" => Some(Region::West),
            "СЗАО" => Some(Region::NorthWest),
            "ЗелАО" => Some(Region::Zelenograd),
            "Онлайн" => Some(Region::Online),
            "Все районы" => Some(Region::AllRegions),
            _ => None,
        }
    }
}

/// How accessible an event venue is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Accessibility {
    #[default]
    #[serde(rename = "Полная (100%)")]
    Full,
    #[serde(rename = "Частичная")]
    Partial,
    #[serde(rename = "С помощью")]
    Assisted,
    #[serde(rename = "Не доступно")]
    NotAccessible,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EventCategory {
    #[serde(rename = "Активный досуг")]
    Active,
    #[serde(rename = "Образование")]
    Education,
    #[serde(rename = "Культура")]
    Culture,
    #[default]
    #[serde(rename = "Встречи/Общение")]
    Social,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HelpCategory {
    #[default]
    #[serde(rename = "Сопровождение")]
    Accompaniment,
    #[serde(rename = "Бытовая помощь")]
    HomeAndTech,
    #[serde(rename = "Права и документы")]
    Legal,
    #[serde(rename = "Психология")]
    Psychology,
}
