use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported standard color: '{0}'")]
pub struct ParseColorError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid temperature representation: '{0}'")]
pub struct ParseTemperatureError(String);

/// Display color of a particle type.
///
/// Particle-set files store the color by name; names are matched
/// case-insensitively and always written back upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardColor {
    Black,
    Blue,
    Brown,
    Cyan,
    DarkGray,
    Gold,
    Gray,
    Green,
    LightGray,
    Lime,
    Magenta,
    Maroon,
    Navy,
    Olive,
    Orange,
    Pink,
    Purple,
    Red,
    Silver,
    Teal,
    Turquoise,
    Violet,
    White,
    Yellow,
}

impl StandardColor {
    pub const ALL: [StandardColor; 24] = [
        StandardColor::Black,
        StandardColor::Blue,
        StandardColor::Brown,
        StandardColor::Cyan,
        StandardColor::DarkGray,
        StandardColor::Gold,
        StandardColor::Gray,
        StandardColor::Green,
        StandardColor::LightGray,
        StandardColor::Lime,
        StandardColor::Magenta,
        StandardColor::Maroon,
        StandardColor::Navy,
        StandardColor::Olive,
        StandardColor::Orange,
        StandardColor::Pink,
        StandardColor::Purple,
        StandardColor::Red,
        StandardColor::Silver,
        StandardColor::Teal,
        StandardColor::Turquoise,
        StandardColor::Violet,
        StandardColor::White,
        StandardColor::Yellow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StandardColor::Black => "BLACK",
            StandardColor::Blue => "BLUE",
            StandardColor::Brown => "BROWN",
            StandardColor::Cyan => "CYAN",
            StandardColor::DarkGray => "DARK_GRAY",
            StandardColor::Gold => "GOLD",
            StandardColor::Gray => "GRAY",
            StandardColor::Green => "GREEN",
            StandardColor::LightGray => "LIGHT_GRAY",
            StandardColor::Lime => "LIME",
            StandardColor::Magenta => "MAGENTA",
            StandardColor::Maroon => "MAROON",
            StandardColor::Navy => "NAVY",
            StandardColor::Olive => "OLIVE",
            StandardColor::Orange => "ORANGE",
            StandardColor::Pink => "PINK",
            StandardColor::Purple => "PURPLE",
            StandardColor::Red => "RED",
            StandardColor::Silver => "SILVER",
            StandardColor::Teal => "TEAL",
            StandardColor::Turquoise => "TURQUOISE",
            StandardColor::Violet => "VIOLET",
            StandardColor::White => "WHITE",
            StandardColor::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for StandardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StandardColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        StandardColor::ALL
            .iter()
            .copied()
            .find(|c| c.name() == upper)
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// Simulation temperature, held as its fixed two-decimal representation.
///
/// Equality and hashing use the formatted text, so `"300"`, `"300.0"` and
/// `"300.001"` all address the same interaction column. Ordering is numeric.
#[derive(Debug, Clone)]
pub struct Temperature {
    text: String,
    value: f64,
}

impl Temperature {
    pub const DECIMALS: usize = 2;

    pub fn parse(representation: &str) -> Result<Self, ParseTemperatureError> {
        let value = representation
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseTemperatureError(representation.to_string()))?;
        let text = format!("{:.*}", Self::DECIMALS, value);
        let value = text
            .parse::<f64>()
            .map_err(|_| ParseTemperatureError(representation.to_string()))?;
        Ok(Self { text, value })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl PartialEq for Temperature {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Temperature {}

impl std::hash::Hash for Temperature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Temperature {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Temperature {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Temperature {
    type Err = ParseTemperatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Order-independent key for a particle pair.
///
/// Both codes are trimmed and upper-cased, then sorted, so `(A, B)` and
/// `(B, A)` always address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let a = a.trim().to_ascii_uppercase();
        let b = b.trim().to_ascii_uppercase();
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn involves(&self, code: &str) -> bool {
        let code = code.trim().to_ascii_uppercase();
        self.first == code || self.second == code
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn color_from_str_is_case_insensitive() {
        assert_eq!(StandardColor::from_str("red").unwrap(), StandardColor::Red);
        assert_eq!(
            StandardColor::from_str("Light_Gray").unwrap(),
            StandardColor::LightGray
        );
        assert_eq!(StandardColor::Cyan.to_string(), "CYAN");
    }

    #[test]
    fn color_from_str_invalid() {
        let err = StandardColor::from_str("ultraviolet").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid or unsupported standard color: 'ultraviolet'"
        );
    }

    #[test]
    fn temperature_formats_to_two_decimals() {
        assert_eq!(Temperature::parse("300").unwrap().as_str(), "300.00");
        assert_eq!(Temperature::parse(" 298.5 ").unwrap().as_str(), "298.50");
        assert_eq!(
            Temperature::parse("300.001").unwrap(),
            Temperature::parse("300").unwrap()
        );
    }

    #[test]
    fn temperature_rejects_garbage() {
        assert!(Temperature::parse("warm").is_err());
        assert!(Temperature::parse("").is_err());
        assert!(Temperature::parse("NaN").is_err());
    }

    #[test]
    fn temperature_orders_numerically() {
        let mut temps: Vec<Temperature> = ["1000", "300", "95.5"]
            .iter()
            .map(|t| Temperature::parse(t).unwrap())
            .collect();
        temps.sort();
        let texts: Vec<&str> = temps.iter().map(|t| t.as_str()).collect();
        assert_eq!(texts, vec!["95.50", "300.00", "1000.00"]);
    }

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(PairKey::new("H2O", "OIL"), PairKey::new("OIL", "H2O"));
        assert_eq!(PairKey::new(" h2o", "OIL ").to_string(), "H2O_OIL");

        let set: HashSet<PairKey> = [PairKey::new("A", "B"), PairKey::new("B", "A")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn pair_key_involves_matches_whole_codes_only() {
        let key = PairKey::new("OIL2", "H2O");
        assert!(key.involves("oil2"));
        assert!(key.involves("H2O"));
        assert!(!key.involves("OIL"));
    }
}
