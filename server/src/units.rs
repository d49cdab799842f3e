use async_graphql::Enum;

const CENTIMETRES_PER_FOOT: f64 = 30.48;
const KILOGRAMS_PER_POUND: f64 = 0.45359237;

/// Unit a height is reported in
#[derive(Enum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HeightUnit {
    /// Metres
    Metre,
    /// Centimetres
    #[default]
    Centimetre,
    /// Feet (1 ft = 30.48 cm)
    Foot,
}

impl HeightUnit {
    pub fn convert(self, centimetres: f64) -> f64 {
        match self {
            HeightUnit::Metre => centimetres / 100.0,
            HeightUnit::Centimetre => centimetres,
            HeightUnit::Foot => centimetres / CENTIMETRES_PER_FOOT,
        }
    }
}

/// Unit a weight is reported in
#[derive(Enum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WeightUnit {
    /// Kilograms
    #[default]
    Kilogram,
    /// Grams
    Gram,
    /// Pounds (1 lb = 0.45359237 kg)
    Pound,
}

impl WeightUnit {
    pub fn convert(self, kilograms: f64) -> f64 {
        match self {
            WeightUnit::Kilogram => kilograms,
            WeightUnit::Gram => kilograms * 1000.0,
            WeightUnit::Pound => kilograms / KILOGRAMS_PER_POUND,
        }
    }
}
