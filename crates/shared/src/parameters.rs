use crate::DesignParameters;

/// Допустимый диапазон значения параметра
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max, step: 1.0 }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Имя числового параметра корпуса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterName {
    Length,
    Width,
    Height,
    WallThickness,
    BaseThickness,
    LidThickness,
}

impl ParameterName {
    pub fn all() -> &'static [ParameterName] {
        &[
            ParameterName::Length,
            ParameterName::Width,
            ParameterName::Height,
            ParameterName::WallThickness,
            ParameterName::BaseThickness,
            ParameterName::LidThickness,
        ]
    }

    /// Разбор имени параметра (как в JSON-полях DesignParameters)
    pub fn parse(name: &str) -> Result<Self, ParameterError> {
        match name {
            "length" => Ok(ParameterName::Length),
            "width" => Ok(ParameterName::Width),
            "height" => Ok(ParameterName::Height),
            "wall_thickness" => Ok(ParameterName::WallThickness),
            "base_thickness" => Ok(ParameterName::BaseThickness),
            "lid_thickness" => Ok(ParameterName::LidThickness),
            other => Err(ParameterError::NotFound(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterName::Length => "length",
            ParameterName::Width => "width",
            ParameterName::Height => "height",
            ParameterName::WallThickness => "wall_thickness",
            ParameterName::BaseThickness => "base_thickness",
            ParameterName::LidThickness => "lid_thickness",
        }
    }

    /// Диапазон значений для элемента управления
    pub fn range(&self) -> ParamRange {
        match self {
            ParameterName::Length | ParameterName::Width => ParamRange::new(1.0, 180.0),
            ParameterName::Height => ParamRange::new(2.0, 180.0),
            ParameterName::WallThickness => ParamRange::new(3.0, 90.0),
            ParameterName::BaseThickness => ParamRange::new(1.0, 180.0),
            ParameterName::LidThickness => ParamRange::new(1.0, 4.0),
        }
    }
}

/// Ошибки при работе с параметрами
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Параметр не найден
    NotFound(String),
    /// Значение вне допустимого диапазона
    OutOfRange {
        name: &'static str,
        value: f64,
        range: ParamRange,
    },
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::NotFound(name) => write!(f, "Parameter '{}' not found", name),
            ParameterError::OutOfRange { name, value, range } => write!(
                f,
                "Parameter '{}' = {} is outside [{}, {}]",
                name, value, range.min, range.max
            ),
        }
    }
}

impl std::error::Error for ParameterError {}

impl DesignParameters {
    /// Прочитать значение параметра по имени
    pub fn get(&self, name: ParameterName) -> f64 {
        match name {
            ParameterName::Length => self.length,
            ParameterName::Width => self.width,
            ParameterName::Height => self.height,
            ParameterName::WallThickness => self.wall_thickness,
            ParameterName::BaseThickness => self.base_thickness,
            ParameterName::LidThickness => self.lid_thickness,
        }
    }

    /// Установить значение с проверкой диапазона; при ошибке параметры не меняются
    pub fn set(&mut self, name: ParameterName, value: f64) -> Result<(), ParameterError> {
        let range = name.range();
        if !range.contains(value) {
            return Err(ParameterError::OutOfRange {
                name: name.as_str(),
                value,
                range,
            });
        }
        let slot = match name {
            ParameterName::Length => &mut self.length,
            ParameterName::Width => &mut self.width,
            ParameterName::Height => &mut self.height,
            ParameterName::WallThickness => &mut self.wall_thickness,
            ParameterName::BaseThickness => &mut self.base_thickness,
            ParameterName::LidThickness => &mut self.lid_thickness,
        };
        *slot = value;
        Ok(())
    }
}
