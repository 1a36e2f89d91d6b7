use serde::{Deserialize, Serialize};

pub mod parameters;

pub use parameters::{ParamRange, ParameterError, ParameterName};

/// Уникальный идентификатор объёма (тела) в сцене
pub type VolumeId = String;

/// Уникальный идентификатор группы компонентов
pub type GroupId = String;

/// Трансформация объекта: позиция, поворот (градусы, порядок XYZ), масштаб
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
            ..Self::new()
        }
    }

    pub fn with_rotation(mut self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rotation = [rx, ry, rz];
        self
    }

    pub fn with_scale(mut self, sx: f64, sy: f64, sz: f64) -> Self {
        self.scale = [sx, sy, sz];
        self
    }

    pub fn is_identity(&self) -> bool {
        self.position == [0.0; 3] && self.rotation == [0.0; 3] && self.scale == [1.0; 3]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Класс винта крышки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScrewClass {
    M2,
    #[default]
    M3,
    M4,
}

impl ScrewClass {
    /// Радиус отверстия под винт, мм
    pub fn radius(&self) -> f64 {
        match self {
            ScrewClass::M2 => 1.25,
            ScrewClass::M3 => 1.65,
            ScrewClass::M4 => 2.1,
        }
    }

    pub fn all() -> &'static [ScrewClass] {
        &[ScrewClass::M2, ScrewClass::M3, ScrewClass::M4]
    }
}

impl std::fmt::Display for ScrewClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrewClass::M2 => write!(f, "M2"),
            ScrewClass::M3 => write!(f, "M3"),
            ScrewClass::M4 => write!(f, "M4"),
        }
    }
}

/// Параметры корпуса (все размеры в мм)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParameters {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub wall_thickness: f64,
    pub base_thickness: f64,
    pub lid_thickness: f64,
    #[serde(default)]
    pub screw: ScrewClass,
}

impl Default for DesignParameters {
    fn default() -> Self {
        Self {
            length: 100.0,
            width: 100.0,
            height: 100.0,
            wall_thickness: 4.0,
            base_thickness: 3.0,
            lid_thickness: 1.0,
            screw: ScrewClass::M3,
        }
    }
}

impl DesignParameters {
    /// Внутренняя длина полости (может быть неположительной для неверных параметров)
    pub fn cavity_length(&self) -> f64 {
        self.length - 2.0 * self.wall_thickness
    }

    /// Внутренняя ширина полости
    pub fn cavity_width(&self) -> f64 {
        self.width - 2.0 * self.wall_thickness
    }

    /// Предупреждение: винт слишком толстый для выбранной толщины стенки
    pub fn screw_warning(&self) -> Option<ScrewWarning> {
        let thin_wall = self.wall_thickness < 4.0 && self.screw != ScrewClass::M2;
        let reference_wall = self.wall_thickness == 4.0 && self.screw == ScrewClass::M4;
        if thin_wall || reference_wall {
            Some(ScrewWarning {
                screw: self.screw,
                wall_thickness: self.wall_thickness,
            })
        } else {
            None
        }
    }
}

/// Винт не помещается в стенку заданной толщины
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrewWarning {
    pub screw: ScrewClass,
    pub wall_thickness: f64,
}

impl std::fmt::Display for ScrewWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "screw {} is too thick for a {} mm wall",
            self.screw, self.wall_thickness
        )
    }
}

/// Роль объёма в сборке корпуса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeKind {
    Shell,
    Cavity,
    Lid,
    ScrewPost,
    SubtractExtra,
    AddExtra,
    /// Декоративная модель компонента, не участвует в CSG
    Decor,
}

impl VolumeKind {
    /// CSG-операция, которой объём участвует в экспорте
    pub fn boolean_role(&self) -> Option<BooleanOp> {
        match self {
            VolumeKind::ScrewPost | VolumeKind::SubtractExtra => Some(BooleanOp::Difference),
            VolumeKind::AddExtra => Some(BooleanOp::Union),
            _ => None,
        }
    }
}

/// Тип CSG-операции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    Union,
    Difference,
}

/// Компонент из встроенной библиотеки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    ArduinoUno,
    Esp32,
    LedRgb,
    LcdI2c16x2,
    /// Дополнительный куб без внешней модели
    AdditionalCube,
}

impl ComponentKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::ArduinoUno => "Arduino Uno",
            ComponentKind::Esp32 => "ESP32",
            ComponentKind::LedRgb => "LED RGB",
            ComponentKind::LcdI2c16x2 => "LCD I2C 16x2",
            ComponentKind::AdditionalCube => "Additional geometry cube",
        }
    }

    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::ArduinoUno,
            ComponentKind::Esp32,
            ComponentKind::LedRgb,
            ComponentKind::LcdI2c16x2,
            ComponentKind::AdditionalCube,
        ]
    }
}

/// Формат STL-файла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Запись манифеста: положение компонента или итоговые параметры корпуса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    Component(ComponentPlacement),
    Enclosure(EnclosureRecord),
}

/// Положение группы компонентов в сцене
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentPlacement {
    pub name: String,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
}

/// Итоговые размеры корпуса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnclosureRecord {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub wall_thickness: f64,
    pub lid_thickness: f64,
}

impl From<&DesignParameters> for EnclosureRecord {
    fn from(params: &DesignParameters) -> Self {
        Self {
            length: params.length,
            width: params.width,
            height: params.height,
            wall_thickness: params.wall_thickness,
            lid_thickness: params.lid_thickness,
        }
    }
}
