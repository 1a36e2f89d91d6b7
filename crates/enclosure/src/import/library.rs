//! Built-in component layout table.
//!
//! Each library component is a set of STL assets. Every asset gets a fixed kind
//! and a local rotation in degrees; some components also rotate the whole group.

use std::path::PathBuf;

use shared::{ComponentKind, Transform, VolumeKind};

/// One asset of a component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartSpec {
    pub file: &'static str,
    pub name: &'static str,
    pub kind: VolumeKind,
    pub rotation: [f64; 3],
    /// Mounting boss stretched to the facing wall.
    pub attached: bool,
}

impl PartSpec {
    const fn new(file: &'static str, name: &'static str, kind: VolumeKind, rotation: [f64; 3]) -> Self {
        Self {
            file,
            name,
            kind,
            rotation,
            attached: false,
        }
    }

    const fn boss(file: &'static str, name: &'static str, rotation: [f64; 3]) -> Self {
        Self {
            file,
            name,
            kind: VolumeKind::AddExtra,
            rotation,
            attached: true,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::new().with_rotation(self.rotation[0], self.rotation[1], self.rotation[2])
    }
}

/// Asset layout of one library component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentLayout {
    pub kind: ComponentKind,
    /// Asset folder below the library root
    pub folder: &'static str,
    pub parts: &'static [PartSpec],
    pub group_rotation: [f64; 3],
}

impl ComponentLayout {
    pub fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    pub fn asset_path(&self, part: &PartSpec) -> PathBuf {
        PathBuf::from(self.folder).join(part.file)
    }

    pub fn group_transform(&self) -> Transform {
        let [rx, ry, rz] = self.group_rotation;
        Transform::new().with_rotation(rx, ry, rz)
    }
}

const FLAT: [f64; 3] = [-90.0, 0.0, 0.0];
const UPRIGHT: [f64; 3] = [0.0, 90.0, 0.0];
const FACING_WALL: [f64; 3] = [0.0, -90.0, 90.0];

const ARDUINO_UNO: &[PartSpec] = &[
    PartSpec::new("arduino.stl", "Arduino Uno", VolumeKind::Decor, FLAT),
    PartSpec::new("arduinoICSP1.stl", "ICSP1", VolumeKind::SubtractExtra, FLAT),
    PartSpec::new("arduinoICSP2.stl", "ICSP2", VolumeKind::SubtractExtra, FLAT),
    PartSpec::new("arduinoPinsAnalog.stl", "Analog pins", VolumeKind::SubtractExtra, FLAT),
    PartSpec::new("arduinoPinsDigital.stl", "Digital pins", VolumeKind::SubtractExtra, FLAT),
    PartSpec::new("arduinoStromversorgung.stl", "Power jack", VolumeKind::SubtractExtra, FLAT),
    PartSpec::new("arduinoUSB.stl", "USB", VolumeKind::SubtractExtra, FLAT),
    PartSpec::boss("arduinoLoch.stl", "Mounting boss", FLAT),
];

const ESP32: &[PartSpec] = &[
    PartSpec::new("esp32.stl", "ESP32", VolumeKind::Decor, UPRIGHT),
    PartSpec::new("esp32Anschluss.stl", "USB", VolumeKind::SubtractExtra, UPRIGHT),
    PartSpec::new("esp32Pins.stl", "Pins", VolumeKind::SubtractExtra, UPRIGHT),
    PartSpec::boss("esp32Loch.stl", "Mounting boss", UPRIGHT),
];

const LED_RGB: &[PartSpec] = &[
    PartSpec::new("led_rgb.stl", "LED RGB", VolumeKind::Decor, UPRIGHT),
    PartSpec::new("led_rgb_bool.stl", "LED", VolumeKind::SubtractExtra, [0.0, 180.0, 0.0]),
];

const LCD_I2C_16X2: &[PartSpec] = &[
    PartSpec::new("lcd.stl", "LCD I2C 16x2", VolumeKind::Decor, UPRIGHT),
    PartSpec::new("lcd_bool_anschluss.stl", "Connector", VolumeKind::SubtractExtra, UPRIGHT),
    PartSpec::new("lcd_bool_body.stl", "Screen", VolumeKind::SubtractExtra, UPRIGHT),
    PartSpec::new("lcd_bool_loch.stl", "Holes", VolumeKind::SubtractExtra, UPRIGHT),
];

/// Layout of a library component; `None` for the asset-less additional cube.
pub fn layout(kind: ComponentKind) -> Option<ComponentLayout> {
    let (folder, parts, group_rotation) = match kind {
        ComponentKind::ArduinoUno => ("Arduino_Uno", ARDUINO_UNO, [0.0; 3]),
        ComponentKind::Esp32 => ("ESP32_No_Hole", ESP32, FACING_WALL),
        ComponentKind::LedRgb => ("LED_rgb", LED_RGB, FACING_WALL),
        ComponentKind::LcdI2c16x2 => ("LCD_I2C_16x2", LCD_I2C_16X2, [0.0; 3]),
        ComponentKind::AdditionalCube => return None,
    };
    Some(ComponentLayout {
        kind,
        folder,
        parts,
        group_rotation,
    })
}
