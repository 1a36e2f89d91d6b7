//! Design parameter store with bounded setters

use shared::{DesignParameters, ParameterError, ParameterName, ScrewClass, ScrewWarning};

use crate::error::Result;

/// Holds the enclosure's scalar parameters and screw selection.
///
/// Every setter enforces the documented control range. The cavity invariant is
/// checked later, when the enclosure is derived.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: DesignParameters,
    version: u64,
}

impl ParameterStore {
    pub fn new(params: DesignParameters) -> Self {
        Self { params, version: 0 }
    }

    pub fn params(&self) -> &DesignParameters {
        &self.params
    }

    /// Incremented on every accepted change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set a parameter by field name, e.g. `"wall_thickness"`.
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        let name = ParameterName::parse(name)?;
        self.set_named(name, value)
    }

    pub fn set_named(&mut self, name: ParameterName, value: f64) -> Result<()> {
        self.params.set(name, value)?;
        self.version += 1;
        tracing::debug!("{} = {}", name.as_str(), value);
        Ok(())
    }

    pub fn set_length(&mut self, value: f64) -> Result<()> {
        self.set_named(ParameterName::Length, value)
    }

    pub fn set_width(&mut self, value: f64) -> Result<()> {
        self.set_named(ParameterName::Width, value)
    }

    pub fn set_height(&mut self, value: f64) -> Result<()> {
        self.set_named(ParameterName::Height, value)
    }

    pub fn set_wall_thickness(&mut self, value: f64) -> Result<()> {
        self.set_named(ParameterName::WallThickness, value)
    }

    pub fn set_base_thickness(&mut self, value: f64) -> Result<()> {
        self.set_named(ParameterName::BaseThickness, value)
    }

    pub fn set_lid_thickness(&mut self, value: f64) -> Result<()> {
        self.set_named(ParameterName::LidThickness, value)
    }

    pub fn set_screw(&mut self, screw: ScrewClass) {
        if self.params.screw != screw {
            self.params.screw = screw;
            self.version += 1;
        }
    }

    /// Replace all parameters at once. Each value must be within its range.
    pub fn replace(&mut self, params: DesignParameters) -> Result<()> {
        for name in ParameterName::all() {
            let value = params.get(*name);
            let range = name.range();
            if !range.contains(value) {
                return Err(ParameterError::OutOfRange {
                    name: name.as_str(),
                    value,
                    range,
                }
                .into());
            }
        }
        self.params = params;
        self.version += 1;
        Ok(())
    }

    pub fn screw_warning(&self) -> Option<ScrewWarning> {
        self.params.screw_warning()
    }
}
