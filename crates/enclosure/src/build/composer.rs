//! Boolean composition of the enclosure with registry volumes.
//!
//! The live preview only subtracts the cavity from the shell. Screw posts and
//! component volumes are folded in at export time, in registry order.

use shared::Transform;

use super::primitives::build_world_part;
use super::solid::Solid;
use crate::error::Result;
use crate::geometry::Volume;

/// A registry volume ready for composition, with its group transform.
#[derive(Debug, Clone, Copy)]
pub struct Operand<'a> {
    pub volume: &'a Volume,
    pub parent: Option<&'a Transform>,
}

impl<'a> Operand<'a> {
    pub fn new(volume: &'a Volume, parent: Option<&'a Transform>) -> Self {
        Self { volume, parent }
    }

    pub fn standalone(volume: &'a Volume) -> Self {
        Self::new(volume, None)
    }
}

/// Evaluates preview and export solids.
#[derive(Debug, Default)]
pub struct BooleanComposer {
    preview_evaluations: u64,
}

impl BooleanComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful preview evaluations so far
    pub fn preview_evaluations(&self) -> u64 {
        self.preview_evaluations
    }

    /// Shell minus cavity. Hides both sources once the result exists.
    pub fn preview_tick(&mut self, shell: &mut Volume, cavity: &mut Volume) -> Result<Solid> {
        let shell_part = build_world_part(shell, None)?;
        let cavity_part = build_world_part(cavity, None)?;
        let solid = Solid::checked("preview", shell_part.difference(&cavity_part), &cavity.name)?;

        shell.visible = false;
        cavity.visible = false;
        self.preview_evaluations += 1;
        Ok(solid)
    }

    /// Preview with every add member unioned, then every subtract member removed.
    pub fn export_enclosure(
        &self,
        preview: &Solid,
        add_set: &[Operand<'_>],
        subtract_set: &[Operand<'_>],
    ) -> Result<Solid> {
        let mut acc = preview.clone();
        for operand in add_set {
            let tool = build_world_part(operand.volume, operand.parent)?;
            acc = Solid::checked("enclosure", acc.part().union(&tool), &operand.volume.name)?;
        }
        let acc = Self::subtract_all(acc, "enclosure", subtract_set)?;
        tracing::info!(
            "Composed enclosure: {} additions, {} subtractions, {} triangles",
            add_set.len(),
            subtract_set.len(),
            acc.triangle_count()
        );
        Ok(acc)
    }

    /// Lid with every subtract member removed. The lid never receives additions.
    pub fn export_lid(&self, lid: &Volume, subtract_set: &[Operand<'_>]) -> Result<Solid> {
        let base = Solid::checked("lid", build_world_part(lid, None)?, &lid.name)?;
        let acc = Self::subtract_all(base, "lid", subtract_set)?;
        tracing::info!(
            "Composed lid: {} subtractions, {} triangles",
            subtract_set.len(),
            acc.triangle_count()
        );
        Ok(acc)
    }

    fn subtract_all(mut acc: Solid, label: &str, subtract_set: &[Operand<'_>]) -> Result<Solid> {
        for operand in subtract_set {
            let tool = build_world_part(operand.volume, operand.parent)?;
            acc = Solid::checked(label, acc.part().difference(&tool), &operand.volume.name)?;
        }
        Ok(acc)
    }
}
