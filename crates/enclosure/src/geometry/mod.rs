//! Parametric enclosure derivation.
//!
//! Turns a [`DesignParameters`] value into the shell, cavity, lid and the four
//! corner screw posts. Derivation is a pure function: the same parameters always
//! yield dimension- and position-equal volumes with the same slot identities.

mod volume;

pub use volume::{ImportedMesh, Volume, VolumeGeometry, DEFAULT_SEGMENTS};

use shared::{DesignParameters, Transform, VolumeKind};

use crate::error::{EnclosureError, Result};

/// Corner offset of a screw post in the 100 mm reference design.
pub const SCREW_POST_MARGIN: f64 = 48.25;
/// Wall thickness the post margin was laid out for.
pub const REFERENCE_WALL: f64 = 4.0;
/// Reference length and width of the enclosure the margin was measured on.
pub const REFERENCE_SIZE: f64 = 100.0;
/// How far a screw post pokes out above the lid.
pub const POST_OVERSHOOT: f64 = 0.5;

pub const SHELL_ID: &str = "enclosure:shell";
pub const CAVITY_ID: &str = "enclosure:cavity";
pub const LID_ID: &str = "enclosure:lid";
pub const SCREW_POST_IDS: [&str; 4] = [
    "enclosure:screw_post:0",
    "enclosure:screw_post:1",
    "enclosure:screw_post:2",
    "enclosure:screw_post:3",
];

/// Volumes derived from the design parameters for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosureState {
    pub shell: Volume,
    pub cavity: Volume,
    pub lid: Volume,
    pub screw_posts: [Volume; 4],
}

impl EnclosureState {
    pub fn volumes(&self) -> impl Iterator<Item = &Volume> {
        [&self.shell, &self.cavity, &self.lid]
            .into_iter()
            .chain(self.screw_posts.iter())
    }

    /// Drop every derived volume.
    pub fn dispose(self) {
        let EnclosureState {
            shell,
            cavity,
            lid,
            screw_posts,
        } = self;
        shell.dispose();
        cavity.dispose();
        lid.dispose();
        for post in screw_posts {
            post.dispose();
        }
    }
}

/// Derives [`EnclosureState`] from [`DesignParameters`].
pub struct EnclosureGeometryBuilder;

impl EnclosureGeometryBuilder {
    /// Check that the parameters describe a buildable enclosure.
    pub fn validate(params: &DesignParameters) -> Result<()> {
        let dims = [
            ("length", params.length),
            ("width", params.width),
            ("height", params.height),
            ("wall_thickness", params.wall_thickness),
            ("base_thickness", params.base_thickness),
            ("lid_thickness", params.lid_thickness),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(EnclosureError::InvalidParameters(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let cavity_length = params.cavity_length();
        if cavity_length <= 0.0 {
            return Err(EnclosureError::InvalidParameters(format!(
                "cavity length {} - 2 x {} = {} is not positive",
                params.length, params.wall_thickness, cavity_length
            )));
        }
        let cavity_width = params.cavity_width();
        if cavity_width <= 0.0 {
            return Err(EnclosureError::InvalidParameters(format!(
                "cavity width {} - 2 x {} = {} is not positive",
                params.width, params.wall_thickness, cavity_width
            )));
        }
        Ok(())
    }

    /// Build the enclosure volumes for `params`.
    pub fn derive(params: &DesignParameters) -> Result<EnclosureState> {
        Self::validate(params)?;

        let DesignParameters {
            length,
            width,
            height,
            wall_thickness: wall,
            base_thickness: base,
            lid_thickness: lid,
            screw,
        } = *params;

        let shell = Volume::with_id(
            SHELL_ID,
            VolumeKind::Shell,
            "Shell",
            VolumeGeometry::cuboid(length, height, width),
        )
        .with_transform(Transform::at(0.0, height / 2.0, 0.0));

        let cavity = Volume::with_id(
            CAVITY_ID,
            VolumeKind::Cavity,
            "Cavity",
            VolumeGeometry::cuboid(params.cavity_length(), height, params.cavity_width()),
        )
        .with_transform(Transform::at(0.0, height / 2.0 + base, 0.0));

        let lid_volume = Volume::with_id(
            LID_ID,
            VolumeKind::Lid,
            "Lid",
            VolumeGeometry::cuboid(length, lid, width),
        )
        .with_transform(Transform::at(0.0, height + lid / 2.0, 0.0));

        let post_height = base + lid + 1.0;
        let post_top = height + lid + POST_OVERSHOOT;
        let post_y = post_top - post_height / 2.0;
        let wall_shift = (REFERENCE_WALL - wall) / 2.0;
        let post_x = SCREW_POST_MARGIN + (length - REFERENCE_SIZE) / 2.0 + wall_shift;
        let post_z = SCREW_POST_MARGIN + (width - REFERENCE_SIZE) / 2.0 + wall_shift;

        let corners = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];
        let screw_posts = std::array::from_fn(|i| {
            let (sx, sz) = corners[i];
            Volume::with_id(
                SCREW_POST_IDS[i],
                VolumeKind::ScrewPost,
                format!("Screw post {}", i + 1),
                VolumeGeometry::cylinder(screw.radius(), post_height),
            )
            .with_transform(Transform::at(sx * post_x, post_y, sz * post_z))
        });

        tracing::debug!(
            "derived enclosure {}x{}x{} wall={} base={} lid={} screw={}",
            length,
            width,
            height,
            wall,
            base,
            lid,
            screw
        );

        Ok(EnclosureState {
            shell,
            cavity,
            lid: lid_volume,
            screw_posts,
        })
    }
}
