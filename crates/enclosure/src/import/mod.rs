//! Asynchronous component import.
//!
//! Loads run on the tokio blocking pool and report back over a channel. The tick
//! thread drains finished loads and claims each one against the table of still
//! wanted imports before anything touches the scene, so a group removed while
//! its assets were loading is never revived.

pub mod library;
mod source;

pub use library::{layout, ComponentLayout, PartSpec};
pub use source::{read_stl, MemoryMeshSource, MeshSource, StlDirectory};

use std::collections::HashMap;
use std::sync::Arc;

use shared::{ComponentKind, GroupId, Transform, VolumeKind};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::geometry::{Volume, VolumeGeometry};
use crate::state::{ExtraVolume, NewGroup};

/// A finished load, successful or not.
#[derive(Debug)]
pub struct ImportOutcome {
    pub group_id: GroupId,
    pub component: ComponentKind,
    pub result: Result<NewGroup>,
}

/// Queue of in-flight component imports.
pub struct ImportQueue {
    source: Arc<dyn MeshSource>,
    handle: Handle,
    tx: mpsc::UnboundedSender<ImportOutcome>,
    rx: mpsc::UnboundedReceiver<ImportOutcome>,
    pending: HashMap<GroupId, ComponentKind>,
}

impl ImportQueue {
    pub fn new(source: Arc<dyn MeshSource>, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            handle,
            tx,
            rx,
            pending: HashMap::new(),
        }
    }

    /// Start loading a component. Returns the identity its group will get.
    pub fn request(&mut self, component: ComponentKind) -> GroupId {
        let group_id = uuid::Uuid::new_v4().to_string();
        self.pending.insert(group_id.clone(), component);

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let id = group_id.clone();
        self.handle.spawn_blocking(move || {
            let result = load_component(source.as_ref(), component, &id);
            // The queue may be gone already; then nobody wants the result.
            let _ = tx.send(ImportOutcome {
                group_id: id,
                component,
                result,
            });
        });

        tracing::info!("Importing {} as group {}", component.display_name(), group_id);
        group_id
    }

    /// Mark an in-flight import as no longer wanted.
    pub fn cancel(&mut self, group_id: &str) -> bool {
        let cancelled = self.pending.remove(group_id).is_some();
        if cancelled {
            tracing::info!("Cancelled pending import {}", group_id);
        }
        cancelled
    }

    pub fn is_pending(&self, group_id: &str) -> bool {
        self.pending.contains_key(group_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Take the still-wanted claim for a finished load.
    ///
    /// Returns false when the group was cancelled in the meantime.
    pub fn claim(&mut self, outcome: &ImportOutcome) -> bool {
        self.pending.remove(&outcome.group_id).is_some()
    }

    /// Next finished load without waiting.
    pub fn try_next(&mut self) -> Option<ImportOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished load.
    pub async fn next(&mut self) -> Option<ImportOutcome> {
        self.rx.recv().await
    }
}

/// Load every asset of a component into a group ready for insertion.
pub fn load_component(
    source: &dyn MeshSource,
    component: ComponentKind,
    group_id: &str,
) -> Result<NewGroup> {
    let Some(layout) = library::layout(component) else {
        return Ok(additional_cube(group_id));
    };

    let mut decor = Vec::new();
    let mut extras = Vec::new();
    for part in layout.parts {
        let mesh = source.load(&layout.asset_path(part))?;
        let volume = Volume::new(part.kind, part.name, VolumeGeometry::Mesh(mesh))
            .with_transform(part.transform());
        if part.kind == VolumeKind::Decor {
            decor.push(volume);
        } else {
            extras.push(ExtraVolume {
                volume,
                attached: part.attached,
            });
        }
    }

    tracing::debug!(
        "Loaded {}: {} decor, {} boolean volumes",
        layout.name(),
        decor.len(),
        extras.len()
    );

    Ok(NewGroup {
        id: group_id.to_string(),
        name: layout.name().to_string(),
        component,
        transform: layout.group_transform(),
        decor,
        extras,
    })
}

/// Unit box added to the enclosure, resized through its scale.
fn additional_cube(group_id: &str) -> NewGroup {
    let cube = Volume::new(
        VolumeKind::AddExtra,
        ComponentKind::AdditionalCube.display_name(),
        VolumeGeometry::cuboid(1.0, 1.0, 1.0),
    );
    NewGroup {
        id: group_id.to_string(),
        name: ComponentKind::AdditionalCube.display_name().to_string(),
        component: ComponentKind::AdditionalCube,
        transform: Transform::new(),
        decor: Vec::new(),
        extras: vec![ExtraVolume {
            volume: cube,
            attached: false,
        }],
    }
}
