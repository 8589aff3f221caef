//! The morph pipeline around the visible avatar.
//!
//! [`Morpher`] owns the visible head mesh and its blend-shape registry, the
//! per-region reference assignments, and the reference meshes fetched so far.
//! Reloading the avatar replaces the registry wholesale and rebuilds every
//! shape from the active assignments.

use std::collections::{HashMap, HashSet};

use facemorph_core::{
    apply_weights_ordered, build_region_delta, slider_weights, BlendShapeRegistry,
    InterpolationMap, MeshBuffer, MeshId, MorphError, MorphOptions, ReferenceMeshId, Region,
    RegionAssignments, RegionStatus, RegionTableSource, Renderer, Result, Slot, Vec2,
    VertexRegionTable,
};

use crate::provisioning::{as_fetch_error, AvatarProvisioner, MeshSource, Session};

/// The avatar currently on screen.
struct VisibleMesh {
    id: MeshId,
    avatar: String,
    base: MeshBuffer,
    registry: BlendShapeRegistry,
}

/// An in-flight reference fetch, returned by [`Morpher::begin_reference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTicket {
    mesh: MeshId,
    region: Region,
    reference: ReferenceMeshId,
}

impl ReferenceTicket {
    /// The visible mesh the reference will be registered against.
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// The region the reference was selected for.
    pub fn region(&self) -> Region {
        self.region
    }

    /// The reference being fetched.
    pub fn reference(&self) -> &ReferenceMeshId {
        &self.reference
    }
}

/// Result of completing a reference fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOutcome {
    /// The blend shape was registered at this slot.
    Registered(Slot),
    /// The avatar was replaced while fetching; nothing was registered.
    Stale,
}

/// The avatar morph pipeline.
pub struct Morpher<S, R> {
    options: MorphOptions,
    regions: Option<VertexRegionTable>,
    source: S,
    renderer: R,
    visible: Option<VisibleMesh>,
    next_mesh_id: u64,
    assignments: RegionAssignments,
    pending: HashSet<(Region, ReferenceMeshId)>,
    references: HashMap<ReferenceMeshId, MeshBuffer>,
    interpolation: InterpolationMap,
}

impl<S: MeshSource, R: Renderer> Morpher<S, R> {
    /// Creates a pipeline without a region table (no-morph mode).
    pub fn new(options: MorphOptions, source: S, renderer: R) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            assignments: RegionAssignments::new(options.max_references_per_region),
            options,
            regions: None,
            source,
            renderer,
            visible: None,
            next_mesh_id: 0,
            pending: HashSet::new(),
            references: HashMap::new(),
            interpolation: InterpolationMap::default(),
        })
    }

    /// Loads the region table. The error is returned for the caller to
    /// surface; a previously loaded table stays in use, otherwise the
    /// pipeline stays usable without morphing.
    pub fn load_region_table(&mut self, source: &dyn RegionTableSource) -> Result<()> {
        match source.load_region_table() {
            Ok(table) => {
                self.set_region_table(table);
                Ok(())
            }
            Err(e) if self.regions.is_some() => {
                log::warn!("cannot reload region table, keeping the current one: {e}");
                Err(e)
            }
            Err(e) => {
                log::error!("cannot load region table, morphing disabled: {e}");
                Err(e)
            }
        }
    }

    /// Installs a region table.
    pub fn set_region_table(&mut self, table: VertexRegionTable) {
        self.regions = Some(table);
        log::info!("region table loaded, morphing enabled");
    }

    /// Returns whether a region table is loaded.
    pub fn morphing_enabled(&self) -> bool {
        self.regions.is_some()
    }

    /// Returns the options.
    pub fn options(&self) -> &MorphOptions {
        &self.options
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Returns the identity of the visible mesh.
    pub fn visible_mesh(&self) -> Option<MeshId> {
        self.visible.as_ref().map(|v| v.id)
    }

    /// Returns the avatar id of the visible mesh.
    pub fn visible_avatar(&self) -> Option<&str> {
        self.visible.as_ref().map(|v| v.avatar.as_str())
    }

    /// Returns the unmorphed vertex buffer of the visible mesh.
    pub fn base_mesh(&self) -> Option<&MeshBuffer> {
        self.visible.as_ref().map(|v| &v.base)
    }

    /// Returns the blend shapes of the visible mesh.
    pub fn registry(&self) -> Option<&BlendShapeRegistry> {
        self.visible.as_ref().map(|v| &v.registry)
    }

    /// Returns the references assigned to a region, in assignment order.
    pub fn assigned_references(&self, region: Region) -> &[ReferenceMeshId] {
        self.assignments.references(region)
    }

    /// Returns the assignment status of a region, for UI gating.
    pub fn region_status(&self, region: Region) -> RegionStatus {
        self.assignments.status(region)
    }

    /// Loads an avatar and makes it the visible mesh.
    ///
    /// On success the previous registry is discarded and shapes are rebuilt
    /// from the active assignments. A failed fetch leaves everything as it was.
    pub fn load_avatar(&mut self, id: &str) -> Result<MeshId> {
        let base = self
            .source
            .fetch_mesh(id)
            .map_err(|e| as_fetch_error(id, e))?;

        if let Some(mut old) = self.visible.take() {
            log::info!("discarding {} with {} blend shapes", old.id, old.registry.len());
            old.registry.discard();
        }

        let mesh = MeshId(self.next_mesh_id);
        self.next_mesh_id += 1;
        let registry = BlendShapeRegistry::for_buffer(&base);
        log::info!("avatar '{id}' is now {mesh} ({} vertices)", base.vertex_count());
        self.visible = Some(VisibleMesh {
            id: mesh,
            avatar: id.to_string(),
            base,
            registry,
        });

        self.rebuild_shapes();
        self.renderer.mark_dirty(mesh);
        Ok(mesh)
    }

    /// Re-derives a shape for every settled assignment whose reference is
    /// cached. Reservations still waiting on a fetch are left to their
    /// completion. Assignments whose shape cannot be derived for the new mesh
    /// are dropped.
    fn rebuild_shapes(&mut self) {
        let (Some(table), Some(visible)) = (&self.regions, &mut self.visible) else {
            return;
        };
        let mut failed = Vec::new();
        for (region, reference) in self.assignments.iter() {
            if self.pending.contains(&(region, reference.clone())) {
                continue;
            }
            let Some(target) = self.references.get(reference) else {
                log::warn!("{region} reference '{reference}' not loaded yet, skipping");
                continue;
            };
            let result = build_region_delta(&visible.base, target, table, region).and_then(
                |delta| {
                    visible
                        .registry
                        .register_shape(region, reference.clone(), delta)
                },
            );
            if let Err(e) = result {
                log::warn!("dropping {region} reference '{reference}', cannot rebuild: {e}");
                failed.push((region, reference.clone()));
            }
        }
        for (region, reference) in failed {
            self.assignments.unassign(region, &reference);
        }
    }

    /// Reserves `reference` for `region` ahead of fetching it.
    ///
    /// The reservation fixes the reference's position in the region's weight
    /// vector, whatever order fetches complete in.
    pub fn begin_reference(
        &mut self,
        region: Region,
        reference: ReferenceMeshId,
    ) -> Result<ReferenceTicket> {
        if self.regions.is_none() {
            return Err(MorphError::MorphingUnavailable);
        }
        let mesh = self.visible_mesh().ok_or(MorphError::NoVisibleMesh)?;
        self.assignments.assign(region, reference.clone())?;
        self.pending.insert((region, reference.clone()));
        log::debug!("reserved '{reference}' for {region} on {mesh}");
        Ok(ReferenceTicket {
            mesh,
            region,
            reference,
        })
    }

    /// Completes a reference fetch started with [`Morpher::begin_reference`].
    ///
    /// A failed fetch, a failed delta, or a completion for a mesh that is no
    /// longer visible releases the reservation and registers nothing.
    pub fn complete_reference(
        &mut self,
        ticket: ReferenceTicket,
        fetched: Result<MeshBuffer>,
    ) -> Result<ReferenceOutcome> {
        let ReferenceTicket {
            mesh,
            region,
            reference,
        } = ticket;
        self.pending.remove(&(region, reference.clone()));

        let target = match fetched {
            Ok(target) => target,
            Err(e) => {
                self.assignments.unassign(region, &reference);
                return Err(as_fetch_error(reference.as_str(), e));
            }
        };

        let registered = match (&self.regions, &mut self.visible) {
            (Some(table), Some(visible)) if visible.id == mesh => {
                build_region_delta(&visible.base, &target, table, region).and_then(|delta| {
                    visible
                        .registry
                        .register_shape(region, reference.clone(), delta)
                })
            }
            (None, _) => Err(MorphError::MorphingUnavailable),
            _ => {
                log::warn!("dropping '{reference}' for {region}: {mesh} is no longer visible");
                self.assignments.unassign(region, &reference);
                return Ok(ReferenceOutcome::Stale);
            }
        };

        match registered {
            Ok(slot) => {
                log::info!("{region} shape from '{reference}' registered at slot {slot}");
                self.references.insert(reference, target);
                Ok(ReferenceOutcome::Registered(slot))
            }
            Err(e) => {
                self.assignments.unassign(region, &reference);
                Err(e)
            }
        }
    }

    /// Selects a reference mesh for a region: fetch, derive, and register.
    ///
    /// References fetched earlier (e.g. for another region) are reused.
    pub fn select_reference_mesh(
        &mut self,
        region: Region,
        reference: impl Into<ReferenceMeshId>,
    ) -> Result<Slot> {
        let ticket = self.begin_reference(region, reference.into())?;
        let fetched = match self.references.get(ticket.reference()) {
            Some(cached) => Ok(cached.clone()),
            None => self.source.fetch_mesh(ticket.reference().as_str()),
        };
        match self.complete_reference(ticket, fetched)? {
            ReferenceOutcome::Registered(slot) => Ok(slot),
            ReferenceOutcome::Stale => Err(MorphError::RegistryDiscarded),
        }
    }

    /// Creates an avatar from a template and selects it as a reference.
    pub fn select_template_reference<P: AvatarProvisioner + ?Sized>(
        &mut self,
        provisioner: &mut P,
        session: &Session,
        region: Region,
        template_id: &str,
    ) -> Result<Slot> {
        let avatar = provisioner.assign_template(session, template_id)?;
        self.select_reference_mesh(region, ReferenceMeshId(avatar.0))
    }

    /// Applies weights to a region's references in assignment order.
    ///
    /// Returns how many weights landed on a registered shape.
    pub fn set_region_weights(&mut self, region: Region, weights: &[f32]) -> Result<usize> {
        if self.regions.is_none() {
            return Err(MorphError::MorphingUnavailable);
        }
        let visible = self.visible.as_mut().ok_or(MorphError::NoVisibleMesh)?;
        apply_weights_ordered(
            &mut visible.registry,
            visible.id,
            region,
            self.assignments.references(region),
            weights,
            &mut self.renderer,
        )
    }

    /// Single-slider control: drives the region's first reference.
    pub fn set_region_slider(&mut self, region: Region, value: f32) -> Result<usize> {
        self.set_region_weights(region, &slider_weights(value))
    }

    /// 2-D picker control. Requires the region's full set of references.
    pub fn set_region_point(&mut self, region: Region, point: Vec2) -> Result<usize> {
        let status = self.region_status(region);
        if !status.is_ready() {
            return Err(MorphError::NotEnoughReferences {
                region,
                assigned: status.assigned_count,
                required: status.required,
            });
        }
        let weights = self.interpolation.weights_at(point);
        self.set_region_weights(region, &weights)
    }

    /// Returns the visible mesh with all weighted shapes applied.
    pub fn composited_positions(&self) -> Result<MeshBuffer> {
        let visible = self.visible.as_ref().ok_or(MorphError::NoVisibleMesh)?;
        visible.registry.composite_positions(&visible.base)
    }

    /// Drops the avatar, every assignment, and every cached reference.
    pub fn reset(&mut self) {
        if let Some(mut old) = self.visible.take() {
            old.registry.discard();
        }
        self.assignments.clear();
        self.pending.clear();
        self.references.clear();
        log::info!("morph pipeline reset");
    }
}
