use kgen_dtype::ScalarType;
use smallvec::SmallVec;
use snafu::ensure;

use crate::access::{AccessType, CodegenDataPattern, DataState};
use crate::error::{InvalidTransitionSnafu, Result};
use crate::geometry::Geometry;
use crate::indexing::{Size, Window};
use crate::provenance::SourceLocation;
use crate::shape::Shape;
use crate::types::{DataId, DataRole, EdgeId, NodeId};

/// Tile analysis results of one data item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileInfo {
    /// Smallest tile every consumer can be fed from without partial blocks.
    pub grain_for_successors: Size,
    /// Tile grain used by the schedule (one scheduler step).
    pub grain: Size,
    /// Producer executions per grain.
    pub execution_rate: Size,
    /// Halo consumers need around a grain, inflated to the grain.
    pub nbh_for_successors: Window,
    /// Union of the read windows of all consumers.
    pub access_union: Window,
}

/// A named data item of a kernel.
///
/// Analysis annotations are written through the transition methods, which
/// enforce the [`DataState`] order.
#[derive(Debug, Clone)]
pub struct KernelData {
    id: DataId,
    name: String,
    dtype: ScalarType,
    shape: Shape,
    iterative: bool,
    role: DataRole,
    location: Option<SourceLocation>,
    pub(crate) producer: Option<NodeId>,
    pub(crate) users: SmallVec<[EdgeId; 4]>,
    pattern: CodegenDataPattern,
    state: DataState,
    tiling: Option<TileInfo>,
    geometry: Option<Geometry>,
}

impl KernelData {
    pub(crate) fn new(id: DataId, name: String, dtype: ScalarType, shape: Shape, iterative: bool, role: DataRole) -> Self {
        Self {
            id,
            name,
            dtype,
            shape,
            iterative,
            role,
            location: None,
            producer: None,
            users: SmallVec::new(),
            pattern: CodegenDataPattern::default(),
            state: DataState::Unscheduled,
            tiling: None,
            geometry: None,
        }
    }

    pub fn id(&self) -> DataId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ScalarType {
        self.dtype
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn nb_dims(&self) -> usize {
        self.shape.len()
    }

    /// Element size in bytes.
    pub fn elem_bytes(&self) -> usize {
        self.dtype.bytes()
    }

    /// Varies with the schedule step; false for control data.
    pub fn is_iterative(&self) -> bool {
        self.iterative
    }

    pub fn is_control(&self) -> bool {
        !self.iterative
    }

    pub fn role(&self) -> DataRole {
        self.role
    }

    pub(crate) fn set_role(&mut self, role: DataRole) {
        self.role = role;
    }

    pub fn is_input(&self) -> bool {
        self.role == DataRole::Input
    }

    pub fn is_output(&self) -> bool {
        self.role == DataRole::Output
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub(crate) fn set_location(&mut self, location: Option<SourceLocation>) {
        self.location = location;
    }

    pub fn producer(&self) -> Option<NodeId> {
        self.producer
    }

    pub fn users(&self) -> &[EdgeId] {
        &self.users
    }

    pub fn pattern(&self) -> &CodegenDataPattern {
        &self.pattern
    }

    pub fn state(&self) -> DataState {
        self.state
    }

    pub fn tiling(&self) -> Option<&TileInfo> {
        self.tiling.as_ref()
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    // ============================================================================
    // State transitions
    // ============================================================================

    fn check(&self, allowed: &[DataState], to: DataState) -> Result<()> {
        ensure!(
            allowed.contains(&self.state),
            InvalidTransitionSnafu { data: self.name.clone(), from: self.state, to }
        );
        Ok(())
    }

    /// Record tile analysis results; only before cycle assignment.
    pub fn set_tiling(&mut self, tiling: TileInfo) -> Result<()> {
        self.check(&[DataState::Unscheduled], DataState::Unscheduled)?;
        self.tiling = Some(tiling);
        Ok(())
    }

    pub fn schedule_at(&mut self, cycle: u32) -> Result<()> {
        self.check(&[DataState::Unscheduled], DataState::Scheduled)?;
        self.pattern.set_scheduling_cycle(cycle);
        self.state = DataState::Scheduled;
        Ok(())
    }

    /// Set the access type.
    ///
    /// Revising the type of a slot-sized item keeps its slots but drops any
    /// resolved geometry.
    pub fn assign_access(&mut self, access: AccessType) -> Result<()> {
        match self.state {
            DataState::Scheduled | DataState::PatternAssigned => {
                self.state = DataState::PatternAssigned;
            }
            DataState::SlotSized | DataState::GeometryResolved => {
                self.geometry = None;
                self.state = DataState::SlotSized;
            }
            DataState::Unscheduled => {
                return InvalidTransitionSnafu {
                    data: self.name.clone(),
                    from: self.state,
                    to: DataState::PatternAssigned,
                }
                .fail();
            }
        }
        self.pattern.set_access_type(access);
        Ok(())
    }

    pub fn size_slots(&mut self, slots: u32) -> Result<()> {
        self.check(&[DataState::PatternAssigned, DataState::SlotSized], DataState::SlotSized)?;
        self.pattern.set_nb_buffer_slot(slots)?;
        self.geometry = None;
        self.state = DataState::SlotSized;
        Ok(())
    }

    pub fn resolve_geometry(&mut self, geometry: Geometry) -> Result<()> {
        self.check(&[DataState::SlotSized], DataState::GeometryResolved)?;
        self.geometry = Some(geometry);
        self.state = DataState::GeometryResolved;
        Ok(())
    }

    /// Drop every analysis annotation.
    pub fn reset_analysis(&mut self) {
        self.pattern = CodegenDataPattern::default();
        self.state = DataState::Unscheduled;
        self.tiling = None;
        self.geometry = None;
    }
}

impl std::fmt::Display for KernelData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.dtype, self.name, crate::shape::display(&self.shape))?;
        if self.pattern.is_scheduled() {
            write!(f, "{}", self.pattern)?;
        }
        Ok(())
    }
}
