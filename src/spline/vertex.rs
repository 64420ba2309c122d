use crate::math::{Point, Vector};

/// Coupling between the entry and exit control of a vertex.
///
/// A dependent control follows its leader whenever the leader changes:
/// by point reflection through the location for Bezier vertices, by
/// copying for Hermite vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependence {
    /// Entry and exit are set independently.
    Independent,
    /// Entry leads, exit is derived from it.
    OnEntry,
    /// Exit leads, entry is derived from it.
    OnExit,
}

/// Vertex of a Bezier spline, its controls stored as absolute points.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierVertex {
    loc: Point,
    entry: Point,
    exit: Point,
    dependence: Dependence,
}

impl BezierVertex {
    /// Creates a vertex. A missing control is derived from the other side
    /// by point reflection through the location and keeps following it.
    /// With both controls missing they collapse onto the location.
    ///
    /// # Panics
    ///
    /// Panics if a control's dimension differs from the location's.
    #[must_use]
    pub fn new(loc: Point, entry: Option<Point>, exit: Option<Point>) -> Self {
        for control in entry.iter().chain(exit.iter()) {
            assert_eq!(control.len(), loc.len(), "controls must match the location's dimension");
        }
        let (entry, exit, dependence) = match (entry, exit) {
            (Some(entry), Some(exit)) => (entry, exit, Dependence::Independent),
            (Some(entry), None) => {
                let exit = reflect(&loc, &entry);
                (entry, exit, Dependence::OnEntry)
            }
            (None, Some(exit)) => {
                let entry = reflect(&loc, &exit);
                (entry, exit, Dependence::OnExit)
            }
            (None, None) => (loc.clone(), loc.clone(), Dependence::Independent),
        };
        Self { loc, entry, exit, dependence }
    }

    #[must_use]
    pub fn loc(&self) -> &Point {
        &self.loc
    }

    #[must_use]
    pub fn entry(&self) -> &Point {
        &self.entry
    }

    #[must_use]
    pub fn exit(&self) -> &Point {
        &self.exit
    }

    #[must_use]
    pub fn dependence(&self) -> Dependence {
        self.dependence
    }

    /// Returns the vertex with a new entry control. On a coupled vertex the
    /// last-set control leads, so the exit is re-derived.
    #[must_use]
    pub fn with_entry(&self, entry: Point) -> Self {
        let exit = match self.dependence {
            Dependence::Independent => Some(self.exit.clone()),
            Dependence::OnEntry | Dependence::OnExit => None,
        };
        Self::new(self.loc.clone(), Some(entry), exit)
    }

    /// Returns the vertex with a new exit control, the entry re-derived if
    /// the vertex is coupled.
    #[must_use]
    pub fn with_exit(&self, exit: Point) -> Self {
        let entry = match self.dependence {
            Dependence::Independent => Some(self.entry.clone()),
            Dependence::OnEntry | Dependence::OnExit => None,
        };
        Self::new(self.loc.clone(), entry, Some(exit))
    }

    /// Returns the vertex moved by `dv`. Both controls move along, which
    /// keeps any coupling intact.
    #[must_use]
    pub fn translate(&self, dv: &Vector) -> Self {
        Self {
            loc: &self.loc + dv,
            entry: &self.entry + dv,
            exit: &self.exit + dv,
            dependence: self.dependence,
        }
    }
}

/// Vertex of a Hermite spline, its controls stored as tangent vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct HermiteVertex {
    loc: Point,
    entry: Vector,
    exit: Vector,
    dependence: Dependence,
}

impl HermiteVertex {
    /// Creates a vertex. A missing tangent is copied from the other side
    /// and keeps following it. With both tangents missing they are zero.
    ///
    /// # Panics
    ///
    /// Panics if a tangent's dimension differs from the location's.
    #[must_use]
    pub fn new(loc: Point, entry: Option<Vector>, exit: Option<Vector>) -> Self {
        for tangent in entry.iter().chain(exit.iter()) {
            assert_eq!(tangent.len(), loc.len(), "tangents must match the location's dimension");
        }
        let (entry, exit, dependence) = match (entry, exit) {
            (Some(entry), Some(exit)) => (entry, exit, Dependence::Independent),
            (Some(entry), None) => {
                let exit = entry.clone();
                (entry, exit, Dependence::OnEntry)
            }
            (None, Some(exit)) => {
                let entry = exit.clone();
                (entry, exit, Dependence::OnExit)
            }
            (None, None) => {
                let zero = Vector::zeros(loc.len());
                (zero.clone(), zero, Dependence::Independent)
            }
        };
        Self { loc, entry, exit, dependence }
    }

    /// Creates a vertex with zero tangents, to be filled in by a tangent
    /// finder.
    #[must_use]
    pub fn raw(loc: Point) -> Self {
        Self::new(loc, None, None)
    }

    #[must_use]
    pub fn loc(&self) -> &Point {
        &self.loc
    }

    #[must_use]
    pub fn entry(&self) -> &Vector {
        &self.entry
    }

    #[must_use]
    pub fn exit(&self) -> &Vector {
        &self.exit
    }

    #[must_use]
    pub fn dependence(&self) -> Dependence {
        self.dependence
    }

    /// Returns the vertex with a new entry tangent, the exit re-derived if
    /// the vertex is coupled.
    #[must_use]
    pub fn with_entry(&self, entry: Vector) -> Self {
        let exit = match self.dependence {
            Dependence::Independent => Some(self.exit.clone()),
            Dependence::OnEntry | Dependence::OnExit => None,
        };
        Self::new(self.loc.clone(), Some(entry), exit)
    }

    /// Returns the vertex with a new exit tangent, the entry re-derived if
    /// the vertex is coupled.
    #[must_use]
    pub fn with_exit(&self, exit: Vector) -> Self {
        let entry = match self.dependence {
            Dependence::Independent => Some(self.entry.clone()),
            Dependence::OnEntry | Dependence::OnExit => None,
        };
        Self::new(self.loc.clone(), entry, Some(exit))
    }

    /// Overwrites both tangents, decoupling them.
    pub fn set_tangents(&mut self, entry: Vector, exit: Vector) {
        self.entry = entry;
        self.exit = exit;
        self.dependence = Dependence::Independent;
    }

    /// Returns the vertex moved by `dv`. Tangents are unaffected by
    /// translation.
    #[must_use]
    pub fn translate(&self, dv: &Vector) -> Self {
        Self {
            loc: &self.loc + dv,
            entry: self.entry.clone(),
            exit: self.exit.clone(),
            dependence: self.dependence,
        }
    }
}

/// A spline vertex of either control flavor.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertex {
    Bezier(BezierVertex),
    Hermite(HermiteVertex),
}

impl Vertex {
    #[must_use]
    pub fn loc(&self) -> &Point {
        match self {
            Self::Bezier(vertex) => vertex.loc(),
            Self::Hermite(vertex) => vertex.loc(),
        }
    }

    #[must_use]
    pub fn translate(&self, dv: &Vector) -> Self {
        match self {
            Self::Bezier(vertex) => Self::Bezier(vertex.translate(dv)),
            Self::Hermite(vertex) => Self::Hermite(vertex.translate(dv)),
        }
    }
}

impl From<BezierVertex> for Vertex {
    fn from(vertex: BezierVertex) -> Self {
        Self::Bezier(vertex)
    }
}

impl From<HermiteVertex> for Vertex {
    fn from(vertex: HermiteVertex) -> Self {
        Self::Hermite(vertex)
    }
}

/// Point reflection of `control` through `loc`.
fn reflect(loc: &Point, control: &Point) -> Point {
    loc * 2.0 - control
}
