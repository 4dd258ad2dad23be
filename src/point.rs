//! Points and the append-only store that holds them.
//!
//! A point's value is never overwritten.  Whether a point survived filtering
//! is recorded in a parallel list of marks, so a legitimate value that happens
//! to equal the skip flag can't be mistaken for a skipped one.

/// One measurement and the caller's opaque handle for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub value: T,
    /// Caller-assigned; need not be unique or match the storage position.
    pub index: i64,
}

/// Retain/skip decision for one point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mark {
    #[default]
    Retained,
    Skipped,
}

/// What a caller sees at a storage position after filtering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointState<T> {
    Retained(T),
    Skipped,
}

impl<T: Copy> PointState<T> {
    /// Returns the value if the point was retained.
    #[inline]
    pub fn retained(self) -> Option<T> {
        match self {
            PointState::Retained(v) => Some(v),
            PointState::Skipped => None,
        }
    }

    #[inline]
    pub fn is_skipped(self) -> bool {
        matches!(self, PointState::Skipped)
    }
}

/// Ordered sequence of points.  Positions never move; only marks change.
#[derive(Clone, Debug, Default)]
pub struct PointStore<T> {
    points: Vec<Point<T>>,
    // marks[i] belongs to points[i].
    marks: Vec<Mark>,
}

impl<T: Copy> PointStore<T> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            marks: Vec::with_capacity(capacity),
        }
    }

    /// Appends a point.  New points start out retained.
    #[inline]
    pub fn push(&mut self, value: T, index: i64) {
        self.points.push(Point { value, index });
        self.marks.push(Mark::Retained);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    #[inline]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[inline]
    pub fn point(&self, position: usize) -> Option<&Point<T>> {
        self.points.get(position)
    }

    #[inline]
    pub fn mark(&self, position: usize) -> Option<Mark> {
        self.marks.get(position).copied()
    }

    /// The tagged state at a storage position, or `None` past the end.
    pub fn state_at(&self, position: usize) -> Option<PointState<T>> {
        let point = self.points.get(position)?;
        Some(match self.marks[position] {
            Mark::Retained => PointState::Retained(point.value),
            Mark::Skipped => PointState::Skipped,
        })
    }

    /// Every storage position whose point carries `index`.
    pub fn positions_of_index(&self, index: i64) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.index == index)
            .map(|(position, _)| position)
            .collect()
    }

    pub fn retained_count(&self) -> usize {
        self.marks.iter().filter(|&&m| m == Mark::Retained).count()
    }

    pub(crate) fn set_mark(&mut self, position: usize, mark: Mark) {
        self.marks[position] = mark;
    }

    pub(crate) fn mark_all(&mut self, mark: Mark) {
        self.marks.fill(mark);
    }

    /// Points paired with their mutable marks, in position order.
    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&Point<T>, &mut Mark)> {
        self.points.iter().zip(self.marks.iter_mut())
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.marks.clear();
    }
}
