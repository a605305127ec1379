use scope_jitter_common::SampleIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Rising,
    Falling,
}

/// A change of binary state, located at the first sample of the new state
/// (or at the last sample of a trace which ends high).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub index: SampleIndex,
    pub direction: EdgeDirection,
}

/// The edges of one voltage sequence, each list strictly increasing.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct EdgeSet {
    pub rising: Vec<SampleIndex>,
    pub falling: Vec<SampleIndex>,
}

impl EdgeSet {
    /// Number of complete pulses, provided the edges pair up.
    pub fn num_pulses(&self) -> Option<usize> {
        (self.rising.len() == self.falling.len()).then_some(self.rising.len())
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = Edge>>(iter: T) -> Self {
        let mut edges = EdgeSet::default();
        for edge in iter {
            match edge.direction {
                EdgeDirection::Rising => edges.rising.push(edge.index),
                EdgeDirection::Falling => edges.falling.push(edge.index),
            }
        }
        edges
    }
}
