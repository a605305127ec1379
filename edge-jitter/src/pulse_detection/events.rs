use super::Detector;
use scope_jitter_common::{Real, SampleIndex};

#[derive(Clone)]
pub(crate) struct EventIter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    source: I,
    detector: D,
    finished: bool,
}

impl<I, D> Iterator for EventIter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    type Item = D::EventPointType;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        for (index, value) in &mut self.source {
            if let Some(event) = self.detector.signal(index, value) {
                return Some(event);
            }
        }
        self.finished = true;
        self.detector.finish()
    }
}

pub(crate) trait EventFilter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D>;
}

impl<I, D> EventFilter<I, D> for I
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D> {
        EventIter {
            source: self,
            detector,
            finished: false,
        }
    }
}
