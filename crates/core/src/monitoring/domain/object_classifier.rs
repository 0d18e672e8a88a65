use crate::detection::domain::detection::Detection;
use crate::monitoring::domain::candidate::Candidate;
use crate::monitoring::domain::event_key::EventKey;
use crate::shared::constants::{
    BOOK_MESSAGE, DEVICE_MESSAGE_PREFIX, MULTIPLE_FACES_MESSAGE, OBJECT_CONFIDENCE_THRESHOLD,
    PHONE_MESSAGE,
};

/// Semantic group an object label can fall into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectGroup {
    Phone,
    Book,
    Device,
}

impl ObjectGroup {
    /// First-match-wins classification of a lower-cased label.
    pub fn classify(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("cell phone")
            || label.contains("cellphone")
            || label.contains("mobile phone")
            || label == "phone"
        {
            Some(ObjectGroup::Phone)
        } else if label == "book" {
            Some(ObjectGroup::Book)
        } else if matches!(
            label.as_str(),
            "laptop" | "keyboard" | "remote" | "tvmonitor"
        ) {
            Some(ObjectGroup::Device)
        } else {
            None
        }
    }

    pub fn event_key(&self) -> EventKey {
        match self {
            ObjectGroup::Phone => EventKey::Phone,
            ObjectGroup::Book => EventKey::Book,
            ObjectGroup::Device => EventKey::Device,
        }
    }
}

/// Per-frame classification of raw detections into multiplicity and
/// object candidates.
#[derive(Clone, Debug)]
pub struct ObjectClassifier {
    confidence_threshold: f64,
}

impl ObjectClassifier {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    /// Offers `multipleFaces` when more than one face is present.
    pub fn classify_faces(&self, face_count: usize) -> Option<Candidate> {
        (face_count > 1).then(|| Candidate::new(EventKey::MultipleFaces, MULTIPLE_FACES_MESSAGE))
    }

    /// Classifies one object-detection cycle.
    ///
    /// Detections below the confidence threshold are ignored. At most one
    /// candidate per group is produced; the first matching detection in
    /// detector order decides the message. Unmatched labels produce nothing.
    pub fn classify_objects(&self, objects: &[&Detection]) -> Vec<Candidate> {
        let mut seen: Vec<ObjectGroup> = Vec::with_capacity(3);
        let mut candidates = Vec::new();

        for det in objects {
            if det.confidence < self.confidence_threshold {
                continue;
            }
            let Some(group) = ObjectGroup::classify(&det.label) else {
                continue;
            };
            if seen.contains(&group) {
                continue;
            }
            seen.push(group);
            candidates.push(Candidate::new(group.event_key(), message_for(group, det)));
        }

        candidates
    }
}

impl Default for ObjectClassifier {
    fn default() -> Self {
        Self::new(OBJECT_CONFIDENCE_THRESHOLD)
    }
}

fn message_for(group: ObjectGroup, det: &Detection) -> String {
    match group {
        ObjectGroup::Phone => PHONE_MESSAGE.to_string(),
        ObjectGroup::Book => BOOK_MESSAGE.to_string(),
        ObjectGroup::Device => format!("{DEVICE_MESSAGE_PREFIX}: {}", det.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::region::{PixelBox, Region};
    use rstest::rstest;

    fn obj(label: &str, confidence: f64) -> Detection {
        Detection::object(label, Region::Pixel(PixelBox::new(10.0, 10.0, 50.0, 80.0)), confidence)
    }

    fn classify(dets: &[Detection]) -> Vec<Candidate> {
        let refs: Vec<&Detection> = dets.iter().collect();
        ObjectClassifier::default().classify_objects(&refs)
    }

    #[rstest]
    #[case("cell phone", Some(ObjectGroup::Phone))]
    #[case("Cell Phone", Some(ObjectGroup::Phone))]
    #[case("cellphone", Some(ObjectGroup::Phone))]
    #[case("mobile phone", Some(ObjectGroup::Phone))]
    #[case("phone", Some(ObjectGroup::Phone))]
    #[case("smartphone", None)]
    #[case("book", Some(ObjectGroup::Book))]
    #[case("books", None)]
    #[case("laptop", Some(ObjectGroup::Device))]
    #[case("keyboard", Some(ObjectGroup::Device))]
    #[case("remote", Some(ObjectGroup::Device))]
    #[case("tvmonitor", Some(ObjectGroup::Device))]
    #[case("person", None)]
    #[case("cup", None)]
    fn test_group_classification(#[case] label: &str, #[case] expected: Option<ObjectGroup>) {
        assert_eq!(ObjectGroup::classify(label), expected);
    }

    #[test]
    fn test_two_phone_like_detections_yield_one_candidate() {
        let c = classify(&[obj("cell phone", 0.9), obj("phone", 0.7)]);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].key, EventKey::Phone);
        assert_eq!(c[0].message, "Phone detected in frame");
    }

    #[rstest]
    #[case::below(0.59, 0)]
    #[case::at_threshold(0.6, 1)]
    #[case::above(0.61, 1)]
    fn test_confidence_filter(#[case] confidence: f64, #[case] expected: usize) {
        assert_eq!(classify(&[obj("book", confidence)]).len(), expected);
    }

    #[test]
    fn test_low_confidence_match_does_not_block_later_match() {
        let c = classify(&[obj("laptop", 0.3), obj("keyboard", 0.8)]);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].message, "Extra electronic device detected: keyboard");
    }

    #[test]
    fn test_one_candidate_per_group_in_detector_order() {
        let c = classify(&[
            obj("book", 0.7),
            obj("laptop", 0.95),
            obj("cell phone", 0.8),
            obj("remote", 0.9),
            obj("person", 0.99),
        ]);
        let keys: Vec<EventKey> = c.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![EventKey::Book, EventKey::Device, EventKey::Phone]);
        assert_eq!(c[1].message, "Extra electronic device detected: laptop");
    }

    #[test]
    fn test_device_message_uses_reported_label() {
        let c = classify(&[obj("Laptop", 0.9)]);
        assert_eq!(c[0].message, "Extra electronic device detected: Laptop");
    }

    #[test]
    fn test_empty_cycle_yields_nothing() {
        assert!(classify(&[]).is_empty());
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, false)]
    #[case(2, true)]
    #[case(5, true)]
    fn test_multiple_faces(#[case] count: usize, #[case] offered: bool) {
        let c = ObjectClassifier::default().classify_faces(count);
        assert_eq!(c.is_some(), offered);
        if let Some(c) = c {
            assert_eq!(c.key, EventKey::MultipleFaces);
            assert_eq!(c.message, "Multiple faces detected");
        }
    }
}
