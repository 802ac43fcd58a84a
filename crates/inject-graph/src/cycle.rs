//! Tracks the active resolution path.

use inject_model::Element;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleResult {
    /// Not on the path; it has been pushed.
    None,
    /// Already on the path.
    Cycle,
    /// A cycle a lazy binding could break. Never produced: breaking cycles
    /// through laziness is not supported, and callers treat this as a defect.
    Resolvable,
}

/// The stack of elements currently being resolved.
///
/// Every `check` returning [`CycleResult::None`] must be matched by exactly
/// one `pop`.
#[derive(Debug, Default)]
pub struct CycleDetector {
    elements: Vec<Element>,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, element: &Element) -> CycleResult {
        if self.elements.contains(element) {
            return CycleResult::Cycle;
        }
        self.elements.push(element.clone());
        CycleResult::None
    }

    pub fn pop(&mut self) {
        self.elements.pop();
    }

    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    /// Trace text of the path, most recent first.
    pub fn trace(&self) -> Vec<String> {
        self.elements.iter().rev().map(|e| e.trace.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inject_model::ElementKind;

    fn element(name: &str) -> Element {
        Element::new(ElementKind::Constructor, name, format!("{}()", name))
    }

    #[test]
    fn push_check_pop() {
        let mut detector = CycleDetector::new();
        let a = element("A");
        let b = element("B");
        assert_eq!(detector.check(&a), CycleResult::None);
        assert_eq!(detector.check(&b), CycleResult::None);
        assert_eq!(detector.check(&a), CycleResult::Cycle);
        assert_eq!(detector.depth(), 2);
        assert_eq!(detector.trace(), vec!["B()", "A()"]);
        detector.pop();
        detector.pop();
        assert_eq!(detector.depth(), 0);
        assert_eq!(detector.check(&a), CycleResult::None);
    }
}
