//! One-shot reveal of page sections as they scroll into view.

use super::Document;

pub const HERO: &str = ".hero";
pub const SECTIONS: &str = ".section";
pub const SITE_FOOTER: &str = ".site-footer";

pub const REVEAL_CLASS: &str = "reveal";
pub const VISIBLE_CLASS: &str = "is-visible";

/// Fraction of a target that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.18;
/// Pulls the bottom of the trigger zone up by 10% of the viewport.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -10% 0px";

/// Cosmetic entrance style, cycling every three targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealVariant {
    Plain,
    FadeLeft,
    FadeRight,
}

impl RevealVariant {
    pub fn for_index(index: usize) -> Self {
        match index % 3 {
            1 => RevealVariant::FadeLeft,
            2 => RevealVariant::FadeRight,
            _ => RevealVariant::Plain,
        }
    }

    pub fn class(&self) -> Option<&'static str> {
        match self {
            RevealVariant::Plain => None,
            RevealVariant::FadeLeft => Some("fade-left"),
            RevealVariant::FadeRight => Some("fade-right"),
        }
    }
}

/// Targets still waiting to be revealed.
#[derive(Clone, Debug)]
pub struct ScrollReveal<E> {
    pending: Vec<E>,
}

impl<E: Clone + PartialEq> ScrollReveal<E> {
    /// Mark the hero, every section and the footer for reveal.
    ///
    /// Missing elements are dropped before variants are assigned, so the
    /// variant cycle follows the targets actually present.
    pub fn install<D: Document<Element = E>>(doc: &D) -> Self {
        let mut targets = Vec::new();
        targets.extend(doc.query(HERO));
        targets.extend(doc.query_all(SECTIONS));
        targets.extend(doc.query(SITE_FOOTER));

        for (index, target) in targets.iter().enumerate() {
            doc.add_class(target, REVEAL_CLASS);
            if let Some(class) = RevealVariant::for_index(index).class() {
                doc.add_class(target, class);
            }
        }

        Self { pending: targets }
    }

    /// Elements the host should observe.
    pub fn targets(&self) -> &[E] {
        &self.pending
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// An intersection report for `target`.
    ///
    /// Returns `true` when the target was revealed and the host should stop
    /// observing it.
    pub fn on_intersection<D: Document<Element = E>>(
        &mut self,
        doc: &D,
        target: &E,
        is_intersecting: bool,
    ) -> bool {
        if !is_intersecting {
            return false;
        }
        doc.add_class(target, VISIBLE_CLASS);
        self.pending.retain(|e| e != target);
        true
    }

    /// Reveal every remaining target at once. Used when the host cannot
    /// observe intersections.
    pub fn reveal_all<D: Document<Element = E>>(&mut self, doc: &D) {
        for target in self.pending.drain(..) {
            doc.add_class(&target, VISIBLE_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDocument;

    #[test]
    fn reveal_all_empties_pending() {
        let doc = MemoryDocument::new();
        let hero = doc.insert("header", &["hero"], &[]);
        let section = doc.insert("section", &["section"], &[]);
        let mut reveal = ScrollReveal::install(&doc);
        reveal.reveal_all(&doc);
        assert!(reveal.is_complete());
        assert!(doc.has_class(&hero, VISIBLE_CLASS));
        assert!(doc.has_class(&section, VISIBLE_CLASS));
    }

    #[test]
    fn variants_cycle_every_three() {
        let v: Vec<RevealVariant> = (0..6).map(RevealVariant::for_index).collect();
        assert_eq!(
            v,
            vec![
                RevealVariant::Plain,
                RevealVariant::FadeLeft,
                RevealVariant::FadeRight,
                RevealVariant::Plain,
                RevealVariant::FadeLeft,
                RevealVariant::FadeRight,
            ]
        );
    }
}
