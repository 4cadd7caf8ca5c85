//! Relationship-label composition.
//!
//! A path is reduced to its sequence of [`EdgeKind`]s, read from the
//! viewpoint outwards: `[ParentOf, SiblingOf]` is "my parent's sibling". The
//! sequence is looked up in a fixed rule table. Anything longer than the
//! configured bound, or not in the table, becomes "Distant relative (N steps)".

use kindred_core::person::Gender;

use crate::{EngineConfig, graph::EdgeKind};

const PARENT: EdgeKind = EdgeKind::ParentOf;
const CHILD: EdgeKind = EdgeKind::ChildOf;
const SPOUSE: EdgeKind = EdgeKind::SpouseOf;
const PARTNER: EdgeKind = EdgeKind::PartnerOf;
const SIBLING: EdgeKind = EdgeKind::SiblingOf;

pub const SELF_LABEL: &str = "Self";
pub const DISTANT_LABEL: &str = "Distant relative";

/// One label in its neutral, male and female forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
  pub neutral: &'static str,
  pub male:    &'static str,
  pub female:  &'static str,
}

impl Label {
  const fn new(neutral: &'static str, male: &'static str, female: &'static str) -> Self {
    Self { neutral, male, female }
  }

  const fn same(all: &'static str) -> Self { Self::new(all, all, all) }

  pub fn pick(&self, gender: Gender) -> &'static str {
    match gender {
      Gender::Male => self.male,
      Gender::Female => self.female,
      Gender::Other => self.neutral,
    }
  }
}

// ─── Rule table ──────────────────────────────────────────────────────────────

#[rustfmt::skip]
static RULES: &[(&[EdgeKind], Label)] = &[
  // One step.
  (&[PARENT],  Label::new("Parent", "Father", "Mother")),
  (&[CHILD],   Label::new("Child", "Son", "Daughter")),
  (&[SPOUSE],  Label::new("Spouse", "Husband", "Wife")),
  (&[PARTNER], Label::same("Partner")),
  (&[SIBLING], Label::new("Sibling", "Brother", "Sister")),

  // Two steps, blood.
  (&[PARENT, PARENT],   Label::new("Grandparent", "Grandfather", "Grandmother")),
  (&[CHILD, CHILD],     Label::new("Grandchild", "Grandson", "Granddaughter")),
  (&[PARENT, CHILD],    Label::new("Sibling", "Brother", "Sister")),
  (&[PARENT, SIBLING],  Label::new("Aunt/Uncle", "Uncle", "Aunt")),
  (&[SIBLING, CHILD],   Label::new("Niece/Nephew", "Nephew", "Niece")),
  (&[SIBLING, SIBLING], Label::new("Sibling", "Brother", "Sister")),
  (&[SIBLING, PARENT],  Label::new("Parent", "Father", "Mother")),
  (&[CHILD, SIBLING],   Label::new("Child", "Son", "Daughter")),
  (&[CHILD, PARENT],    Label::same("Co-parent")),

  // Two steps, by marriage.
  (&[PARENT, SPOUSE],   Label::new("Step-parent", "Stepfather", "Stepmother")),
  (&[PARENT, PARTNER],  Label::new("Step-parent", "Stepfather", "Stepmother")),
  (&[SPOUSE, CHILD],    Label::new("Stepchild", "Stepson", "Stepdaughter")),
  (&[PARTNER, CHILD],   Label::new("Stepchild", "Stepson", "Stepdaughter")),
  (&[SPOUSE, PARENT],   Label::new("Parent-in-law", "Father-in-law", "Mother-in-law")),
  (&[PARTNER, PARENT],  Label::new("Parent-in-law", "Father-in-law", "Mother-in-law")),
  (&[CHILD, SPOUSE],    Label::new("Child-in-law", "Son-in-law", "Daughter-in-law")),
  (&[CHILD, PARTNER],   Label::new("Child-in-law", "Son-in-law", "Daughter-in-law")),
  (&[SPOUSE, SIBLING],  Label::new("Sibling-in-law", "Brother-in-law", "Sister-in-law")),
  (&[PARTNER, SIBLING], Label::new("Sibling-in-law", "Brother-in-law", "Sister-in-law")),
  (&[SIBLING, SPOUSE],  Label::new("Brother/Sister-in-law", "Brother-in-law", "Sister-in-law")),
  (&[SIBLING, PARTNER], Label::new("Brother/Sister-in-law", "Brother-in-law", "Sister-in-law")),

  // Three steps.
  (&[PARENT, PARENT, PARENT],  Label::new("Great-grandparent", "Great-grandfather", "Great-grandmother")),
  (&[CHILD, CHILD, CHILD],     Label::new("Great-grandchild", "Great-grandson", "Great-granddaughter")),
  (&[PARENT, PARENT, CHILD],   Label::new("Aunt/Uncle", "Uncle", "Aunt")),
  (&[PARENT, PARENT, SIBLING], Label::new("Great-aunt/Great-uncle", "Great-uncle", "Great-aunt")),
  (&[PARENT, SIBLING, CHILD],  Label::same("First cousin")),
  (&[PARENT, CHILD, CHILD],    Label::new("Niece/Nephew", "Nephew", "Niece")),
  (&[SIBLING, CHILD, CHILD],   Label::new("Grandniece/Grandnephew", "Grandnephew", "Grandniece")),
  (&[PARENT, SIBLING, SPOUSE], Label::new("Aunt/Uncle", "Uncle", "Aunt")),
  (&[SPOUSE, SIBLING, CHILD],  Label::new("Niece/Nephew", "Nephew", "Niece")),
  (&[PARENT, CHILD, SPOUSE],   Label::new("Brother/Sister-in-law", "Brother-in-law", "Sister-in-law")),
  (&[SPOUSE, PARENT, CHILD],   Label::new("Sibling-in-law", "Brother-in-law", "Sister-in-law")),
  (&[PARENT, PARENT, SPOUSE],  Label::new("Step-grandparent", "Step-grandfather", "Step-grandmother")),
  (&[SPOUSE, CHILD, CHILD],    Label::new("Step-grandchild", "Step-grandson", "Step-granddaughter")),
  (&[SPOUSE, PARENT, PARENT],  Label::new("Grandparent-in-law", "Grandfather-in-law", "Grandmother-in-law")),
  (&[CHILD, CHILD, SPOUSE],    Label::new("Grandchild-in-law", "Grandson-in-law", "Granddaughter-in-law")),

  // Four steps.
  (&[PARENT, PARENT, CHILD, CHILD],    Label::same("First cousin")),
  (&[PARENT, PARENT, PARENT, CHILD],   Label::new("Great-aunt/Great-uncle", "Great-uncle", "Great-aunt")),
  (&[PARENT, PARENT, SIBLING, CHILD],  Label::same("First cousin once removed")),
  (&[PARENT, SIBLING, CHILD, CHILD],   Label::same("First cousin once removed")),
  (&[PARENT, CHILD, CHILD, CHILD],     Label::new("Grandniece/Grandnephew", "Grandnephew", "Grandniece")),
];

/// Find the rule for an exact step sequence.
pub fn lookup(steps: &[EdgeKind]) -> Option<Label> {
  RULES
    .iter()
    .find(|(pattern, _)| *pattern == steps)
    .map(|(_, label)| *label)
}

/// "Distant relative (N steps)".
pub fn distant(steps: usize) -> String { format!("{DISTANT_LABEL} ({steps} steps)") }

/// Compose the label for a path from the viewpoint to a target of `gender`.
pub fn compose(steps: &[EdgeKind], gender: Gender, config: &EngineConfig) -> String {
  if steps.is_empty() {
    return SELF_LABEL.to_owned();
  }
  if steps.len() > config.max_label_hops {
    return distant(steps.len());
  }
  let gender = if config.gendered_labels { gender } else { Gender::Other };
  match lookup(steps) {
    Some(label) => label.pick(gender).to_owned(),
    None => distant(steps.len()),
  }
}

/// Adjust a composed label for a path that crosses an ended relationship.
pub fn former(label: String, steps: &[EdgeKind], gender: Gender, config: &EngineConfig) -> String {
  match steps {
    [SPOUSE] if config.gendered_labels && gender == Gender::Male => "Former husband".to_owned(),
    [SPOUSE] if config.gendered_labels && gender == Gender::Female => "Former wife".to_owned(),
    [SPOUSE] => "Former spouse".to_owned(),
    [PARTNER] => "Former partner".to_owned(),
    _ => format!("{label} (former)"),
  }
}
