//! Weighted upstream target lists.
//!
//! # Responsibilities
//! - Hold the upstream locations one forward rule may dispatch to
//! - Pick one target per request, weighted-random
//! - Fill the `{0}{1}` URL template with the route captures

/// One upstream location, expressed as a URL template.
///
/// The template carries two placeholders: `{0}` for the matched resource
/// name and `{1}` for the remainder of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub weight: u32,
    pub template: String,
}

impl Target {
    pub fn new(weight: u32, template: impl Into<String>) -> Self {
        Self {
            weight,
            template: template.into(),
        }
    }

    /// Fill the template with the two route captures.
    pub fn url_for(&self, resource: &str, rest: &str) -> String {
        self.template.replace("{0}", resource).replace("{1}", rest)
    }
}

/// A weighted list of upstream targets for one backend.
#[derive(Debug, Clone, Default)]
pub struct TargetList {
    targets: Vec<Target>,
}

impl TargetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list with exactly one entry, the common case for a forward rule.
    pub fn single(weight: u32, template: impl Into<String>) -> Self {
        let mut list = Self::new();
        list.add(weight, template);
        list
    }

    pub fn add(&mut self, weight: u32, template: impl Into<String>) {
        self.targets.push(Target::new(weight, template));
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Pick one target, weighted-random. None when the list is empty or
    /// all weights are zero.
    pub fn pick(&self) -> Option<&Target> {
        let total: u32 = self.targets.iter().map(|t| t.weight).sum();
        if total == 0 {
            return None;
        }

        let mut roll = fastrand::u32(..total);
        for target in &self.targets {
            if roll < target.weight {
                return Some(target);
            }
            roll -= target.weight;
        }
        None
    }
}
