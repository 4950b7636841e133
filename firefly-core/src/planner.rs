/// Role of a single path segment in the namespace chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Routes the segment on to the default gateway of the next level.
    Intermediate,
    /// Exposes the real backend through the shadow components of this level.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyStep {
    /// 1-based depth of the step, used to derive the level's resource names.
    pub index: usize,
    pub token: String,
    pub kind: StepKind,
}

impl HierarchyStep {
    fn new(index: usize, token: &str, kind: StepKind) -> Self {
        Self {
            index,
            token: token.to_owned(),
            kind,
        }
    }
}

/// Splits an ingress path into at most `max_depth` segments and tags every
/// segment but the last as an intermediate hop. When there are more segments
/// than `max_depth` allows, the last step carries the unsplit remainder.
///
/// A path that yields nothing to split (or a depth of zero) still produces a
/// single terminal step carrying the raw path, so every observed route gets
/// exactly one shadow chain.
pub fn plan(path: &str, max_depth: usize) -> Vec<HierarchyStep> {
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() || max_depth == 0 {
        return vec![HierarchyStep::new(1, path, StepKind::Terminal)];
    }

    let segments = trimmed.splitn(max_depth, '/').collect::<Vec<_>>();
    let last = segments.len() - 1;

    segments
        .into_iter()
        .enumerate()
        .map(|(i, token)| {
            let kind = match i == last {
                true => StepKind::Terminal,
                false => StepKind::Intermediate,
            };

            HierarchyStep::new(i + 1, token, kind)
        })
        .collect()
}
