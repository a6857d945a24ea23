use std::fmt;

/// Which form the builder currently has open. At most one form is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderMode {
    #[default]
    Idle,
    Adding,
    /// Editing the step at this position.
    Editing(usize),
}

impl BuilderMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, BuilderMode::Idle)
    }

    /// The mode after the step at `removed` is deleted. An edit of that step is closed
    /// and edits of later steps follow their step down by one.
    pub(crate) fn after_removal(self, removed: usize) -> Self {
        match self {
            BuilderMode::Editing(i) if i == removed => BuilderMode::Idle,
            BuilderMode::Editing(i) if i > removed => BuilderMode::Editing(i - 1),
            other => other,
        }
    }

    /// The mode after the step at `from` moves to `to`. An open edit follows its step.
    pub(crate) fn after_move(self, from: usize, to: usize) -> Self {
        match self {
            BuilderMode::Editing(i) if i == from => BuilderMode::Editing(to),
            BuilderMode::Editing(i) if from < i && i <= to => BuilderMode::Editing(i - 1),
            BuilderMode::Editing(i) if to <= i && i < from => BuilderMode::Editing(i + 1),
            other => other,
        }
    }
}

impl fmt::Display for BuilderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderMode::Idle => write!(f, "idle"),
            BuilderMode::Adding => write!(f, "adding a step"),
            BuilderMode::Editing(i) => write!(f, "editing step {}", i),
        }
    }
}
