// Definitions that are used throughout all modules

// How strictly a basis matrix is checked for lower-triangular form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriangularCheck {
    /// Reject any entry above the diagonal
    #[default]
    Strict,
    /// Drop entries above the diagonal (with a warning)
    Lenient,
}

impl TriangularCheck {
    pub fn from_lenient_flag(lenient: bool) -> Self {
        if lenient {
            TriangularCheck::Lenient
        } else {
            TriangularCheck::Strict
        }
    }
}
