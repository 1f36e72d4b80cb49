/// Tri-state validity of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validity {
    /// Not judged; renders no validation affordance.
    #[default]
    Unset,
    /// Judged valid.
    Valid,
    /// Judged invalid.
    Invalid,
}

impl From<bool> for Validity {
    fn from(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }
}

/// Validity plus whether anyone ever judged the field.
///
/// `explicit` flips to true the first time a consumer assigns validity or a
/// validator runs, and never flips back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    /// Current validity
    pub validity: Validity,
    /// Whether validity was ever determined
    pub explicit: bool,
}

impl ValidityState {
    /// Whether the field renders without any validation affordance.
    pub fn is_neutral(&self) -> bool {
        !self.explicit || self.validity == Validity::Unset
    }

    /// The rendered validity: `Unset` while neutral.
    pub fn shown(&self) -> Validity {
        if self.is_neutral() {
            Validity::Unset
        } else {
            self.validity
        }
    }

    /// Value for `aria-invalid`, or `None` while neutral.
    pub fn aria_invalid(&self) -> Option<bool> {
        match self.shown() {
            Validity::Unset => None,
            Validity::Valid => Some(false),
            Validity::Invalid => Some(true),
        }
    }
}
