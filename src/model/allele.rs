use std::fmt;
use std::sync::Arc;

/// Bases string used for the no-call allele.
const NO_CALL_BASES: &str = ".";
/// Symbol for the spanning-deletion allele.
const SPANNING_DELETION_BASES: &str = "*";
/// Symbol for the placeholder "any other possible allele" sentinel.
const PLACEHOLDER_BASES: &str = "<NON_REF>";

/// An immutable allele: a base sequence (or symbol) plus a reference flag.
///
/// Distinguished forms are the no-call allele (`.`), the spanning-deletion
/// allele (`*`), symbolic alleles (`<...>`), and the placeholder sentinel
/// `<NON_REF>` that merged records use to stand in for "any other possible
/// allele". When the placeholder appears in a record's allele list it must
/// be the last element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allele {
    bases: Arc<str>,
    is_reference: bool,
}

impl Allele {
    /// Construct a reference allele from its bases.
    pub fn reference(bases: impl Into<Arc<str>>) -> Self {
        Self {
            bases: bases.into(),
            is_reference: true,
        }
    }

    /// Construct an alternate allele from its bases.
    pub fn alternate(bases: impl Into<Arc<str>>) -> Self {
        Self {
            bases: bases.into(),
            is_reference: false,
        }
    }

    /// The canonical no-call allele.
    pub fn no_call() -> Self {
        Self::alternate(NO_CALL_BASES)
    }

    /// The spanning-deletion allele (`*`).
    pub fn spanning_deletion() -> Self {
        Self::alternate(SPANNING_DELETION_BASES)
    }

    /// The placeholder sentinel representing "any other possible allele".
    pub fn placeholder() -> Self {
        Self::alternate(PLACEHOLDER_BASES)
    }

    /// Base sequence (or symbol) of this allele.
    pub fn bases(&self) -> &str {
        &self.bases
    }

    /// Whether this allele is the record's reference allele.
    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    /// Whether this allele is the no-call sentinel.
    pub fn is_no_call(&self) -> bool {
        self.bases.as_ref() == NO_CALL_BASES
    }

    /// Whether this allele is called (anything but the no-call sentinel).
    pub fn is_called(&self) -> bool {
        !self.is_no_call()
    }

    /// Whether this allele is symbolic (`<...>` form).
    pub fn is_symbolic(&self) -> bool {
        self.bases.starts_with('<')
    }

    /// Whether this allele is the placeholder sentinel.
    pub fn is_placeholder(&self) -> bool {
        self.bases.as_ref() == PLACEHOLDER_BASES
    }

    /// Whether this allele is the spanning-deletion symbol.
    pub fn is_spanning_deletion(&self) -> bool {
        self.bases.as_ref() == SPANNING_DELETION_BASES
    }

    /// Base length of the allele. Symbolic and sentinel forms count as 1,
    /// so they never promote a site to indel status on their own.
    pub fn length(&self) -> usize {
        if self.is_symbolic() || self.is_no_call() || self.is_spanning_deletion() {
            1
        } else {
            self.bases.len()
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reference {
            write!(f, "{}*", self.bases)
        } else {
            write!(f, "{}", self.bases)
        }
    }
}
