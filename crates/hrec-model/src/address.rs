//! Dotted key syntax.
//!
//! An address is a list of segments joined by `.`. Each segment is a field
//! name optionally followed directly by an instance index:
//!
//! ```text
//! Person0.Email1   => [Person[0], Email[1]]   (value address)
//! Person0.Email    => [Person[0], Email]      (field address)
//! ```
//!
//! The index is always the maximal run of trailing ASCII digits, so field
//! names themselves may never end in a digit.

use std::fmt;
use std::str::FromStr;

use crate::error::{RecordError, Result};

/// Separator between address segments.
pub const SEPARATOR: char = '.';

/// Check that `name` can be used as a field name.
///
/// Rejects empty names, names containing the separator and names ending in
/// a digit (they would be read back as an index).
pub fn validate_field_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "field names must not be empty"
    } else if name.contains(SEPARATOR) {
        "'.' is a protected character in field names"
    } else if name.ends_with(|c: char| c.is_ascii_digit()) {
        "field names must not end in a digit"
    } else {
        return Ok(());
    };
    Err(RecordError::InvalidFieldName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// One `.`-delimited piece of an address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    pub name: String,
    pub index: Option<usize>,
}

impl Segment {
    /// A segment without an index.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_field_name(&name)?;
        Ok(Self { name, index: None })
    }

    /// A segment addressing a single instance.
    pub fn indexed(name: impl Into<String>, index: usize) -> Result<Self> {
        let name = name.into();
        validate_field_name(&name)?;
        Ok(Self {
            name,
            index: Some(index),
        })
    }

    /// Split a piece of dotted key syntax into field name and index.
    pub fn parse(piece: &str) -> Result<Self> {
        let name_len = piece.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (name, digits) = piece.split_at(name_len);
        if name.is_empty() {
            return Err(RecordError::malformed(piece, "segment has no field name"));
        }
        let index = if digits.is_empty() {
            None
        } else {
            let index = digits
                .parse::<usize>()
                .map_err(|e| RecordError::malformed(piece, format!("bad index: {e}")))?;
            Some(index)
        };
        Ok(Self {
            name: name.to_string(),
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            name: self.name.clone(),
            index: Some(index),
        }
    }

    #[must_use]
    pub fn without_index(&self) -> Self {
        Self {
            name: self.name.clone(),
            index: None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}{}", self.name, index),
            None => f.write_str(&self.name),
        }
    }
}

/// A parsed, non-empty dotted key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(Vec<Segment>);

impl Address {
    /// Parse dotted key syntax.
    pub fn parse(dotted: &str) -> Result<Self> {
        if dotted.is_empty() {
            return Err(RecordError::malformed(dotted, "address is empty"));
        }
        let segments = dotted
            .split(SEPARATOR)
            .map(|piece| {
                if piece.is_empty() {
                    Err(RecordError::malformed(dotted, "empty segment"))
                } else {
                    Segment::parse(piece).map_err(|e| match e {
                        RecordError::MalformedAddress { reason, .. } => {
                            RecordError::malformed(dotted, reason)
                        }
                        other => other,
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(segments))
    }

    /// Build an address from pre-split segments, checking every field name.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(RecordError::malformed("", "address is empty"));
        }
        for segment in &segments {
            validate_field_name(&segment.name)?;
        }
        Ok(Self(segments))
    }

    /// Join segments back into dotted key syntax.
    pub fn format(segments: &[Segment]) -> Result<String> {
        for segment in segments {
            validate_field_name(&segment.name)?;
        }
        Ok(segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("."))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed address.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the address has more than one segment.
    pub fn is_nested(&self) -> bool {
        self.0.len() > 1
    }

    pub fn last(&self) -> &Segment {
        // Construction guarantees at least one segment.
        &self.0[self.0.len() - 1]
    }

    /// Inner segments and the final one.
    pub fn split_last(&self) -> (&Segment, &[Segment]) {
        let (inner, last) = self.0.split_at(self.0.len() - 1);
        (&last[0], inner)
    }

    /// The address without its final segment, if any remain.
    pub fn parent(&self) -> Option<Address> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Append a segment.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Address {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Replace the final segment's index.
    #[must_use]
    pub fn with_last_index(&self, index: Option<usize>) -> Address {
        let mut segments = self.0.clone();
        let last = segments.len() - 1;
        segments[last].index = index;
        Self(segments)
    }

    /// True when every segment, including the last, carries an index.
    pub fn is_value_address(&self) -> bool {
        self.0.iter().all(Segment::is_indexed)
    }

    /// Value operations need an index on every segment.
    pub fn require_all_indexed(&self) -> Result<()> {
        if let Some(segment) = self.0.iter().find(|s| !s.is_indexed()) {
            return Err(RecordError::malformed(
                self.to_string(),
                format!("a portion of the path ({segment}) lacks an index"),
            ));
        }
        Ok(())
    }

    /// Field operations need an index on every inner segment and none on the
    /// last.
    pub fn require_only_inner_indexed(&self) -> Result<()> {
        let (last, inner) = self.split_last();
        if let Some(segment) = inner.iter().find(|s| !s.is_indexed()) {
            return Err(RecordError::malformed(
                self.to_string(),
                format!("a portion of the path ({segment}) lacks an index"),
            ));
        }
        if last.is_indexed() {
            return Err(RecordError::malformed(
                self.to_string(),
                "operations on fields can not accept an index at the leaf",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Anything a record operation accepts as a path: dotted strings or
/// pre-split segments.
pub trait IntoAddress {
    fn into_address(self) -> Result<Address>;
}

impl IntoAddress for &str {
    fn into_address(self) -> Result<Address> {
        Address::parse(self)
    }
}

impl IntoAddress for String {
    fn into_address(self) -> Result<Address> {
        Address::parse(&self)
    }
}

impl IntoAddress for &String {
    fn into_address(self) -> Result<Address> {
        Address::parse(self)
    }
}

impl IntoAddress for Address {
    fn into_address(self) -> Result<Address> {
        Ok(self)
    }
}

impl IntoAddress for &Address {
    fn into_address(self) -> Result<Address> {
        Ok(self.clone())
    }
}

impl IntoAddress for Vec<Segment> {
    fn into_address(self) -> Result<Address> {
        Address::from_segments(self)
    }
}

impl IntoAddress for &[Segment] {
    fn into_address(self) -> Result<Address> {
        Address::from_segments(self.to_vec())
    }
}
