//! EDIFACT envelope segments (UNB/UNZ, UNH/UNT)
//!
//! Each envelope type is a thin typed view over a raw [`Segment`] with a
//! fixed tag and named positional accessors. Validation is never implicit:
//! callers invoke [`EnvelopeSegment::validate`] when they want it.

use crate::segment::{Element, Segment};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use tracing::debug;

/// Shared construction and validation contract of the envelope segments
pub trait EnvelopeSegment: Sized {
    /// Fixed segment tag
    const TAG: &'static str;

    /// Wrap a segment without checking its tag
    fn from_segment_unchecked(segment: Segment) -> Self;

    /// Borrow the underlying raw segment
    fn segment(&self) -> &Segment;

    /// Give back the underlying raw segment
    fn into_segment(self) -> Segment;

    /// Build from a flat sequence of positional values
    fn from_elements<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Element>,
    {
        Self::from_segment_unchecked(Segment::new(Self::TAG, elements))
    }

    /// Wrap a tokenized segment, checking its tag
    fn from_segment(segment: Segment) -> Result<Self> {
        if segment.tag != Self::TAG {
            return Err(Error::TagMismatch {
                location: Self::TAG.to_string(),
                expected: Self::TAG.to_string(),
                found: segment.tag,
            });
        }
        Ok(Self::from_segment_unchecked(segment))
    }

    /// Positional elements
    fn elements(&self) -> &[Element] {
        &self.segment().elements
    }

    /// Check the segment's fields; accepts anything unless overridden
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Read component `index` of element `position`, failing when absent
fn field(segment: &Segment, position: usize, index: usize) -> Result<&str> {
    segment
        .component(position, index)
        .ok_or_else(|| Error::MissingElement {
            tag: segment.tag.clone(),
            position,
            component: index,
        })
}

macro_rules! envelope_segment {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            segment: Segment,
        }

        impl EnvelopeSegment for $name {
            const TAG: &'static str = $tag;

            fn from_segment_unchecked(segment: Segment) -> Self {
                Self { segment }
            }

            fn segment(&self) -> &Segment {
                &self.segment
            }

            fn into_segment(self) -> Segment {
                self.segment
            }
        }
    };
}

envelope_segment!(
    /// UNZ - Interchange Trailer segment
    UnzSegment,
    "UNZ"
);
envelope_segment!(
    /// UNH - Message Header segment
    UnhSegment,
    "UNH"
);
envelope_segment!(
    /// UNT - Message Trailer segment
    UntSegment,
    "UNT"
);

// ============================================================================
// UNB
// ============================================================================

/// Minimum number of UNB elements (syntax, sender, recipient, date/time)
const UNB_MIN_ELEMENTS: usize = 4;

/// UNB - Interchange Header segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbSegment {
    segment: Segment,
}

impl EnvelopeSegment for UnbSegment {
    const TAG: &'static str = "UNB";

    fn from_segment_unchecked(segment: Segment) -> Self {
        Self { segment }
    }

    fn segment(&self) -> &Segment {
        &self.segment
    }

    fn into_segment(self) -> Segment {
        self.segment
    }

    /// Fails on fewer than four elements or a timestamp not 6 or 8 long
    fn validate(&self) -> Result<()> {
        self.validate_header()
    }
}

impl UnbSegment {
    /// Date of preparation (element 3, component 0)
    pub fn timestamp(&self) -> Result<&str> {
        field(&self.segment, 3, 0)
    }

    /// Time of preparation (element 3, component 1)
    pub fn time(&self) -> Result<&str> {
        field(&self.segment, 3, 1)
    }

    /// Syntax identifier, e.g. "UNOC"
    pub fn syntax_identifier(&self) -> Result<&str> {
        field(&self.segment, 0, 0)
    }

    /// Syntax version number
    pub fn syntax_version(&self) -> Result<&str> {
        field(&self.segment, 0, 1)
    }

    /// Sender identification
    pub fn sender(&self) -> Result<&str> {
        field(&self.segment, 1, 0)
    }

    /// Recipient identification
    pub fn recipient(&self) -> Result<&str> {
        field(&self.segment, 2, 0)
    }

    /// Interchange control reference
    pub fn control_reference(&self) -> Result<&str> {
        field(&self.segment, 4, 0)
    }

    /// `strftime` pattern matching the timestamp length.
    ///
    /// Syntax version 3 writes two-digit years, version 4 four digits. Files
    /// in the wild mix both, so the pattern follows the length of the date
    /// rather than the declared version. `None` for any other length; call
    /// [`EnvelopeSegment::validate`] first to rule that out.
    #[must_use]
    pub fn datetime_format(&self) -> Option<&'static str> {
        match self.timestamp().ok()?.chars().count() {
            6 => Some("%y%m%d-%H%M"),
            8 => Some("%Y%m%d-%H%M"),
            _ => None,
        }
    }

    /// Date and time of preparation, parsed with [`Self::datetime_format`]
    pub fn datetime(&self) -> Result<NaiveDateTime> {
        self.validate_header()?;
        let timestamp = self.timestamp()?;
        let format = self
            .datetime_format()
            .ok_or_else(|| Error::MalformedTimestamp {
                timestamp: timestamp.to_string(),
            })?;
        let value = format!("{}-{}", timestamp, self.time()?);

        NaiveDateTime::parse_from_str(&value, format)
            .map_err(|source| Error::InvalidDateTime { value, source })
    }

    fn validate_header(&self) -> Result<()> {
        let found = self.segment.elements.len();
        if found < UNB_MIN_ELEMENTS {
            debug!("UNB has {} elements, expected {}", found, UNB_MIN_ELEMENTS);
            return Err(Error::MissingElements {
                tag: Self::TAG.to_string(),
                expected: UNB_MIN_ELEMENTS,
                found,
            });
        }

        let timestamp = self.segment.component(3, 0).unwrap_or("");
        if !matches!(timestamp.chars().count(), 6 | 8) {
            debug!("UNB timestamp '{}' is malformed", timestamp);
            return Err(Error::MalformedTimestamp {
                timestamp: timestamp.to_string(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// UNZ
// ============================================================================

impl UnzSegment {
    /// Build a trailer from message count and control reference
    pub fn new(control_count: usize, control_reference: impl Into<String>) -> Self {
        Self::from_elements([control_count.to_string(), control_reference.into()])
    }

    /// Interchange control count (element 0)
    pub fn control_count(&self) -> Result<&str> {
        field(&self.segment, 0, 0)
    }

    /// Interchange control reference (element 1)
    pub fn control_reference(&self) -> Result<&str> {
        field(&self.segment, 1, 0)
    }
}

// ============================================================================
// UNH
// ============================================================================

/// Message type identifier (composite S009 in UNH)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTypeIdentifier {
    /// Message type (e.g., "UTILMD", "ORDERS")
    pub message_type: String,
    /// Message version number (e.g., "D")
    pub version: String,
    /// Message release number (e.g., "11A", "96A")
    pub release: String,
    /// Controlling agency (e.g., "UN")
    pub controlling_agency: String,
    /// Association assigned code (e.g., "5.2e")
    pub association_code: Option<String>,
}

impl MessageTypeIdentifier {
    fn into_element(self) -> Element {
        let mut components = vec![
            self.message_type,
            self.version,
            self.release,
            self.controlling_agency,
        ];
        components.extend(self.association_code);
        Element::Composite(components)
    }
}

impl UnhSegment {
    /// Build a header from reference number and message identifier
    pub fn build(reference: impl Into<String>, identifier: MessageTypeIdentifier) -> Self {
        Self::from_elements([Element::Simple(reference.into()), identifier.into_element()])
    }

    /// Message reference number (element 0)
    pub fn message_reference_number(&self) -> Result<&str> {
        field(&self.segment, 0, 0)
    }

    /// Message type (element 1, component 0)
    pub fn message_type(&self) -> Result<&str> {
        field(&self.segment, 1, 0)
    }

    /// Message version number (element 1, component 1)
    pub fn version(&self) -> Result<&str> {
        field(&self.segment, 1, 1)
    }

    /// Message release number (element 1, component 2)
    pub fn release(&self) -> Result<&str> {
        field(&self.segment, 1, 2)
    }

    /// Controlling agency (element 1, component 3)
    pub fn controlling_agency(&self) -> Result<&str> {
        field(&self.segment, 1, 3)
    }

    /// Association assigned code (element 1, component 4)
    pub fn association_code(&self) -> Result<&str> {
        field(&self.segment, 1, 4)
    }

    /// Common access reference (element 2, component 0)
    pub fn common_access_reference(&self) -> Result<&str> {
        field(&self.segment, 2, 0)
    }

    /// Sequence of transfers (element 3, component 0)
    pub fn sequence_of_transfer(&self) -> Result<&str> {
        field(&self.segment, 3, 0)
    }

    /// First and last transfer (element 3, component 1)
    pub fn first_and_last_transfer(&self) -> Result<&str> {
        field(&self.segment, 3, 1)
    }

    /// Version and release joined, e.g. "D.11A"
    pub fn message_version(&self) -> Result<String> {
        Ok(format!("{}.{}", self.version()?, self.release()?))
    }

    /// The whole S009 composite
    pub fn message_identifier(&self) -> Result<MessageTypeIdentifier> {
        Ok(MessageTypeIdentifier {
            message_type: self.message_type()?.to_string(),
            version: self.version()?.to_string(),
            release: self.release()?.to_string(),
            controlling_agency: self.controlling_agency()?.to_string(),
            association_code: self.association_code().ok().map(str::to_string),
        })
    }
}

// ============================================================================
// UNT
// ============================================================================

impl UntSegment {
    /// Build a trailer from segment count and message reference
    pub fn new(segment_count: usize, reference: impl Into<String>) -> Self {
        Self::from_elements([segment_count.to_string(), reference.into()])
    }

    /// Trailer for a message body of `body_segments` segments (UNH and UNT added)
    pub fn for_message_body(body_segments: usize, reference: impl Into<String>) -> Self {
        Self::new(body_segments + 2, reference)
    }

    /// Number of segments in the message (element 0)
    pub fn segment_count(&self) -> Result<&str> {
        field(&self.segment, 0, 0)
    }

    /// Message reference number (element 1)
    pub fn message_reference_number(&self) -> Result<&str> {
        field(&self.segment, 1, 0)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Any of the four envelope segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    InterchangeHeader(UnbSegment),
    InterchangeTrailer(UnzSegment),
    MessageHeader(UnhSegment),
    MessageTrailer(UntSegment),
}

impl Envelope {
    /// Tag of the wrapped segment
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Envelope::InterchangeHeader(_) => UnbSegment::TAG,
            Envelope::InterchangeTrailer(_) => UnzSegment::TAG,
            Envelope::MessageHeader(_) => UnhSegment::TAG,
            Envelope::MessageTrailer(_) => UntSegment::TAG,
        }
    }

    /// Borrow the underlying raw segment
    #[must_use]
    pub fn segment(&self) -> &Segment {
        match self {
            Envelope::InterchangeHeader(s) => s.segment(),
            Envelope::InterchangeTrailer(s) => s.segment(),
            Envelope::MessageHeader(s) => s.segment(),
            Envelope::MessageTrailer(s) => s.segment(),
        }
    }

    /// Validate the wrapped segment
    pub fn validate(&self) -> Result<()> {
        match self {
            Envelope::InterchangeHeader(s) => s.validate(),
            Envelope::InterchangeTrailer(s) => s.validate(),
            Envelope::MessageHeader(s) => s.validate(),
            Envelope::MessageTrailer(s) => s.validate(),
        }
    }
}

impl TryFrom<Segment> for Envelope {
    type Error = Segment;

    /// Dispatch by tag; non-envelope segments are handed back unchanged
    fn try_from(segment: Segment) -> std::result::Result<Self, Segment> {
        let envelope = match segment.tag.as_str() {
            "UNB" => Envelope::InterchangeHeader(UnbSegment::from_segment_unchecked(segment)),
            "UNZ" => Envelope::InterchangeTrailer(UnzSegment::from_segment_unchecked(segment)),
            "UNH" => Envelope::MessageHeader(UnhSegment::from_segment_unchecked(segment)),
            "UNT" => Envelope::MessageTrailer(UntSegment::from_segment_unchecked(segment)),
            _ => return Err(segment),
        };
        Ok(envelope)
    }
}

// ============================================================================
// Pair validation
// ============================================================================

/// Check a message trailer against its header and body length
pub fn validate_message(unh: &UnhSegment, unt: &UntSegment, body_segments: usize) -> Result<()> {
    let header_ref = unh.message_reference_number()?;
    let trailer_ref = unt.message_reference_number()?;
    if header_ref != trailer_ref {
        return Err(Error::Envelope(format!(
            "Message reference mismatch: UNH='{header_ref}', UNT='{trailer_ref}'"
        )));
    }

    // +2 for UNH and UNT
    let expected = (body_segments + 2).to_string();
    let declared = unt.segment_count()?;
    if declared != expected {
        return Err(Error::Envelope(format!(
            "Segment count mismatch: UNT says {declared}, counted {expected} with UNH/UNT"
        )));
    }

    Ok(())
}

/// Check an interchange trailer against its header and message count
pub fn validate_interchange(unb: &UnbSegment, unz: &UnzSegment, messages: usize) -> Result<()> {
    let header_ref = unb.control_reference()?;
    let trailer_ref = unz.control_reference()?;
    if header_ref != trailer_ref {
        return Err(Error::Envelope(format!(
            "Interchange control reference mismatch: UNB='{header_ref}', UNZ='{trailer_ref}'"
        )));
    }

    let declared = unz.control_count()?;
    if declared != messages.to_string() {
        return Err(Error::Envelope(format!(
            "Message count mismatch: UNZ says {declared}, actual count is {messages}"
        )));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unb(timestamp: &str) -> UnbSegment {
        UnbSegment::from_elements([
            Element::from(vec!["UNOC", "3"]),
            Element::from(vec!["9900000000003", "500"]),
            Element::from(vec!["9900000000004", "500"]),
            Element::from(vec![timestamp, "1200"]),
            Element::from("REF0001"),
        ])
    }

    fn sample_unh() -> UnhSegment {
        UnhSegment::from_elements([
            Element::from("1"),
            Element::from(vec!["UTILMD", "D", "11A", "UN", "5.2e"]),
            Element::from(vec!["ref1"]),
            Element::from(vec!["1", "C"]),
        ])
    }

    #[test]
    fn test_unb_timestamp_lengths_pass() {
        assert!(unb("200101").validate().is_ok());
        assert!(unb("20200101").validate().is_ok());
    }

    #[test]
    fn test_unb_timestamp_other_lengths_fail() {
        for timestamp in ["", "2001", "2001011", "202001011"] {
            let err = unb(timestamp).validate().unwrap_err();
            assert!(
                matches!(err, Error::MalformedTimestamp { .. }),
                "timestamp {timestamp:?} gave {err:?}"
            );
            assert!(err.is_syntax_error());
        }
    }

    #[test]
    fn test_unb_absent_timestamp_is_malformed() {
        let header = UnbSegment::from_elements([
            Element::from(vec!["UNOC", "3"]),
            Element::from("SENDER"),
            Element::from("RECEIVER"),
            Element::Composite(Vec::new()),
        ]);

        let err = header.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp { ref timestamp } if timestamp.is_empty()
        ));
        assert!(err.is_syntax_error());
    }

    #[test]
    fn test_unb_missing_elements() {
        let short = UnbSegment::from_elements([
            Element::from(vec!["UNOC", "3"]),
            Element::from("SENDER"),
            Element::from("RECEIVER"),
        ]);

        let err = short.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingElements { expected: 4, found: 3, .. }
        ));
        assert!(err.is_syntax_error());
    }

    #[test]
    fn test_unb_accessors() {
        let header = unb("200101");

        assert_eq!(header.syntax_identifier().unwrap(), "UNOC");
        assert_eq!(header.syntax_version().unwrap(), "3");
        assert_eq!(header.sender().unwrap(), "9900000000003");
        assert_eq!(header.recipient().unwrap(), "9900000000004");
        assert_eq!(header.timestamp().unwrap(), "200101");
        assert_eq!(header.control_reference().unwrap(), "REF0001");
    }

    #[test]
    fn test_unb_datetime_format() {
        assert_eq!(unb("200101").datetime_format(), Some("%y%m%d-%H%M"));
        assert_eq!(unb("20200101").datetime_format(), Some("%Y%m%d-%H%M"));
        assert_eq!(unb("2001").datetime_format(), None);
    }

    #[test]
    fn test_unb_datetime() {
        let expected = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        assert_eq!(unb("200101").datetime().unwrap(), expected);
        assert_eq!(unb("20200101").datetime().unwrap(), expected);
    }

    #[test]
    fn test_unb_datetime_invalid_date() {
        let err = unb("201301").datetime().unwrap_err();
        assert!(matches!(err, Error::InvalidDateTime { .. }));
    }

    #[test]
    fn test_unz_accessors() {
        let unz = UnzSegment::from_elements(["5", "12345"]);

        assert!(unz.validate().is_ok());
        assert_eq!(unz.control_count().unwrap(), "5");
        assert_eq!(unz.control_reference().unwrap(), "12345");
    }

    #[test]
    fn test_unh_accessors() {
        let unh = sample_unh();

        assert!(unh.validate().is_ok());
        assert_eq!(unh.message_reference_number().unwrap(), "1");
        assert_eq!(unh.message_type().unwrap(), "UTILMD");
        assert_eq!(unh.version().unwrap(), "D");
        assert_eq!(unh.release().unwrap(), "11A");
        assert_eq!(unh.controlling_agency().unwrap(), "UN");
        assert_eq!(unh.association_code().unwrap(), "5.2e");
        assert_eq!(unh.common_access_reference().unwrap(), "ref1");
        assert_eq!(unh.sequence_of_transfer().unwrap(), "1");
        assert_eq!(unh.first_and_last_transfer().unwrap(), "C");
        assert_eq!(unh.message_version().unwrap(), "D.11A");
    }

    #[test]
    fn test_unh_simple_common_access_reference() {
        let unh = UnhSegment::from_elements([
            Element::from("1"),
            Element::from(vec!["UTILMD", "D", "11A", "UN", "5.2e"]),
            Element::from("UNB_DE0020_nr_1"),
        ]);

        assert_eq!(unh.common_access_reference().unwrap(), "UNB_DE0020_nr_1");
        assert!(matches!(
            unh.sequence_of_transfer(),
            Err(Error::MissingElement { position: 3, .. })
        ));
    }

    #[test]
    fn test_unh_build_round_trip() {
        let identifier = MessageTypeIdentifier {
            message_type: "ORDERS".to_string(),
            version: "D".to_string(),
            release: "96A".to_string(),
            controlling_agency: "UN".to_string(),
            association_code: None,
        };

        let unh = UnhSegment::build("42", identifier.clone());
        assert_eq!(unh.message_identifier().unwrap(), identifier);
        assert_eq!(unh.segment().elements.len(), 2);
    }

    #[test]
    fn test_unt_is_always_valid() {
        assert!(UntSegment::from_elements(Vec::<Element>::new()).validate().is_ok());

        let unt = UntSegment::for_message_body(4, "1");
        assert_eq!(unt.segment_count().unwrap(), "6");
        assert_eq!(unt.message_reference_number().unwrap(), "1");
    }

    #[test]
    fn test_from_segment_checks_tag() {
        let segment = Segment::new("UNT", ["2", "1"]);
        assert!(UntSegment::from_segment(segment.clone()).is_ok());

        let err = UnhSegment::from_segment(segment).unwrap_err();
        assert!(matches!(
            err,
            Error::TagMismatch { ref expected, ref found, .. }
                if expected == "UNH" && found == "UNT"
        ));
    }

    #[test]
    fn test_envelope_dispatch() {
        let envelope = Envelope::try_from(Segment::new("UNZ", ["1", "REF"])).unwrap();
        assert_eq!(envelope.tag(), "UNZ");
        assert!(envelope.validate().is_ok());

        let bad = Envelope::try_from(unb("2001").into_segment()).unwrap();
        assert!(bad.validate().is_err());

        let other = Segment::new("BGM", ["E01"]);
        assert_eq!(Envelope::try_from(other.clone()), Err(other));
    }

    #[test]
    fn test_validate_message_pair() {
        let unh = sample_unh();

        assert!(validate_message(&unh, &UntSegment::for_message_body(3, "1"), 3).is_ok());
        assert!(matches!(
            validate_message(&unh, &UntSegment::new(4, "2"), 2),
            Err(Error::Envelope(msg)) if msg.contains("reference mismatch")
        ));
        assert!(matches!(
            validate_message(&unh, &UntSegment::new(9, "1"), 2),
            Err(Error::Envelope(msg)) if msg.contains("count mismatch")
        ));
    }

    #[test]
    fn test_validate_interchange_pair() {
        let header = unb("200101");

        assert!(validate_interchange(&header, &UnzSegment::new(2, "REF0001"), 2).is_ok());
        assert!(validate_interchange(&header, &UnzSegment::new(2, "OTHER"), 2).is_err());
        assert!(validate_interchange(&header, &UnzSegment::new(1, "REF0001"), 2).is_err());
    }
}
