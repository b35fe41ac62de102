//! Stream identity and matching
//!
//! A [`StreamDescriptor`] is an immutable metadata snapshot of one stream as
//! observed by the discovery service. A [`StreamQuery`] is the name/type
//! predicate shared by inlet bindings and ad-hoc catalog lookups.

/// Nominal rate value indicating irregular (non-uniform) sampling.
pub const IRREGULAR_RATE: f64 = 0.0;

/// Immutable metadata snapshot of one discovered stream
///
/// Produced by the discovery service; never mutated after construction. The
/// `name` and `stream_type` fields are non-empty for any well-formed
/// descriptor coming off the network.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDescriptor {
    /// Human-readable stream name (the catalog's dedup key)
    pub name: String,

    /// Content type (e.g. "EEG", "Markers")
    pub stream_type: String,

    /// Number of channels per sample
    pub channel_count: usize,

    /// Unique ID of the publishing session
    pub uid: String,

    /// Session ID of the publishing host
    pub session_id: String,

    /// Publisher-assigned source ID (stable across restarts)
    pub source_id: String,

    /// Hostname of the publishing machine
    pub host_name: String,

    /// Nominal sampling rate in Hz, [`IRREGULAR_RATE`] if irregular
    pub nominal_rate: f64,

    /// Protocol version of the publisher
    pub version: u32,
}

impl StreamDescriptor {
    /// Create a descriptor with the given name and type
    ///
    /// The remaining metadata defaults to empty/zero and can be filled in
    /// with the builder setters.
    pub fn new(name: impl Into<String>, stream_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stream_type: stream_type.into(),
            channel_count: 0,
            uid: String::new(),
            session_id: String::new(),
            source_id: String::new(),
            host_name: String::new(),
            nominal_rate: IRREGULAR_RATE,
            version: 0,
        }
    }

    /// Set the channel count
    pub fn channel_count(mut self, count: usize) -> Self {
        self.channel_count = count;
        self
    }

    /// Set the session-unique stream ID
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Set the session ID
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Set the source ID
    pub fn source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Set the publishing host name
    pub fn host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    /// Set the nominal sampling rate
    pub fn nominal_rate(mut self, rate: f64) -> Self {
        self.nominal_rate = rate;
        self
    }

    /// Set the publisher protocol version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Whether the stream has no fixed sampling rate
    pub fn is_irregular(&self) -> bool {
        self.nominal_rate == IRREGULAR_RATE
    }
}

impl std::fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.stream_type)
    }
}

/// Name/type predicate for selecting a stream
///
/// An empty field is a wildcard; both fields empty matches nothing, so an
/// unconfigured query can never silently grab an arbitrary stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamQuery {
    /// Required stream name, empty to accept any name
    pub name: String,

    /// Required stream type, empty to accept any type
    pub stream_type: String,
}

impl StreamQuery {
    /// Create a query on both name and type
    pub fn new(name: impl Into<String>, stream_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stream_type: stream_type.into(),
        }
    }

    /// Create a query matching on name only
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Create a query matching on type only
    pub fn by_type(stream_type: impl Into<String>) -> Self {
        Self::new("", stream_type)
    }

    /// Whether both fields are empty, in which case nothing ever matches
    pub fn is_unconstrained(&self) -> bool {
        self.name.is_empty() && self.stream_type.is_empty()
    }

    /// Test a descriptor against this query
    ///
    /// Both fields set requires both to be equal; one field set requires that
    /// field to be equal; neither set never matches. Exact string equality
    /// only.
    pub fn matches(&self, descriptor: &StreamDescriptor) -> bool {
        match (self.name.is_empty(), self.stream_type.is_empty()) {
            (false, false) => {
                self.name == descriptor.name && self.stream_type == descriptor.stream_type
            }
            (false, true) => self.name == descriptor.name,
            (true, false) => self.stream_type == descriptor.stream_type,
            (true, true) => false,
        }
    }
}

impl std::fmt::Display for StreamQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "name={:?} type={:?}", self.name, self.stream_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(name: &str, stream_type: &str) -> StreamDescriptor {
        StreamDescriptor::new(name, stream_type)
    }

    #[test]
    fn test_both_fields_must_match() {
        let query = StreamQuery::new("A", "B");

        assert!(query.matches(&desc("A", "B")));
        assert!(!query.matches(&desc("A", "X")));
        assert!(!query.matches(&desc("X", "B")));
    }

    #[test]
    fn test_name_only() {
        let query = StreamQuery::by_name("A");

        assert!(query.matches(&desc("A", "B")));
        assert!(query.matches(&desc("A", "anything")));
        assert!(!query.matches(&desc("B", "A")));
    }

    #[test]
    fn test_type_only() {
        let query = StreamQuery::by_type("B");

        assert!(query.matches(&desc("A", "B")));
        assert!(!query.matches(&desc("A", "X")));
    }

    #[test]
    fn test_unconstrained_never_matches() {
        let query = StreamQuery::default();

        assert!(query.is_unconstrained());
        assert!(!query.matches(&desc("A", "B")));
        assert!(!query.matches(&desc("", "")));
    }

    #[test]
    fn test_exact_equality_only() {
        let query = StreamQuery::by_name("EEG");

        // No prefix/substring or case-insensitive matching
        assert!(!query.matches(&desc("EEG2", "EEG")));
        assert!(!query.matches(&desc("eeg", "EEG")));
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = StreamDescriptor::new("EEG", "EEG")
            .channel_count(8)
            .uid("uid-1")
            .source_id("amp-01")
            .host_name("lab-pc")
            .nominal_rate(250.0)
            .version(110);

        assert_eq!(descriptor.channel_count, 8);
        assert_eq!(descriptor.uid, "uid-1");
        assert_eq!(descriptor.nominal_rate, 250.0);
        assert!(!descriptor.is_irregular());
        assert_eq!(format!("{descriptor}"), "EEG (EEG)");
    }

    #[test]
    fn test_irregular_rate_default() {
        let descriptor = StreamDescriptor::new("Markers", "Markers");

        assert!(descriptor.is_irregular());
    }
}
