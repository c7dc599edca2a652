//! Media types and `Accept` negotiation.

use daedalus_schema::{PrimitiveKind, SchemaArena, SchemaDescription};
use mime::Mime;

/// `application/yaml`.
pub const APPLICATION_YAML: &str = "application/yaml";

/// Request media types the default binder decodes, in documentation order.
pub const DEFAULT_REQUEST_MEDIA_TYPES: [&str; 3] = [
    "application/json",
    APPLICATION_YAML,
    "application/x-www-form-urlencoded",
];

/// Response media types the default renderer offers, preferred first.
pub const DEFAULT_RESPONSE_MEDIA_TYPES: [&str; 2] = ["application/json", APPLICATION_YAML];

/// Body encodings understood by the default binder and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json` and any `+json` type
    Json,
    /// `application/yaml`, `application/x-yaml`, `text/yaml`
    Yaml,
    /// `application/x-www-form-urlencoded`
    Form,
    /// `text/plain`
    Text,
}

impl BodyFormat {
    /// Classifies a media type.
    ///
    /// ```rust
    /// use daedalus_extract::BodyFormat;
    ///
    /// let problem: mime::Mime = "application/problem+json".parse().unwrap();
    /// assert_eq!(BodyFormat::from_mime(&problem), Some(BodyFormat::Json));
    /// assert_eq!(BodyFormat::from_mime(&mime::TEXT_CSV), None);
    /// ```
    pub fn from_mime(media: &Mime) -> Option<Self> {
        let (ty, sub) = (media.type_(), media.subtype());
        if (ty == mime::APPLICATION && sub == mime::JSON) || media.suffix() == Some(mime::JSON) {
            return Some(Self::Json);
        }
        match (ty.as_str(), sub.as_str()) {
            ("application", "yaml" | "x-yaml") | ("text", "yaml") => Some(Self::Yaml),
            ("application", "x-www-form-urlencoded") => Some(Self::Form),
            ("text", "plain") => Some(Self::Text),
            _ => None,
        }
    }

    /// Whether the default binder can decode a body of this format into a
    /// value of `schema`.
    ///
    /// Forms need a flat object (repeated keys may fill arrays of scalars);
    /// plain text needs a string input.
    pub fn can_decode(self, schema: &SchemaDescription, arena: &SchemaArena) -> bool {
        match self {
            Self::Json | Self::Yaml => true,
            Self::Form => flat_object(schema, arena, true),
            Self::Text => matches!(
                arena.resolve(schema),
                SchemaDescription::Primitive {
                    kind: PrimitiveKind::String,
                    ..
                } | SchemaDescription::Any
                    | SchemaDescription::Empty
            ),
        }
    }

    /// Whether the default renderer can encode a value of `schema` in this
    /// format. Only forms are picky: a flat object of scalars.
    pub fn can_encode(self, schema: &SchemaDescription, arena: &SchemaArena) -> bool {
        match self {
            Self::Json | Self::Yaml | Self::Text => true,
            Self::Form => flat_object(schema, arena, false),
        }
    }

    /// Canonical `Content-Type` value for responses in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => APPLICATION_YAML,
            Self::Form => "application/x-www-form-urlencoded",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

fn flat_object(schema: &SchemaDescription, arena: &SchemaArena, repeated: bool) -> bool {
    let scalar = |schema: &SchemaDescription| {
        matches!(
            arena.resolve(schema),
            SchemaDescription::Primitive { .. }
                | SchemaDescription::Enumeration(_)
                | SchemaDescription::Any
        )
    };
    let value = |schema: &SchemaDescription| match arena.resolve(schema) {
        SchemaDescription::Array(items) => repeated && scalar(&**items),
        _ => scalar(schema),
    };

    match arena.resolve(schema) {
        SchemaDescription::Object(object) => object.iter().all(|(_, field)| value(&field.schema)),
        SchemaDescription::Map(values) => value(&**values),
        SchemaDescription::Any | SchemaDescription::Empty => true,
        _ => false,
    }
}

/// One parsed `Accept` range.
#[derive(Debug)]
struct AcceptRange {
    media: Mime,
    quality: f32,
}

impl AcceptRange {
    /// 2 for `type/sub`, 1 for `type/*`, 0 for `*/*`, `None` if no match.
    fn specificity(&self, offer: &Mime) -> Option<u8> {
        if self.media.type_() == mime::STAR {
            return Some(0);
        }
        if self.media.type_() != offer.type_() {
            return None;
        }
        if self.media.subtype() == mime::STAR {
            return Some(1);
        }
        (self.media.subtype() == offer.subtype()).then_some(2)
    }
}

fn parse_accept(accept: &str) -> Vec<AcceptRange> {
    accept
        .split(',')
        .filter_map(|part| part.trim().parse::<Mime>().ok())
        .map(|media| {
            let quality = media
                .get_param("q")
                .and_then(|q| q.as_str().parse::<f32>().ok())
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);
            AcceptRange { media, quality }
        })
        .collect()
}

/// Picks the offer the client prefers.
///
/// Each offer is weighed by the most specific range that matches it;
/// `q=0` excludes an offer. Ties go to the earlier offer. Without an
/// `Accept` header the first offer wins. Returns `None` when the header
/// accepts none of the offers.
///
/// ```rust
/// use daedalus_extract::negotiate;
///
/// let offers: Vec<mime::Mime> = vec![
///     "application/json".parse().unwrap(),
///     "application/yaml".parse().unwrap(),
/// ];
///
/// let chosen = negotiate(Some("application/yaml, application/json;q=0.5"), &offers);
/// assert_eq!(chosen.map(|m| m.essence_str()), Some("application/yaml"));
///
/// assert_eq!(negotiate(None, &offers), offers.first());
/// assert_eq!(negotiate(Some("text/html"), &offers), None);
/// ```
pub fn negotiate<'a>(accept: Option<&str>, offers: &'a [Mime]) -> Option<&'a Mime> {
    let accept = match accept.map(str::trim) {
        Some(accept) if !accept.is_empty() => accept,
        _ => return offers.first(),
    };
    let ranges = parse_accept(accept);
    if ranges.is_empty() {
        return offers.first();
    }

    let mut best: Option<(&Mime, f32)> = None;
    for offer in offers {
        let quality = ranges
            .iter()
            .filter_map(|range| range.specificity(offer).map(|s| (s, range.quality)))
            .max_by_key(|(specificity, _)| *specificity)
            .map_or(0.0, |(_, q)| q);

        if quality > 0.0 && best.map_or(true, |(_, q)| quality > q) {
            best = Some((offer, quality));
        }
    }
    best.map(|(offer, _)| offer)
}
