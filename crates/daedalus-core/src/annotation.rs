//! Route annotations.
//!
//! Annotations carry documentation that cannot be read off the handler's
//! types: summaries, extra responses, header and query parameters, or an
//! input model that differs from the bound input. They never change how a
//! request is bound or rendered.
//!
//! ```
//! use daedalus_core::{Annotation, HeaderDoc};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let annotations = vec![
//!     Annotation::summary("Remove a fruit from the market"),
//!     Annotation::response(StatusCode::BAD_REQUEST, "Bad request"),
//!     Annotation::response_with_examples(
//!         StatusCode::NOT_FOUND,
//!         "No such fruit",
//!         [("X-Market-Listing-Size", HeaderDoc::new::<i64>("Listing size"))],
//!         [("missing", json!({"kind": "not-found", "message": "no fruit named kiwi"}))],
//!     ),
//!     Annotation::header::<String>("X-Request-Source", "Where the call comes from"),
//! ];
//! assert_eq!(annotations.len(), 4);
//! ```

use std::any::TypeId;
use std::fmt;

use daedalus_schema::{Describe, Inspector, SchemaDescription};
use http::StatusCode;
use indexmap::IndexMap;
use serde_json::Value;

/// A type referenced from an annotation, described when the route is
/// registered.
#[derive(Clone, Copy)]
pub struct TypeModel {
    type_id: TypeId,
    rust_name: &'static str,
    describe: fn(&mut Inspector) -> SchemaDescription,
}

fn describe_type<T: Describe>(inspector: &mut Inspector) -> SchemaDescription {
    inspector.describe::<T>()
}

impl TypeModel {
    /// The model of `T`.
    #[must_use]
    pub fn of<T: Describe>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            describe: describe_type::<T>,
        }
    }

    /// Type identity.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name, for diagnostics.
    #[must_use]
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// Describes the type with `inspector`.
    pub fn describe(&self, inspector: &mut Inspector) -> SchemaDescription {
        (self.describe)(inspector)
    }
}

impl fmt::Debug for TypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeModel").field(&self.rust_name).finish()
    }
}

impl PartialEq for TypeModel {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeModel {}

/// A header documented on a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDoc {
    /// Human-readable description
    pub description: String,
    /// Header value type
    pub model: TypeModel,
}

impl HeaderDoc {
    /// A header whose value has type `T`.
    pub fn new<T: Describe>(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            model: TypeModel::of::<T>(),
        }
    }
}

/// A documented response.
///
/// Responses are additive: a status the route already documents only gains
/// headers and examples, never a new description or body model.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDoc {
    /// Status code
    pub status: StatusCode,
    /// Human-readable description
    pub description: String,
    /// Body model, if the response has one
    pub model: Option<TypeModel>,
    /// Response headers by name
    pub headers: IndexMap<String, HeaderDoc>,
    /// Named body examples
    pub examples: IndexMap<String, Value>,
}

impl ResponseDoc {
    /// A response without body model, headers or examples.
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
            model: None,
            headers: IndexMap::new(),
            examples: IndexMap::new(),
        }
    }

    /// Sets the body model.
    #[must_use]
    pub fn model<T: Describe>(mut self) -> Self {
        self.model = Some(TypeModel::of::<T>());
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, header: HeaderDoc) -> Self {
        self.headers.insert(name.into(), header);
        self
    }

    /// Adds a named example.
    #[must_use]
    pub fn example(mut self, name: impl Into<String>, value: Value) -> Self {
        self.examples.insert(name.into(), value);
        self
    }
}

/// A documented request parameter (path, header or query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    /// Parameter name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Value type
    pub model: TypeModel,
    /// Whether the parameter must be present
    pub required: bool,
}

/// Documentation attached to a route.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// One-line summary. The last one wins.
    Summary(String),
    /// Longer description. The last one wins.
    Description(String),
    /// Extra tag after the group tags.
    Tag(String),
    /// Operation id replacing the derived one. The last one wins.
    OperationId(String),
    /// Marks the operation deprecated.
    Deprecated,
    /// An additional documented response.
    Response(ResponseDoc),
    /// A request header parameter.
    Header(ParamDoc),
    /// Declares a path parameter that the input type does not carry.
    PathParam(ParamDoc),
    /// A query parameter.
    QueryParam(ParamDoc),
    /// Documents the request body as this type instead of the bound input.
    InputModel(TypeModel),
}

impl Annotation {
    /// `Summary(text)`.
    pub fn summary(text: impl Into<String>) -> Self {
        Self::Summary(text.into())
    }

    /// `Description(text)`.
    pub fn description(text: impl Into<String>) -> Self {
        Self::Description(text.into())
    }

    /// `Tag(name)`.
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// `OperationId(id)`.
    pub fn operation_id(id: impl Into<String>) -> Self {
        Self::OperationId(id.into())
    }

    /// `Deprecated`.
    #[must_use]
    pub fn deprecated() -> Self {
        Self::Deprecated
    }

    /// A response without a body model.
    pub fn response(status: StatusCode, description: impl Into<String>) -> Self {
        Self::Response(ResponseDoc::new(status, description))
    }

    /// A response whose body is a `T`.
    pub fn response_with_model<T: Describe>(
        status: StatusCode,
        description: impl Into<String>,
    ) -> Self {
        Self::Response(ResponseDoc::new(status, description).model::<T>())
    }

    /// A response with headers and named examples.
    pub fn response_with_examples<H, E, HK, EK>(
        status: StatusCode,
        description: impl Into<String>,
        headers: H,
        examples: E,
    ) -> Self
    where
        H: IntoIterator<Item = (HK, HeaderDoc)>,
        E: IntoIterator<Item = (EK, Value)>,
        HK: Into<String>,
        EK: Into<String>,
    {
        let mut doc = ResponseDoc::new(status, description);
        doc.headers = headers.into_iter().map(|(k, v)| (k.into(), v)).collect();
        doc.examples = examples.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::Response(doc)
    }

    /// An optional request header of type `T`.
    pub fn header<T: Describe>(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Header(ParamDoc {
            name: name.into(),
            description: description.into(),
            model: TypeModel::of::<T>(),
            required: false,
        })
    }

    /// A path parameter of type `T`.
    pub fn path_param<T: Describe>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::PathParam(ParamDoc {
            name: name.into(),
            description: description.into(),
            model: TypeModel::of::<T>(),
            required: true,
        })
    }

    /// A query parameter of type `T`.
    pub fn query_param<T: Describe>(
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        Self::QueryParam(ParamDoc {
            name: name.into(),
            description: description.into(),
            model: TypeModel::of::<T>(),
            required,
        })
    }

    /// Documents the request body as `T`.
    #[must_use]
    pub fn input_model<T: Describe>() -> Self {
        Self::InputModel(TypeModel::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_model_describes_lazily() {
        let model = TypeModel::of::<Vec<u16>>();
        let mut inspector = Inspector::default();
        assert_eq!(
            model.describe(&mut inspector),
            SchemaDescription::array(inspector.describe::<u16>())
        );
        assert!(model.rust_name().contains("Vec"));
    }

    #[test]
    fn test_type_model_equality_is_type_identity() {
        assert_eq!(TypeModel::of::<String>(), TypeModel::of::<String>());
        assert_ne!(TypeModel::of::<String>(), TypeModel::of::<i64>());
    }

    #[test]
    fn test_response_with_examples_keeps_order() {
        let annotation = Annotation::response_with_examples(
            StatusCode::CONFLICT,
            "Already listed",
            [("X-Existing", HeaderDoc::new::<String>("Existing fruit"))],
            [("second", json!(2)), ("first", json!(1))],
        );
        let Annotation::Response(doc) = annotation else {
            panic!("expected a response annotation");
        };
        assert_eq!(doc.status, StatusCode::CONFLICT);
        assert!(doc.model.is_none());
        assert_eq!(doc.examples.keys().collect::<Vec<_>>(), vec!["second", "first"]);
        assert_eq!(doc.headers["X-Existing"].description, "Existing fruit");
    }

    #[test]
    fn test_param_constructors() {
        let Annotation::PathParam(param) = Annotation::path_param::<u64>("id", "Fruit id") else {
            panic!("expected a path parameter");
        };
        assert!(param.required);

        let Annotation::Header(header) = Annotation::header::<String>("X-Trace", "Trace") else {
            panic!("expected a header");
        };
        assert!(!header.required);

        let Annotation::QueryParam(query) =
            Annotation::query_param::<u32>("limit", "Page size", false)
        else {
            panic!("expected a query parameter");
        };
        assert_eq!(query.name, "limit");
    }
}
