//! Parsing of serde attributes and doc comments.
//!
//! Only the attributes that change the serialized shape are interpreted; the
//! rest (`with`, `bound`, `deny_unknown_fields`, ...) are accepted and ignored.

use syn::{
    punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Lit, Meta, Token,
};

/// serde's `rename_all` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    pub fn parse(value: &str, span: proc_macro2::Span) -> syn::Result<Self> {
        Ok(match value {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            other => {
                return Err(syn::Error::new(
                    span,
                    format!("unknown rename_all rule: {other}"),
                ))
            }
        })
    }

    /// Applies the rule to a snake_case field identifier.
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_string(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => field
                .split('_')
                .map(capitalize)
                .collect(),
            Self::Camel => {
                let pascal = Self::Pascal.apply_to_field(field);
                lowercase_first(&pascal)
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.replace('_', "-").to_ascii_uppercase(),
        }
    }

    /// Applies the rule to a PascalCase variant identifier.
    pub fn apply_to_variant(self, variant: &str) -> String {
        match self {
            Self::Pascal => variant.to_string(),
            Self::Lower => variant.to_ascii_lowercase(),
            Self::Upper => variant.to_ascii_uppercase(),
            Self::Camel => lowercase_first(variant),
            Self::Snake => {
                let mut snake = String::with_capacity(variant.len() + 4);
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            Self::ScreamingSnake => Self::Snake.apply_to_variant(variant).to_ascii_uppercase(),
            Self::Kebab => Self::Snake.apply_to_variant(variant).replace('_', "-"),
            Self::ScreamingKebab => Self::ScreamingSnake
                .apply_to_variant(variant)
                .replace('_', "-"),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_lowercase().to_string() + chars.as_str()
    })
}

/// Container-level attributes.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    pub rename: Option<String>,
    pub rename_all: Option<RenameRule>,
    pub transparent: bool,
    pub default: bool,
    /// `tag`, `content` or `untagged` was present.
    pub tagged: bool,
}

impl ContainerAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for meta in serde_metas(attrs)? {
            let key = meta_key(&meta);
            match key.as_str() {
                "rename" => out.rename = string_value(&meta)?,
                "rename_all" => {
                    if let Some(value) = string_value(&meta)? {
                        out.rename_all = Some(RenameRule::parse(&value, meta.span())?);
                    }
                }
                "transparent" => out.transparent = true,
                "default" => out.default = true,
                "tag" | "content" | "untagged" => out.tagged = true,
                _ => {}
            }
        }
        Ok(out)
    }
}

/// Field-level attributes.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub optional: bool,
    pub flatten: bool,
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        let mut skip_serializing = false;
        let mut skip_deserializing = false;

        for meta in serde_metas(attrs)? {
            match meta_key(&meta).as_str() {
                "rename" => out.rename = string_value(&meta)?,
                "skip" => out.skip = true,
                "skip_serializing" => skip_serializing = true,
                "skip_deserializing" => skip_deserializing = true,
                "default" | "skip_serializing_if" => out.optional = true,
                "flatten" => out.flatten = true,
                _ => {}
            }
        }

        if skip_serializing && skip_deserializing {
            out.skip = true;
        } else if skip_serializing || skip_deserializing {
            out.optional = true;
        }
        Ok(out)
    }

    /// The published name, falling back to the rule or the declared name.
    pub fn published_name(&self, declared: &str, rule: Option<RenameRule>) -> String {
        match self.rename.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => rule.map_or_else(|| declared.to_string(), |r| r.apply_to_field(declared)),
        }
    }
}

/// Collects the items of every `#[serde(...)]` attribute.
fn serde_metas(attrs: &[Attribute]) -> syn::Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let list = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        metas.extend(list);
    }
    Ok(metas)
}

fn meta_key(meta: &Meta) -> String {
    meta.path()
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// `key = "value"` yields the value; `key(...)` lists (serialize/deserialize
/// splits) yield `None`.
fn string_value(meta: &Meta) -> syn::Result<Option<String>> {
    match meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Ok(Some(s.value())),
            other => Err(syn::Error::new(other.span(), "expected string literal")),
        },
        Meta::List(_) => Ok(None),
        Meta::Path(path) => Err(syn::Error::new(path.span(), "expected `= \"...\"`")),
    }
}

/// Joins `///` lines into one description.
pub fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

/// Strips the raw identifier prefix.
pub fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}
