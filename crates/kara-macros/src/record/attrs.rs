//! Parsers for `#[record(...)]` on the struct and `#[field(...)]` on its fields.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, Meta, Path, Result, Token,
};

/// The semantic kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `#[field(ShortText)]`
    ShortText,
    /// `#[field(LongText)]`
    LongText,
    /// `#[field(Choice, choices = ...)]`
    Choice,
    /// `#[field(Numeric)]`
    Numeric,
    /// `#[field(Boolean)]`
    Boolean,
    /// `#[field(Date)]`
    Date,
    /// `#[field(Reference, to = Model)]`
    Reference,
    /// `#[field(ManyRelation, to = Model)]`
    ManyRelation,
}

impl Kind {
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "ShortText" | "short_text" => Ok(Kind::ShortText),
            "LongText" | "long_text" => Ok(Kind::LongText),
            "Choice" | "choice" => Ok(Kind::Choice),
            "Numeric" | "numeric" => Ok(Kind::Numeric),
            "Boolean" | "boolean" => Ok(Kind::Boolean),
            "Date" | "date" => Ok(Kind::Date),
            "Reference" | "reference" => Ok(Kind::Reference),
            "ManyRelation" | "many_relation" => Ok(Kind::ManyRelation),
            other => Err(Error::new(
                ident.span(),
                format!(
                    "unknown field kind: '{}'. Expected one of: ShortText, LongText, Choice, Numeric, Boolean, Date, Reference, ManyRelation",
                    other
                ),
            )),
        }
    }

    /// Name of the matching `kara_query::FieldKind` variant.
    pub fn variant(self) -> &'static str {
        match self {
            Kind::ShortText => "ShortText",
            Kind::LongText => "LongText",
            Kind::Choice => "Choice",
            Kind::Numeric => "Numeric",
            Kind::Boolean => "Boolean",
            Kind::Date => "Date",
            Kind::Reference => "Reference",
            Kind::ManyRelation => "ManyRelation",
        }
    }

    /// Returns `true` for kinds that need a `to = Model` target.
    pub fn is_relation(self) -> bool {
        matches!(self, Kind::Reference | Kind::ManyRelation)
    }
}

/// Field-level attributes from `#[field(...)]`.
#[derive(Clone)]
pub struct FieldAttr {
    pub kind: Option<Kind>,
    pub skip: bool,
    /// Custom field name (default: the Rust field name).
    pub rename: Option<String>,
    /// Human-readable label (default: the name with `_` as spaces).
    pub label: Option<String>,
    /// Expression evaluating to the choice set.
    pub choices: Option<Expr>,
    /// Related model for relation kinds.
    pub to: Option<Path>,
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            kind: None,
            skip: false,
            rename: None,
            label: None,
            choices: None,
            to: None,
            span: Span::call_site(),
        }
    }
}

fn lit_str(value: &Expr, what: &str) -> Result<String> {
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(s), ..
    }) = value
    {
        Ok(s.value())
    } else {
        Err(Error::new(
            value.span(),
            format!("{what} must be a string literal"),
        ))
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr {
            span: input.span(),
            ..FieldAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.kind = Some(Kind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(p.span(), "expected a field kind or skip"));
                    }
                }

                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(lit_str(&nv.value, "rename")?);
                    } else if nv.path.is_ident("label") {
                        attr.label = Some(lit_str(&nv.value, "label")?);
                    } else if nv.path.is_ident("choices") {
                        attr.choices = Some(nv.value.clone());
                    } else if nv.path.is_ident("to") {
                        match &nv.value {
                            Expr::Path(p) => attr.to = Some(p.path.clone()),
                            other => {
                                return Err(Error::new(other.span(), "to must be a model type path"))
                            }
                        }
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename, label, choices or to",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown field attribute. Expected a field kind, skip, rename = \"...\", label = \"...\", choices = ..., or to = ...",
                    ));
                }
            }
        }

        if let Some(kind) = attr.kind {
            if kind.is_relation() && attr.to.is_none() {
                return Err(Error::new(
                    attr.span,
                    "relation fields need a target: to = Model",
                ));
            }
            if !kind.is_relation() && attr.to.is_some() {
                return Err(Error::new(
                    attr.span,
                    "to = ... is only valid on Reference and ManyRelation fields",
                ));
            }
        }

        Ok(attr)
    }
}

/// Extract `#[field(...)]` attributes from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

/// Struct-level attributes from `#[record(...)]`.
#[derive(Debug, Clone, Default)]
pub struct RecordAttr {
    /// Model name (default: snake case struct name).
    pub name: Option<String>,
    /// Primary key field (default: `id`).
    pub primary_key: Option<String>,
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    attr.name = Some(lit_str(&nv.value, "name")?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("primary_key") => {
                    attr.primary_key = Some(lit_str(&nv.value, "primary_key")?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: name = \"...\" or primary_key = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract the `#[record(...)]` attribute from a struct's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_field(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    #[test]
    fn test_field_kind() {
        let attr = parse_field("ShortText").unwrap();
        assert_eq!(attr.kind, Some(Kind::ShortText));
        assert!(!attr.skip);
    }

    #[test]
    fn test_field_kind_snake_case() {
        let attr = parse_field("long_text").unwrap();
        assert_eq!(attr.kind, Some(Kind::LongText));
    }

    #[test]
    fn test_field_label_and_rename() {
        let attr = parse_field(r#"Numeric, label = "amount", rename = "price""#).unwrap();
        assert_eq!(attr.kind, Some(Kind::Numeric));
        assert_eq!(attr.label.as_deref(), Some("amount"));
        assert_eq!(attr.rename.as_deref(), Some("price"));
    }

    #[test]
    fn test_field_choices() {
        let attr = parse_field("Choice, choices = KIND_CHOICES").unwrap();
        assert_eq!(attr.kind, Some(Kind::Choice));
        assert!(attr.choices.is_some());
    }

    #[test]
    fn test_field_relation() {
        let attr = parse_field("ManyRelation, to = crate::models::GiftTag").unwrap();
        assert_eq!(attr.kind, Some(Kind::ManyRelation));
        assert!(attr.to.is_some());
    }

    #[test]
    fn test_relation_needs_target() {
        let result = parse_field("Reference");
        assert!(result.is_err());
        assert!(result
            .err()
            .map(|e| e.to_string().contains("need a target"))
            .unwrap_or(false));
    }

    #[test]
    fn test_target_only_on_relations() {
        assert!(parse_field("ShortText, to = Owner").is_err());
    }

    #[test]
    fn test_field_skip() {
        let attr = parse_field("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn test_field_invalid_kind() {
        let result = parse_field("Timestamp");
        assert!(result.is_err());
        assert!(result
            .err()
            .map(|e| e.to_string().contains("unknown field kind"))
            .unwrap_or(false));
    }

    #[test]
    fn test_record_attr() {
        let attr =
            syn::parse_str::<RecordAttr>(r#"name = "cash_gift", primary_key = "uid""#).unwrap();
        assert_eq!(attr.name.as_deref(), Some("cash_gift"));
        assert_eq!(attr.primary_key.as_deref(), Some("uid"));

        assert!(syn::parse_str::<RecordAttr>(r#"table = "x""#).is_err());
    }
}
