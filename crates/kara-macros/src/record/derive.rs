//! `#[derive(Record)]` expansion: a static schema, `Record`/`Model` impls
//! and one name constant per declared field.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_field_attrs, parse_record_attrs};

pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let record_attrs = parse_record_attrs(&input.attrs)?;
    let model_name = record_attrs
        .name
        .unwrap_or_else(|| to_snake_case(&struct_name.to_string()));
    let primary_key = record_attrs.primary_key.unwrap_or_else(|| "id".to_string());

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut schema_fields: Vec<TokenStream> = Vec::new();
    let mut declared_names: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;

        let kind = match attrs.kind {
            Some(kind) if !attrs.skip => kind,
            _ => continue,
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let label = attrs.label.unwrap_or_else(|| query_name.replace('_', " "));

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            #[doc = concat!("Lookup name of the `", #query_name, "` field.")]
            pub const #const_name: &'static str = #query_name;
        });

        let variant = format_ident!("{}", kind.variant());
        let mut schema_field = quote! {
            ::kara_query::Field::new(#query_name, ::kara_query::FieldKind::#variant, #label)
        };
        if let Some(choices) = &attrs.choices {
            schema_field = quote! { #schema_field.with_choices(#choices) };
        }
        if let Some(target) = &attrs.to {
            schema_field = quote! {
                #schema_field.with_relation(<#target as ::kara_query::Model>::schema)
            };
        }
        schema_fields.push(schema_field);

        field_matches.push(quote! {
            #query_name => ::kara_query::ToValue::to_value(&self.#field_name),
        });
        declared_names.push(query_name);
    }

    if !declared_names.iter().any(|name| *name == primary_key) {
        return Err(Error::new(
            input.ident.span(),
            format!("primary key `{primary_key}` is not a declared #[field]"),
        ));
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::kara_query::Record for #struct_name {
            fn record_schema(&self) -> &'static ::kara_query::Schema {
                <Self as ::kara_query::Model>::schema()
            }

            fn field_value(&self, field: &str) -> ::kara_query::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::kara_query::Value::None,
                }
            }
        }

        impl ::kara_query::Model for #struct_name {
            fn schema() -> &'static ::kara_query::Schema {
                static SCHEMA: ::kara_query::Schema = ::kara_query::Schema {
                    name: #model_name,
                    primary_key: #primary_key,
                    fields: &[#(#schema_fields),*],
                };
                &SCHEMA
            }
        }
    };

    Ok(expanded)
}

fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

/// `CashGift` and `cash-gift` both become `cash_gift`.
fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut after_word_char = false;
    for c in s.chars() {
        match c {
            '_' | '-' => {
                out.push('_');
                after_word_char = false;
            }
            c if c.is_uppercase() => {
                if after_word_char {
                    out.push('_');
                }
                out.extend(c.to_lowercase());
                after_word_char = false;
            }
            c => {
                out.push(c);
                after_word_char = true;
            }
        }
    }
    out
}
