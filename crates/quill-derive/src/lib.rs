//! Derive macro for quill models.
//!
//! This crate provides `#[derive(Model)]`, re-exported by `quill-core`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Ident, LitInt,
    LitStr, Path, PathArguments, Type,
};

/// Derives `quill_core::Model` for a struct with named fields.
///
/// The struct must have an `id: Option<i64>` field; every other field is a
/// column, in declaration order.
///
/// # Field Attributes
///
/// - `#[field(integer)]`, `float`, `char`, `text`, `boolean`, `datetime` -
///   Selects the column type (optional, inferred from the Rust type)
/// - `#[field(nullable)]` - Drops `NOT NULL` (implied by `Option<_>`)
/// - `#[field(default = expr)]` - Value used when none is supplied
/// - `#[field(max_length = 120)]` - Length of a `char` column (default 255)
/// - `#[field(foreign_key = Model)]` - References `Model`'s `id`; the column
///   is named `{field}_id`
/// - `#[field(on_delete = "SET NULL")]` - Foreign key delete action
///
/// # Generated Items
///
/// For a struct `Message`, this macro implements `Model` with
/// `NAME = "Message"` and `TABLE = "messages_message"`.
#[proc_macro_derive(Model, attributes(field))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_model_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_model_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let model_name = struct_name.to_string();
    let table_name = table_name(&model_name);

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model derive does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Model derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Model derive only supports structs",
            ));
        }
    };

    let mut has_id = false;
    let mut columns: Vec<ColumnInfo> = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        if ident == "id" {
            has_id = true;
            continue;
        }
        columns.push(ColumnInfo::from_field(ident, &field.ty, &field.attrs)?);
    }
    if !has_id {
        return Err(syn::Error::new_spanned(
            struct_name,
            "Model derive requires an `id: Option<i64>` field",
        ));
    }

    let meta = expand_meta(&model_name, &table_name, &columns);
    let accessors = expand_accessors(&model_name, &columns);
    let from_values = expand_from_values(&model_name, &columns);

    Ok(quote! {
        impl ::quill_core::Model for #struct_name {
            const NAME: &'static str = #model_name;
            const TABLE: &'static str = #table_name;

            #meta

            fn id(&self) -> ::std::option::Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: ::std::option::Option<i64>) {
                self.id = id;
            }

            #accessors

            #from_values
        }
    })
}

/// `meta()`, building the `ModelMeta` once.
fn expand_meta(model_name: &str, table_name: &str, columns: &[ColumnInfo]) -> TokenStream2 {
    let field_metas = columns.iter().map(|c| {
        let name = c.ident.to_string();
        let descriptor = c.descriptor();
        quote! { ::quill_core::FieldMeta::new(#name, #descriptor) }
    });

    quote! {
        fn meta() -> &'static ::quill_core::ModelMeta {
            static META: ::std::sync::OnceLock<::quill_core::ModelMeta> =
                ::std::sync::OnceLock::new();
            META.get_or_init(|| {
                ::quill_core::ModelMeta::new(
                    #model_name,
                    #table_name,
                    ::std::vec![#(#field_metas),*],
                )
            })
        }
    }
}

/// `value` and `set_value`, matching a column or field name.
fn expand_accessors(model_name: &str, columns: &[ColumnInfo]) -> TokenStream2 {
    let patterns: Vec<TokenStream2> = columns.iter().map(ColumnInfo::pattern).collect();
    let idents: Vec<&Ident> = columns.iter().map(|c| &c.ident).collect();
    let column_names: Vec<&str> = columns.iter().map(|c| c.column.as_str()).collect();

    quote! {
        fn value(
            &self,
            column: &str,
        ) -> ::std::result::Result<::quill_core::SqlValue, ::quill_core::FieldError> {
            match column {
                "id" => ::std::result::Result::Ok(
                    ::quill_core::ToSqlValue::to_sql_value(self.id),
                ),
                #(
                    #patterns => ::std::result::Result::Ok(
                        ::quill_core::ToSqlValue::to_sql_value(
                            ::std::clone::Clone::clone(&self.#idents),
                        ),
                    ),
                )*
                other => ::std::result::Result::Err(
                    ::quill_core::FieldError::unknown(#model_name, other),
                ),
            }
        }

        fn set_value(
            &mut self,
            column: &str,
            value: ::quill_core::SqlValue,
        ) -> ::std::result::Result<(), ::quill_core::FieldError> {
            match column {
                "id" => {
                    self.id = ::quill_core::FromSqlValue::from_sql_value(value)
                        .map_err(|e| ::quill_core::FieldError::invalid(#model_name, "id", e))?;
                }
                #(
                    #patterns => {
                        self.#idents = ::quill_core::FromSqlValue::from_sql_value(value)
                            .map_err(|e| {
                                ::quill_core::FieldError::invalid(#model_name, #column_names, e)
                            })?;
                    }
                )*
                other => {
                    return ::std::result::Result::Err(
                        ::quill_core::FieldError::unknown(#model_name, other),
                    );
                }
            }
            ::std::result::Result::Ok(())
        }
    }
}

/// `from_values`, taking each field from the map and rejecting leftovers.
fn expand_from_values(model_name: &str, columns: &[ColumnInfo]) -> TokenStream2 {
    let idents: Vec<&Ident> = columns.iter().map(|c| &c.ident).collect();
    let column_names: Vec<&str> = columns.iter().map(|c| c.column.as_str()).collect();
    let locals: Vec<Ident> = (0..columns.len())
        .map(|i| format_ident!("field_{}", i))
        .collect();
    let types: Vec<&Type> = columns.iter().map(|c| &c.ty).collect();
    let indexes: Vec<usize> = (0..columns.len()).collect();
    let fields_binding = if columns.is_empty() {
        quote! {}
    } else {
        quote! { let fields = <Self as ::quill_core::Model>::meta().fields(); }
    };

    quote! {
        fn from_values(
            mut values: ::quill_core::Values,
        ) -> ::std::result::Result<Self, ::quill_core::FieldError> {
            #fields_binding
            let id = match values.take("id") {
                ::std::option::Option::Some(value) => {
                    ::quill_core::FromSqlValue::from_sql_value(value)
                        .map_err(|e| ::quill_core::FieldError::invalid(#model_name, "id", e))?
                }
                ::std::option::Option::None => ::std::option::Option::None,
            };
            #(
                let #locals: #types = ::quill_core::FromSqlValue::from_sql_value(
                    fields[#indexes].take_from(&mut values),
                )
                .map_err(|e| ::quill_core::FieldError::invalid(#model_name, #column_names, e))?;
            )*
            if let ::std::option::Option::Some(key) = values.keys().next() {
                return ::std::result::Result::Err(
                    ::quill_core::FieldError::unknown(#model_name, key),
                );
            }
            ::std::result::Result::Ok(Self {
                id,
                #(#idents: #locals),*
            })
        }
    }
}

/// `Message` becomes `messages_message`.
fn table_name(model_name: &str) -> String {
    let lower = model_name.to_lowercase();
    format!("{lower}s_{lower}")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Integer,
    Float,
    Char,
    Text,
    Boolean,
    DateTime,
    ForeignKey,
}

struct ColumnInfo {
    ident: Ident,
    ty: Type,
    column: String,
    kind: FieldKind,
    nullable: bool,
    default: Option<Expr>,
    max_length: Option<LitInt>,
    target: Option<Path>,
    on_delete: Option<Ident>,
}

#[derive(Default)]
struct FieldAttrs {
    kind: Option<FieldKind>,
    nullable: bool,
    default: Option<Expr>,
    max_length: Option<LitInt>,
    foreign_key: Option<Path>,
    on_delete: Option<Ident>,
}

impl ColumnInfo {
    fn from_field(ident: Ident, ty: &Type, attrs: &[Attribute]) -> syn::Result<Self> {
        let attrs = parse_field_attrs(attrs)?;
        let inner = option_inner(ty);
        let kind = if attrs.foreign_key.is_some() {
            Some(FieldKind::ForeignKey)
        } else {
            attrs.kind.or_else(|| infer_kind(inner.unwrap_or(ty)))
        };
        let kind = kind.ok_or_else(|| {
            syn::Error::new_spanned(
                ty,
                "cannot infer the column type, add e.g. `#[field(text)]`",
            )
        })?;
        if attrs.on_delete.is_some() && kind != FieldKind::ForeignKey {
            return Err(syn::Error::new_spanned(
                &ident,
                "`on_delete` requires `foreign_key`",
            ));
        }
        let column = if kind == FieldKind::ForeignKey {
            format!("{ident}_id")
        } else {
            ident.to_string()
        };

        Ok(Self {
            column,
            ty: ty.clone(),
            kind,
            nullable: attrs.nullable || inner.is_some(),
            default: attrs.default,
            max_length: attrs.max_length,
            target: attrs.foreign_key,
            on_delete: attrs.on_delete,
            ident,
        })
    }

    /// The match pattern accepted by `value`/`set_value`.
    fn pattern(&self) -> TokenStream2 {
        let column = &self.column;
        let name = self.ident.to_string();
        if *column == name {
            quote! { #column }
        } else {
            quote! { #column | #name }
        }
    }

    /// Expression building the field descriptor.
    fn descriptor(&self) -> TokenStream2 {
        let mut descriptor = match self.kind {
            FieldKind::Integer => quote! { ::quill_core::fields::IntegerField::new() },
            FieldKind::Float => quote! { ::quill_core::fields::FloatField::new() },
            FieldKind::Char => {
                let max_length = self
                    .max_length
                    .as_ref()
                    .map_or_else(|| quote! { 255 }, |n| quote! { #n });
                quote! { ::quill_core::fields::CharField::new(#max_length) }
            }
            FieldKind::Text => quote! { ::quill_core::fields::TextField::new() },
            FieldKind::Boolean => quote! { ::quill_core::fields::BooleanField::new() },
            FieldKind::DateTime => quote! { ::quill_core::fields::DateTimeField::new() },
            FieldKind::ForeignKey => {
                let target = &self.target;
                let mut fk = quote! {
                    ::quill_core::fields::ForeignKey::new(<#target as ::quill_core::Model>::TABLE)
                };
                if let Some(action) = &self.on_delete {
                    fk = quote! { #fk.on_delete(::quill_core::fields::OnDelete::#action) };
                }
                fk
            }
        };
        if self.nullable {
            descriptor = quote! { #descriptor.nullable() };
        }
        if let Some(default) = &self.default {
            descriptor = quote! {
                #descriptor.with_default(::quill_core::ToSqlValue::to_sql_value(#default))
            };
        }
        descriptor
    }
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let kind = [
                ("integer", FieldKind::Integer),
                ("float", FieldKind::Float),
                ("char", FieldKind::Char),
                ("text", FieldKind::Text),
                ("boolean", FieldKind::Boolean),
                ("datetime", FieldKind::DateTime),
            ]
            .into_iter()
            .find(|(name, _)| meta.path.is_ident(name));

            if let Some((_, kind)) = kind {
                result.kind = Some(kind);
            } else if meta.path.is_ident("nullable") {
                result.nullable = true;
            } else if meta.path.is_ident("default") {
                result.default = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("max_length") {
                result.max_length = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("foreign_key") {
                result.foreign_key = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("on_delete") {
                let action: LitStr = meta.value()?.parse()?;
                let variant = on_delete_variant(&action.value())
                    .ok_or_else(|| syn::Error::new_spanned(&action, "unknown ON DELETE action"))?;
                result.on_delete = Some(format_ident!("{}", variant));
            } else {
                return Err(meta.error("unsupported field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// Maps an ON DELETE action to its `OnDelete` variant name.
///
/// Accepts exactly the spellings of `quill_core::fields::OnDelete::parse`;
/// `derive_model.rs` checks the two agree.
fn on_delete_variant(action: &str) -> Option<&'static str> {
    let normalized = action.split_whitespace().collect::<Vec<_>>().join(" ");
    match normalized.to_ascii_uppercase().as_str() {
        "CASCADE" => Some("Cascade"),
        "RESTRICT" | "PROTECT" => Some("Protect"),
        "SET NULL" => Some("SetNull"),
        "SET DEFAULT" => Some("SetDefault"),
        "NO ACTION" | "DO NOTHING" => Some("DoNothing"),
        _ => None,
    }
}

/// Returns `T` for a type spelled `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn infer_kind(ty: &Type) -> Option<FieldKind> {
    let Type::Path(path) = ty else {
        return None;
    };
    let ident = path.path.segments.last()?.ident.to_string();
    match ident.as_str() {
        "String" => Some(FieldKind::Char),
        "i16" | "i32" | "i64" => Some(FieldKind::Integer),
        "f32" | "f64" => Some(FieldKind::Float),
        "bool" => Some(FieldKind::Boolean),
        "DateTime" => Some(FieldKind::DateTime),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name() {
        assert_eq!(table_name("Message"), "messages_message");
        assert_eq!(table_name("Job"), "jobs_job");
        assert_eq!(table_name("BlogPost"), "blogposts_blogpost");
    }

    #[test]
    fn test_on_delete_variant() {
        assert_eq!(on_delete_variant("set null"), Some("SetNull"));
        assert_eq!(on_delete_variant("DO  NOTHING"), Some("DoNothing"));
        assert_eq!(on_delete_variant("nope"), None);
    }

    #[test]
    fn test_option_inner_and_inference() {
        let ty: Type = syn::parse_quote!(Option<i32>);
        let inner = option_inner(&ty).map(infer_kind);
        assert!(matches!(inner, Some(Some(FieldKind::Integer))));

        let ty: Type = syn::parse_quote!(chrono::DateTime<chrono::Utc>);
        assert!(option_inner(&ty).is_none());
        assert!(matches!(infer_kind(&ty), Some(FieldKind::DateTime)));

        let ty: Type = syn::parse_quote!(Vec<u8>);
        assert!(infer_kind(&ty).is_none());
    }
}
