//! #[derive(RowShaped)] implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Type};

use crate::{get_attribute, parse_attribute_string};

/// Column kinds the derive understands, mirroring `rowforge_core::ColumnType`.
#[derive(Clone, Copy, PartialEq)]
enum Kind {
    I64,
    F64,
    Bool,
    String,
    Decimal,
    DateTime,
    Date,
}

pub fn expand_derive(input: DeriveInput) -> Result<TokenStream, Error> {
    let name = &input.ident;
    let name_str = name.to_string();
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    &input,
                    "#[derive(RowShaped)] requires named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input,
                "#[derive(RowShaped)] only works on structs",
            ))
        }
    };

    let mut columns = Vec::new();
    let mut arms = Vec::new();

    for (idx, field) in fields.iter().enumerate() {
        let ident = field.ident.as_ref().unwrap();
        let attr = get_attribute(&field.attrs, "column");
        let column_name = attr
            .and_then(|a| parse_attribute_string(a, "rename"))
            .unwrap_or_else(|| ident.to_string());
        let kind_override = attr.and_then(|a| parse_attribute_string(a, "kind"));

        let (optional, inner) = unwrap_option(&field.ty);
        let kind = resolve_kind(field, inner, kind_override.as_deref())?;

        let variant = match kind {
            Kind::I64 => quote! { I64 },
            Kind::F64 => quote! { F64 },
            Kind::Bool => quote! { Bool },
            Kind::String => quote! { String },
            Kind::Decimal => quote! { Decimal },
            Kind::DateTime => quote! { DateTime },
            Kind::Date => quote! { Date },
        };

        columns.push(quote! {
            ::rowforge::Column::new(#column_name, ::rowforge::ColumnType::#variant)
        });

        let extract = match kind {
            Kind::I64 => quote! { value.as_i64() },
            Kind::F64 => quote! { value.as_f64() },
            Kind::Bool => quote! { value.as_bool() },
            Kind::String => quote! { value.as_str().map(::std::string::ToString::to_string) },
            Kind::Decimal => quote! { value.as_decimal() },
            Kind::DateTime => quote! { value.as_datetime() },
            Kind::Date => quote! { value.as_date() },
        };

        let assign = if optional {
            quote! { ::core::option::Option::Some(v) }
        } else {
            quote! { v }
        };

        arms.push(quote! {
            #idx => {
                if value.is_none() {
                    self.#ident = ::core::default::Default::default();
                    ::core::result::Result::Ok(())
                } else {
                    match #extract {
                        ::core::option::Option::Some(v) => {
                            self.#ident = #assign;
                            ::core::result::Result::Ok(())
                        }
                        ::core::option::Option::None => ::core::result::Result::Err(
                            ::rowforge::mismatch(&Self::columns()[#idx], &value),
                        ),
                    }
                }
            }
        });
    }

    let expanded = quote! {
        impl #impl_generics ::rowforge::RowShaped for #name #ty_generics #where_clause {
            const SHAPE_NAME: &'static str = #name_str;

            fn columns() -> &'static [::rowforge::Column] {
                const COLUMNS: &[::rowforge::Column] = &[ #(#columns),* ];
                COLUMNS
            }

            fn apply(
                &mut self,
                field_idx: usize,
                value: ::rowforge::Value,
            ) -> ::rowforge::Result<()> {
                match field_idx {
                    #(#arms)*
                    _ => ::core::result::Result::Err(::rowforge::RowForgeError::Internal(
                        ::std::format!(
                            "field index {} out of range for {}",
                            field_idx,
                            Self::SHAPE_NAME,
                        ),
                    )),
                }
            }
        }
    };

    Ok(expanded)
}

/// Peels `Option<T>`, reporting whether the field was optional.
fn unwrap_option(ty: &Type) -> (bool, &Type) {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return (true, inner);
                    }
                }
            }
        }
    }
    (false, ty)
}

fn resolve_kind(
    field: &syn::Field,
    inner: &Type,
    kind_override: Option<&str>,
) -> Result<Kind, Error> {
    let base = base_type_name(inner);

    match kind_override {
        Some("datetime") => {
            if base.as_deref() == Some("i64") {
                Ok(Kind::DateTime)
            } else {
                Err(Error::new_spanned(
                    field,
                    "kind = \"datetime\" requires an i64 field (milliseconds since epoch)",
                ))
            }
        }
        Some("date") => {
            if base.as_deref() == Some("i32") {
                Ok(Kind::Date)
            } else {
                Err(Error::new_spanned(
                    field,
                    "kind = \"date\" requires an i32 field (days since epoch)",
                ))
            }
        }
        Some(other) => Err(Error::new_spanned(
            field,
            format!("unknown column kind '{other}' (expected \"datetime\" or \"date\")"),
        )),
        None => match base.as_deref() {
            Some("i64") => Ok(Kind::I64),
            Some("f64") => Ok(Kind::F64),
            Some("bool") => Ok(Kind::Bool),
            Some("String") => Ok(Kind::String),
            Some("Decimal") => Ok(Kind::Decimal),
            _ => Err(Error::new_spanned(
                field,
                "unsupported field type for RowShaped; expected i64, f64, bool, String, \
                 Decimal, or Option of one of these",
            )),
        },
    }
}

fn base_type_name(ty: &Type) -> Option<String> {
    if let Type::Path(type_path) = ty {
        type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
    } else {
        None
    }
}
