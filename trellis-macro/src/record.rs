use crate::naming::RenameRule;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Error, Fields, GenericParam, Index, LitStr, Member, Path,
    Result, parse_macro_input, parse_quote, spanned::Spanned,
};

pub fn record_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

struct ContainerOptions {
    rename_all: Option<RenameRule>,
    krate: Path,
}

#[derive(Default)]
struct FieldOptions {
    rename: Option<String>,
    skip: bool,
}

fn container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions {
        rename_all: None,
        krate: parse_quote!(::trellis_validation),
    };

    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename_all = Some(RenameRule::parse(&value.value(), value.span())?);
            } else if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                options.krate = value.parse()?;
            } else {
                return Err(meta.error(
                    "unknown record attribute; expected `rename_all` or `crate`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

fn field_options(attrs: &[Attribute]) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else {
                return Err(meta.error("unknown record field attribute; expected `rename` or `skip`"));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

fn expand(mut input: DeriveInput) -> Result<TokenStream2> {
    let options = container_options(&input.attrs)?;
    let krate = &options.krate;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(Error::new(
                data.enum_token.span(),
                "Record can only be derived for structs",
            ));
        }
        Data::Union(data) => {
            return Err(Error::new(
                data.union_token.span(),
                "Record can only be derived for structs",
            ));
        }
    };

    let mut names = Vec::new();
    let mut members = Vec::new();

    let entries: Vec<_> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| {
                let ident = field.ident.clone().ok_or_else(|| {
                    Error::new(field.span(), "named field without an identifier")
                })?;
                let raw = ident.to_string();
                let raw = raw.strip_prefix("r#").unwrap_or(&raw).to_string();
                let default = match options.rename_all {
                    Some(rule) => rule.apply(&raw),
                    None => raw,
                };
                Ok((field, default, Member::Named(ident)))
            })
            .collect::<Result<_>>()?,
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, field)| Ok((field, i.to_string(), Member::Unnamed(Index::from(i)))))
            .collect::<Result<_>>()?,
        Fields::Unit => Vec::new(),
    };

    for (field, default, member) in entries {
        let field_opts = field_options(&field.attrs)?;
        if field_opts.skip {
            continue;
        }
        let name = field_opts.rename.unwrap_or(default);
        if names.contains(&name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate record field name: \"{}\"", name),
            ));
        }
        names.push(name);
        members.push(member);
    }

    // Generic fields are walked like any other, so they need `Reflect` too.
    let type_params: Vec<_> = input
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();
    let where_clause = input.generics.make_where_clause();
    for ident in &type_params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: #krate::Reflect));
    }

    let ident = &input.ident;
    let record_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn record_name(&self) -> &'static str {
                #record_name
            }

            fn field(&self, name: &str) -> ::core::option::Option<&dyn #krate::Reflect> {
                match name {
                    #( #names => ::core::option::Option::Some(&self.#members), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #krate::Reflect> {
                match name {
                    #( #names => ::core::option::Option::Some(&mut self.#members), )*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics #krate::Reflect for #ident #ty_generics #where_clause {
            fn node(&self) -> #krate::Node<'_> {
                #krate::Node::Record(self)
            }

            fn node_mut(&mut self) -> #krate::NodeMut<'_> {
                #krate::NodeMut::Record(self)
            }

            fn assign(
                &mut self,
                value: #krate::FieldValue,
            ) -> ::core::result::Result<(), #krate::TypeMismatch> {
                ::core::result::Result::Err(#krate::TypeMismatch::new(#record_name, value.kind()))
            }

            fn from_value(
                value: #krate::FieldValue,
            ) -> ::core::result::Result<Self, #krate::TypeMismatch> {
                ::core::result::Result::Err(#krate::TypeMismatch::new(#record_name, value.kind()))
            }
        }
    };

    Ok(expanded)
}
