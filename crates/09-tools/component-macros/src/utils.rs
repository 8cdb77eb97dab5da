//! 宏工具函数

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Expr, ItemStruct, Meta, Result};

/// 名称-值参数
pub struct NamedArg {
    pub name: String,
    pub value: Expr,
}

/// 把参数列表拆成名称-值对，拒绝其他形式
pub fn parse_named_args(args: impl IntoIterator<Item = Meta>) -> Result<Vec<NamedArg>> {
    let mut parsed = Vec::new();
    for meta in args {
        match meta {
            Meta::NameValue(nv) => {
                let Some(ident) = nv.path.get_ident() else {
                    return Err(Error::new_spanned(nv.path, "参数名称必须是标识符"));
                };
                parsed.push(NamedArg {
                    name: ident.to_string(),
                    value: nv.value,
                });
            }
            other => return Err(Error::new_spanned(other, "参数必须是 `名称 = 值` 形式")),
        }
    }
    Ok(parsed)
}

/// 优先级表达式，缺省为 0
pub fn priority_tokens(value: Option<&Expr>) -> TokenStream {
    match value {
        Some(value) => quote! { #value },
        None => quote! { 0 },
    }
}

/// 类型名称表达式，默认使用 Rust 类型路径
pub fn class_name_tokens(input: &ItemStruct, class: Option<&Expr>) -> TokenStream {
    match class {
        Some(class) => quote! { #class },
        None => {
            let ident = &input.ident;
            quote! { ::std::any::type_name::<#ident>() }
        }
    }
}

/// 拒绝泛型结构体
pub fn ensure_not_generic(input: &ItemStruct, macro_name: &str) -> Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::new_spanned(
            &input.generics,
            format!("#[{macro_name}] 不支持泛型结构体"),
        ))
    }
}
