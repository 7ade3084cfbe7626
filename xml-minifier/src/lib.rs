use proc_macro::{TokenStream, TokenTree};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quote::quote;
use std::fs;
use std::path::PathBuf;

/// Minifies an XML file at compile time and embeds it as a `&'static str`.
///
/// The path is resolved relative to the manifest directory of the crate that
/// invokes the macro. The file is also pulled in through `include_bytes!` so
/// that editing a template triggers a rebuild.
///
/// ```ignore
/// pub fn theme_xml() -> &'static str {
///     minified_xml!("resources/pptx/theme/theme1.xml")
/// }
/// ```
#[proc_macro]
pub fn minified_xml(input: TokenStream) -> TokenStream {
    let file_path = input_to_string(input);

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .unwrap_or_else(|_| panic!("CARGO_MANIFEST_DIR is not set while expanding minified_xml!"));
    let target_path = PathBuf::from(manifest_dir).join(&file_path);

    let canonical_path = target_path
        .canonicalize()
        .unwrap_or_else(|e| panic!("Failed to canonicalize file path '{}': {}", file_path, e));

    let xml_content = fs::read_to_string(&canonical_path)
        .unwrap_or_else(|e| panic!("Failed to read XML file '{}': {}", file_path, e));

    let minified = minify_xml(&xml_content)
        .unwrap_or_else(|e| panic!("Failed to minify XML from '{}': {}", file_path, e));

    let tracked = canonical_path.to_string_lossy().into_owned();

    TokenStream::from(quote! {
        {
            const _: &[u8] = include_bytes!(#tracked);
            #minified
        }
    })
}

fn input_to_string(input: TokenStream) -> String {
    let token_trees: Vec<_> = input.into_iter().collect();
    if token_trees.len() != 1 {
        panic!("Expected exactly one token tree, got {}", token_trees.len());
    }
    let Some(TokenTree::Literal(literal)) = token_trees.first() else {
        panic!("Expected a string literal");
    };
    literal_to_string(literal.to_string())
}

/// Strip the quoting from a string literal token, unescaping plain literals.
fn literal_to_string(mut literal: String) -> String {
    if !literal.starts_with('r') {
        literal = literal
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\r", "\r")
            .replace("\\t", "\t")
            .replace("\\\\", "\\")
    }

    let (Some(first), Some(last)) = (literal.find('"'), literal.rfind('"')) else {
        panic!("Invalid string literal");
    };
    if first >= last {
        panic!("Invalid string literal");
    }
    literal[first + 1..last].to_string()
}

/// Single-pass minifier.
///
/// A start tag is held back until the next event: if that event is its own
/// end tag the pair is written as an empty element, otherwise the start tag is
/// flushed first. Entity references are written back untouched.
fn minify_xml(xml: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut output = Vec::with_capacity(xml.len() / 2);
    let mut pending: Option<BytesStart<'static>> = None;

    loop {
        let event = reader.read_event()?;

        if let Event::End(ref e) = event
            && let Some(start) = pending.take()
        {
            if start.name() == e.name() {
                write_tag(&mut output, &start, b"/>")?;
                continue;
            }
            write_tag(&mut output, &start, b">")?;
        }

        match event {
            Event::Eof => break,
            Event::Comment(_) | Event::PI(_) => continue,
            Event::Text(ref e) if is_whitespace_only(e.as_ref()) => continue,
            _ => {},
        }

        if let Some(start) = pending.take() {
            write_tag(&mut output, &start, b">")?;
        }

        match event {
            Event::Decl(e) => {
                output.extend_from_slice(b"<?");
                output.extend_from_slice(e.as_ref());
                output.extend_from_slice(b"?>");
            },
            Event::DocType(e) => {
                output.extend_from_slice(b"<!DOCTYPE ");
                output.extend_from_slice(e.as_ref());
                output.push(b'>');
            },
            Event::Start(e) => pending = Some(e.into_owned()),
            Event::Empty(e) => write_tag(&mut output, &e, b"/>")?,
            Event::End(e) => {
                output.extend_from_slice(b"</");
                output.extend_from_slice(e.name().as_ref());
                output.push(b'>');
            },
            Event::Text(e) => output.extend_from_slice(e.as_ref()),
            Event::CData(e) => {
                output.extend_from_slice(b"<![CDATA[");
                output.extend_from_slice(e.as_ref());
                output.extend_from_slice(b"]]>");
            },
            Event::GeneralRef(e) => {
                output.push(b'&');
                output.extend_from_slice(e.as_ref());
                output.push(b';');
            },
            Event::Eof | Event::Comment(_) | Event::PI(_) => {},
        }
    }

    if let Some(start) = pending {
        write_tag(&mut output, &start, b">")?;
    }

    Ok(String::from_utf8(output)?)
}

#[inline]
fn write_tag(output: &mut Vec<u8>, tag: &BytesStart<'_>, close: &[u8]) -> Result<(), quick_xml::Error> {
    output.push(b'<');
    output.extend_from_slice(tag.name().as_ref());
    for attr in tag.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        output.push(b' ');
        output.extend_from_slice(attr.key.as_ref());
        output.extend_from_slice(b"=\"");
        output.extend_from_slice(&attr.value);
        output.push(b'"');
    }
    output.extend_from_slice(close);
    Ok(())
}

#[inline]
fn is_whitespace_only(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}
