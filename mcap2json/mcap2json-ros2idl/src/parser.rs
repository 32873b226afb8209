//! Tolerant IDL scanning built from `nom` combinators.
//!
//! Only two shapes are recognized: record declarations
//! (`struct Name { ... }`) and field statements inside a record body
//! (`Type name;`, `Type name = default;`). Everything else is skipped, so
//! unsupported IDL constructs never fail a whole schema.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag, take_till},
    character::complete::{alpha1, alphanumeric1, char, digit0, multispace0, multispace1},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};

use crate::lex::{is_ident_continue, is_ident_start};

/// Keyword that opens a record declaration.
const RECORD_KEYWORD: &str = "struct";

/// Statements inside a record body that look like fields but are not.
const SKIPPED_STATEMENTS: [&str; 2] = ["const", "typedef"];

/// A record declaration located in IDL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDecl<'a> {
    pub name: &'a str,
    /// Text between the outer braces, nested blocks included.
    pub body: &'a str,
}

/// A raw `(type, name)` pair as written in the IDL body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    pub ty: &'a str,
    pub name: &'a str,
}

/// Parse an identifier (alphanumeric + underscore, must start with alpha or _)
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Parse a field type token: `a::b::C`, optionally followed by `[N]` or `[]`.
fn type_token(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        identifier,
        many0(preceded(tag("::"), identifier)),
        opt(delimited(char('['), digit0, char(']'))),
    )))(input)
}

/// Parse a double-quoted literal. Escapes are not interpreted.
fn string_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((char('"'), take_till(|c: char| c == '"'), char('"'))))(input)
}

/// Parse `= value` up to (not including) the statement delimiter.
/// Semicolons inside string literals do not end the value.
fn default_value(input: &str) -> IResult<&str, &str> {
    preceded(
        tuple((multispace0, char('='), multispace0)),
        recognize(many0(alt((string_literal, is_not("\";"))))),
    )(input)
}

/// Parse a field statement: `type name [= value];`
fn field_decl(input: &str) -> IResult<&str, RawField<'_>> {
    map(
        tuple((
            type_token,
            multispace1,
            identifier,
            opt(default_value),
            multispace0,
            char(';'),
        )),
        |(ty, _, name, _, _, _)| RawField { ty, name },
    )(input)
}

/// Parse a record opening: `struct Name {`
fn record_open(input: &str) -> IResult<&str, &str> {
    map(
        tuple((tag(RECORD_KEYWORD), multispace1, identifier, multispace0, char('{'))),
        |(_, _, name, _, _)| name,
    )(input)
}

/// Find every record declaration in `text`, outer records before the records
/// nested inside them. Declarations without a matching close brace are dropped.
pub fn record_declarations(text: &str) -> Vec<RecordDecl<'_>> {
    let mut out = Vec::new();
    let mut prev: Option<char> = None;

    for (idx, ch) in text.char_indices() {
        let at_boundary = !prev.is_some_and(is_ident_continue);
        prev = Some(ch);
        if !at_boundary || !text[idx..].starts_with(RECORD_KEYWORD) {
            continue;
        }
        let Ok((after_open, name)) = record_open(&text[idx..]) else {
            continue;
        };
        if let Some((body, _)) = split_block(after_open) {
            out.push(RecordDecl { name, body });
        }
    }
    out
}

/// Scan a record body for field statements in order.
///
/// Non-matching text is skipped one character at a time. Nested brace blocks,
/// string literals and `const`/`typedef` statements are stepped over whole.
pub fn scan_fields(body: &str) -> Vec<RawField<'_>> {
    let mut fields = Vec::new();
    let mut rest = body;
    let mut prev: Option<char> = None;

    while let Some(ch) = rest.chars().next() {
        let at_boundary = !prev.is_some_and(is_ident_continue);

        let skip_to = match ch {
            '{' => Some(split_block(&rest[1..]).map_or("", |(_, after)| after)),
            '"' => Some(skip_string(&rest[1..])),
            c if at_boundary && is_ident_start(c) && starts_skipped_statement(rest) => {
                Some(rest.find(';').map_or("", |i| &rest[i + 1..]))
            }
            _ => None,
        };
        if let Some(after) = skip_to {
            rest = after;
            prev = None;
            continue;
        }

        if at_boundary && let Ok((after, field)) = field_decl(rest) {
            fields.push(field);
            rest = after;
            prev = Some(';');
            continue;
        }

        prev = Some(ch);
        rest = &rest[ch.len_utf8()..];
    }
    fields
}

fn starts_skipped_statement(input: &str) -> bool {
    identifier(input).is_ok_and(|(_, word)| SKIPPED_STATEMENTS.contains(&word))
}

/// Split `input` (positioned just after an opening brace) into the block body
/// and the text after its matching close brace.
fn split_block(input: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    let mut in_str = false;
    let mut escaped = false;

    for (idx, ch) in input.char_indices() {
        if in_str {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }
        match ch {
            '"' => in_str = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[..idx], &input[idx + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Return the text after the closing quote of a string literal whose opening
/// quote has already been consumed.
fn skip_string(input: &str) -> &str {
    let mut escaped = false;
    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            return &input[idx + 1..];
        }
    }
    ""
}
