//! Tokenization of formula text using `nom`.
//!
//! Produces a stream of [`Token`]s from a formula such as
//! `=SUM(Sheet2!$A$1:A3)*'Rates 2024'!B2`. The leading `=` and whitespace
//! between tokens are discarded. Characters the lexer does not recognise
//! become [`Token::Unknown`] so that odd formulas still yield their
//! references; only unterminated literals are errors.

use graphedexcel_common::constants::{FUNCTION_PREFIXES, MAX_COLUMN_LETTERS};
use graphedexcel_common::error::{GraphedExcelError, Result};
use graphedexcel_common::types::CellAddress;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1, take_while_m_n},
    character::complete::{anychar, char, digit1, one_of, satisfy},
    combinator::{map, not, opt, peek, recognize, value},
    error::{Error, ErrorKind},
    sequence::{preceded, terminated},
};

use crate::references::RawReference;

/// A token in a spreadsheet formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A double-quoted string literal, unescaped.
    Text(String),
    /// A cell or range reference, optionally sheet-qualified.
    Reference(RawReference),
    /// A function name directly followed by `(`, normalised to upper case.
    Function(String),
    /// Any other name: booleans, defined names, whole-column parts.
    Name(String),
    /// A numeric literal as written.
    Number(String),
    /// An error literal such as `#REF!` or `#N/A`.
    ErrorLiteral(String),
    /// An operator (`+`, `<>`, `:` …).
    Operator(String),
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{` opening an array constant.
    OpenBrace,
    /// `}` closing an array constant.
    CloseBrace,
    /// Argument or array separator (`,` or `;`).
    Separator(char),
    /// A character with no meaning to the lexer.
    Unknown(char),
}

// Sheet and defined names may use any Unicode letter (`Données`, `Übersicht`).
fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '\\'
}

fn is_name_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn is_sheet_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']')
}

/// Reads the body of a literal delimited by `quote`, where a doubled quote
/// stands for one quote character. Returns the text after the closing quote.
fn delimited_body(input: &str, quote: char) -> IResult<&str, String> {
    let (rest, _) = char(quote).parse(input)?;
    let mut body = String::new();
    let mut chars = rest.char_indices().peekable();
    loop {
        match chars.next() {
            Some((idx, c)) if c == quote => {
                if chars.peek().is_some_and(|&(_, next)| next == quote) {
                    let _ = chars.next();
                    body.push(quote);
                    continue;
                }
                return Ok((&rest[idx + c.len_utf8()..], body));
            }
            Some((_, c)) => body.push(c),
            None => return Err(nom::Err::Failure(Error::new(input, ErrorKind::Char))),
        }
    }
}

/// Parses a string literal; `""` inside it is an escaped quote.
fn string_literal(input: &str) -> IResult<&str, Token> {
    let (rest, text) = delimited_body(input, '"')?;
    Ok((rest, Token::Text(text)))
}

fn quoted_name(input: &str) -> IResult<&str, String> {
    delimited_body(input, '\'')
}

/// Parses `'Sheet Name'!`.
fn quoted_sheet(input: &str) -> IResult<&str, String> {
    terminated(quoted_name, char('!')).parse(input)
}

/// Parses `Sheet1!`.
fn unquoted_sheet(input: &str) -> IResult<&str, String> {
    map(terminated(take_while1(is_sheet_char), char('!')), str::to_string).parse(input)
}

fn sheet_prefix(input: &str) -> IResult<&str, String> {
    alt((quoted_sheet, unquoted_sheet)).parse(input)
}

/// Parses an `A1`/`$A$1` address that is not part of a longer name or a
/// function call (`LOG10(` is a function, `ABC1D` a name).
fn cell_address(input: &str) -> IResult<&str, CellAddress> {
    let (rest, text) = recognize((
        opt(char('$')),
        take_while_m_n(1, MAX_COLUMN_LETTERS, |c: char| c.is_ascii_uppercase()),
        opt(char('$')),
        digit1,
    ))
    .parse(input)?;
    let (rest, ()) = not(satisfy(|c| is_name_continue(c) || c == '(' || c == '!')).parse(rest)?;
    let address = CellAddress::parse(text)
        .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Verify)))?;
    Ok((rest, address))
}

/// Parses an optionally sheet-qualified cell or range reference.
fn reference(input: &str) -> IResult<&str, Token> {
    let (rest, (sheet, start, end)) = (
        opt(sheet_prefix),
        cell_address,
        opt(preceded(char(':'), cell_address)),
    )
        .parse(input)?;
    Ok((rest, Token::Reference(RawReference { sheet, start, end })))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize((satisfy(is_name_start), take_while(is_name_continue))).parse(input)
}

/// Strips the storage prefixes Excel adds to newer functions.
fn normalize_function_name(raw: &str) -> String {
    let mut name = raw;
    while let Some(stripped) = FUNCTION_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
    {
        name = stripped;
    }
    name.to_ascii_uppercase()
}

/// Parses a function name; the `(` is left for [`punctuation`].
fn function_call(input: &str) -> IResult<&str, Token> {
    let (rest, name) = terminated(identifier, peek(char('('))).parse(input)?;
    Ok((rest, Token::Function(normalize_function_name(name))))
}

fn name(input: &str) -> IResult<&str, Token> {
    map(identifier, |n: &str| Token::Name(n.to_string())).parse(input)
}

fn number(input: &str) -> IResult<&str, Token> {
    let (rest, text) = recognize((
        take_while1(|c: char| c.is_ascii_digit() || c == '.'),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;
    Ok((rest, Token::Number(text.to_string())))
}

fn error_literal(input: &str) -> IResult<&str, Token> {
    let (rest, text) = recognize((
        char('#'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '/'),
        opt(one_of("!?")),
    ))
    .parse(input)?;
    Ok((rest, Token::ErrorLiteral(text.to_string())))
}

fn operator(input: &str) -> IResult<&str, Token> {
    map(
        alt((
            tag("<>"),
            tag("<="),
            tag(">="),
            recognize(one_of("+-*/^&=<>%:@")),
        )),
        |op: &str| Token::Operator(op.to_string()),
    )
    .parse(input)
}

fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::OpenParen, char('(')),
        value(Token::CloseParen, char(')')),
        value(Token::OpenBrace, char('{')),
        value(Token::CloseBrace, char('}')),
        map(one_of(",;"), Token::Separator),
    ))
    .parse(input)
}

/// Parses a single token (after whitespace has been skipped).
fn single_token(input: &str) -> IResult<&str, Token> {
    alt((
        string_literal,
        error_literal,
        reference,
        function_call,
        name,
        number,
        operator,
        punctuation,
        map(anychar, Token::Unknown),
    ))
    .parse(input)
}

/// Tokenizes a formula. A leading `=` is optional.
///
/// # Errors
///
/// Returns an error if a string literal or quoted sheet name is not
/// terminated.
pub fn tokenize(formula: &str) -> Result<Vec<Token>> {
    let body = formula.trim_start();
    let mut remaining = body.strip_prefix('=').unwrap_or(body);
    let mut tokens = Vec::new();

    loop {
        remaining = remaining.trim_start();
        if remaining.is_empty() {
            break;
        }

        let (rest, token) = single_token(remaining).map_err(|e| GraphedExcelError::Formula {
            formula: formula.to_string(),
            message: match e {
                nom::Err::Failure(err) => format!(
                    "unterminated literal at \"{}\"",
                    err.input.chars().take(20).collect::<String>()
                ),
                other => other.to_string(),
            },
        })?;
        tokens.push(token);
        remaining = rest;
    }

    Ok(tokens)
}
