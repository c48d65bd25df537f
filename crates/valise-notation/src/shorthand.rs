use valise_core::{Arg, DirectiveMap, DirectiveValue};

/// Parsed form of a shorthand string: the type name and its directives in
/// source order.
pub struct Shorthand {
    pub kind: String,
    pub directives: DirectiveMap,
}

/// Parse the compact grammar `type[:directive[,directive...]]` where each
/// directive is `name` or `name=literal`.
///
/// The grammar is total: every string yields a type name, and unknown type
/// names are rejected later against the engine. A literal is an integer
/// iff it is all ASCII digits after trimming; everything else stays a
/// string. Empty directive segments (a trailing comma, a bare `:`) are
/// dropped.
pub fn parse(notation: &str) -> Shorthand {
    let (kind, rest) = match notation.split_once(':') {
        Some((kind, rest)) => (kind, Some(rest)),
        None => (notation, None),
    };

    let mut directives = DirectiveMap::new();
    if let Some(rest) = rest {
        for segment in rest.split(',') {
            if segment.is_empty() {
                continue;
            }
            match segment.split_once('=') {
                None => directives.insert(segment, DirectiveValue::Flag),
                Some((name, literal)) => {
                    directives.insert(name, DirectiveValue::Value(parse_literal(literal)));
                }
            }
        }
    }

    Shorthand {
        kind: kind.to_string(),
        directives,
    }
}

fn parse_literal(literal: &str) -> Arg {
    let trimmed = literal.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        // Digits past i64 fall back to the string form.
        if let Ok(value) = trimmed.parse::<i64>() {
            return Arg::Int(value);
        }
    }
    Arg::Str(literal.to_string())
}
